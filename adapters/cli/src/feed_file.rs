use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use silk_road_core::EventFeed;

/// On-disk shapes accepted for a feed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedFile {
    /// Contest matrix: `[1, position]` or `[2, position, tenges]` rows.
    Rows(Vec<Vec<i64>>),
    /// Tagged placements as serialized by [`EventFeed`].
    Events(EventFeed),
}

/// Reads and parses the feed stored at the provided path.
pub(crate) fn load_feed(path: &Path) -> Result<EventFeed> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read feed file {}", path.display()))?;
    parse_feed(&text).with_context(|| format!("invalid feed file {}", path.display()))
}

pub(crate) fn parse_feed(text: &str) -> Result<EventFeed> {
    let file: FeedFile = serde_json::from_str(text)
        .context("feed must be a JSON array of rows or placements")?;
    match file {
        FeedFile::Rows(rows) => Ok(EventFeed::from_rows(&rows)?),
        FeedFile::Events(feed) => Ok(feed),
    }
}

#[cfg(test)]
mod tests {
    use silk_road_core::{ContestEvent, Position, Tenge};

    use super::*;

    #[test]
    fn parses_contest_matrix() {
        let feed = parse_feed("[[1, 20], [2, 15, 15]]").expect("valid feed");

        assert_eq!(
            feed,
            EventFeed::new(vec![
                ContestEvent::Robot {
                    position: Position::new(20)
                },
                ContestEvent::Store {
                    position: Position::new(15),
                    tenges: Tenge::new(15),
                },
            ])
        );
    }

    #[test]
    fn parses_tagged_events() {
        let feed = parse_feed(r#"[{"store": {"position": 4, "tenges": 50}}]"#)
            .expect("valid feed");

        assert_eq!(
            feed.get(0),
            Some(&ContestEvent::Store {
                position: Position::new(4),
                tenges: Tenge::new(50),
            })
        );
    }

    #[test]
    fn empty_array_is_an_empty_feed() {
        assert!(parse_feed("[]").expect("valid feed").is_empty());
    }

    #[test]
    fn malformed_rows_are_reported() {
        let error = parse_feed("[[7, 1]]").expect_err("unknown kind");
        assert!(error.to_string().contains("unknown entity kind 7"));

        assert!(parse_feed("{\"robot\": 1}").is_err());
    }

    #[test]
    fn missing_file_mentions_the_path() {
        let path = Path::new("definitely/not/a/feed.json");
        let error = load_feed(path).expect_err("missing file");

        assert!(error.to_string().contains("definitely/not/a/feed.json"));
    }
}
