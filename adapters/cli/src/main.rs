#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays Silk Road contest feeds.

mod feed_file;
mod trace_canvas;

use std::{path::PathBuf, thread, time::Duration};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use silk_road_core::EventFeed;
use silk_road_rendering::{Canvas, NoopCanvas, RoadPresenter};
use silk_road_system_contest::{Contest, Replay, ReplayFrame};
use silk_road_world::{query, SpiralConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{feed_file::load_feed, trace_canvas::TraceCanvas};

/// Replays robot and store placements on the Silk Road.
#[derive(Debug, Parser)]
#[command(name = "silk-road", version)]
struct Cli {
    /// Tracing filter directive; overrides `RUST_LOG` when provided.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replays a feed and prints the profit recorded after every step as JSON.
    Solve {
        /// JSON file holding the feed.
        #[arg(long, env = "SILK_ROAD_FEED")]
        feed: PathBuf,
    },
    /// Replays a feed one step at a time, printing each step as it completes.
    Simulate {
        /// JSON file holding the feed.
        #[arg(long, env = "SILK_ROAD_FEED")]
        feed: PathBuf,
        /// Pause between steps in milliseconds.
        #[arg(long, env = "SILK_ROAD_INTERVAL_MS", default_value_t = 0)]
        interval_ms: u64,
        /// Logs every canvas call the presenter makes.
        #[arg(long)]
        render: bool,
    },
}

/// Entry point for the Silk Road command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    match cli.command {
        Commands::Solve { feed } => solve(&load_feed(&feed)?),
        Commands::Simulate {
            feed,
            interval_ms,
            render,
        } => simulate(
            load_feed(&feed)?,
            Duration::from_millis(interval_ms),
            render,
        ),
    }
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log level '{directive}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!(error))
}

fn solve(feed: &EventFeed) -> Result<()> {
    let profits = Contest::solve(feed);
    println!("{}", serde_json::to_string(&profits)?);
    Ok(())
}

fn simulate(feed: EventFeed, interval: Duration, render: bool) -> Result<()> {
    let mut replay = Replay::new(feed);
    let mut canvas: Box<dyn Canvas> = if render {
        Box::new(TraceCanvas::default())
    } else {
        Box::new(NoopCanvas::default())
    };
    let mut presenter = RoadPresenter::new(SpiralConfig::DEFAULT_CELL_SIZE as f32)?;

    let road = replay.road();
    presenter.draw_road(
        canvas.as_mut(),
        query::layout(road).coordinates(),
        &query::robot_view(road),
        &query::store_view(road),
    )?;

    while !replay.is_finished() {
        let mut failure = None;
        let mut observer = |frame: &ReplayFrame<'_>| {
            debug!(
                step = frame.step,
                phase = ?frame.phase,
                events = frame.events.len(),
                "replay frame"
            );
            if failure.is_none() {
                failure = presenter.apply_events(canvas.as_mut(), frame.events).err();
            }
        };

        let profit = replay.step(Some(&mut observer));
        if let Some(error) = failure {
            return Err(error.context("failed to present replay frame"));
        }
        if let Some(profit) = profit {
            println!("{}\t{}", replay.steps_taken(), profit);
        }

        if !interval.is_zero() && !replay.is_finished() {
            thread::sleep(interval);
        }
    }

    info!(
        steps = replay.steps_taken(),
        best = replay.profits().iter().max().map(|profit| profit.get()),
        "simulation finished"
    );
    Ok(())
}
