use std::collections::BTreeMap;

use silk_road_core::{LedgerEntry, Position, Tenge};

/// Last collection observed at every destination, keyed by position.
#[derive(Clone, Debug, Default)]
pub(crate) struct ProfitLedger {
    entries: BTreeMap<Position, (Tenge, Tenge)>,
}

impl ProfitLedger {
    /// Records a collection, overwriting any earlier one at the same destination.
    pub(crate) fn record(&mut self, position: Position, before: Tenge, after: Tenge) {
        let _ = self.entries.insert(position, (before, after));
    }

    pub(crate) fn entries(&self) -> Vec<LedgerEntry> {
        self.entries
            .iter()
            .map(|(&position, &(before, after))| LedgerEntry {
                position,
                before,
                after,
            })
            .collect()
    }
}
