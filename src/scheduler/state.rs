//! Mutable placement state.
//!
//! `PlacementGrid` tracks which branch-semester cohorts already sit an
//! exam on each date; `CapacityLedger` tracks cumulative student load
//! per (date, slot, campus) against the session ceiling. Both start
//! empty and are mutated only by the scheduling passes, in pass order.
//! `SchedulerContext` bundles them with the config and date window so
//! no state is ambient.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{BranchSem, ConfigError, DateWindow, EngineConfig};

/// Date → occupied branch-semester keys.
#[derive(Debug, Clone, Default)]
pub struct PlacementGrid {
    occupied: HashMap<NaiveDate, HashSet<BranchSem>>,
}

impl PlacementGrid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether none of the keys already sit an exam on the date.
    pub fn is_free<'a>(
        &self,
        date: NaiveDate,
        keys: impl IntoIterator<Item = &'a BranchSem>,
    ) -> bool {
        match self.occupied.get(&date) {
            Some(taken) => keys.into_iter().all(|k| !taken.contains(k)),
            None => true,
        }
    }

    /// Marks the keys as examined on the date.
    pub fn occupy<'a>(&mut self, date: NaiveDate, keys: impl IntoIterator<Item = &'a BranchSem>) {
        let taken = self.occupied.entry(date).or_default();
        for key in keys {
            taken.insert(key.clone());
        }
    }

    /// Clears the keys from the date (relocation support).
    pub fn release<'a>(&mut self, date: NaiveDate, keys: impl IntoIterator<Item = &'a BranchSem>) {
        if let Some(taken) = self.occupied.get_mut(&date) {
            for key in keys {
                taken.remove(key);
            }
            if taken.is_empty() {
                self.occupied.remove(&date);
            }
        }
    }

    /// Number of keys occupied on a date.
    pub fn occupancy(&self, date: NaiveDate) -> usize {
        self.occupied.get(&date).map_or(0, HashSet::len)
    }
}

/// Cumulative student load per (date, slot, campus).
#[derive(Debug, Clone)]
pub struct CapacityLedger {
    totals: HashMap<(NaiveDate, u8), BTreeMap<String, u32>>,
    max_per_session: u32,
}

impl CapacityLedger {
    /// Creates an empty ledger with the given session ceiling.
    pub fn new(max_per_session: u32) -> Self {
        Self {
            totals: HashMap::new(),
            max_per_session,
        }
    }

    /// Current load for one (date, slot, campus) cell.
    pub fn load(&self, date: NaiveDate, slot: u8, campus: &str) -> u32 {
        self.totals
            .get(&(date, slot))
            .and_then(|by_campus| by_campus.get(campus))
            .copied()
            .unwrap_or(0)
    }

    /// Whether adding the per-campus delta keeps every campus within
    /// the ceiling.
    pub fn fits(&self, date: NaiveDate, slot: u8, delta: &BTreeMap<String, u32>) -> bool {
        delta
            .iter()
            .all(|(campus, add)| self.load(date, slot, campus) + add <= self.max_per_session)
    }

    /// Applies the per-campus delta. Never rolled back automatically;
    /// relocation debits the old cell explicitly.
    pub fn commit(&mut self, date: NaiveDate, slot: u8, delta: &BTreeMap<String, u32>) {
        let by_campus = self.totals.entry((date, slot)).or_default();
        for (campus, add) in delta {
            *by_campus.entry(campus.clone()).or_insert(0) += add;
        }
    }

    /// Removes the per-campus delta from a cell.
    pub fn debit(&mut self, date: NaiveDate, slot: u8, delta: &BTreeMap<String, u32>) {
        if let Some(by_campus) = self.totals.get_mut(&(date, slot)) {
            for (campus, sub) in delta {
                if let Some(current) = by_campus.get_mut(campus) {
                    *current = current.saturating_sub(*sub);
                }
            }
        }
    }
}

/// All state one engine run threads through its phases.
///
/// Replaces the ambient per-session globals of spreadsheet-era tooling
/// with one explicit value: nothing outside this struct is mutated.
#[derive(Debug, Clone)]
pub struct SchedulerContext {
    /// Validated run configuration.
    pub config: EngineConfig,
    /// Eligible dates, core/reserved split applied.
    pub window: DateWindow,
    /// Branch-semester occupancy per date.
    pub grid: PlacementGrid,
    /// Student load per (date, slot, campus).
    pub ledger: CapacityLedger,
}

impl SchedulerContext {
    /// Validates the config and builds the date window and empty
    /// placement state.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let window = DateWindow::build(
            config.start_date,
            config.end_date,
            &config.holidays,
            config.reserved_elective_days,
        );
        let ledger = CapacityLedger::new(config.max_students_per_session);
        Ok(Self {
            config,
            window,
            grid: PlacementGrid::new(),
            ledger,
        })
    }
}
