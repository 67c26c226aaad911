//! Per-state population tallies, one entry per round.
//!
//! The ledger is incremental: opening a round copies every tally forward and each transition
//! then moves one unit from its source state to its destination state. The board is never
//! rescanned, so `Counters::recount` exists only to cross-check the running totals.
use serde::Serialize;
use strum::{EnumCount, IntoEnumIterator};

use crate::grid::Board;
use crate::state::HealthState;

/// Population of every state at one round.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub susceptible: usize,
    pub infected: usize,
    pub immune: usize,
    pub quarantined: usize,
    pub hospitalized: usize,
    pub deceased: usize,
}

impl StateCounts {
    #[must_use]
    pub fn get(&self, state: HealthState) -> usize {
        match state {
            HealthState::Susceptible => self.susceptible,
            HealthState::Infected => self.infected,
            HealthState::Immune => self.immune,
            HealthState::Quarantined => self.quarantined,
            HealthState::Hospitalized => self.hospitalized,
            HealthState::Deceased => self.deceased,
        }
    }

    fn get_mut(&mut self, state: HealthState) -> &mut usize {
        match state {
            HealthState::Susceptible => &mut self.susceptible,
            HealthState::Infected => &mut self.infected,
            HealthState::Immune => &mut self.immune,
            HealthState::Quarantined => &mut self.quarantined,
            HealthState::Hospitalized => &mut self.hospitalized,
            HealthState::Deceased => &mut self.deceased,
        }
    }

    /// Sum over all states. Equals the population whenever the ledger is consistent.
    #[must_use]
    pub fn total(&self) -> usize {
        HealthState::iter().map(|state| self.get(state)).sum()
    }

    /// Infected, quarantined and hospitalized.
    #[must_use]
    pub fn sick(&self) -> usize {
        self.infected + self.quarantined + self.hospitalized
    }

    /// Quarantined and hospitalized.
    #[must_use]
    pub fn diagnosed(&self) -> usize {
        self.quarantined + self.hospitalized
    }
}

/// Append-only count series for every state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    series: [Vec<usize>; HealthState::COUNT],
}

impl Counters {
    /// Starts a new ledger whose round-0 entry is `initial`.
    #[must_use]
    pub fn starting_at(initial: StateCounts) -> Self {
        let mut counters = Counters::default();
        for state in HealthState::iter() {
            counters.series[state.index()].push(initial.get(state));
        }
        counters
    }

    /// Full scan of `board`.
    #[must_use]
    pub fn recount(board: &Board) -> StateCounts {
        let mut counts = StateCounts::default();
        for (_, &state) in board.iter() {
            *counts.get_mut(state) += 1;
        }
        counts
    }

    /// Number of rounds recorded, round 0 included.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.series[0].len()
    }

    /// Appends a new round whose tallies start equal to the previous round's.
    pub fn open_round(&mut self) {
        for series in &mut self.series {
            let last = series.last().copied().unwrap_or_default();
            series.push(last);
        }
    }

    /// Records one individual moving from `from` to `to` in the latest round.
    ///
    /// # Panics
    /// Panics if the ledger has no round yet or if `from` is already at zero, both of which
    /// mean the tallies have drifted from the board.
    pub fn transfer(&mut self, from: HealthState, to: HealthState) {
        let source = self.series[from.index()]
            .last_mut()
            .expect("counters have no open round");
        *source = source
            .checked_sub(1)
            .unwrap_or_else(|| panic!("{from} counter would drop below zero"));
        *self.series[to.index()]
            .last_mut()
            .expect("counters have no open round") += 1;
    }

    /// Latest tally for `state`, or 0 for an empty ledger.
    #[must_use]
    pub fn current(&self, state: HealthState) -> usize {
        self.series[state.index()].last().copied().unwrap_or_default()
    }

    /// Every recorded tally for `state`, indexed by round.
    #[must_use]
    pub fn series(&self, state: HealthState) -> &[usize] {
        &self.series[state.index()]
    }

    /// All tallies at `round`.
    #[must_use]
    pub fn at(&self, round: usize) -> Option<StateCounts> {
        if round >= self.rounds() {
            return None;
        }
        let mut counts = StateCounts::default();
        for state in HealthState::iter() {
            *counts.get_mut(state) = self.series[state.index()][round];
        }
        Some(counts)
    }

    /// Tallies of the latest round.
    #[must_use]
    pub fn latest(&self) -> StateCounts {
        self.rounds()
            .checked_sub(1)
            .and_then(|round| self.at(round))
            .unwrap_or_default()
    }
}
