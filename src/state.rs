//! The health state carried by every cell of the board.
//!
//! An individual moves along a directed graph of states:
//!
//! * `Susceptible` -> `Infected`
//! * `Infected` -> `Quarantined` | `Hospitalized` | `Immune`
//! * `Quarantined` -> `Hospitalized` | `Immune`
//! * `Hospitalized` -> `Deceased` | `Immune`
//!
//! `Immune` and `Deceased` are terminal: a cell in either state never changes again, and no
//! state leads back to `Susceptible`.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    IntoStaticStr,
)]
pub enum HealthState {
    #[default]
    Susceptible,
    Infected,
    Immune,
    Quarantined,
    Hospitalized,
    Deceased,
}

impl HealthState {
    /// Dense index of the state, used to address per-state tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Infected, quarantined and hospitalized cells carry the disease and have a
    /// meaningful infection date.
    #[must_use]
    pub const fn is_sick(self) -> bool {
        matches!(
            self,
            HealthState::Infected | HealthState::Quarantined | HealthState::Hospitalized
        )
    }

    #[must_use]
    pub const fn is_diagnosed(self) -> bool {
        matches!(self, HealthState::Quarantined | HealthState::Hospitalized)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, HealthState::Immune | HealthState::Deceased)
    }
}
