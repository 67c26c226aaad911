//! A probabilistic cellular automaton for disease spread on a 2-D population grid
//!
//! Every cell of a bounded `length × width` board holds one individual in a
//! [`HealthState`]. Round 0 places a partly immune population and a handful of seed
//! infections; each call to [`EpidemicGrid::advance`] then derives the next board from the
//! previous one:
//! * infected cells try to infect their susceptible Moore neighbours,
//! * infected cells may be diagnosed (quarantined) or hospitalized once a delay elapses,
//! * hospitalized cells may die,
//! * every sick cell that survives long enough becomes immune.
//!
//! The engine keeps the full board history and per-state counters for every round, so a
//! driver can chart the epidemic curve or replay any round. All randomness comes from named
//! streams derived from one base seed, which makes a run reproducible:
//!
//! ```
//! use spread::{EpidemicGrid, HealthState};
//!
//! let mut grid = EpidemicGrid::with_seed(30, 3, 42).unwrap();
//! grid.run(60).unwrap();
//! assert_eq!(grid.current_round(), 60);
//! assert_eq!(grid.counts().total(), grid.population());
//! println!("{} deceased", grid.count(HealthState::Deceased));
//! ```
//!
//! The `spread` binary wraps the engine in a command line driver (see [`runner`]) and can
//! write the per-round counts as CSV (see [`report`]).
pub mod counters;
pub mod engine;
pub mod error;
pub mod grid;
pub mod log;
pub mod neighbors;
pub mod parameters;
#[cfg(feature = "progress_bar")]
pub mod progress;
pub mod random;
pub mod report;
pub mod runner;
pub mod state;

pub use counters::{Counters, StateCounts};
pub use engine::{EpidemicGrid, GENESIS_ROUND};
pub use error::SpreadError;
pub use grid::{Board, Coord, Grid};
pub use neighbors::moore_neighbors;
pub use parameters::Parameters;
pub use state::HealthState;

// Re-exported for use in macros
pub use rand;
