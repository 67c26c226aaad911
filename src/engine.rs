//! The epidemic engine.
//!
//! `EpidemicGrid` owns the board history, the per-cell infection dates, the per-state
//! counters and the random streams. A driver calls [`EpidemicGrid::reset`] to place the
//! round-0 population and then [`EpidemicGrid::advance`] once per round.
//!
//! Within a round every cell is evaluated against the board of the *previous* round, in
//! row-major order. For a cell infected at round `d`, `elapsed = round - d` selects which
//! delay-triggered transition may fire; the first transition that fires ends the cell's
//! evaluation for the round:
//!
//! * `Quarantined`: immune at `contagion_delay`, else hospitalized with probability
//!   `hospitalization_rate` at `hospitalization_delay`.
//! * `Hospitalized`: deceased with probability `mortality_rate / hospitalization_rate` at
//!   `mortality_delay`, else immune at `contagion_delay`.
//! * `Infected`: quarantined with probability `quarantine_rate` at `diagnosis_delay`, else
//!   hospitalized with probability `hospitalization_rate` at `hospitalization_delay`, else
//!   immune at `contagion_delay`, else it tries to infect each susceptible Moore neighbour
//!   with probability `contagion_rate`.
//!
//! A susceptible cell next to several infected cells gets one draw per infected neighbour;
//! the first success infects it and later successes in the same round are ignored.
use crate::counters::{Counters, StateCounts};
use crate::define_rng;
use crate::error::SpreadError;
use crate::grid::{Board, Coord, Grid};
use crate::log::{debug, info, trace};
use crate::neighbors::moore_neighbors;
use crate::parameters::Parameters;
use crate::random::{RandomStreams, RngId};
use crate::state::HealthState;

define_rng!(SeedingRng);
define_rng!(ProgressionRng);
define_rng!(TransmissionRng);

/// Infection date given to the seed infections placed before round 0.
pub const GENESIS_ROUND: i64 = -1;

/// A bounded board of individuals, its history since round 0 and the per-state counters.
pub struct EpidemicGrid {
    length: usize,
    width: usize,
    parameters: Parameters,
    history: Vec<Board>,
    infection_dates: Grid<i64>,
    counters: Counters,
    current_round: usize,
    seed_collisions: usize,
    streams: RandomStreams,
}

impl EpidemicGrid {
    /// Creates a `size × size` engine with default parameters and random seed 0, and places
    /// the round-0 population.
    ///
    /// # Errors
    /// Returns `SpreadError::InvalidConfiguration` if `size` is zero.
    pub fn new(size: usize, cluster_count: usize) -> Result<Self, SpreadError> {
        Self::with_seed(size, cluster_count, 0)
    }

    /// Same as [`EpidemicGrid::new`] with an explicit base random seed.
    ///
    /// # Errors
    /// Returns `SpreadError::InvalidConfiguration` if `size` is zero.
    pub fn with_seed(size: usize, cluster_count: usize, seed: u64) -> Result<Self, SpreadError> {
        Self::with_dimensions(size, size, cluster_count, seed)
    }

    /// Creates a `length × width` engine with default parameters and places the round-0
    /// population.
    ///
    /// # Errors
    /// Returns `SpreadError::InvalidConfiguration` if either side is zero.
    pub fn with_dimensions(
        length: usize,
        width: usize,
        cluster_count: usize,
        seed: u64,
    ) -> Result<Self, SpreadError> {
        let parameters = Parameters {
            cluster_count,
            ..Parameters::default()
        };
        Self::with_parameters(length, width, parameters, seed)
    }

    /// Creates an engine with the given parameters and places the round-0 population.
    ///
    /// # Errors
    /// Returns `SpreadError::InvalidConfiguration` if either side is zero.
    pub fn with_parameters(
        length: usize,
        width: usize,
        parameters: Parameters,
        seed: u64,
    ) -> Result<Self, SpreadError> {
        let mut grid = Self::unseeded(length, width, parameters, seed)?;
        grid.reset();
        Ok(grid)
    }

    /// Creates an engine without a round-0 board. Parameters can be adjusted before the first
    /// call to [`EpidemicGrid::reset`]; calling [`EpidemicGrid::advance`] first is an error.
    ///
    /// # Errors
    /// Returns `SpreadError::InvalidConfiguration` if either side is zero or the board area
    /// overflows `usize`.
    pub fn unseeded(
        length: usize,
        width: usize,
        parameters: Parameters,
        seed: u64,
    ) -> Result<Self, SpreadError> {
        if length == 0 || width == 0 {
            return Err(SpreadError::InvalidConfiguration(format!(
                "board must have at least one cell, got {length}x{width}"
            )));
        }
        if length.checked_mul(width).is_none() {
            return Err(SpreadError::InvalidConfiguration(format!(
                "a {length}x{width} board is too large"
            )));
        }
        Ok(EpidemicGrid {
            length,
            width,
            parameters,
            history: Vec::new(),
            infection_dates: Grid::filled(length, width, 0),
            counters: Counters::default(),
            current_round: 0,
            seed_collisions: 0,
            streams: RandomStreams::new(seed),
        })
    }

    /// Starts a run from a prepared round-0 board instead of random placement. Every sick
    /// cell on `board` is treated as infected at [`GENESIS_ROUND`].
    ///
    /// A later [`EpidemicGrid::reset`] discards `board` and places a random population.
    ///
    /// # Errors
    /// Returns `SpreadError::InvalidConfiguration` if `board` has no cells.
    pub fn from_board(
        board: Board,
        parameters: Parameters,
        seed: u64,
    ) -> Result<Self, SpreadError> {
        if board.area() == 0 {
            return Err(SpreadError::InvalidConfiguration(
                "board must have at least one cell".to_string(),
            ));
        }
        let mut infection_dates = Grid::filled(board.length(), board.width(), 0);
        for (coord, state) in board.iter() {
            if state.is_sick() {
                infection_dates[coord] = GENESIS_ROUND;
            }
        }
        Ok(EpidemicGrid {
            length: board.length(),
            width: board.width(),
            parameters,
            counters: Counters::starting_at(Counters::recount(&board)),
            history: vec![board],
            infection_dates,
            current_round: 0,
            seed_collisions: 0,
            streams: RandomStreams::new(seed),
        })
    }

    /// Places a fresh round-0 population using the current immunity rate and cluster count.
    /// The board size and the other parameters are left untouched.
    ///
    /// Each cell is immune with probability `immunity_rate`. Then `cluster_count` cells are
    /// drawn uniformly *with replacement* and set to infected, overriding immunity. Two seeds
    /// can land on the same cell; such collisions are counted by
    /// [`EpidemicGrid::seed_collisions`] and the cell is infected only once.
    pub fn reset(&mut self) {
        let mut board = Board::filled(self.length, self.width, HealthState::Susceptible);
        for x in 0..self.length {
            for y in 0..self.width {
                if self
                    .streams
                    .sample_bool(SeedingRng, self.parameters.immunity_rate)
                {
                    board[Coord::new(x, y)] = HealthState::Immune;
                }
            }
        }

        self.infection_dates.fill(0);
        self.seed_collisions = 0;
        for _ in 0..self.parameters.cluster_count {
            let coord = Coord::new(
                self.streams.sample_range(SeedingRng, 0..self.length),
                self.streams.sample_range(SeedingRng, 0..self.width),
            );
            if board[coord] == HealthState::Infected {
                trace!("seed cluster landed again on {coord}");
                self.seed_collisions += 1;
            }
            board[coord] = HealthState::Infected;
            self.infection_dates[coord] = GENESIS_ROUND;
        }

        let initial = Counters::recount(&board);
        debug!(
            "reset {}x{} board: {} infected, {} immune, {} seed collisions",
            self.length, self.width, initial.infected, initial.immune, self.seed_collisions
        );
        self.counters = Counters::starting_at(initial);
        self.history = vec![board];
        self.current_round = 0;
    }

    /// Computes the next round, appends it to the history and returns it.
    ///
    /// # Errors
    /// Returns `SpreadError::NotSeeded` if no round-0 board has been placed yet.
    pub fn advance(&mut self) -> Result<&Board, SpreadError> {
        let current = self.history.last().ok_or(SpreadError::NotSeeded)?;

        if let Some(start) = self.parameters.social_distancing_round {
            if start as usize == self.current_round {
                info!(
                    "social distancing starts at round {}: contagion rate {} -> {}",
                    self.current_round,
                    self.parameters.contagion_rate,
                    self.parameters.social_distancing_contagion_rate
                );
                self.parameters.contagion_rate = self.parameters.social_distancing_contagion_rate;
            }
        }

        self.counters.open_round();
        let mut step = RoundStep {
            current,
            next: current.clone(),
            newly_infected: Grid::filled(self.length, self.width, false),
            parameters: &self.parameters,
            round: self.current_round as i64,
            infection_dates: &mut self.infection_dates,
            counters: &mut self.counters,
            streams: &mut self.streams,
        };
        step.run();
        let next = step.next;

        self.history.push(next);
        self.current_round += 1;
        trace!(
            "advanced to round {}: {} sick",
            self.current_round,
            self.counters.latest().sick()
        );
        Ok(&self.history[self.current_round])
    }

    /// Advances `rounds` times and returns the final tallies.
    ///
    /// # Errors
    /// Returns `SpreadError::NotSeeded` if no round-0 board has been placed yet.
    pub fn run(&mut self, rounds: usize) -> Result<StateCounts, SpreadError> {
        for _ in 0..rounds {
            self.advance()?;
        }
        Ok(self.counts())
    }

    /// Re-seeds every random stream. Call [`EpidemicGrid::reset`] afterwards to replay a run
    /// from the start.
    pub fn reseed(&mut self, seed: u64) {
        self.streams.reseed(seed);
    }

    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.streams.base_seed()
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Parameter changes take effect at the next call to `advance` (or `reset` for the
    /// immunity rate and cluster count).
    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.parameters = parameters;
    }

    #[must_use]
    pub fn r0(&self) -> f64 {
        self.parameters.r0()
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.length * self.width
    }

    #[must_use]
    pub fn current_round(&self) -> usize {
        self.current_round
    }

    #[must_use]
    pub fn last_board(&self) -> Option<&Board> {
        self.history.last()
    }

    #[must_use]
    pub fn board_at(&self, round: usize) -> Option<&Board> {
        self.history.get(round)
    }

    /// Every board since round 0.
    #[must_use]
    pub fn history(&self) -> &[Board] {
        &self.history
    }

    /// Round at which the cell at `coord` was infected, if it is currently sick.
    #[must_use]
    pub fn infection_date(&self, coord: Coord) -> Option<i64> {
        let state = self.last_board()?.get(coord)?;
        state.is_sick().then(|| self.infection_dates[coord])
    }

    /// Number of seeds at the last reset that hit an already seeded cell.
    #[must_use]
    pub fn seed_collisions(&self) -> usize {
        self.seed_collisions
    }

    #[must_use]
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Tallies of the current round.
    #[must_use]
    pub fn counts(&self) -> StateCounts {
        self.counters.latest()
    }

    #[must_use]
    pub fn counts_at(&self, round: usize) -> Option<StateCounts> {
        self.counters.at(round)
    }

    #[must_use]
    pub fn count(&self, state: HealthState) -> usize {
        self.counters.current(state)
    }

    #[must_use]
    pub fn deceased_count(&self) -> usize {
        self.count(HealthState::Deceased)
    }

    #[must_use]
    pub fn infected_count(&self) -> usize {
        self.count(HealthState::Infected)
    }

    #[must_use]
    pub fn quarantined_count(&self) -> usize {
        self.count(HealthState::Quarantined)
    }

    #[must_use]
    pub fn hospitalized_count(&self) -> usize {
        self.count(HealthState::Hospitalized)
    }

    /// Infected, hospitalized and quarantined.
    #[must_use]
    pub fn sick_count(&self) -> usize {
        self.counts().sick()
    }

    /// Hospitalized and quarantined.
    #[must_use]
    pub fn diagnosed_count(&self) -> usize {
        self.counts().diagnosed()
    }

    #[must_use]
    pub fn series(&self, state: HealthState) -> &[usize] {
        self.counters.series(state)
    }

    #[must_use]
    pub fn infected_series(&self) -> &[usize] {
        self.series(HealthState::Infected)
    }

    #[must_use]
    pub fn hospitalized_series(&self) -> &[usize] {
        self.series(HealthState::Hospitalized)
    }

    #[must_use]
    pub fn quarantined_series(&self) -> &[usize] {
        self.series(HealthState::Quarantined)
    }

    #[must_use]
    pub fn deceased_series(&self) -> &[usize] {
        self.series(HealthState::Deceased)
    }
}

/// Working state for one call to `advance`. Reads `current`, writes `next`.
struct RoundStep<'a> {
    current: &'a Board,
    next: Board,
    newly_infected: Grid<bool>,
    parameters: &'a Parameters,
    round: i64,
    infection_dates: &'a mut Grid<i64>,
    counters: &'a mut Counters,
    streams: &'a mut RandomStreams,
}

impl RoundStep<'_> {
    fn run(&mut self) {
        for x in 0..self.current.length() {
            for y in 0..self.current.width() {
                let coord = Coord::new(x, y);
                match self.current[coord] {
                    HealthState::Quarantined => self.quarantined(coord),
                    HealthState::Hospitalized => self.hospitalized(coord),
                    HealthState::Infected => self.infected(coord),
                    HealthState::Susceptible | HealthState::Immune | HealthState::Deceased => {}
                }
            }
        }
    }

    fn elapsed_is(&self, coord: Coord, delay: u32) -> bool {
        self.round - self.infection_dates[coord] == i64::from(delay)
    }

    fn draw<R: RngId>(&mut self, rng_id: R, p: f64) -> bool {
        self.streams.sample_bool(rng_id, p)
    }

    fn transition(&mut self, coord: Coord, from: HealthState, to: HealthState) {
        self.next[coord] = to;
        self.counters.transfer(from, to);
    }

    fn quarantined(&mut self, coord: Coord) {
        let params = self.parameters;
        if self.elapsed_is(coord, params.contagion_delay) {
            self.transition(coord, HealthState::Quarantined, HealthState::Immune);
        } else if self.elapsed_is(coord, params.hospitalization_delay)
            && self.draw(ProgressionRng, params.hospitalization_rate)
        {
            self.transition(coord, HealthState::Quarantined, HealthState::Hospitalized);
        }
    }

    fn hospitalized(&mut self, coord: Coord) {
        let params = self.parameters;
        if self.elapsed_is(coord, params.mortality_delay)
            && self.draw(ProgressionRng, params.hospital_mortality())
        {
            self.transition(coord, HealthState::Hospitalized, HealthState::Deceased);
        } else if self.elapsed_is(coord, params.contagion_delay) {
            self.transition(coord, HealthState::Hospitalized, HealthState::Immune);
        }
    }

    fn infected(&mut self, coord: Coord) {
        let params = self.parameters;
        if self.elapsed_is(coord, params.diagnosis_delay)
            && self.draw(ProgressionRng, params.quarantine_rate)
        {
            self.transition(coord, HealthState::Infected, HealthState::Quarantined);
        } else if self.elapsed_is(coord, params.hospitalization_delay)
            && self.draw(ProgressionRng, params.hospitalization_rate)
        {
            self.transition(coord, HealthState::Infected, HealthState::Hospitalized);
        } else if self.elapsed_is(coord, params.contagion_delay) {
            self.transition(coord, HealthState::Infected, HealthState::Immune);
        } else {
            self.spread_from(coord);
        }
    }

    fn spread_from(&mut self, coord: Coord) {
        let rate = self.parameters.contagion_rate;
        for neighbor in moore_neighbors(coord, self.current.length(), self.current.width()) {
            if self.current[neighbor] != HealthState::Susceptible {
                continue;
            }
            if self.draw(TransmissionRng, rate) && !self.newly_infected[neighbor] {
                self.newly_infected[neighbor] = true;
                self.infection_dates[neighbor] = self.round;
                self.transition(neighbor, HealthState::Susceptible, HealthState::Infected);
            }
        }
    }
}
