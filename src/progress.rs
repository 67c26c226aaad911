//! Terminal progress bar for a batch of rounds.
//!
//! Only one progress bar can be active at a time; initializing a second one replaces the
//! first. The `spread` binary draws one bar per run:
//!
//! ```ignore
//! init_rounds_progress_bar(rounds);
//! for _ in 0..rounds {
//!     grid.advance()?;
//!     update_rounds_progress(grid.current_round(), grid.sick_count());
//! }
//! finish_rounds_progress();
//! ```
use crate::log::trace;
use progress_bar::{
    finalize_progress_bar, init_progress_bar, set_progress_bar_action,
    set_progress_bar_progress, Color, Style,
};
use std::sync::atomic::{AtomicUsize, Ordering};

static MAX_ROUNDS: AtomicUsize = AtomicUsize::new(0);

/// Initializes the bar for a run of `rounds` advances. A run of zero rounds gets no bar.
pub fn init_rounds_progress_bar(rounds: usize) {
    if rounds == 0 {
        return;
    }
    trace!("initializing rounds progress bar with {rounds} rounds");
    MAX_ROUNDS.store(rounds, Ordering::Relaxed);
    init_progress_bar(rounds);
    set_progress_bar_action("Rounds", Color::Blue, Style::Bold);
}

/// Moves the bar to `round` of the current run and shows the sick count as its label.
/// Finalizes the bar once `round` reaches the maximum. Does nothing without an active bar.
pub fn update_rounds_progress(round: usize, sick: usize) {
    let max_rounds = MAX_ROUNDS.load(Ordering::Relaxed);
    if max_rounds == 0 {
        return;
    }
    let round = round.min(max_rounds);
    set_progress_bar_action(&format!("Sick {sick:>6}"), Color::Blue, Style::Bold);
    set_progress_bar_progress(round);
    if round == max_rounds {
        finish_rounds_progress();
    }
}

/// Finalizes the bar early, e.g. when a run is interrupted by an error.
pub fn finish_rounds_progress() {
    if MAX_ROUNDS.swap(0, Ordering::Relaxed) > 0 {
        finalize_progress_bar();
    }
}
