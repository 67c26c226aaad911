//! The `log` module configures the process-wide logger used by the engine and the command line
//! driver. Logging describes what the simulation is doing internally; the per-round counts
//! that a user charts belong to the [`report`](crate::report) module instead.
//!
//! The five logging macros are re-exported here: `error!`, `warn!`, `info!`, `debug!` and
//! `trace!`, from highest to lowest priority. The engine emits:
//!
//!  - `debug`: a summary of every `reset()` (immune cells, seeds, seed collisions)
//!  - `info`: the round social distancing starts
//!  - `trace`: every `advance()`, every RNG stream created, parameter and report files opened
//!
//! Logging is _disabled_ by default. The `spread` binary enables it with `--log-level <level>`
//! or `-v`. From code, use:
//!
//!  - `enable_logging()`: turns on all log messages
//!  - `disable_logging()`: turns off all log messages
//!  - `set_log_level(level: LevelFilter)`: enables only log messages with priority at least `level`
//!
//! Per-module filtering is configured with `set_module_filter()` / `set_module_filters()` and
//! `remove_module_filter()`:
//!
//! ```rust
//! use spread::log::{set_module_filter, set_log_level, LevelFilter};
//!
//! pub fn setup_logging() {
//!     // Enable `info` log messages globally.
//!     set_log_level(LevelFilter::Info);
//!     // Show every round, but keep RNG chatter quiet.
//!     set_module_filter("spread::engine", LevelFilter::Trace);
//!     set_module_filter("spread::random", LevelFilter::Warn);
//! }
//! ```
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(all(feature = "logging", feature = "progress_bar"))]
mod progress_bar_encoder;

#[cfg(not(feature = "logging"))]
mod null_logger;

pub use log::{debug, error, info, trace, warn, LevelFilter};
use std::collections::hash_map::Entry;

#[cfg(feature = "logging")]
use log4rs::Handle;
use rustc_hash::FxHashMap;
use std::sync::LazyLock;
use std::sync::{Mutex, MutexGuard};

// Logging disabled
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;

/// A global instance of the logging configuration.
static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// A level filter applied to the messages of one module path (e.g. `"spread::engine"`).
#[derive(Debug, PartialEq)]
struct ModuleLogConfiguration {
    module: String,
    level: LevelFilter,
}

impl From<(&str, LevelFilter)> for ModuleLogConfiguration {
    fn from((module, level): (&str, LevelFilter)) -> Self {
        Self {
            module: module.to_string(),
            level,
        }
    }
}

/// Tracks the global level, the per-module filters and the handle to the installed logger.
///
/// Loggers are installed process-wide, so only the singleton behind `LOG_CONFIGURATION`
/// exists. The public API are free functions that lock it and forward the call.
#[derive(Debug)]
pub(in crate::log) struct LogConfiguration {
    /// Level for targets without a module filter. `LevelFilter::Off` disables logging.
    pub(in crate::log) global_log_level: LevelFilter,
    pub(in crate::log) module_configurations: FxHashMap<String, ModuleLogConfiguration>,

    #[cfg(feature = "logging")]
    root_handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            global_log_level: DEFAULT_LOG_LEVEL,
            module_configurations: FxHashMap::default(),

            #[cfg(feature = "logging")]
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    pub(in crate::log) fn set_log_level(&mut self, level: LevelFilter) {
        self.global_log_level = level;
        self.set_config();
    }

    /// Returns true if the configuration was mutated, false otherwise.
    fn insert_module_filter(&mut self, module: &str, level: LevelFilter) -> bool {
        match self.module_configurations.entry(module.to_string()) {
            Entry::Occupied(mut entry) => {
                let module_config = entry.get_mut();
                if module_config.level == level {
                    return false;
                }
                module_config.level = level;
            }
            Entry::Vacant(entry) => {
                entry.insert((module, level).into());
            }
        }
        true
    }

    pub(in crate::log) fn set_module_filter(&mut self, module: &str, level: LevelFilter) {
        if self.insert_module_filter(module, level) {
            self.set_config();
        }
    }

    pub(in crate::log) fn set_module_filters<S: AsRef<str>>(
        &mut self,
        module_filters: &[(S, LevelFilter)],
    ) {
        let mut mutated = false;
        for (module, level) in module_filters {
            mutated |= self.insert_module_filter(module.as_ref(), *level);
        }
        if mutated {
            self.set_config();
        }
    }

    pub(in crate::log) fn remove_module_filter(&mut self, module: &str) {
        if self.module_configurations.remove(module).is_some() {
            self.set_config();
        }
    }
}

// The public API

/// Enables the logger with no global level filter / full logging. Equivalent to
/// `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level. A global filter level of `LevelFilter::Off` disables logging.
pub fn set_log_level(level: LevelFilter) {
    get_log_configuration().set_log_level(level);
}

/// Sets a level filter for the given module path.
pub fn set_module_filter(module_path: &str, level_filter: LevelFilter) {
    get_log_configuration().set_module_filter(module_path, level_filter);
}

/// Removes a module-specific level filter for the given module path. The global level filter will
/// apply to the module.
pub fn remove_module_filter(module_path: &str) {
    get_log_configuration().remove_module_filter(module_path);
}

/// Sets the level filters for a set of modules. Use this instead of `set_module_filter()` to set
/// filters in bulk; the logger is rebuilt at most once.
pub fn set_module_filters<S: AsRef<str>>(module_filters: &[(S, LevelFilter)]) {
    get_log_configuration().set_module_filters(module_filters);
}

/// The current global level.
pub fn log_level() -> LevelFilter {
    get_log_configuration().global_log_level
}

fn get_log_configuration() -> MutexGuard<'static, LogConfiguration> {
    LOG_CONFIGURATION.lock().expect("Mutex poisoned")
}
