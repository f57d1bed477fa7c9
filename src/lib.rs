//! # Preparar: Run-Configuration Resolver
//!
//! Preparar turns a partial, declarative set of training-run parameters into
//! an immutable, fully-validated [`RunConfig`] that a downstream training
//! harness can consume without further interpretation. It covers the
//! configuration of a character-level generative model trained on a code
//! dataset: model shape, batching, learning-rate schedule, evaluation and
//! logging cadence, experiment tracking, and compute device.
//!
//! ## Architecture
//!
//! - **schema**: the closed parameter set, default table, and the partial /
//!   resolved record types
//! - **probe**: injectable accelerator detection with a bounded-timeout host
//!   implementation and a deterministic fake
//! - **resolve**: merge-over-defaults, device resolution, and cross-field
//!   validation
//! - **load**: YAML parameter files
//! - **cli**: command-line interface for the `preparar` binary
//!
//! ## Example
//!
//! ```
//! use preparar::{resolve, FixedProbe, PartialRunConfig};
//!
//! let partial = PartialRunConfig {
//!     batch_size: Some(32),
//!     ..Default::default()
//! };
//!
//! let config = resolve(&partial, &FixedProbe::absent())?;
//! assert_eq!(config.batch_size(), 32);
//! assert_eq!(config.context_length(), 512);
//! # Ok::<(), preparar::ResolveError>(())
//! ```

pub mod cli;
pub mod load;
pub mod probe;
pub mod resolve;
pub mod schema;

pub mod error;

#[cfg(test)]
mod property_tests;
#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use cli::{
    apply_overrides, parse_args, Cli, Command, DefaultsArgs, OutputFormat, ResolveArgs,
    ValidateArgs,
};
pub use error::{Error, Result};
pub use load::{load_partial, resolve_file};
pub use probe::{AcceleratorProbe, FixedProbe, HostProbe, ProbeOutcome};
pub use resolve::{advisories, resolve, resolve_auto, ResolveError};
pub use schema::{defaults, ComputeDevice, DevicePreference, PartialRunConfig, RunConfig};
