//! Configuration resolution
//!
//! Transforms a [`PartialRunConfig`] into a validated [`RunConfig`]:
//! explicit values are merged over the default table, the compute device is
//! resolved through the injected probe, and every cross-field invariant is
//! checked. Resolution is a single-shot, stateless transformation; for a
//! fixed probe answer the same input always yields an identical record.

use crate::probe::{AcceleratorProbe, HostProbe, ProbeOutcome};
use crate::schema::{defaults, ComputeDevice, DevicePreference, PartialRunConfig, RunConfig};

/// Resolution error type
///
/// Configuration errors are not transient: they are surfaced immediately and
/// never retried or silently corrected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Invalid value for {field}: {value} ({constraint})")]
    InvalidConfiguration {
        field: &'static str,
        value: String,
        constraint: &'static str,
    },
}

impl ResolveError {
    /// Name of the offending parameter
    pub fn field(&self) -> &str {
        match self {
            ResolveError::UnknownParameter(name) => name,
            ResolveError::InvalidConfiguration { field, .. } => field,
        }
    }
}

fn invalid(field: &'static str, value: impl ToString, constraint: &'static str) -> ResolveError {
    ResolveError::InvalidConfiguration {
        field,
        value: value.to_string(),
        constraint,
    }
}

fn positive(field: &'static str, value: usize) -> Result<usize, ResolveError> {
    if value == 0 {
        return Err(invalid(field, value, "must be > 0"));
    }
    Ok(value)
}

fn resolve_device(preference: DevicePreference, probe: &dyn AcceleratorProbe) -> ComputeDevice {
    match preference {
        DevicePreference::Accelerator => ComputeDevice::Accelerator,
        DevicePreference::Cpu => ComputeDevice::Cpu,
        DevicePreference::Auto => match probe.detect() {
            ProbeOutcome::Present => ComputeDevice::Accelerator,
            // Ambiguous detection falls back to cpu, never to an error.
            ProbeOutcome::Absent | ProbeOutcome::Indeterminate => ComputeDevice::Cpu,
        },
    }
}

/// Resolve a partial configuration into a frozen [`RunConfig`]
///
/// Checks, in order:
/// - the input contains no unrecognized keys
/// - every count and interval field is positive
/// - `head_count` evenly divides `embedding_width`
/// - `dropout_rate` is in `[0, 1)`, `beta2` in `(0, 1)`
/// - `learning_rate` is positive and finite, `min_lr` positive and below it
/// - `warmup_iters` does not exceed `lr_decay_iters`
/// - tracking, when enabled, has explicitly supplied, non-empty project and
///   run names (the defaulted names do not satisfy the pairing)
///
/// The probe is consulted only when `compute_device` is unset or `auto`.
pub fn resolve(
    partial: &PartialRunConfig,
    probe: &dyn AcceleratorProbe,
) -> Result<RunConfig, ResolveError> {
    if let Some(name) = partial.extra.keys().next() {
        return Err(ResolveError::UnknownParameter(name.clone()));
    }

    let output_directory = partial
        .output_directory
        .clone()
        .unwrap_or_else(|| defaults::OUTPUT_DIRECTORY.to_string());
    let eval_interval = partial.eval_interval.unwrap_or(defaults::EVAL_INTERVAL);
    let eval_iters = partial.eval_iters.unwrap_or(defaults::EVAL_ITERS);
    let log_interval = partial.log_interval.unwrap_or(defaults::LOG_INTERVAL);
    let experiment_tracking_enabled = partial
        .experiment_tracking_enabled
        .unwrap_or(defaults::EXPERIMENT_TRACKING_ENABLED);
    let experiment_project_name = partial
        .experiment_project_name
        .clone()
        .unwrap_or_else(|| defaults::EXPERIMENT_PROJECT_NAME.to_string());
    let experiment_run_name = partial
        .experiment_run_name
        .clone()
        .unwrap_or_else(|| defaults::EXPERIMENT_RUN_NAME.to_string());
    let dataset_identifier = partial
        .dataset_identifier
        .clone()
        .unwrap_or_else(|| defaults::DATASET_IDENTIFIER.to_string());
    let gradient_accumulation_steps = partial
        .gradient_accumulation_steps
        .unwrap_or(defaults::GRADIENT_ACCUMULATION_STEPS);
    let batch_size = partial.batch_size.unwrap_or(defaults::BATCH_SIZE);
    let context_length = partial.context_length.unwrap_or(defaults::CONTEXT_LENGTH);
    let layer_count = partial.layer_count.unwrap_or(defaults::LAYER_COUNT);
    let head_count = partial.head_count.unwrap_or(defaults::HEAD_COUNT);
    let embedding_width = partial.embedding_width.unwrap_or(defaults::EMBEDDING_WIDTH);
    let dropout_rate = partial.dropout_rate.unwrap_or(defaults::DROPOUT_RATE);
    let learning_rate = partial.learning_rate.unwrap_or(defaults::LEARNING_RATE);
    let max_iters = partial.max_iters.unwrap_or(defaults::MAX_ITERS);
    let lr_decay_iters = partial.lr_decay_iters.unwrap_or(defaults::LR_DECAY_ITERS);
    let min_lr = partial.min_lr.unwrap_or(defaults::MIN_LR);
    let beta2 = partial.beta2.unwrap_or(defaults::BETA2);
    let warmup_iters = partial.warmup_iters.unwrap_or(defaults::WARMUP_ITERS);
    let preference = partial.compute_device.unwrap_or_default();
    let use_compilation = partial.use_compilation.unwrap_or(defaults::USE_COMPILATION);

    // The probe is the only side effect of resolution; validation below is
    // pure and performs no I/O.
    let compute_device = resolve_device(preference, probe);

    if output_directory.is_empty() {
        return Err(invalid(
            "output_directory",
            "\"\"",
            "must be a non-empty path",
        ));
    }

    positive("eval_interval", eval_interval)?;
    positive("eval_iters", eval_iters)?;
    positive("log_interval", log_interval)?;
    positive("gradient_accumulation_steps", gradient_accumulation_steps)?;
    positive("batch_size", batch_size)?;
    positive("context_length", context_length)?;
    positive("layer_count", layer_count)?;
    positive("head_count", head_count)?;
    positive("embedding_width", embedding_width)?;
    positive("max_iters", max_iters)?;
    positive("lr_decay_iters", lr_decay_iters)?;

    if batch_size
        .checked_mul(gradient_accumulation_steps)
        .is_none()
    {
        return Err(invalid(
            "gradient_accumulation_steps",
            gradient_accumulation_steps,
            "batch_size * gradient_accumulation_steps must not overflow",
        ));
    }

    if embedding_width % head_count != 0 {
        return Err(invalid(
            "head_count",
            head_count,
            "must evenly divide embedding_width",
        ));
    }

    if !(0.0..1.0).contains(&dropout_rate) {
        return Err(invalid(
            "dropout_rate",
            dropout_rate,
            "must be in [0, 1)",
        ));
    }

    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(invalid(
            "learning_rate",
            learning_rate,
            "must be a positive finite number",
        ));
    }

    if !(min_lr.is_finite() && min_lr > 0.0) {
        return Err(invalid(
            "min_lr",
            min_lr,
            "must be a positive finite number",
        ));
    }

    if min_lr >= learning_rate {
        return Err(invalid(
            "min_lr",
            min_lr,
            "must be < learning_rate",
        ));
    }

    if !(beta2 > 0.0 && beta2 < 1.0) {
        return Err(invalid("beta2", beta2, "must be in (0, 1)"));
    }

    if warmup_iters > lr_decay_iters {
        return Err(invalid(
            "warmup_iters",
            warmup_iters,
            "must be <= lr_decay_iters",
        ));
    }

    // The pairing is checked against the supplied input, not the merged
    // values: defaulted names must not satisfy it, or enabling tracking
    // without naming the run would silently pass.
    if experiment_tracking_enabled {
        for (field, supplied) in [
            ("experiment_project_name", &partial.experiment_project_name),
            ("experiment_run_name", &partial.experiment_run_name),
        ] {
            match supplied.as_deref() {
                Some(name) if !name.is_empty() => {}
                Some(_) => {
                    return Err(invalid(
                        field,
                        "\"\"",
                        "must be non-empty when experiment_tracking_enabled is true",
                    ))
                }
                None => {
                    return Err(invalid(
                        field,
                        "unset",
                        "must be supplied when experiment_tracking_enabled is true",
                    ))
                }
            }
        }
    }

    Ok(RunConfig {
        output_directory,
        eval_interval,
        eval_iters,
        log_interval,
        experiment_tracking_enabled,
        experiment_project_name,
        experiment_run_name,
        dataset_identifier,
        gradient_accumulation_steps,
        batch_size,
        context_length,
        layer_count,
        head_count,
        embedding_width,
        dropout_rate,
        learning_rate,
        max_iters,
        lr_decay_iters,
        min_lr,
        beta2,
        warmup_iters,
        compute_device,
        use_compilation,
    })
}

/// Resolve against the host hardware with the default bounded-timeout probe
pub fn resolve_auto(partial: &PartialRunConfig) -> Result<RunConfig, ResolveError> {
    resolve(partial, &HostProbe::default())
}

/// Non-fatal findings about a resolved configuration
///
/// A decay horizon past `max_iters` is legal (the reference run uses
/// `lr_decay_iters == max_iters`) but a longer horizon usually means the
/// schedule never reaches `min_lr`; it is reported here instead of rejected.
pub fn advisories(config: &RunConfig) -> Vec<String> {
    let mut notes = Vec::new();

    if config.lr_decay_iters() > config.max_iters() {
        notes.push(format!(
            "lr_decay_iters ({}) exceeds max_iters ({}); the learning rate will still be decaying when training stops",
            config.lr_decay_iters(),
            config.max_iters()
        ));
    }

    notes
}
