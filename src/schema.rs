//! Run-configuration schema
//!
//! Defines the closed parameter set for a training run: the partial input
//! record (`PartialRunConfig`), the fully-resolved immutable record
//! (`RunConfig`), the device enums, and the default table.
//!
//! The parameter set is closed: keys outside the recognized set are captured
//! during deserialization and rejected at resolution time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default value for every recognized parameter.
///
/// These are the literal values of the reference character-level
/// code-generation run: 8-layer, 8-head, 512-wide model over a 512-token
/// context, trained for 5000 iterations with cosine decay to `MIN_LR`.
pub mod defaults {
    pub const OUTPUT_DIRECTORY: &str = "out-code-generation";
    pub const EVAL_INTERVAL: usize = 250;
    pub const EVAL_ITERS: usize = 100;
    pub const LOG_INTERVAL: usize = 50;
    pub const EXPERIMENT_TRACKING_ENABLED: bool = false;
    pub const EXPERIMENT_PROJECT_NAME: &str = "code-generation";
    pub const EXPERIMENT_RUN_NAME: &str = "code-gpt";
    pub const DATASET_IDENTIFIER: &str = "code_generation";
    pub const GRADIENT_ACCUMULATION_STEPS: usize = 1;
    pub const BATCH_SIZE: usize = 64;
    pub const CONTEXT_LENGTH: usize = 512;
    pub const LAYER_COUNT: usize = 8;
    pub const HEAD_COUNT: usize = 8;
    pub const EMBEDDING_WIDTH: usize = 512;
    pub const DROPOUT_RATE: f32 = 0.2;
    pub const LEARNING_RATE: f32 = 5e-4;
    pub const MAX_ITERS: usize = 5000;
    pub const LR_DECAY_ITERS: usize = 5000;
    pub const MIN_LR: f32 = 1e-5;
    pub const BETA2: f32 = 0.99;
    pub const WARMUP_ITERS: usize = 100;
    pub const USE_COMPILATION: bool = false;
}

/// Requested compute device, before hardware resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// Probe the host and pick `accelerator` if one is present
    #[default]
    Auto,
    Accelerator,
    Cpu,
}

impl std::str::FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(DevicePreference::Auto),
            "accelerator" | "gpu" | "cuda" => Ok(DevicePreference::Accelerator),
            "cpu" => Ok(DevicePreference::Cpu),
            _ => Err(format!(
                "Unknown device preference: {}. Valid values: auto, accelerator, cpu",
                s
            )),
        }
    }
}

/// Compute device after hardware resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    Accelerator,
    Cpu,
}

impl std::fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComputeDevice::Accelerator => write!(f, "accelerator"),
            ComputeDevice::Cpu => write!(f, "cpu"),
        }
    }
}

/// Partial run configuration: the declarative input record
///
/// Every field is optional; unset fields take the values in [`defaults`]
/// during resolution. Keys outside the recognized set land in `extra` and
/// cause resolution to fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialRunConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_interval: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_iters: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_interval: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_tracking_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_project_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_run_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_accumulation_steps: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,

    /// Context length (a.k.a. block size): tokens the model conditions on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_count: Option<usize>,

    /// Attention heads per layer; must evenly divide `embedding_width`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_count: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_width: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropout_rate: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iters: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lr_decay_iters: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_lr: Option<f32>,

    /// Second-moment decay for the adaptive optimizer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta2: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup_iters: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_device: Option<DevicePreference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_compilation: Option<bool>,

    /// Unrecognized keys, captured verbatim. Non-empty `extra` fails
    /// resolution with `ResolveError::UnknownParameter`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl PartialRunConfig {
    /// Create an empty partial configuration (everything defaulted)
    pub fn new() -> Self {
        Self::default()
    }
}

/// Fully-resolved, immutable run configuration
///
/// Constructed exclusively by [`crate::resolve::resolve`]; fields are private
/// and no mutating methods exist, so a resolved record cannot change after
/// construction. Downstream consumers (model builder, data pipeline, training
/// loop) read it through the accessor methods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub(crate) output_directory: String,
    pub(crate) eval_interval: usize,
    pub(crate) eval_iters: usize,
    pub(crate) log_interval: usize,
    pub(crate) experiment_tracking_enabled: bool,
    pub(crate) experiment_project_name: String,
    pub(crate) experiment_run_name: String,
    pub(crate) dataset_identifier: String,
    pub(crate) gradient_accumulation_steps: usize,
    pub(crate) batch_size: usize,
    pub(crate) context_length: usize,
    pub(crate) layer_count: usize,
    pub(crate) head_count: usize,
    pub(crate) embedding_width: usize,
    pub(crate) dropout_rate: f32,
    pub(crate) learning_rate: f32,
    pub(crate) max_iters: usize,
    pub(crate) lr_decay_iters: usize,
    pub(crate) min_lr: f32,
    pub(crate) beta2: f32,
    pub(crate) warmup_iters: usize,
    pub(crate) compute_device: ComputeDevice,
    pub(crate) use_compilation: bool,
}

impl RunConfig {
    pub fn output_directory(&self) -> &str {
        &self.output_directory
    }

    /// Steps between evaluation passes
    pub fn eval_interval(&self) -> usize {
        self.eval_interval
    }

    /// Batches sampled per evaluation pass
    pub fn eval_iters(&self) -> usize {
        self.eval_iters
    }

    /// Steps between log emissions
    pub fn log_interval(&self) -> usize {
        self.log_interval
    }

    pub fn experiment_tracking_enabled(&self) -> bool {
        self.experiment_tracking_enabled
    }

    pub fn experiment_project_name(&self) -> &str {
        &self.experiment_project_name
    }

    pub fn experiment_run_name(&self) -> &str {
        &self.experiment_run_name
    }

    pub fn dataset_identifier(&self) -> &str {
        &self.dataset_identifier
    }

    pub fn gradient_accumulation_steps(&self) -> usize {
        self.gradient_accumulation_steps
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Effective batch size: `batch_size * gradient_accumulation_steps`
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size * self.gradient_accumulation_steps
    }

    /// Context length (a.k.a. block size)
    pub fn context_length(&self) -> usize {
        self.context_length
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    pub fn head_count(&self) -> usize {
        self.head_count
    }

    pub fn embedding_width(&self) -> usize {
        self.embedding_width
    }

    /// Per-head dimensionality: `embedding_width / head_count`
    pub fn head_dim(&self) -> usize {
        self.embedding_width / self.head_count
    }

    pub fn dropout_rate(&self) -> f32 {
        self.dropout_rate
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    pub fn lr_decay_iters(&self) -> usize {
        self.lr_decay_iters
    }

    pub fn min_lr(&self) -> f32 {
        self.min_lr
    }

    pub fn beta2(&self) -> f32 {
        self.beta2
    }

    pub fn warmup_iters(&self) -> usize {
        self.warmup_iters
    }

    pub fn compute_device(&self) -> ComputeDevice {
        self.compute_device
    }

    pub fn use_compilation(&self) -> bool {
        self.use_compilation
    }
}
