//! Integration tests across the schema, load, and resolve modules

use crate::probe::FixedProbe;
use crate::{load, resolve};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_end_to_end_yaml_resolution() {
    let yaml = r#"
output_directory: out-code-generation
eval_interval: 250
eval_iters: 100
log_interval: 50

experiment_tracking_enabled: true
experiment_project_name: code-generation
experiment_run_name: code-gpt

dataset_identifier: code_generation
gradient_accumulation_steps: 1
batch_size: 64
context_length: 512

layer_count: 8
head_count: 8
embedding_width: 512
dropout_rate: 0.2

learning_rate: 0.0005
max_iters: 5000
lr_decay_iters: 5000
min_lr: 0.00001
beta2: 0.99

warmup_iters: 100
compute_device: auto
use_compilation: false
"#;

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(yaml.as_bytes()).unwrap();

    let config = load::resolve_file(temp_file.path(), &FixedProbe::absent()).unwrap();

    assert_eq!(config.output_directory(), "out-code-generation");
    assert!(config.experiment_tracking_enabled());
    assert_eq!(config.experiment_project_name(), "code-generation");
    assert_eq!(config.layer_count(), 8);
    assert_eq!(config.head_dim(), 64);
    assert_eq!(config.compute_device(), crate::ComputeDevice::Cpu);
    assert!(!config.use_compilation());
    assert!(resolve::advisories(&config).is_empty());
}

#[test]
fn test_sparse_yaml_takes_defaults() {
    let yaml = r#"
batch_size: 16
dropout_rate: 0.0
"#;

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(yaml.as_bytes()).unwrap();

    let config = load::resolve_file(temp_file.path(), &FixedProbe::absent()).unwrap();

    assert_eq!(config.batch_size(), 16);
    assert_eq!(config.dropout_rate(), 0.0);
    // Everything else defaulted
    assert_eq!(config.embedding_width(), 512);
    assert_eq!(config.warmup_iters(), 100);
    assert_eq!(config.dataset_identifier(), "code_generation");
}

#[test]
fn test_invalid_yaml_field_names_error() {
    // Typo'd key: the legacy spelling of context_length
    let yaml = "block_size: 512\n";

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(yaml.as_bytes()).unwrap();

    let err = load::resolve_file(temp_file.path(), &FixedProbe::absent()).unwrap_err();
    assert!(err.to_string().contains("Unknown parameter: block_size"));
}

#[test]
fn test_yaml_cross_field_violation_names_the_field() {
    let yaml = r#"
head_count: 7
embedding_width: 512
"#;

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(yaml.as_bytes()).unwrap();

    let err = load::resolve_file(temp_file.path(), &FixedProbe::absent()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("head_count"));
    assert!(msg.contains('7'));
}

#[test]
fn test_resolved_record_serializes_to_yaml_and_json() {
    let config = resolve::resolve(&crate::PartialRunConfig::new(), &FixedProbe::present()).unwrap();

    let yaml = serde_yaml::to_string(&config).unwrap();
    assert!(yaml.contains("batch_size: 64"));
    assert!(yaml.contains("compute_device: accelerator"));

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"context_length\":512"));
}
