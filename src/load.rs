//! Loading partial configurations from YAML files
//!
//! The on-disk form of a run configuration is a flat YAML mapping of
//! parameter names to values; any subset of the recognized parameters may
//! appear. See `configs/code_generation.yaml` for the reference file.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::probe::AcceleratorProbe;
use crate::schema::{PartialRunConfig, RunConfig};

/// Load a partial configuration from a YAML file
///
/// Parsing only; unknown keys are captured and will fail later at
/// resolution, so `preparar validate` can report the offending name.
pub fn load_partial<P: AsRef<Path>>(path: P) -> Result<PartialRunConfig> {
    let yaml_content = fs::read_to_string(path.as_ref()).map_err(|e| Error::ReadConfig {
        path: path.as_ref().display().to_string(),
        source: e,
    })?;

    let partial: PartialRunConfig =
        serde_yaml::from_str(&yaml_content).map_err(|e| Error::ParseConfig(e.to_string()))?;

    Ok(partial)
}

/// Load a YAML file and resolve it in one step
pub fn resolve_file<P: AsRef<Path>>(path: P, probe: &dyn AcceleratorProbe) -> Result<RunConfig> {
    let partial = load_partial(path)?;
    let config = crate::resolve::resolve(&partial, probe)?;
    Ok(config)
}
