//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use qmap_core::{MapperConfig, TopologySpec};
use qmap_qasm::CostModel;
use serde::Deserialize;

/// Contents of a configuration file.
///
/// A file is either a bare topology (`kind: linear`, ...) or a full mapper
/// configuration with an optional `costs` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    #[serde(flatten)]
    pub mapper: MapperConfig,
    #[serde(default)]
    pub costs: CostModel,
}

/// Top-level fields of a full configuration file.
const CONFIG_FIELDS: [&str; 5] = ["topology", "placement", "mover", "meeting", "costs"];

/// Load a configuration file, or the defaults when `path` is `None`.
pub fn load_config(path: Option<&str>) -> Result<RunConfig> {
    let Some(path) = path else {
        return Ok(RunConfig::default());
    };
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    let ext = path_obj.extension().and_then(|e| e.to_str()).unwrap_or("");
    let document: serde_json::Value = if ext.eq_ignore_ascii_case("json") {
        serde_json::from_str(&source).with_context(|| format!("Invalid JSON: {path}"))?
    } else {
        serde_yaml_ng::from_str(&source).with_context(|| format!("Invalid YAML: {path}"))?
    };
    parse_config(document).with_context(|| format!("Invalid configuration: {path}"))
}

/// Interpret a parsed configuration document.
///
/// A bare topology carries a `kind` tag at the top level, which a full
/// configuration never does.
fn parse_config(document: serde_json::Value) -> Result<RunConfig> {
    if document.is_null() {
        return Ok(RunConfig::default());
    }
    let Some(fields) = document.as_object() else {
        anyhow::bail!("expected a mapping at the top level");
    };

    if fields.contains_key("kind") {
        let topology: TopologySpec = serde_json::from_value(document)?;
        return Ok(RunConfig {
            mapper: MapperConfig {
                topology,
                ..MapperConfig::default()
            },
            costs: CostModel::default(),
        });
    }

    if let Some(unknown) = fields.keys().find(|k| !CONFIG_FIELDS.contains(&k.as_str())) {
        anyhow::bail!(
            "unknown field '{unknown}', expected one of: {}",
            CONFIG_FIELDS.join(", ")
        );
    }
    Ok(serde_json::from_value(document)?)
}

/// The `.qasm` files named by `input`: the file itself, or the files of a
/// directory in name order.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        anyhow::bail!("File not found: {}", input.display());
    }
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    let entries = fs::read_dir(input)
        .with_context(|| format!("Failed to read directory: {}", input.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_qasm = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("qasm"));
        if path.is_file() && is_qasm {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No .qasm files in {}", input.display());
    }
    Ok(files)
}
