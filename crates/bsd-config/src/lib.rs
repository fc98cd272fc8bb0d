//! bsd-config
//!
//! Layered YAML configuration for screening runs.
//!
//! - YAML documents merge in order: earlier layers are the base, later
//!   layers override by deep merge.
//! - The merged document is rendered as canonical JSON and hashed
//!   (SHA-256, hex) so a screening report can name the exact settings it
//!   ran under.
//! - The typed [`ScreeningConfig`] is decoded from the merged document and
//!   validated before it is handed out.

mod consumption;
mod screening;

pub use consumption::{
    consumed_pointers_for, report_unused_keys, ConfigConsumer, UnusedKeyPolicy, UnusedKeyReport,
};
pub use screening::{BatchDefaults, GrimmerDefaults, ReproducibilityDefaults, ScreeningConfig};

use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
    pub screening: ScreeningConfig,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        // An empty document parses as null; it contributes nothing.
        if v_yaml.is_null() {
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    let screening: ScreeningConfig = serde_json::from_value(merged.clone())
        .context("CONFIG_INVALID: merged yaml does not match the screening config schema")?;
    screening.validate()?;

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    debug!(layers = yaml_docs.len(), config_hash = config_hash.as_str(), "screening config loaded");
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
        screening,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

/// serde_json's default map is ordered by key, so the compact rendering is
/// independent of key order in the source YAML.
fn canonicalize_json(v: &Value) -> Result<String> {
    serde_json::to_string(v).context("canonical json serialize failed")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deep_merge_overrides_leaves_and_keeps_siblings() {
        let base = json!({"grimmer": {"decimals_mean": 2, "decimals_sd": 2}});
        let over = json!({"grimmer": {"decimals_sd": 3}});
        assert_eq!(
            deep_merge(base, over),
            json!({"grimmer": {"decimals_mean": 2, "decimals_sd": 3}})
        );
    }

    #[test]
    fn deep_merge_replaces_non_objects_wholesale() {
        assert_eq!(deep_merge(json!({"a": [1, 2]}), json!({"a": [3]})), json!({"a": [3]}));
        assert_eq!(deep_merge(json!({"a": {"b": 1}}), json!({"a": 5})), json!({"a": 5}));
    }

    #[test]
    fn sha256_hex_is_lowercase_64_chars() {
        let h = sha256_hex(b"{}");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
