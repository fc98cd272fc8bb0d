//! Unused-key guard.
//!
//! Consumed keys are JSON Pointer prefixes: "/grimmer" consumes
//! "/grimmer/decimals_sd", and "/batch/fail_on_invalid_row" consumes only
//! itself. Any leaf of the merged config not under a consumed prefix for the
//! chosen consumer is reported as unused. Callers pick whether that is a
//! warning or an error.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::warn;

/// Which part of the workspace is about to read the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigConsumer {
    /// `bsd-screen`: GRIMMER defaults and batch behaviour.
    BatchScreening,
    /// `bsd-repro`: bootstrap and error-flag defaults.
    Reproducibility,
    /// Both of the above in one run.
    All,
}

impl ConfigConsumer {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigConsumer::BatchScreening => "BATCH_SCREENING",
            ConfigConsumer::Reproducibility => "REPRODUCIBILITY",
            ConfigConsumer::All => "ALL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    pub consumer: String,
    /// Sorted, unique.
    pub consumed_prefixes: Vec<String>,
    /// Sorted.
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Keys each consumer actually reads. Keep in step with the `ScreeningConfig`
/// fields.
pub fn consumed_pointers_for(consumer: ConfigConsumer) -> &'static [&'static str] {
    match consumer {
        ConfigConsumer::BatchScreening => &[
            "/grimmer/decimals_mean",
            "/grimmer/decimals_sd",
            "/batch/fail_on_invalid_row",
        ],
        ConfigConsumer::Reproducibility => &[
            "/reproducibility/n_boot",
            "/reproducibility/ci",
            "/reproducibility/seed",
            "/reproducibility/error_threshold",
        ],
        ConfigConsumer::All => &["/grimmer", "/batch", "/reproducibility"],
    }
}

/// With `Fail`, unused keys are an error; with `Warn` the report is returned
/// and each unused pointer is logged.
pub fn report_unused_keys(
    consumer: ConfigConsumer,
    config_json: &Value,
    policy: UnusedKeyPolicy,
) -> Result<UnusedKeyReport> {
    let consumed: BTreeSet<String> = consumed_pointers_for(consumer)
        .iter()
        .map(|p| normalize_pointer(p))
        .collect();
    let consumed_prefixes: Vec<String> = consumed.into_iter().collect();

    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|lp| !consumed_prefixes.iter().any(|cp| is_prefix_pointer(cp, lp)))
        .collect();
    unused.sort();
    unused.dedup();

    let report = UnusedKeyReport {
        consumer: consumer.as_str().to_string(),
        consumed_prefixes,
        unused_leaf_pointers: unused,
    };

    if report.is_clean() {
        return Ok(report);
    }

    match policy {
        UnusedKeyPolicy::Fail => bail!(
            "CONFIG_UNUSED_KEYS (consumer={}): {} unused config leaf key(s). First few: {}",
            report.consumer,
            report.unused_leaf_pointers.len(),
            preview_list(&report.unused_leaf_pointers, 12)
        ),
        UnusedKeyPolicy::Warn => {
            for p in &report.unused_leaf_pointers {
                warn!(consumer = report.consumer.as_str(), pointer = p.as_str(), "unused config key");
            }
            Ok(report)
        }
    }
}

fn normalize_pointer(p: &str) -> String {
    let mut s = p.trim().to_string();
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    while s.ends_with('/') && s.len() > 1 {
        s.pop();
    }
    s
}

/// "/a/b" is a prefix of "/a/b" and "/a/b/c" but not of "/a/bc".
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if prefix == "/" || leaf == prefix {
        return true;
    }
    leaf.strip_prefix(prefix)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false)
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) if !map.is_empty() => {
            for (k, vv) in map {
                let next = format!("{}/{}", prefix, escape_pointer_token(k));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) if !arr.is_empty() => {
            for (i, vv) in arr.iter().enumerate() {
                collect_leaf_pointers(vv, &format!("{prefix}/{i}"), out);
            }
        }
        // Scalars and empty containers. The root itself never counts.
        _ => {
            if !prefix.is_empty() {
                out.push(prefix.to_string());
            }
        }
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn preview_list(items: &[String], n: usize) -> String {
    format!("{:?}", items.iter().take(n).collect::<Vec<_>>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefix_respects_segment_boundaries() {
        assert!(is_prefix_pointer("/grimmer", "/grimmer/decimals_sd"));
        assert!(is_prefix_pointer("/grimmer", "/grimmer"));
        assert!(!is_prefix_pointer("/grimmer", "/grimmers/x"));
        assert!(is_prefix_pointer("/", "/anything"));
    }

    #[test]
    fn normalize_adds_leading_and_strips_trailing_slash() {
        assert_eq!(normalize_pointer("batch/"), "/batch");
        assert_eq!(normalize_pointer("/"), "/");
    }

    #[test]
    fn leaves_escape_tokens_and_index_arrays() {
        let mut out = Vec::new();
        collect_leaf_pointers(&json!({"a/b": 1, "c": [true, {}]}), "", &mut out);
        out.sort();
        assert_eq!(out, vec!["/a~1b", "/c/0", "/c/1"]);
    }

    #[test]
    fn empty_root_has_no_leaves() {
        let mut out = Vec::new();
        collect_leaf_pointers(&json!({}), "", &mut out);
        assert!(out.is_empty());
    }
}
