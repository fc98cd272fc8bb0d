//! Scenario: the config hash names the settings, not the YAML spelling.
//!
//! GREEN when:
//! - Loading the same documents twice yields the same hash.
//! - Key order inside the YAML does not change the hash.
//! - A changed value changes the hash.
//! - Overlays are applied in order, last one wins.

use bsd_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
grimmer:
  decimals_mean: 2
  decimals_sd: 2
reproducibility:
  n_boot: 5000
  ci: 0.95
"#;

const BASE_YAML_REORDERED: &str = r#"
reproducibility:
  ci: 0.95
  n_boot: 5000
grimmer:
  decimals_sd: 2
  decimals_mean: 2
"#;

const OVERLAY_YAML: &str = r#"
grimmer:
  decimals_sd: 3
reproducibility:
  seed: 42
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
    assert_eq!(a.config_hash.len(), 64);
}

#[test]
fn key_order_does_not_change_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();
    assert_eq!(a.config_hash, b.config_hash, "canonical json must sort keys");
}

#[test]
fn different_values_produce_different_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_ne!(a.config_hash, b.config_hash);
}

#[test]
fn overlay_wins_and_keeps_untouched_siblings() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    let s = loaded.screening;
    assert_eq!(s.grimmer.decimals_mean, 2);
    assert_eq!(s.grimmer.decimals_sd, 3);
    assert_eq!(s.reproducibility.n_boot, 5000);
    assert_eq!(s.reproducibility.seed, Some(42));

    let again = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_eq!(loaded.config_hash, again.config_hash);
}

#[test]
fn layer_order_matters() {
    let fwd = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    let rev = load_layered_yaml_from_strings(&[OVERLAY_YAML, BASE_YAML]).unwrap();
    assert_eq!(fwd.screening.grimmer.decimals_sd, 3);
    assert_eq!(rev.screening.grimmer.decimals_sd, 2);
    assert_ne!(fwd.config_hash, rev.config_hash);
}
