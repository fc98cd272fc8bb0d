//! Scenario: `batch.fail_on_invalid_row` turns the first bad row into an
//! error; flagged-but-valid rows never abort.

use bsd_config::load_layered_yaml_from_strings;
use bsd_screen::{screen_csv_str, screen_rows, StatsRow};

const STRICT: &str = "batch:\n  fail_on_invalid_row: true\n";

#[test]
fn strict_mode_aborts_on_first_invalid_row() {
    let cfg = load_layered_yaml_from_strings(&[STRICT]).unwrap().screening;
    let csv = "n,mean,sd\n10,3.20,1.48\n1,3.00,1.00\n10,abc,1.48\n";
    let err = screen_csv_str(csv, &cfg).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("SCREEN_INVALID_ROW row 2"), "{msg}");
    assert!(msg.contains("n must be >= 2"), "{msg}");
}

#[test]
fn strict_mode_accepts_inconsistent_rows() {
    let cfg = load_layered_yaml_from_strings(&[STRICT]).unwrap().screening;
    let csv = "n,mean,sd\n18,3.44,2.47\n10,3.45,1.50\n";
    let report = screen_csv_str(csv, &cfg).unwrap();
    assert_eq!(report.summary.inconsistent(), 2);
    assert_eq!(report.summary.rows_rejected, 0);
}

#[test]
fn strict_mode_applies_to_in_memory_rows() {
    let cfg = load_layered_yaml_from_strings(&[STRICT]).unwrap().screening;
    let rows = vec![StatsRow::new(10, 3.20, f64::NAN)];
    let err = screen_rows(&rows, &cfg).unwrap_err();
    assert!(format!("{err:#}").contains("SCREEN_INVALID_ROW row 1"));
}

#[test]
fn lenient_mode_is_the_default() {
    let cfg = load_layered_yaml_from_strings(&[""]).unwrap().screening;
    let csv = "n,mean,sd\n1,3.00,1.00\n";
    let report = screen_csv_str(csv, &cfg).unwrap();
    assert_eq!(report.summary.rows_rejected, 1);
}
