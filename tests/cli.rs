//! End-to-end tests for the `ledgerpulse` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn ledgerpulse(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ledgerpulse").unwrap();
    cmd.env("LEDGERPULSE_DATA_DIR", data_dir)
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(data_dir: &Path, json: &str) {
    std::fs::write(data_dir.join("config.json"), json).unwrap();
}

#[test]
fn calc_evaluates_left_to_right() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["calc", "2+3*4="])
        .assert()
        .success()
        .stdout("20\n");
}

#[test]
fn calc_shows_error_on_divide_by_zero() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["calc", "8/0="])
        .assert()
        .success()
        .stdout("Error\n");
}

#[test]
fn calc_rejects_unknown_keys() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["calc", "2^3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown calculator key"));
}

#[test]
fn interest_uses_the_currency_symbol() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["interest", "1000000", "10", "2", "--monthly", "150000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Interest:    ₦200000"))
        .stdout(predicate::str::contains("Total:       ₦1200000"))
        .stdout(predicate::str::contains("Annual:      ₦1800000"));
}

#[test]
fn dashboard_renders_the_selected_range() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["dashboard", "--range", "week", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard (week)"))
        .stdout(predicate::str::contains("Active users"));
}

#[test]
fn dashboard_json_uses_camel_case_fields() {
    let dir = TempDir::new().unwrap();
    let output = ledgerpulse(dir.path())
        .args(["dashboard", "--format", "json", "--seed", "7", "--ticks", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["timeRange"], "month");
    assert_eq!(snapshot["dailyTrends"].as_array().unwrap().len(), 7);
    assert_eq!(snapshot["monthlyTrends"].as_array().unwrap().len(), 6);
    assert!(snapshot["recentTransactions"].as_array().unwrap().len() <= 10);
}

#[test]
fn dashboard_rejects_unknown_range() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["dashboard", "--range", "decade"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown time range"));
}

#[test]
fn transactions_are_capped_by_limit() {
    let dir = TempDir::new().unwrap();
    let output = ledgerpulse(dir.path())
        .args(["transactions", "--limit", "5", "--format", "json", "--seed", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let transactions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(transactions.as_array().unwrap().len(), 5);
}

#[test]
fn notifications_arrive_after_ticks() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["notifications", "--seed", "2"])
        .assert()
        .success()
        .stdout("No notifications.\n");

    ledgerpulse(dir.path())
        .args(["notifications", "--seed", "2", "--ticks", "6", "--mark-read"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Notifications (0 unread)"));
}

#[test]
fn budget_status_shows_admin_view() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["budget", "status", "--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budgets for"))
        .stdout(predicate::str::contains("Advertising"))
        .stdout(predicate::str::contains("Budget used"));
}

#[test]
fn budget_status_for_unknown_user_fails() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["budget", "status", "--user", "nobody@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User not found"));
}

#[test]
fn categories_filter_by_kind() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["categories", "--kind", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sales"))
        .stdout(predicate::str::contains("Marketing").not());
}

#[test]
fn pay_succeeds_when_declines_are_disabled() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), r#"{ "payments": { "decline_probability": 0.0 } }"#);

    ledgerpulse(dir.path())
        .args(["pay", "₦250,000", "Supplier invoice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Payment successful"))
        .stdout(predicate::str::contains("₦250,000"))
        .stdout(predicate::str::contains("Category:    Payments"));
}

#[test]
fn pay_reports_a_decline() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), r#"{ "payments": { "decline_probability": 1.0 } }"#);

    ledgerpulse(dir.path())
        .args(["pay", "1000", "Courier"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Payment declined"));
}

#[test]
fn pay_rejects_a_zero_amount() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["pay", "0", "Nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be positive"));
}

#[test]
fn invalid_settings_are_rejected() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), r#"{ "payments": { "decline_probability": 1.5 } }"#);

    ledgerpulse(dir.path()).arg("config").assert().failure();
}

#[test]
fn export_csv_to_stdout() {
    let dir = TempDir::new().unwrap();
    let output = ledgerpulse(dir.path())
        .args(["export", "csv", "--stdout", "--seed", "4"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let csv = String::from_utf8(output.stdout).unwrap();
    assert!(csv.starts_with("ID,Date,Type,Category,Item,Description,Place,Amount\n"));
    assert_eq!(csv.lines().count(), 51);
}

#[test]
fn export_json_to_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("dashboard.json");

    ledgerpulse(dir.path())
        .args(["export", "json", "--seed", "4", "--output"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported dashboard (50 records)"));

    let export: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(export["schema_version"], "1.0.0");
    assert_eq!(export["metadata"]["user_count"], 25);
    assert_eq!(export["transactions"].as_array().unwrap().len(), 50);
}

#[test]
fn export_defaults_to_exports_dir() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["export", "yaml", "--seed", "4"])
        .assert()
        .success();

    let files: Vec<_> = std::fs::read_dir(dir.path().join("exports"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("ledgerpulse-dashboard-"));
    assert!(files[0].ends_with(".yaml"));
}

#[test]
fn export_budgets_requires_csv() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["export", "json", "--budgets", "--stdout"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only available for CSV"));
}

#[test]
fn admin_csv_lists_platform_figures() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["admin", "--csv", "--seed", "9"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Metric,Value\n"))
        .stdout(predicate::str::contains("Total Users,25\n"))
        .stdout(predicate::str::contains("Admins,1\n"));
}

#[test]
fn onboarding_flag_is_persisted() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .args(["onboarding", "status"])
        .assert()
        .success()
        .stdout("Onboarding not completed.\n");

    ledgerpulse(dir.path())
        .args(["onboarding", "complete"])
        .assert()
        .success();
    assert!(dir.path().join("config.json").exists());

    ledgerpulse(dir.path())
        .args(["onboarding", "status"])
        .assert()
        .success()
        .stdout("Onboarding completed.\n");
}

#[test]
fn config_shows_paths() {
    let dir = TempDir::new().unwrap();
    ledgerpulse(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("LedgerPulse Configuration"))
        .stdout(predicate::str::contains("Currency symbol:       ₦"));
}

#[test]
fn watch_follows_the_live_feed() {
    let dir = TempDir::new().unwrap();
    write_config(
        dir.path(),
        r#"{ "realtime": { "handshake_delay_ms": 10, "transaction_interval_ms": 40, "notification_interval_ms": 1000 } }"#,
    );

    ledgerpulse(dir.path())
        .args(["watch", "--ticks", "2", "--seed", "11"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("Connected: 50 transactions loaded"))
        .stdout(predicate::str::contains("Dashboard (month)"));
}
