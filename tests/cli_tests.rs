use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const LEDGER_CSV: &str = "\
Debtors Ledger FY 2024,,,,,,,
SNO,Account Name,Doc No,Doc Date,Narration,Debit,Credit,Running Balance
1,Acme Traders,INV-001,01-01-2024,Sales,,100,100
2,Acme Traders,RCP-001,10-01-2024,Receipt,40,,60
3,ACCOUNT Wise Totals,,,,40,100,60
4,Beta Stores,INV-002,01-06-2024,Sales,,100,100
5,Beta Stores,RCP-002,05-06-2024,Receipt,100,,0
6,Gamma Co,INV-003,01-05-2024,Sales,,50,50
7,Gamma Co,INV-004,10-06-2024,Sales,,80,130
8,Gamma Co,RCP-003,15-06-2024,Receipt,60,,70
";

fn ageing_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("ageing"))
}

/// Initialized config dir plus a ledger file inside the temp dir
fn setup(ledger: &str) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("ageing-config");

    ageing_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    let ledger_path = temp_dir.path().join("ledger.csv");
    fs::write(&ledger_path, ledger).unwrap();

    (temp_dir, config_path, ledger_path)
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_help() {
    ageing_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("FIFO debtors ageing report"));
}

#[test]
fn test_version() {
    ageing_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ageing"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("ageing-config");

    ageing_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized ageing config"));

    assert!(config_path.join("config.toml").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let (_temp_dir, config_path, _) = setup(LEDGER_CSV);

    ageing_cmd()
        .args(["-C", arg(&config_path), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    ageing_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_status() {
    let (_temp_dir, config_path, _) = setup(LEDGER_CSV);

    ageing_cmd()
        .args(["-C", arg(&config_path), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ageing Status"))
        .stdout(predicate::str::contains("ACCOUNT Wise Totals"))
        .stdout(predicate::str::contains("Debtors_Ageing_FIFO.xlsx"));
}

#[test]
fn test_buckets_list() {
    ageing_cmd()
        .arg("buckets")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 Month"))
        .stdout(predicate::str::contains("211 - 240"))
        .stdout(predicate::str::contains("9+ Months"));
}

#[test]
fn test_report_prints_pivot_and_writes_xlsx() {
    let (temp_dir, config_path, ledger_path) = setup(LEDGER_CSV);
    let out = temp_dir.path().join("out").join("ageing.xlsx");

    ageing_cmd()
        .args([
            "-C",
            arg(&config_path),
            "report",
            arg(&ledger_path),
            "--as-of",
            "2024-06-30",
            "-o",
            arg(&out),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Traders"))
        .stdout(predicate::str::contains("Gamma Co"))
        .stdout(predicate::str::contains("7 Months"))
        .stdout(predicate::str::contains("Total Outstanding"))
        .stdout(predicate::str::contains("130.00"))
        .stdout(predicate::str::contains("Beta Stores").not())
        .stdout(predicate::str::contains("ACCOUNT Wise Totals").not())
        .stdout(predicate::str::contains("Saved:"));

    assert!(out.exists());
}

#[test]
fn test_report_csv_output() {
    let (temp_dir, config_path, ledger_path) = setup(LEDGER_CSV);
    let out = temp_dir.path().join("ageing.csv");

    ageing_cmd()
        .args([
            "-C",
            arg(&config_path),
            "report",
            arg(&ledger_path),
            "--as-of",
            "2024-06-30",
            "--format",
            "csv",
            "-o",
            arg(&out),
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out).unwrap();
    assert_eq!(
        content,
        "Account Name,1 Month,7 Months,Total Outstanding\n\
         Acme Traders,0.00,60.00,60.00\n\
         Gamma Co,70.00,0.00,70.00\n"
    );
}

#[test]
fn test_report_json_to_stdout() {
    let (temp_dir, config_path, ledger_path) = setup(LEDGER_CSV);

    ageing_cmd()
        .current_dir(temp_dir.path())
        .args([
            "-C",
            arg(&config_path),
            "report",
            arg(&ledger_path),
            "--as-of",
            "2024-06-30",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"account_name\": \"Gamma Co\""))
        .stdout(predicate::str::contains("\"total_outstanding\": 130.0"));

    assert!(!temp_dir.path().join("Debtors_Ageing_FIFO.json").exists());
}

#[test]
fn test_report_uses_configured_output() {
    let (temp_dir, config_path, ledger_path) = setup(LEDGER_CSV);
    let reports = temp_dir.path().join("reports");
    fs::write(
        config_path.join("config.toml"),
        format!(
            "[report]\noutput_dir = '{}'\nfile_name = 'march.xlsx'\n",
            reports.display()
        ),
    )
    .unwrap();

    ageing_cmd()
        .args([
            "-C",
            arg(&config_path),
            "report",
            arg(&ledger_path),
            "--as-of",
            "2024-06-30",
        ])
        .assert()
        .success();

    assert!(reports.join("march.xlsx").exists());
}

#[test]
fn test_report_no_write() {
    let (temp_dir, config_path, ledger_path) = setup(LEDGER_CSV);

    ageing_cmd()
        .current_dir(temp_dir.path())
        .args([
            "-C",
            arg(&config_path),
            "report",
            arg(&ledger_path),
            "--no-write",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved:").not());

    assert!(!temp_dir.path().join("Debtors_Ageing_FIFO.xlsx").exists());
}

#[test]
fn test_report_all_settled() {
    let ledger = "\
title,,,,,,,
heading,,,,,,,
1,Beta Stores,INV-002,01-06-2024,Sales,,100,100
2,Beta Stores,RCP-002,05-06-2024,Receipt,100,,0
";
    let (temp_dir, config_path, ledger_path) = setup(ledger);
    let out = temp_dir.path().join("empty.xlsx");

    ageing_cmd()
        .args([
            "-C",
            arg(&config_path),
            "report",
            arg(&ledger_path),
            "-o",
            arg(&out),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No outstanding balances."));

    assert!(out.exists());
}

#[test]
fn test_report_missing_ledger() {
    let (temp_dir, config_path, _) = setup(LEDGER_CSV);
    let missing = temp_dir.path().join("nope.xlsx");

    ageing_cmd()
        .args(["-C", arg(&config_path), "report", arg(&missing)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error processing file"))
        .stderr(predicate::str::contains("Ledger file not found"));
}

#[test]
fn test_report_wrong_column_count() {
    let ledger = "\
title
heading
1,Acme,INV-1,01-01-2024,Sales,,100
";
    let (temp_dir, config_path, ledger_path) = setup(ledger);
    let out = temp_dir.path().join("partial.xlsx");

    ageing_cmd()
        .args([
            "-C",
            arg(&config_path),
            "report",
            arg(&ledger_path),
            "-o",
            arg(&out),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error processing file"))
        .stderr(predicate::str::contains("exactly 8 columns"));

    assert!(!out.exists());
}

#[test]
fn test_report_unsupported_extension() {
    let (temp_dir, config_path, _) = setup(LEDGER_CSV);
    let ledger_path = temp_dir.path().join("ledger.txt");
    fs::write(&ledger_path, LEDGER_CSV).unwrap();

    ageing_cmd()
        .args(["-C", arg(&config_path), "report", arg(&ledger_path)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported ledger format 'txt'"));
}

#[test]
fn test_report_invalid_as_of() {
    let (_temp_dir, config_path, ledger_path) = setup(LEDGER_CSV);

    ageing_cmd()
        .args([
            "-C",
            arg(&config_path),
            "report",
            arg(&ledger_path),
            "--as-of",
            "30/06/2024",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --as-of date"));
}

#[test]
fn test_report_invalid_format() {
    let (_temp_dir, config_path, ledger_path) = setup(LEDGER_CSV);

    ageing_cmd()
        .args([
            "-C",
            arg(&config_path),
            "report",
            arg(&ledger_path),
            "--format",
            "pdf",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid output format 'pdf'"));
}

#[test]
fn test_unsettled_lists_remainders() {
    let (_temp_dir, config_path, ledger_path) = setup(LEDGER_CSV);

    ageing_cmd()
        .args([
            "-C",
            arg(&config_path),
            "unsettled",
            arg(&ledger_path),
            "--as-of",
            "2024-06-30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("INV-001"))
        .stdout(predicate::str::contains("181"))
        .stdout(predicate::str::contains("INV-004"))
        .stdout(predicate::str::contains("70.00"))
        .stdout(predicate::str::contains("INV-003").not())
        .stdout(predicate::str::contains("Total: 2 unpaid invoice(s)"));
}

#[test]
fn test_unsettled_account_filter() {
    let (_temp_dir, config_path, ledger_path) = setup(LEDGER_CSV);

    ageing_cmd()
        .args([
            "-C",
            arg(&config_path),
            "unsettled",
            arg(&ledger_path),
            "--account",
            "Gamma Co",
            "--as-of",
            "2024-06-30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("INV-004"))
        .stdout(predicate::str::contains("Acme Traders").not());
}

#[test]
fn test_overpayment_is_listed_not_reported() {
    let ledger = "\
title,,,,,,,
heading,,,,,,,
1,Acme Traders,INV-001,01-06-2024,Sales,,100,100
2,Acme Traders,RCP-001,10-06-2024,Receipt,150,,-50
";
    let (_temp_dir, config_path, ledger_path) = setup(ledger);

    ageing_cmd()
        .args([
            "-C",
            arg(&config_path),
            "report",
            arg(&ledger_path),
            "--no-write",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No outstanding balances."))
        .stdout(predicate::str::contains("paid more than was invoiced"));

    ageing_cmd()
        .args(["-C", arg(&config_path), "unsettled", arg(&ledger_path)])
        .assert()
        .success()
        .stdout(predicate::str::contains("No unpaid invoices."))
        .stdout(predicate::str::contains("Payments not matched to any invoice"))
        .stdout(predicate::str::contains("50.00"));
}

#[test]
fn test_report_format_follows_output_extension() {
    let (temp_dir, config_path, ledger_path) = setup(LEDGER_CSV);
    let out = temp_dir.path().join("ageing.csv");

    ageing_cmd()
        .args([
            "-C",
            arg(&config_path),
            "report",
            arg(&ledger_path),
            "--as-of",
            "2024-06-30",
            "-o",
            arg(&out),
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("Account Name,1 Month,7 Months,Total Outstanding\n"));
}

#[test]
fn test_report_unreadable_ledger_is_processing_error() {
    let (temp_dir, config_path, _) = setup(LEDGER_CSV);
    let ledger_path = temp_dir.path().join("folder.csv");
    fs::create_dir(&ledger_path).unwrap();

    ageing_cmd()
        .args(["-C", arg(&config_path), "report", arg(&ledger_path)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error processing file"));
}

#[test]
fn test_empty_subtotal_marker_keeps_all_rows() {
    let (_temp_dir, config_path, ledger_path) = setup(LEDGER_CSV);
    fs::write(
        config_path.join("config.toml"),
        "[ledger]\nsubtotal_marker = \"\"\n",
    )
    .unwrap();

    ageing_cmd()
        .args([
            "-C",
            arg(&config_path),
            "report",
            arg(&ledger_path),
            "--as-of",
            "2024-06-30",
            "--no-write",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Traders"))
        .stdout(predicate::str::contains("Gamma Co"))
        .stdout(predicate::str::contains("ACCOUNT Wise Totals"));
}
