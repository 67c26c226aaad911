use assert_cmd::Command;
use spread::report::CountsReportItem;
use tempfile::tempdir;

fn spread() -> Command {
    let mut cmd = Command::cargo_bin("spread").unwrap();
    cmd.arg("--no-progress");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn prints_summary() {
    let stdout = stdout_of(spread().args(["10", "12", "2", "-r", "5"]));
    assert!(stdout.starts_with("round 10, population 144, R0 "), "{stdout}");
    assert!(stdout.contains("deceased "), "{stdout}");
}

#[test]
fn same_seed_same_summary() {
    let first = stdout_of(spread().args(["25", "20", "4", "--random-seed", "99"]));
    let second = stdout_of(spread().args(["25", "20", "4", "--random-seed", "99"]));
    assert_eq!(first, second);
}

#[test]
fn loads_config_and_writes_report() {
    let temp_dir = tempdir().unwrap();
    let output_dir = temp_dir.path().join("run");
    spread()
        .args(["30", "15", "3", "-c", "tests/data/params.json", "-o"])
        .arg(&output_dir)
        .assert()
        .success();

    let mut reader = csv::Reader::from_path(output_dir.join("counts.csv")).unwrap();
    let rows: Vec<CountsReportItem> = reader.deserialize().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 31);
    for (round, row) in rows.iter().enumerate() {
        assert_eq!(row.round, round);
        let total = row.susceptible
            + row.infected
            + row.immune
            + row.quarantined
            + row.hospitalized
            + row.deceased;
        assert_eq!(total, 225);
    }
    // immunity_rate is 0 in the config file.
    assert_eq!(rows[0].immune, 0);
}

#[test]
fn logs_to_stderr() {
    let output = spread()
        .args(["3", "5", "1", "--log-level", "spread::engine=debug"])
        .assert()
        .success()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(output).unwrap();
    assert!(stderr.contains("reset 5x5 board"), "{stderr}");
}

#[test]
fn rejects_zero_board() {
    spread().args(["5", "0"]).assert().failure();
}

#[test]
fn rejects_bad_log_level() {
    spread().args(["--log-level", "loud"]).assert().failure();
}

#[test]
fn rejects_missing_config() {
    spread()
        .args(["-c", "tests/data/no-such-file.json"])
        .assert()
        .failure();
}
