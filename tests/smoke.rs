use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("query-assistant").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn ask_prints_sql_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::cargo_bin("query-assistant")
        .expect("binary exists")
        .current_dir(dir.path())
        .env("DATABASE_PATH", dir.path().join("qa.db"))
        .env("MODELS_DIR", dir.path().join("models"))
        .env_remove("STOPWORDS_PATH")
        .args(["ask", "how", "many", "employees", "--execute"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SELECT COUNT(*) AS total_employees FROM employees"));
    assert!(stdout.contains("\"total_employees\": 10"));
    assert!(dir.path().join("models/intent_classifier.json").exists());
}
