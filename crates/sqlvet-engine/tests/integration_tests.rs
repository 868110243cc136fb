//! End-to-end runs: files on disk -> validator -> JSON documents

use sqlvet_core::{InputRules, SplitMode, Status};
use sqlvet_engine::{read_input, JsonDirectoryWriter, MemorySink, ReaderOptions, ReportSink, Validator};
use sqlvet_sql::resolve_dialect;
use pretty_assertions::assert_eq;

fn write(dir: &std::path::Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

#[test]
fn directory_is_read_in_file_name_order() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b.sql", "SELECT b FROM t2;");
    write(dir.path(), "a.sql", "SELECT a FROM t1; DELETE FROM t1 WHERE id = 1;");
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    write(&dir.path().join("nested"), "c.sql", "SELECT c FROM t3");

    let records = read_input(dir.path(), &ReaderOptions::default()).unwrap();
    let labels: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.source_label.as_str(), r.sql_text.as_str()))
        .collect();

    assert_eq!(
        labels,
        vec![
            ("a.sql", "SELECT a FROM t1"),
            ("a.sql", "DELETE FROM t1 WHERE id = 1"),
            ("b.sql", "SELECT b FROM t2"),
        ]
    );
}

#[test]
fn skipped_files_are_not_read() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "orders.sql", "SELECT a FROM t");
    write(dir.path(), "orders_draft.sql", "SELECT");

    let options = ReaderOptions {
        split: SplitMode::Line,
        input: InputRules {
            skip_files: vec!["*_draft.sql".to_string()],
        },
    };

    let records = read_input(dir.path(), &options).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_label, "orders.sql");
}

#[test]
fn batch_run_writes_every_result() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("queries.sql");
    std::fs::write(
        &input,
        "SELECT name FROM users;\nSELECT * FROM users #;\nINSERT INTO users (id,name);\nSELECT * FROM users LIMIT 5;",
    )
    .unwrap();

    let records = read_input(&input, &ReaderOptions::default()).unwrap();
    assert_eq!(records.len(), 4);

    let dialect = resolve_dialect("ansi").unwrap();
    let validator = Validator::new(dialect);
    let out = dir.path().join("outputs");
    let mut writer = JsonDirectoryWriter::new(&out);

    let summary = validator.run(records, &mut writer).unwrap();
    assert_eq!((summary.processed, summary.passed, summary.failed), (4, 1, 3));

    for id in 1..=4 {
        assert!(out.join(format!("query_{}.json", id)).exists());
    }

    let fatal: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("query_2.json")).unwrap()).unwrap();
    assert_eq!(fatal["status"], "FAILED");
    assert_eq!(fatal["errors"].as_array().unwrap().len(), 1);
    assert_eq!(fatal["errors"][0]["issue"], "Syntax Error");

    let limit: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("query_4.json")).unwrap()).unwrap();
    assert_eq!(limit["errors"][0]["issue"], "Non-ANSI feature");
}

#[test]
fn same_batch_under_mysql() {
    let dialect = resolve_dialect("mysql").unwrap();
    let validator = Validator::new(dialect);

    let records = vec![
        sqlvet_core::QueryRecord::new("q.sql", "SELECT * FROM users LIMIT 5"),
        sqlvet_core::QueryRecord::new("q.sql", "SELECT * FROM users LIMIT"),
    ];

    let mut sink = MemorySink::default();
    validator.run(records, &mut sink).unwrap();

    assert_eq!(sink.results[0].status, Status::Success);
    let issues: Vec<&str> = sink.results[1].diagnostics.iter().map(|d| d.issue.as_str()).collect();
    assert_eq!(issues, vec!["Empty LIMIT clause", "Invalid LIMIT"]);
}

#[test]
fn sink_trait_object() {
    let validator = Validator::new(resolve_dialect("ansi").unwrap());
    let mut sink: Box<dyn ReportSink> = Box::new(MemorySink::default());

    let summary = validator
        .run(vec![sqlvet_core::QueryRecord::new("q.sql", "DROP TABLE users")], sink.as_mut())
        .unwrap();
    assert_eq!(summary.passed, 1);
}
