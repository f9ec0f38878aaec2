use std::fs;

use patch_tracker::config::parse_day;
use patch_tracker::snapshot::{JsonFileSink, SnapshotSource};
use patch_tracker::{AssemblyConfig, DateRange, PipelineError, SinkError, run};
use serde_json::{Value, json};

fn snapshot() -> Value {
    json!({
        "messages": [
            {
                "message_id": "<s0>",
                "subject": "[PATCH 0/2] Series X",
                "body": "cover",
                "date": "2015-04-01T10:00:00",
                "tz_offset": 7200,
                "sender": "author@example.org"
            },
            {
                "message_id": "<s1>",
                "parent_id": "<s0>",
                "subject": "[PATCH 1/2] Part one",
                "body": "Signed-off-by: Author <author@example.org>",
                "date": "2015-04-01T10:01:00",
                "sender": "author@example.org"
            },
            {
                "message_id": "<s2>",
                "parent_id": "<s0>",
                "subject": "[PATCH 2/2] Part two",
                "date": "2015-04-01T10:02:00",
                "sender": "author@example.org"
            },
            {
                "message_id": "<r1>",
                "parent_id": "<s1>",
                "subject": "Re: [PATCH 1/2] Part one",
                "body": "Acked-by: Maintainer <m@example.org>",
                "date": "2015-04-02T09:00:00",
                "sender": "m@example.org"
            },
            {
                "message_id": "<old>",
                "subject": "[PATCH] Too old",
                "date": "2009-06-01T00:00:00",
                "sender": "author@example.org"
            }
        ],
        "people": [
            { "id": 1, "email": "author@example.org" },
            { "id": 2, "email": "m@example.org" }
        ],
        "commits": [
            {
                "commit_id": 100,
                "revision": "feedface",
                "author_date": "2015-04-01T09:00:00",
                "commit_date": "2015-04-10T12:00:00",
                "message": "xen: part one\n\nSigned-off-by: Author <author@example.org>",
                "author_id": 1,
                "committer_id": 2
            }
        ]
    })
}

fn config() -> AssemblyConfig {
    AssemblyConfig {
        parallel_parse: false,
        clean_subjects: true,
    }
}

#[test]
fn snapshot_round_trip_writes_assembly() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("snapshot.json");
    let output = dir.path().join("assembly.json");
    fs::write(&input, serde_json::to_vec(&snapshot()).unwrap()).unwrap();

    let source = SnapshotSource::from_path(&input).unwrap();
    let mut sink = JsonFileSink::new(&output);
    let range = DateRange::new(
        parse_day("2010-01-01").unwrap(),
        parse_day("2100-01-01").unwrap(),
    );

    let assembly = run(&source, &source, &mut sink, &range, &config()).unwrap();
    assert_eq!(assembly.stats.threads, 1);
    assert_eq!(assembly.stats.patches, 2);
    assert_eq!(assembly.stats.commits_matched, 1);

    let written: Value = serde_json::from_slice(&fs::read(&output).unwrap()).unwrap();
    let series = &written["series"][0];
    assert_eq!(series["subject"], "Series X");
    assert_eq!(series["versions"][0]["tz_offset"], 7200);

    let first = &series["versions"][0]["patches"][0];
    assert_eq!(first["message_id"], "<s1>");
    assert_eq!(first["sequence_number"], 1);
    assert_eq!(first["commit"], "partone");
    assert_eq!(first["comments"][0]["message_id"], "<r1>");
    let flags: Vec<&str> = first["flags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["kind"].as_str().unwrap())
        .collect();
    assert_eq!(flags, vec!["Signed-off-by", "Acked-by"]);

    let second = &series["versions"][0]["patches"][1];
    assert_eq!(second["commit"], Value::Null);
    assert_eq!(written["commits"]["partone"]["revision"], "feedface");
    assert_eq!(written["commits"]["partone"]["patch"], "<s1>");
}

#[test]
fn unwritable_output_reports_sink_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("snapshot.json");
    fs::write(&input, serde_json::to_vec(&snapshot()).unwrap()).unwrap();

    let source = SnapshotSource::from_path(&input).unwrap();
    let mut sink = JsonFileSink::new(dir.path().join("missing-dir").join("out.json"));

    let err = run(&source, &source, &mut sink, &DateRange::unbounded(), &config()).unwrap_err();
    assert!(matches!(err, PipelineError::Store(SinkError::Io(_))));
    assert!(!dir.path().join("missing-dir").exists());
}
