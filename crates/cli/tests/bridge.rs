use plr_cli::bridge::{Bridge, BridgeRequest};
use plr_cli::picker::PresetFolders;
use plr_cli::serve::serve;
use plr_core::config::AppConfig;
use plr_core::scanner::ScanRequest;
use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

fn bridge_with(folders: Vec<String>) -> Bridge {
    Bridge::new(AppConfig::default(), Arc::new(PresetFolders::new(folders)))
}

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

async fn call(bridge: &Bridge, request: Value) -> Value {
    let response = bridge.handle_json(&request.to_string()).await;
    assert!(response.ok, "call failed: {:?}", response.error);
    response.result.unwrap()
}

#[tokio::test]
async fn scan_then_analyze_walkthrough() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("a.pdf"), vec![b'x'; 1200]).unwrap();
    write_zip(
        &temp.path().join("b.zip"),
        &[("license.txt", b"resell rights"), ("ebook.pdf", &[b'y'; 2048])],
    );
    fs::write(temp.path().join("c.txt"), "notes").unwrap();
    let bridge = bridge_with(vec![]);

    let files = call(
        &bridge,
        json!({
            "channel": "scan-folders",
            "args": {
                "paths": [temp.path()],
                "includeSubfolders": true,
                "fileTypes": ["pdf", "zip"]
            }
        }),
    )
    .await;
    let files = files.as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["name"], "a.pdf");
    assert_eq!(files[0]["size"], 1200);
    assert_eq!(files[0]["type"], "document");
    assert!(files[0]["modified"].is_string());
    assert_eq!(files[1]["name"], "b.zip");

    let pdf = call(
        &bridge,
        json!({"channel": "analyze-plr-file", "args": files[0]["path"]}),
    )
    .await;
    let zip = call(
        &bridge,
        json!({"channel": "analyze-plr-file", "args": files[1]["path"]}),
    )
    .await;
    assert!(zip["plrScore"].as_u64().unwrap() > pdf["plrScore"].as_u64().unwrap());
    assert_eq!(zip["contents"].as_array().unwrap().len(), 2);
    assert_eq!(zip["contents"][0]["name"], "license.txt");
    assert!(pdf.get("contents").is_none());
    for key in ["hash", "confidence", "suggestedNiche", "suggestedLicense", "filename"] {
        assert!(zip.get(key).is_some(), "missing {key}");
    }
}

#[tokio::test]
async fn analyze_missing_file_returns_null() {
    let temp = tempfile::tempdir().unwrap();
    let bridge = bridge_with(vec![]);
    let response = bridge
        .handle_json(
            &json!({
                "channel": "analyze-plr-file",
                "args": temp.path().join("deleted.zip")
            })
            .to_string(),
        )
        .await;
    assert!(response.ok);
    assert_eq!(response.result, Some(Value::Null));
}

#[tokio::test]
async fn organize_reports_collision_per_operation() {
    let temp = tempfile::tempdir().unwrap();
    let a = temp.path().join("A.pdf");
    let c = temp.path().join("C.pdf");
    let b = temp.path().join("B.pdf");
    fs::write(&a, "a").unwrap();
    fs::write(&c, "c").unwrap();
    let bridge = bridge_with(vec![]);

    let results = call(
        &bridge,
        json!({
            "channel": "organize-files",
            "args": [
                {"type": "move", "source": a, "target": b},
                {"type": "move", "source": c, "target": b}
            ]
        }),
    )
    .await;
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[0]["target"], json!(b));
    assert_eq!(results[1]["success"], false);
    assert_eq!(results[1]["source"], json!(c));
    assert!(results[1]["error"].as_str().unwrap().contains("already exists"));
    assert!(results[1].get("target").is_none());
}

#[tokio::test]
async fn extract_rejects_traversal() {
    let temp = tempfile::tempdir().unwrap();
    let zip_path = temp.path().join("evil.zip");
    write_zip(&zip_path, &[("ok.txt", b"fine"), ("../../evil.txt", b"bad")]);
    let out = temp.path().join("out");
    let bridge = bridge_with(vec![]);

    let response = call(
        &bridge,
        json!({"channel": "extract-zip", "args": [zip_path, out]}),
    )
    .await;
    assert_eq!(response["success"], false);
    assert!(response["error"].as_str().unwrap().contains("evil.txt"));
    assert!(!out.join("ok.txt").exists());

    let good = temp.path().join("good.zip");
    write_zip(&good, &[("docs/ok.txt", b"fine")]);
    let response = bridge
        .extract_zip(&good.to_string_lossy(), &out.to_string_lossy())
        .await;
    assert!(response.success);
    assert_eq!(fs::read_to_string(out.join("docs/ok.txt")).unwrap(), "fine");
}

#[tokio::test]
async fn scan_report_keeps_unreadable_roots() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("kept.pdf"), "k").unwrap();
    let missing = temp.path().join("gone");
    let bridge = bridge_with(Vec::new());

    let request = ScanRequest {
        paths: vec![
            missing.to_string_lossy().into_owned(),
            temp.path().to_string_lossy().into_owned(),
        ],
        include_subfolders: true,
        file_types: vec!["pdf".to_string()],
    };
    let report = bridge.scan_report(request.clone()).await.unwrap();
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].root, missing.to_string_lossy());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["errors"][0]["root"], json!(missing.to_string_lossy()));

    // the wire channel still answers with the bare record list
    let files = bridge.scan_folders(request).await.unwrap();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn select_folders_reports_cancel() {
    let canceled = bridge_with(vec![]);
    let response = call(&canceled, json!({"channel": "select-folders"})).await;
    assert_eq!(response, json!({"canceled": true}));

    let chosen = bridge_with(vec!["/library/plr".to_string()]);
    let response = call(&chosen, json!({"channel": "select-folders"})).await;
    assert_eq!(response, json!({"canceled": false, "paths": ["/library/plr"]}));
}

#[tokio::test]
async fn malformed_requests_fail_the_whole_call() {
    let bridge = bridge_with(vec![]);
    for raw in [
        "not json",
        r#"{"channel": "format-disk"}"#,
        r#"{"channel": "scan-folders", "args": {"includeSubfolders": true}}"#,
        r#"{"channel": "organize-files", "args": [{"type": "delete", "source": "/a", "target": "/b"}]}"#,
    ] {
        let response = bridge.handle_json(raw).await;
        assert!(!response.ok, "{raw} should be rejected");
        assert!(response.error.unwrap().contains("malformed"));
    }
}

#[tokio::test]
async fn duplicates_channel_groups_identical_files() {
    let temp = tempfile::tempdir().unwrap();
    let one = temp.path().join("one.pdf");
    let two = temp.path().join("copy/one.pdf");
    fs::create_dir_all(two.parent().unwrap()).unwrap();
    fs::write(&one, "same").unwrap();
    fs::write(&two, "same").unwrap();
    let bridge = bridge_with(vec![]);

    let request: BridgeRequest = serde_json::from_value(json!({
        "channel": "find-duplicates",
        "args": [one, two, temp.path().join("missing.pdf")]
    }))
    .unwrap();
    let groups = bridge.dispatch(request).await.unwrap();
    assert_eq!(groups.as_array().unwrap().len(), 1);
    assert_eq!(groups[0]["paths"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn serve_answers_each_line_in_order() {
    let bridge = bridge_with(vec!["/library".to_string()]);
    let input = b"{\"channel\":\"select-folders\"}\n\nbroken\n{\"channel\":\"analyze-plr-files\",\"args\":[]}\n";
    let mut output = Vec::new();

    let handled = serve(&bridge, &input[..], &mut output).await.unwrap();
    assert_eq!(handled, 3);
    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["result"]["paths"][0], "/library");
    assert_eq!(lines[1]["ok"], false);
    assert_eq!(lines[2]["result"], json!([]));
}
