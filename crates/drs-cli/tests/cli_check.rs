//! End-to-end tests for the `check` subcommand handler: a mock DRS
//! endpoint, a real schema directory, and a real case file on disk.

use std::path::Path;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drs_cli::check::{run_check, CheckArgs};

fn write_schemas(dir: &Path) {
    let drs_object = serde_json::json!({
        "type": "object",
        "required": ["id", "self_uri"],
        "properties": {
            "id": {"type": "string"},
            "self_uri": {"type": "string"}
        }
    });
    let error = serde_json::json!({
        "type": "object",
        "required": ["status_code"],
        "properties": {
            "status_code": {"type": "integer"},
            "msg": {"type": "string"}
        }
    });
    std::fs::write(
        dir.join("DrsObject.json"),
        serde_json::to_string_pretty(&drs_object).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("Error.json"),
        serde_json::to_string_pretty(&error).unwrap(),
    )
    .unwrap();
}

/// The handler builds its own single-threaded runtime, so the mock
/// server must live on a multi-threaded one that keeps serving while
/// the handler blocks.
fn with_mock_server<F>(f: F)
where
    F: FnOnce(&MockServer),
{
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/objects/abc123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "id": "abc123",
                        "self_uri": "drs://example.org/abc123"
                    }))
                    .insert_header("content-type", "application/json"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/objects/missing1"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({
                        "status_code": 404,
                        "msg": "not found"
                    }))
                    .insert_header("content-type", "application/json"),
            )
            .mount(&server)
            .await;
        server
    });
    f(&server);
    drop(rt);
}

#[test]
fn run_check_all_passing_returns_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_schemas(dir.path());
    std::fs::write(
        dir.path().join("cases.csv"),
        "object_id,expected_status_code\nabc123,200\nmissing1,404\n",
    )
    .unwrap();

    with_mock_server(|server| {
        let args = CheckArgs {
            schema_dir: dir.path().to_path_buf(),
            base_url: format!("{}/objects/", server.uri()),
            input_file: dir.path().join("cases.csv"),
            log_dir: dir.path().to_path_buf(),
            timeout_secs: 5,
        };
        let code = run_check(&args).unwrap();
        assert_eq!(code, 0);
    });
}

#[test]
fn run_check_status_mismatch_returns_one() {
    let dir = tempfile::tempdir().unwrap();
    write_schemas(dir.path());
    std::fs::write(
        dir.path().join("cases.csv"),
        "object_id,expected_status_code\nabc123,404\n",
    )
    .unwrap();

    with_mock_server(|server| {
        let args = CheckArgs {
            schema_dir: dir.path().to_path_buf(),
            base_url: format!("{}/objects/", server.uri()),
            input_file: dir.path().join("cases.csv"),
            log_dir: dir.path().to_path_buf(),
            timeout_secs: 5,
        };
        let code = run_check(&args).unwrap();
        assert_eq!(code, 1);
    });
}

#[test]
fn run_check_unreachable_endpoint_still_completes() {
    let dir = tempfile::tempdir().unwrap();
    write_schemas(dir.path());
    std::fs::write(
        dir.path().join("cases.csv"),
        "object_id,expected_status_code\nabc123,200\n",
    )
    .unwrap();

    let args = CheckArgs {
        schema_dir: dir.path().to_path_buf(),
        base_url: "http://127.0.0.1:1/objects/".to_string(),
        input_file: dir.path().join("cases.csv"),
        log_dir: dir.path().to_path_buf(),
        timeout_secs: 2,
    };
    let code = run_check(&args).unwrap();
    assert_eq!(code, 1);
}

#[test]
fn run_check_missing_input_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_schemas(dir.path());

    let args = CheckArgs {
        schema_dir: dir.path().to_path_buf(),
        base_url: "http://127.0.0.1:1/objects/".to_string(),
        input_file: dir.path().join("nope.csv"),
        log_dir: dir.path().to_path_buf(),
        timeout_secs: 2,
    };
    assert!(run_check(&args).is_err());
}
