use std::collections::HashMap;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_cmd::Command;
use serde_json::json;
use tempfile::TempDir;

mod edge_cases;

/// A test context with an isolated temporary directory and its own mock
/// backend. Tests can run in parallel because nothing is shared.
pub struct TestContext {
    pub temp_dir: TempDir,
    pub backend: MockBackend,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let backend = MockBackend::spawn();
        Self { temp_dir, backend }
    }

    /// Returns the path to the temporary directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Run scanq in this temp directory, pointed at the mock backend
    pub fn run_scanq(&self, args: &[&str]) -> CommandResult {
        let mut cmd = Command::cargo_bin("scanq").expect("Failed to find scanq binary");
        cmd.args(args);
        cmd.current_dir(self.path());
        cmd.env("SCANQ_BASE_URL", &self.backend.base_url);
        cmd.timeout(Duration::from_secs(20));

        let output = cmd.output().expect("Failed to execute scanq command");

        CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }

    /// Get full path to a file in the temp directory
    pub fn file_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.path().join(path)
    }

    /// Read file from temp directory
    pub fn read_file(&self, path: impl AsRef<Path>) -> String {
        let full_path = self.file_path(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Failed to read file: {}", full_path.display()))
    }

    /// Write file to temp directory (creates parent directories)
    pub fn write_file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.file_path(&path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|_| panic!("Failed to create directory: {}", parent.display()));
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|_| panic!("Failed to write file: {}", full_path.display()));
    }

    /// Drop a PDF into the temp directory and return its name
    pub fn write_pdf(&self, name: &str) -> String {
        self.write_file(name, "%PDF-1.4\nfake document body\n");
        name.to_string()
    }

    /// Shrink the poll interval so watch tests finish quickly
    pub fn write_fast_poll_config(&self) {
        self.write_file("scanq.toml", "[poll]\ninterval_ms = 50\n");
    }

    /// Assert file exists
    pub fn assert_file_exists(&self, path: impl AsRef<Path>) {
        let full_path = self.file_path(&path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}

pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

pub fn assert_success(result: &CommandResult) {
    assert!(
        result.success(),
        "Expected command to succeed but it failed.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        result.stdout,
        result.stderr
    );
}

pub fn assert_output_contains(result: &CommandResult, pattern: &str) {
    assert!(
        result.stdout.contains(pattern),
        "Expected stdout to contain '{}', but it didn't.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        pattern,
        result.stdout,
        result.stderr
    );
}

pub fn assert_stderr_contains(result: &CommandResult, pattern: &str) {
    assert!(
        result.stderr.contains(pattern),
        "Expected stderr to contain '{}', but it didn't.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        pattern,
        result.stdout,
        result.stderr
    );
}

type ResponseQueues = Arc<Mutex<HashMap<String, VecDeque<(u16, String)>>>>;

/// In-process stand-in for the scanning backend. Responses are keyed by
/// "METHOD path"; each request pops the next queued response and the
/// last one sticks, so a polling client can hit the same route forever.
pub struct MockBackend {
    pub base_url: String,
    responses: ResponseQueues,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn spawn() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("Failed to bind mock backend");
        let base_url = format!("http://{}", server.server_addr());
        let responses: ResponseQueues = Arc::default();
        let requests: Arc<Mutex<Vec<String>>> = Arc::default();

        let queues = responses.clone();
        let seen = requests.clone();
        std::thread::spawn(move || {
            for request in server.incoming_requests() {
                let key = format!("{} {}", request.method(), request.url());
                seen.lock().unwrap().push(key.clone());

                let (status, body) = next_response(&queues, &key);
                let response = tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(
                        tiny_http::Header::from_bytes(
                            &b"Content-Type"[..],
                            &b"application/json"[..],
                        )
                        .expect("static header"),
                    );
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            responses,
            requests,
        }
    }

    pub fn enqueue(&self, route: &str, status: u16, body: &serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .entry(route.to_string())
            .or_default()
            .push_back((status, body.to_string()));
    }

    /// How many requests hit the given route
    pub fn hits(&self, route: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|seen| seen.as_str() == route)
            .count()
    }

    pub fn total_hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn next_response(queues: &ResponseQueues, key: &str) -> (u16, String) {
    let mut map = queues.lock().unwrap();
    match map.get_mut(key) {
        Some(queue) if queue.len() > 1 => queue.pop_front().expect("non-empty queue"),
        Some(queue) => queue
            .front()
            .cloned()
            .unwrap_or_else(|| (404, json!({"detail": "Not Found"}).to_string())),
        None => (404, json!({"detail": "Not Found"}).to_string()),
    }
}

/// Task object as the backend serializes it, naive timestamps included
pub fn task_value(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "description": format!("task {id}"),
        "filename": format!("{id}.pdf"),
        "status": status,
        "error_message": null,
        "created_at": "2025-03-01T09:30:00.123456",
        "completed_at": null,
        "report_path": null
    })
}

pub fn completed_task_value(id: &str) -> serde_json::Value {
    let mut task = task_value(id, "COMPLETED");
    task["completed_at"] = json!("2025-03-01T09:31:00.123456");
    task["report_path"] = json!(format!("reports/{id}.json"));
    task
}

pub fn report_value(subject: &str) -> serde_json::Value {
    json!({
        "data": {
            "id": subject,
            "attributes": {
                "stats": {
                    "malicious": 1,
                    "suspicious": 0,
                    "harmless": 60,
                    "undetected": 3
                },
                "results": {
                    "Sophos": {"category": "malicious", "result": "Troj/PDFUri-ABC"},
                    "ClamAV": {"category": "harmless", "result": null}
                }
            }
        }
    })
}
