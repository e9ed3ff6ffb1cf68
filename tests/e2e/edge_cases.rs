use super::*;

#[test]
fn submit_refuses_non_pdf_before_any_request() {
    let ctx = TestContext::new();
    ctx.write_file("notes.txt", "plain text");

    let result = ctx.run_scanq(&["submit", "notes.txt", "--description", "notes"]);

    assert!(!result.success(), "non-PDF selection should be refused");
    assert_stderr_contains(&result, "not a PDF");
    assert_eq!(
        ctx.backend.total_hits(),
        0,
        "a rejected selection must not reach the backend"
    );
}

#[test]
fn submit_refuses_blank_description_locally() {
    let ctx = TestContext::new();
    let pdf = ctx.write_pdf("invoice.pdf");

    let result = ctx.run_scanq(&["submit", &pdf, "--description", "   "]);

    assert!(!result.success(), "blank description should be refused");
    assert_stderr_contains(&result, "description must not be empty");
    assert_eq!(ctx.backend.total_hits(), 0);
}

#[test]
fn show_failed_task_prints_error_and_skips_report() {
    let ctx = TestContext::new();
    let mut failed = task_value("t-2", "FAILED");
    failed["error_message"] = json!("scan provider rejected the file");
    ctx.backend.enqueue("GET /api/tasks/t-2", 200, &failed);

    let result = ctx.run_scanq(&["show", "t-2"]);

    assert_success(&result);
    assert_output_contains(&result, "scan provider rejected the file");
    assert_output_contains(&result, "No report; the scan failed.");
    assert_eq!(
        ctx.backend.hits("GET /api/reports/t-2"),
        0,
        "no report fetch for a failed task"
    );
}

#[test]
fn show_running_task_renders_progress_placeholder() {
    let ctx = TestContext::new();
    ctx.backend
        .enqueue("GET /api/tasks/t-3", 200, &task_value("t-3", "RUNNING"));

    let result = ctx.run_scanq(&["show", "t-3"]);

    assert_success(&result);
    assert_output_contains(&result, "The scan has not finished yet.");
    assert_eq!(ctx.backend.hits("GET /api/reports/t-3"), 0);
}

#[test]
fn show_completed_task_without_stored_report() {
    let ctx = TestContext::new();
    let mut done = task_value("t-4", "COMPLETED");
    done["completed_at"] = json!("2025-03-01T09:31:00.123456");
    ctx.backend.enqueue("GET /api/tasks/t-4", 200, &done);

    let result = ctx.run_scanq(&["show", "t-4"]);

    assert_success(&result);
    assert_output_contains(&result, "no report was stored");
    assert_eq!(ctx.backend.hits("GET /api/reports/t-4"), 0);
}

#[test]
fn show_survives_a_failing_report_endpoint() {
    let ctx = TestContext::new();
    ctx.backend
        .enqueue("GET /api/tasks/t-5", 200, &completed_task_value("t-5"));
    ctx.backend.enqueue(
        "GET /api/reports/t-5",
        502,
        &json!({"detail": "provider unavailable"}),
    );

    let result = ctx.run_scanq(&["show", "t-5"]);

    assert_success(&result);
    assert_output_contains(&result, "Report not available.");
}

#[test]
fn report_command_refuses_unfinished_task() {
    let ctx = TestContext::new();
    ctx.backend
        .enqueue("GET /api/tasks/t-6", 200, &task_value("t-6", "PENDING"));

    let result = ctx.run_scanq(&["report", "t-6"]);

    assert!(!result.success(), "no report to download yet");
    assert_stderr_contains(&result, "no report stored for task t-6");
    assert_eq!(ctx.backend.hits("GET /api/reports/t-6"), 0);
}

#[test]
fn unknown_status_from_backend_renders_verbatim() {
    let ctx = TestContext::new();
    ctx.backend
        .enqueue("GET /api/tasks", 200, &json!([task_value("t-7", "archived")]));

    let result = ctx.run_scanq(&["list"]);

    assert_success(&result);
    assert_output_contains(&result, "archived");
}

#[test]
fn unknown_task_id_fails_with_backend_detail() {
    let ctx = TestContext::new();

    let result = ctx.run_scanq(&["show", "missing"]);

    assert!(!result.success());
    assert_stderr_contains(&result, "404");
}

#[test]
fn unreachable_backend_is_a_plain_failure() {
    let ctx = TestContext::new();
    // Grab a port with nothing listening on it.
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
        listener.local_addr().expect("probe addr").port()
    };

    let result = ctx.run_scanq(&["list", "--base-url", &format!("http://127.0.0.1:{closed}")]);

    assert!(!result.success(), "connection failure should fail the run");
    assert!(!result.stderr.is_empty());
}

#[test]
fn base_url_flag_beats_environment() {
    let ctx = TestContext::new();
    let flagged = MockBackend::spawn();
    flagged.enqueue("GET /api/tasks", 200, &json!([task_value("t-8", "PENDING")]));

    let result = ctx.run_scanq(&["list", "--base-url", &flagged.base_url]);

    assert_success(&result);
    assert_output_contains(&result, "t-8");
    assert_eq!(
        ctx.backend.total_hits(),
        0,
        "the env-configured backend should not be contacted"
    );
    assert_eq!(flagged.hits("GET /api/tasks"), 1);
}
