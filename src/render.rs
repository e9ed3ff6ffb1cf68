//! Terminal views: task table, task details, report summary.
//!
//! Views are materialized into plain-string structs first, rendered to
//! markdown through askama templates, then printed with termimad. The
//! status display is a closed mapping with a neutral fallback, so a
//! status value this build has never heard of renders unstyled instead
//! of breaking the view.

use askama::Template;
use chrono::{DateTime, Utc};
use termimad::MadSkin;

use crate::api::model::{ScanReport, Task, TaskStatus};
use crate::report::ReportState;

// ============================================================================
// Status display
// ============================================================================

/// Visual weight of a status, decoupled from its wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Waiting,
    Active,
    Success,
    Failure,
    Neutral,
}

pub fn status_tone(status: &TaskStatus) -> StatusTone {
    match status {
        TaskStatus::Pending => StatusTone::Waiting,
        TaskStatus::Running => StatusTone::Active,
        TaskStatus::Completed => StatusTone::Success,
        TaskStatus::Failed => StatusTone::Failure,
        TaskStatus::Other(_) => StatusTone::Neutral,
    }
}

/// Human label for a status. Unknown wire values pass through verbatim.
pub fn status_label(status: &TaskStatus) -> String {
    match status {
        TaskStatus::Pending => "Pending".into(),
        TaskStatus::Running => "Running".into(),
        TaskStatus::Completed => "Completed".into(),
        TaskStatus::Failed => "Failed".into(),
        TaskStatus::Other(raw) => raw.clone(),
    }
}

pub fn status_markdown(status: &TaskStatus) -> String {
    let label = status_label(status);
    match status_tone(status) {
        StatusTone::Active => format!("*{label}*"),
        StatusTone::Success | StatusTone::Failure => format!("**{label}**"),
        StatusTone::Waiting | StatusTone::Neutral => label,
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

// ============================================================================
// View Building (Materialization)
// ============================================================================

pub struct TaskRowView {
    pub id: String,
    pub description: String,
    pub filename: String,
    pub status: String,
    pub created: String,
}

pub struct TaskListView {
    pub rows: Vec<TaskRowView>,
    pub empty: bool,
}

pub struct TaskDetailsView {
    pub id: String,
    pub description: String,
    pub filename: String,
    pub status: String,
    pub created: String,
    pub completed: String,
    pub has_completed: bool,
    pub error: String,
    pub has_error: bool,
}

pub struct EngineRowView {
    pub name: String,
    pub category: String,
    pub result: String,
}

pub struct ReportSummaryView {
    pub subject_id: String,
    pub malicious: u64,
    pub suspicious: u64,
    pub harmless: u64,
    pub undetected: u64,
    pub engines: Vec<EngineRowView>,
    pub has_engines: bool,
    pub engines_note: String,
    pub deep_link: String,
}

pub fn build_task_list_view(tasks: &[Task]) -> TaskListView {
    let rows = tasks
        .iter()
        .map(|task| TaskRowView {
            id: task.id.clone(),
            description: task.description.clone(),
            filename: task.filename.clone(),
            status: status_markdown(&task.status),
            created: format_timestamp(task.created_at),
        })
        .collect::<Vec<_>>();

    TaskListView {
        empty: rows.is_empty(),
        rows,
    }
}

pub fn build_task_details_view(task: &Task) -> TaskDetailsView {
    let error = task.failure_message().unwrap_or_default().to_string();

    TaskDetailsView {
        id: task.id.clone(),
        description: task.description.clone(),
        filename: task.filename.clone(),
        status: status_markdown(&task.status),
        created: format_timestamp(task.created_at),
        completed: task.completed_at.map(format_timestamp).unwrap_or_default(),
        has_completed: task.completed_at.is_some(),
        has_error: !error.is_empty(),
        error,
    }
}

/// Flatten a report for display. By default only engines that flagged
/// the file are listed; `all_engines` includes the clean verdicts too.
pub fn build_report_view(report: &ScanReport, all_engines: bool) -> ReportSummaryView {
    let stats = report.stats();

    let engines = report
        .results()
        .iter()
        .filter(|(_, verdict)| {
            all_engines || matches!(verdict.category.as_str(), "malicious" | "suspicious")
        })
        .map(|(name, verdict)| EngineRowView {
            name: name.clone(),
            category: verdict.category.clone(),
            result: verdict.result.clone().unwrap_or_else(|| "-".into()),
        })
        .collect::<Vec<_>>();

    let engines_note = if all_engines {
        "No engine results recorded."
    } else {
        "No engines flagged this file."
    };

    ReportSummaryView {
        subject_id: report.subject_id().to_string(),
        malicious: stats.malicious,
        suspicious: stats.suspicious,
        harmless: stats.harmless,
        undetected: stats.undetected,
        has_engines: !engines.is_empty(),
        engines,
        engines_note: engines_note.to_string(),
        deep_link: report.deep_link(),
    }
}

/// One-line stand-in for the report section when there is nothing to
/// tabulate yet. `None` means a full summary should be rendered instead.
pub fn report_placeholder(task: &Task, state: &ReportState) -> Option<String> {
    match state {
        ReportState::Available(_) => None,
        ReportState::Loading => Some("Fetching scan report...".into()),
        ReportState::Unavailable => Some("Report not available.".into()),
        ReportState::Idle => Some(match &task.status {
            TaskStatus::Failed => "No report; the scan failed.".into(),
            TaskStatus::Completed if !task.report_ready() => {
                "The scan finished but no report was stored.".into()
            }
            TaskStatus::Completed => "Report not fetched yet.".into(),
            _ => "The scan has not finished yet.".into(),
        }),
    }
}

// ============================================================================
// Watch feed lines
// ============================================================================

pub fn appearance_line(task: &Task) -> String {
    format!(
        "+ {}  {} ({})",
        task.id,
        task.description,
        status_label(&task.status)
    )
}

pub fn transition_line(task: &Task, previous: &TaskStatus) -> String {
    format!(
        "~ {}  {} -> {}",
        task.id,
        status_label(previous),
        status_label(&task.status)
    )
}

pub fn removal_line(id: &str) -> String {
    format!("- {id}  removed")
}

// ============================================================================
// Askama Templates
// ============================================================================

#[derive(Template)]
#[template(path = "task/list.md")]
struct TaskListTemplate<'a> {
    view: &'a TaskListView,
}

#[derive(Template)]
#[template(path = "task/details.md")]
struct TaskDetailsTemplate<'a> {
    view: &'a TaskDetailsView,
}

#[derive(Template)]
#[template(path = "report/summary.md")]
struct ReportSummaryTemplate<'a> {
    view: &'a ReportSummaryView,
}

pub fn task_list_markdown(view: &TaskListView) -> String {
    TaskListTemplate { view }
        .render()
        .expect("Template rendering failed")
}

pub fn task_details_markdown(view: &TaskDetailsView) -> String {
    TaskDetailsTemplate { view }
        .render()
        .expect("Template rendering failed")
}

pub fn report_summary_markdown(view: &ReportSummaryView) -> String {
    ReportSummaryTemplate { view }
        .render()
        .expect("Template rendering failed")
}

// ============================================================================
// Rendering
// ============================================================================

pub fn print_markdown(markdown: &str) {
    let skin = MadSkin::default();
    skin.print_text(markdown);
}
