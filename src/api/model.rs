use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a scan task as reported by the backend.
///
/// Unknown wire values are preserved in `Other` so a newer backend can
/// introduce statuses without breaking rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Other(String),
}

impl TaskStatus {
    /// COMPLETED and FAILED are terminal: the backend never moves a task
    /// out of them again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => TaskStatus::Pending,
            "RUNNING" => TaskStatus::Running,
            "COMPLETED" => TaskStatus::Completed,
            "FAILED" => TaskStatus::Failed,
            _ => TaskStatus::Other(value),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "PENDING"),
            TaskStatus::Running => write!(f, "RUNNING"),
            TaskStatus::Completed => write!(f, "COMPLETED"),
            TaskStatus::Failed => write!(f, "FAILED"),
            TaskStatus::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// One scan request as known to the client. The backend owns every field;
/// the client only re-reads them through polling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub filename: String,
    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
}

impl Task {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// A report can be fetched only for a COMPLETED task whose report
    /// path has been recorded; COMPLETED without it means the report is
    /// not available yet.
    pub fn report_ready(&self) -> bool {
        self.status == TaskStatus::Completed
            && self.report_path.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Error text to surface, present only for FAILED tasks.
    pub fn failure_message(&self) -> Option<&str> {
        match self.status {
            TaskStatus::Failed => self.error_message.as_deref(),
            _ => None,
        }
    }
}

/// Response of the task creation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTask {
    pub task_id: String,
    pub status: TaskStatus,
}

// The backend emits naive UTC timestamps (no offset); tolerate both those
// and full RFC 3339 strings.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()),
    }
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn de_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|s| parse_timestamp(&s).map_err(serde::de::Error::custom))
        .transpose()
}

const DEEP_LINK_BASE: &str = "https://www.virustotal.com/gui/file";

/// Scan report as served by the report endpoint. The shape is the
/// provider's analysis envelope: `{ data: { id, attributes: { stats,
/// results } } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub data: ReportData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub id: String,

    #[serde(default)]
    pub attributes: ReportAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportAttributes {
    #[serde(default)]
    pub stats: ScanStats,

    #[serde(default)]
    pub results: BTreeMap<String, EngineVerdict>,
}

/// Classification counts across all engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    #[serde(default)]
    pub malicious: u64,

    #[serde(default)]
    pub suspicious: u64,

    #[serde(default)]
    pub harmless: u64,

    #[serde(default)]
    pub undetected: u64,
}

/// Verdict of a single engine. `result` is null on the wire when the
/// engine detected nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineVerdict {
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub result: Option<String>,
}

impl ScanReport {
    /// Identifier of the scanned artifact in the provider's namespace.
    pub fn subject_id(&self) -> &str {
        &self.data.id
    }

    pub fn stats(&self) -> &ScanStats {
        &self.data.attributes.stats
    }

    pub fn results(&self) -> &BTreeMap<String, EngineVerdict> {
        &self.data.attributes.results
    }

    /// External deep link into the provider's UI for this artifact.
    pub fn deep_link(&self) -> String {
        format!("{DEEP_LINK_BASE}/{}", self.data.id)
    }
}
