//! On-demand scan report retrieval for the selected task.
//!
//! Reports are fetched lazily: only when the active selection is a
//! completed task with a stored report, and only once per task id.
//! Every fetch ticket carries the selection generation it was planned
//! under, so a response that lands after the user has moved on is
//! discarded instead of overwriting the current view.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::api::ApiError;
use crate::api::model::{ScanReport, Task};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReportState {
    /// Nothing fetched for the current selection yet.
    #[default]
    Idle,
    /// A fetch for the current selection is in flight.
    Loading,
    Available(ScanReport),
    /// The fetch failed; rendered as "report not available".
    Unavailable,
}

/// A planned fetch, bound to the selection generation it was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub task_id: String,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct ReportFetcher {
    state: ReportState,
    generation: u64,
    current: Option<String>,
    in_flight: Option<FetchTicket>,
    cache: HashMap<String, ScanReport>,
}

impl ReportFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ReportState {
        &self.state
    }

    pub fn report(&self) -> Option<&ScanReport> {
        match &self.state {
            ReportState::Available(report) => Some(report),
            _ => None,
        }
    }

    /// React to a selection change. Switching task bumps the generation,
    /// which invalidates any fetch still in flight for the previous one.
    /// A report already fetched for the new selection is shown straight
    /// from the cache. Re-announcing the same selection is a no-op, so a
    /// failed fetch is not retried until the user actually moves away
    /// and selects the task again.
    pub fn on_select(&mut self, task: Option<&Task>) {
        let id = task.map(|t| t.id.as_str());
        if self.current.as_deref() == id {
            return;
        }

        self.generation += 1;
        self.current = id.map(str::to_owned);
        self.state = match id.and_then(|id| self.cache.get(id)) {
            Some(report) => ReportState::Available(report.clone()),
            None => ReportState::Idle,
        };
    }

    /// Decide whether `task` warrants a fetch right now. Returns a
    /// ticket iff the task is completed with a stored report, nothing is
    /// cached for it, and no fetch for it is already in flight. Issuing
    /// a ticket moves the state to [`ReportState::Loading`].
    pub fn plan_fetch(&mut self, task: &Task) -> Option<FetchTicket> {
        if self.current.as_deref() != Some(task.id.as_str()) {
            return None;
        }
        if self.state != ReportState::Idle {
            return None;
        }
        if !task.report_ready() {
            return None;
        }
        if self.cache.contains_key(&task.id) {
            return None;
        }
        if self
            .in_flight
            .as_ref()
            .is_some_and(|pending| pending.task_id == task.id)
        {
            return None;
        }

        let ticket = FetchTicket {
            task_id: task.id.clone(),
            generation: self.generation,
        };
        self.in_flight = Some(ticket.clone());
        self.state = ReportState::Loading;
        Some(ticket)
    }

    /// Apply a fetch outcome. Responses planned under an older selection
    /// generation are dropped without touching the visible state.
    pub fn resolve(&mut self, ticket: FetchTicket, outcome: Result<ScanReport, ApiError>) {
        if self.in_flight.as_ref() == Some(&ticket) {
            self.in_flight = None;
        }

        if ticket.generation != self.generation {
            debug!(
                task = %ticket.task_id,
                "discarding report response for a superseded selection"
            );
            return;
        }

        match outcome {
            Ok(report) => {
                self.cache.insert(ticket.task_id, report.clone());
                self.state = ReportState::Available(report);
            }
            Err(err) => {
                warn!(task = %ticket.task_id, error = %err, "report fetch failed");
                self.state = ReportState::Unavailable;
            }
        }
    }
}
