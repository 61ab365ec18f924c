//! Roster Loader.
//!
//! Fetches the student list of one class, classifies every row and publishes
//! a complete [`RosterView`] (rows plus cohort counts) to a [`RosterSink`].
//! Every load is a full, self-contained render. Loads are tagged with a
//! monotonically increasing sequence number and only the most recently
//! issued one may publish, so overlapping user-triggered and scheduled
//! reloads resolve deterministically without cancelling anything.

pub mod table;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::types::StudentRecord;
use crate::api::{endpoints, ApiResponse, Gateway, Method};
use crate::config::FailedRosterCounts;
use crate::session::Role;
use crate::status::CohortCounts;

pub use self::table::{RenderedRow, RosterView, TableBody};

pub const ROSTER_ERROR_MESSAGE: &str = "Erro ao carregar alunos.";

/// Rendering boundary: receives the full table and the counts together.
pub trait RosterSink {
    fn render(&self, view: &RosterView);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was rendered.
    Applied,
    /// A newer load was issued while this one was in flight.
    Superseded,
    /// The loader was closed (view unmounted).
    Closed,
}

pub struct RosterLoader<G: Gateway> {
    gateway: Rc<G>,
    sink: Rc<dyn RosterSink>,
    role: Role,
    on_failure: FailedRosterCounts,
    issued: Cell<u64>,
    closed: Cell<bool>,
    view: RefCell<RosterView>,
}

impl<G: Gateway> RosterLoader<G> {
    pub fn new(
        gateway: Rc<G>,
        sink: Rc<dyn RosterSink>,
        role: Role,
        on_failure: FailedRosterCounts,
    ) -> Self {
        Self {
            gateway,
            sink,
            role,
            on_failure,
            issued: Cell::new(0),
            closed: Cell::new(false),
            view: RefCell::new(RosterView::default()),
        }
    }

    pub async fn load(&self, class_id: &str) -> LoadOutcome {
        if self.closed.get() {
            return LoadOutcome::Closed;
        }

        let seq = self.issued.get() + 1;
        self.issued.set(seq);
        self.publish(|view| view.body = TableBody::Loading);

        let response = self
            .gateway
            .call(&endpoints::class_roster(class_id), Method::GET, None)
            .await;

        if self.closed.get() {
            debug!("Discarding roster #{} for class {}: view closed", seq, class_id);
            return LoadOutcome::Closed;
        }
        if seq != self.issued.get() {
            debug!(
                "Discarding roster #{} for class {}: #{} is newer",
                seq,
                class_id,
                self.issued.get()
            );
            return LoadOutcome::Superseded;
        }

        let (body, counts) = self.build(&response);
        info!(
            "Roster #{} for class {}: {} rows ({:?})",
            seq,
            class_id,
            counts.total(),
            counts
        );
        self.publish(|view| {
            view.body = body;
            view.counts = counts;
            view.refilter();
        });
        LoadOutcome::Applied
    }

    fn build(&self, response: &ApiResponse) -> (TableBody, CohortCounts) {
        let previous = self.view.borrow().counts;
        let failed_counts = match self.on_failure {
            FailedRosterCounts::Keep => previous,
            FailedRosterCounts::Reset => CohortCounts::default(),
        };

        if !response.success {
            let message = response.message_or(ROSTER_ERROR_MESSAGE);
            warn!("Roster fetch failed: {}", message);
            return (TableBody::Error(message), failed_counts);
        }

        let entries = match response.payload.get("alunos") {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(entries)) => entries.as_slice(),
            Some(other) => {
                warn!("Malformed roster payload: expected a list, got {}", other);
                return (TableBody::Error(ROSTER_ERROR_MESSAGE.to_string()), failed_counts);
            }
        };
        // One bad entry costs one row, not the table.
        let students: Vec<StudentRecord> = entries
            .iter()
            .filter_map(|entry| match StudentRecord::deserialize(entry) {
                Ok(student) => Some(student),
                Err(e) => {
                    warn!("Skipping malformed roster entry {}: {}", entry, e);
                    None
                }
            })
            .collect();

        if students.is_empty() {
            return (TableBody::Empty, CohortCounts::default());
        }

        let removable = self.role.is_teacher();
        let rows: Vec<RenderedRow> = students
            .iter()
            .map(|s| RenderedRow::from_student(s, removable))
            .collect();
        let counts: CohortCounts = rows.iter().map(|r| r.status).collect();
        (TableBody::Rows(rows), counts)
    }

    fn publish(&self, update: impl FnOnce(&mut RosterView)) {
        let snapshot = {
            let mut view = self.view.borrow_mut();
            update(&mut view);
            view.clone()
        };
        self.sink.render(&snapshot);
    }

    /// Filter the rendered rows by name. No network access; the query is
    /// kept and re-applied to later renders.
    pub fn filter(&self, query: &str) {
        if self.closed.get() {
            return;
        }
        self.publish(|view| view.apply_filter(query));
    }

    /// CSV of the rows currently visible.
    pub fn export_csv(&self) -> String {
        self.view.borrow().to_csv()
    }

    pub fn view(&self) -> RosterView {
        self.view.borrow().clone()
    }

    pub fn counts(&self) -> CohortCounts {
        self.view.borrow().counts
    }

    /// Stop publishing. In-flight loads complete and are discarded.
    pub fn close(&self) {
        self.closed.set(true);
    }
}
