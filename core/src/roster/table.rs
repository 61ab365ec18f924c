//! The rendered roster table: what the user currently sees.
//!
//! Filtering and CSV export both operate on this rendered state rather than
//! on a fresh fetch, so a stale or filtered table exports exactly what is
//! visible.

use crate::api::types::{format_percent, StudentRecord};
use crate::status::{classify_optional, CohortCounts, Status};

pub const EXPORT_FILENAME: &str = "alunos_turma.csv";
pub const EXPORT_MIME: &str = "text/csv;charset=utf-8;";
pub const EXPORT_HEADER: [&str; 4] = ["Nome", "Email", "Frequência", "Média"];

pub const LOADING_TEXT: &str = "Carregando alunos...";
pub const EMPTY_TEXT: &str = "Nenhum aluno encontrado nesta turma.";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub student_id: String,
    pub name: String,
    pub email: String,
    /// Already formatted, e.g. `80%`.
    pub attendance: String,
    /// Already formatted with one decimal, e.g. `7.5`.
    pub grade: String,
    pub status: Status,
    /// Whether the row carries a remove action (teacher sessions only).
    pub removable: bool,
    pub visible: bool,
}

impl RenderedRow {
    pub fn from_student(student: &StudentRecord, removable: bool) -> Self {
        Self {
            student_id: student.id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            attendance: format_percent(student.attendance_percent.unwrap_or(0.0)),
            grade: format!("{:.1}", student.grade.unwrap_or(0.0)),
            status: classify_optional(student.grade),
            removable,
            visible: true,
        }
    }

    /// The data cells in column order, action column excluded.
    pub fn cells(&self) -> [&str; 4] {
        [&self.name, &self.email, &self.attendance, &self.grade]
    }

    fn matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    Loading,
    Error(String),
    Empty,
    Rows(Vec<RenderedRow>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RosterView {
    pub body: TableBody,
    pub counts: CohortCounts,
    /// Active name filter as typed by the user.
    pub query: String,
}

impl Default for RosterView {
    fn default() -> Self {
        Self {
            body: TableBody::Loading,
            counts: CohortCounts::default(),
            query: String::new(),
        }
    }
}

impl RosterView {
    pub fn rows(&self) -> &[RenderedRow] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            _ => &[],
        }
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &RenderedRow> {
        self.rows().iter().filter(|r| r.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    /// Remember `query` and recompute row visibility. Case-insensitive
    /// substring match on the rendered name; a blank query shows every row.
    pub fn apply_filter(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    /// Re-apply the remembered query to the current rows.
    pub fn refilter(&mut self) {
        let needle = self.query.trim().to_lowercase();
        if let TableBody::Rows(rows) = &mut self.body {
            for row in rows.iter_mut() {
                row.visible = row.matches(&needle);
            }
        }
    }

    /// Comma-separated export of the visible student rows, header first,
    /// rows joined by `\n` with no trailing newline.
    pub fn to_csv(&self) -> String {
        let mut lines = vec![EXPORT_HEADER.join(",")];
        lines.extend(self.visible_rows().map(|row| {
            row.cells()
                .iter()
                .map(|c| csv_field(c.trim()))
                .collect::<Vec<_>>()
                .join(",")
        }));
        lines.join("\n")
    }
}

/// Quote a field only when it would otherwise break the row.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
