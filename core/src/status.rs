//! Grade-to-status classification and cohort counting.
//!
//! Status depends on the grade alone; attendance never participates.

pub const APPROVAL_GRADE: f64 = 7.0;
pub const RECOVERY_GRADE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Approved,
    Recovery,
    Failed,
}

impl Status {
    /// Style bucket for the grade cell.
    pub fn bucket(&self) -> &'static str {
        match self {
            Status::Approved => "success",
            Status::Recovery => "warning",
            Status::Failed => "danger",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Approved => "Aprovado",
            Status::Recovery => "Recuperação",
            Status::Failed => "Reprovado",
        }
    }
}

/// `>= 7` approved, `[5, 7)` recovery, everything else failed (negatives
/// and NaN included).
pub fn classify(grade: f64) -> Status {
    if grade >= APPROVAL_GRADE {
        Status::Approved
    } else if grade >= RECOVERY_GRADE {
        Status::Recovery
    } else {
        Status::Failed
    }
}

/// Absent grades count as 0 before classification.
pub fn classify_optional(grade: Option<f64>) -> Status {
    classify(grade.unwrap_or(0.0))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CohortCounts {
    pub approved: usize,
    pub recovery: usize,
    pub failed: usize,
}

impl CohortCounts {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Approved => self.approved += 1,
            Status::Recovery => self.recovery += 1,
            Status::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.approved + self.recovery + self.failed
    }
}

impl FromIterator<Status> for CohortCounts {
    fn from_iter<I: IntoIterator<Item = Status>>(iter: I) -> Self {
        let mut counts = CohortCounts::default();
        for status in iter {
            counts.record(status);
        }
        counts
    }
}
