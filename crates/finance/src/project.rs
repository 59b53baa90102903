//! Projects and the period-index rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use labfunds_core::{DomainError, ProjectId};

/// How a project's funding schedule is sliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// One period per year elapsed since `start_date`.
    Yearly,
    /// Periods advance only when the funding agency releases an installment.
    Invoice,
}

impl ProjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Yearly => "yearly",
            ProjectKind::Invoice => "invoice",
        }
    }
}

impl core::str::FromStr for ProjectKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yearly" => Ok(ProjectKind::Yearly),
            "invoice" => Ok(ProjectKind::Invoice),
            other => Err(DomainError::validation(format!(
                "unknown project kind: {other}"
            ))),
        }
    }
}

/// A funded research project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Short code, e.g. the grant number.
    pub name: String,
    pub title: String,
    pub funding_agency: String,
    pub kind: ProjectKind,
    pub start_date: DateTime<Utc>,
    /// Current installment for invoice-billed projects (0-based).
    pub current_installment: u32,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Period index a newly filed reimbursement or expense is attributed to.
    ///
    /// Invoice projects use the stored installment; yearly projects count whole
    /// years elapsed since the start date, never negative. Indices are 0-based,
    /// display layers add 1.
    pub fn current_index(&self, now: DateTime<Utc>) -> u32 {
        match self.kind {
            ProjectKind::Invoice => self.current_installment,
            ProjectKind::Yearly => now
                .date_naive()
                .years_since(self.start_date.date_naive())
                .unwrap_or(0),
        }
    }

    /// Column label for the period index in reports.
    pub fn index_label(&self) -> &'static str {
        match self.kind {
            ProjectKind::Invoice => "Installment",
            ProjectKind::Yearly => "Year",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn project(kind: ProjectKind, start: DateTime<Utc>, installment: u32) -> Project {
        Project {
            id: ProjectId::new(),
            name: "SERB-042".to_string(),
            title: "Adaptive sensing".to_string(),
            funding_agency: "SERB".to_string(),
            kind,
            start_date: start,
            current_installment: installment,
            created_at: start,
        }
    }

    #[test]
    fn yearly_index_counts_whole_years() {
        let start = Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap();
        let p = project(ProjectKind::Yearly, start, 0);

        let before_anniversary = Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap();
        assert_eq!(p.current_index(before_anniversary), 1);

        let on_anniversary = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(p.current_index(on_anniversary), 2);
    }

    #[test]
    fn yearly_index_is_zero_before_start() {
        let start = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let p = project(ProjectKind::Yearly, start, 0);
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(p.current_index(now), 0);
    }

    #[test]
    fn invoice_index_uses_stored_installment() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let p = project(ProjectKind::Invoice, start, 3);
        assert_eq!(p.current_index(Utc::now()), 3);
    }
}
