//! CSV rendering of the project report.
//!
//! Layout mirrors the spreadsheet the lab circulated: agency and project
//! header lines, one column header row, reimbursement rows then institute
//! expense rows, and a grand-total row over both collections. Period indices
//! are 0-based in storage and shown 1-based.

use anyhow::Result;

use labfunds_core::{display_rupees, Paise};
use labfunds_store::ProjectReport;

pub fn render_report_csv(report: &ProjectReport) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(vec![]);
    let project = &report.project;

    writer.write_record([project.funding_agency.as_str()])?;
    writer.write_record([
        format!("Project ID: {}", project.name),
        format!("Project Title: {}", project.title),
    ])?;
    writer.write_record([
        "S.No.",
        "Submitted On",
        "Title",
        "Project Head",
        "Type",
        project.index_label(),
        "Amount",
    ])?;

    let mut serial = 0usize;
    let mut total: Paise = 0;

    for claim in &report.reimbursements {
        let r = &claim.reimbursement;
        serial += 1;
        total += r.total_amount;
        writer.write_record([
            serial.to_string(),
            r.created_at.format("%d-%m-%Y").to_string(),
            r.title.clone(),
            r.project_head.clone(),
            "Reimbursement".to_string(),
            (r.year_or_installment + 1).to_string(),
            display_rupees(r.total_amount),
        ])?;
    }

    for expense in &report.institute_expenses {
        serial += 1;
        total += expense.amount;
        writer.write_record([
            serial.to_string(),
            expense.created_at.format("%d-%m-%Y").to_string(),
            expense.reason.clone(),
            expense.project_head.clone(),
            "Institute Expense".to_string(),
            (expense.year_or_installment + 1).to_string(),
            display_rupees(expense.amount),
        ])?;
    }

    writer.write_record([
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        "Total Amount".to_string(),
        display_rupees(total),
    ])?;

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing csv report: {e}"))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use labfunds_core::{ExpenseId, ProjectId, ReimbursementId};
    use labfunds_finance::{
        InstituteExpense, Project, ProjectKind, Reimbursement, ReimbursementWithExpenses,
    };

    fn report() -> ProjectReport {
        let created = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let project = Project {
            id: ProjectId::new(),
            name: "SERB-042".to_string(),
            title: "Adaptive sensing".to_string(),
            funding_agency: "SERB".to_string(),
            kind: ProjectKind::Yearly,
            start_date: created,
            current_installment: 0,
            created_at: created,
        };
        let claim = ReimbursementWithExpenses {
            reimbursement: Reimbursement {
                id: ReimbursementId::new(),
                project_id: project.id,
                expense_ids: vec![],
                project_head: "Consumables".to_string(),
                title: "toner".to_string(),
                description: String::new(),
                total_amount: 50_000,
                reference_url: None,
                paid: false,
                entry_id: None,
                year_or_installment: 1,
                created_at: created,
            },
            expenses: vec![],
        };
        let institute = InstituteExpense {
            id: ExpenseId::new(),
            project_id: project.id,
            project_head: "Equipment".to_string(),
            reason: "maintenance contract".to_string(),
            amount: 25_000,
            year_or_installment: 1,
            created_at: created,
        };
        ProjectReport {
            project,
            reimbursements: vec![claim],
            institute_expenses: vec![institute],
        }
    }

    #[test]
    fn report_rows_carry_serials_types_and_grand_total() {
        let bytes = render_report_csv(&report()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "SERB");
        assert!(lines[1].contains("Project ID: SERB-042"));
        assert!(lines[2].starts_with("S.No.,Submitted On,Title"));
        assert!(lines[2].contains(",Year,"));
        assert!(lines[3].starts_with("1,15-03-2024,toner,Consumables,Reimbursement,2,500.00"));
        assert!(lines[4].contains("Institute Expense"));
        assert!(lines.last().unwrap().contains("Total Amount,750.00"));
    }
}
