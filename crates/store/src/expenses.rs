//! Expense and institute-expense queries.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use labfunds_core::{ExpenseId, ProjectId, ReimbursementId};
use labfunds_finance::{Expense, InstituteExpense};

use crate::error::ServiceError;
use crate::service::ReportFilter;
use crate::sql::{parse_timestamp, placeholders};

pub async fn insert(conn: &mut SqliteConnection, expense: &Expense) -> Result<(), ServiceError> {
    sqlx::query(
        r#"
        INSERT INTO expenses (id, description, amount, settled, reimbursement_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(expense.id.to_string())
    .bind(&expense.description)
    .bind(expense.amount)
    .bind(expense.settled.map(|s| s.as_str()))
    .bind(expense.reimbursement_id.map(|id| id.to_string()))
    .bind(expense.created_at.to_rfc3339())
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn get(
    conn: &mut SqliteConnection,
    id: ExpenseId,
) -> Result<Option<Expense>, ServiceError> {
    let row = sqlx::query(
        "SELECT id, description, amount, settled, reimbursement_id, created_at FROM expenses WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(conn)
    .await?;

    row.as_ref().map(row_to_expense).transpose()
}

/// Fetch expenses by id, returned in the order of `ids`. Missing ids are
/// silently dropped, matching the loose reference semantics of the claim
/// list.
pub async fn get_many(
    conn: &mut SqliteConnection,
    ids: &[ExpenseId],
) -> Result<Vec<Expense>, ServiceError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT id, description, amount, settled, reimbursement_id, created_at
         FROM expenses WHERE id IN ({})",
        placeholders(ids.len())
    );

    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id.to_string());
    }
    let rows = query.fetch_all(conn).await?;

    let mut fetched = rows
        .iter()
        .map(row_to_expense)
        .collect::<Result<Vec<_>, _>>()?;

    // Restore claim order.
    let mut ordered = Vec::with_capacity(fetched.len());
    for id in ids {
        if let Some(pos) = fetched.iter().position(|e| e.id == *id) {
            ordered.push(fetched.remove(pos));
        }
    }
    Ok(ordered)
}

/// Point the given expenses at `reimbursement_id` (or clear it with `None`).
pub async fn set_reimbursement(
    conn: &mut SqliteConnection,
    ids: &[ExpenseId],
    reimbursement_id: Option<ReimbursementId>,
) -> Result<(), ServiceError> {
    if ids.is_empty() {
        return Ok(());
    }

    let sql = format!(
        "UPDATE expenses SET reimbursement_id = ? WHERE id IN ({})",
        placeholders(ids.len())
    );

    let mut query = sqlx::query(&sql).bind(reimbursement_id.map(|id| id.to_string()));
    for id in ids {
        query = query.bind(id.to_string());
    }
    query.execute(conn).await?;
    Ok(())
}

/// Clear the back-reference of every expense still pointing at a deleted
/// reimbursement.
pub async fn clear_reimbursement_refs(
    conn: &mut SqliteConnection,
    reimbursement_id: ReimbursementId,
) -> Result<(), ServiceError> {
    sqlx::query("UPDATE expenses SET reimbursement_id = NULL WHERE reimbursement_id = ?")
        .bind(reimbursement_id.to_string())
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn insert_institute(
    conn: &mut SqliteConnection,
    expense: &InstituteExpense,
) -> Result<(), ServiceError> {
    sqlx::query(
        r#"
        INSERT INTO institute_expenses (id, project_id, project_head, reason, amount, year_or_installment, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(expense.id.to_string())
    .bind(expense.project_id.to_string())
    .bind(&expense.project_head)
    .bind(&expense.reason)
    .bind(expense.amount)
    .bind(expense.year_or_installment as i64)
    .bind(expense.created_at.to_rfc3339())
    .execute(conn)
    .await?;
    Ok(())
}

/// Institute expenses of a project under the report filter, newest first.
pub async fn list_institute_for_project(
    conn: &mut SqliteConnection,
    project_id: ProjectId,
    filter: &ReportFilter,
) -> Result<Vec<InstituteExpense>, ServiceError> {
    let mut sql = String::from(
        "SELECT id, project_id, project_head, reason, amount, year_or_installment, created_at
         FROM institute_expenses WHERE project_id = ?",
    );
    if filter.head_filter().is_some() {
        sql.push_str(" AND project_head = ?");
    }
    if filter.index.is_some() {
        sql.push_str(" AND year_or_installment = ?");
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut query = sqlx::query(&sql).bind(project_id.to_string());
    if let Some(head) = filter.head_filter() {
        query = query.bind(head.to_string());
    }
    if let Some(index) = filter.index {
        query = query.bind(index as i64);
    }

    let rows = query.fetch_all(conn).await?;
    rows.iter().map(row_to_institute_expense).collect()
}

fn row_to_expense(row: &SqliteRow) -> Result<Expense, ServiceError> {
    Ok(Expense {
        id: row.try_get::<String, _>("id")?.parse()?,
        description: row.try_get("description")?,
        amount: row.try_get("amount")?,
        settled: row
            .try_get::<Option<String>, _>("settled")?
            .map(|s| s.parse())
            .transpose()?,
        reimbursement_id: row
            .try_get::<Option<String>, _>("reimbursement_id")?
            .map(|s| s.parse())
            .transpose()?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
    })
}

fn row_to_institute_expense(row: &SqliteRow) -> Result<InstituteExpense, ServiceError> {
    Ok(InstituteExpense {
        id: row.try_get::<String, _>("id")?.parse()?,
        project_id: row.try_get::<String, _>("project_id")?.parse()?,
        project_head: row.try_get("project_head")?,
        reason: row.try_get("reason")?,
        amount: row.try_get("amount")?,
        year_or_installment: row.try_get::<i64, _>("year_or_installment")? as u32,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
    })
}
