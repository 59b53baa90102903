//! Reimbursement queries.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use labfunds_core::{EntryId, ExpenseId, ProjectId, ReimbursementId};
use labfunds_finance::Reimbursement;

use crate::error::ServiceError;
use crate::service::ReportFilter;
use crate::sql::{parse_timestamp, placeholders};

const COLUMNS: &str = "id, project_id, expense_ids, project_head, title, description, \
                       total_amount, reference_url, paid, entry_id, year_or_installment, created_at";

pub async fn insert(
    conn: &mut SqliteConnection,
    reimbursement: &Reimbursement,
) -> Result<(), ServiceError> {
    sqlx::query(
        r#"
        INSERT INTO reimbursements
            (id, project_id, expense_ids, project_head, title, description,
             total_amount, reference_url, paid, entry_id, year_or_installment, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(reimbursement.id.to_string())
    .bind(reimbursement.project_id.to_string())
    .bind(expense_ids_json(&reimbursement.expense_ids))
    .bind(&reimbursement.project_head)
    .bind(&reimbursement.title)
    .bind(&reimbursement.description)
    .bind(reimbursement.total_amount)
    .bind(reimbursement.reference_url.as_deref())
    .bind(reimbursement.paid)
    .bind(reimbursement.entry_id.map(|id| id.to_string()))
    .bind(reimbursement.year_or_installment as i64)
    .bind(reimbursement.created_at.to_rfc3339())
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn get(
    conn: &mut SqliteConnection,
    id: ReimbursementId,
) -> Result<Option<Reimbursement>, ServiceError> {
    let sql = format!("SELECT {COLUMNS} FROM reimbursements WHERE id = ?");
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(conn)
        .await?;

    row.as_ref().map(row_to_reimbursement).transpose()
}

/// Replace the mutable fields of a reimbursement. Paid status, ledger
/// reference, period index, and creation time are not touched here.
pub async fn update_fields(
    conn: &mut SqliteConnection,
    reimbursement: &Reimbursement,
) -> Result<(), ServiceError> {
    sqlx::query(
        r#"
        UPDATE reimbursements
        SET project_id = ?, expense_ids = ?, project_head = ?, title = ?,
            description = ?, total_amount = ?, reference_url = ?
        WHERE id = ?
        "#,
    )
    .bind(reimbursement.project_id.to_string())
    .bind(expense_ids_json(&reimbursement.expense_ids))
    .bind(&reimbursement.project_head)
    .bind(&reimbursement.title)
    .bind(&reimbursement.description)
    .bind(reimbursement.total_amount)
    .bind(reimbursement.reference_url.as_deref())
    .bind(reimbursement.id.to_string())
    .execute(conn)
    .await?;
    Ok(())
}

/// Delete a reimbursement. Returns `false` if it did not exist.
pub async fn delete(
    conn: &mut SqliteConnection,
    id: ReimbursementId,
) -> Result<bool, ServiceError> {
    let result = sqlx::query("DELETE FROM reimbursements WHERE id = ?")
        .bind(id.to_string())
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// All reimbursements, unpaid first, newest first within each group.
pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<Reimbursement>, ServiceError> {
    let sql = format!("SELECT {COLUMNS} FROM reimbursements ORDER BY paid ASC, created_at DESC");
    let rows = sqlx::query(&sql).fetch_all(conn).await?;
    rows.iter().map(row_to_reimbursement).collect()
}

/// Fetch a selection by id in lookup order (`created_at` ascending).
///
/// The reconciliation workflow depends on this order being stable and
/// independent of the request order.
pub async fn list_by_ids(
    conn: &mut SqliteConnection,
    ids: &[ReimbursementId],
) -> Result<Vec<Reimbursement>, ServiceError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT {COLUMNS} FROM reimbursements WHERE id IN ({}) ORDER BY created_at ASC",
        placeholders(ids.len())
    );

    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id.to_string());
    }
    let rows = query.fetch_all(conn).await?;
    rows.iter().map(row_to_reimbursement).collect()
}

/// Reimbursements of a project under the report filter, newest first.
pub async fn list_for_project(
    conn: &mut SqliteConnection,
    project_id: ProjectId,
    filter: &ReportFilter,
) -> Result<Vec<Reimbursement>, ServiceError> {
    let mut sql = format!("SELECT {COLUMNS} FROM reimbursements WHERE project_id = ?");
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
    rows.iter().map(row_to_reimbursement).collect()
}

/// Batch-mark the given reimbursements paid against `entry_id`.
pub async fn set_paid(
    conn: &mut SqliteConnection,
    ids: &[ReimbursementId],
    entry_id: EntryId,
) -> Result<(), ServiceError> {
    if ids.is_empty() {
        return Ok(());
    }

    let sql = format!(
        "UPDATE reimbursements SET paid = 1, entry_id = ? WHERE id IN ({})",
        placeholders(ids.len())
    );

    let mut query = sqlx::query(&sql).bind(entry_id.to_string());
    for id in ids {
        query = query.bind(id.to_string());
    }
    query.execute(conn).await?;
    Ok(())
}

/// Batch-mark the given reimbursements unpaid and detach their ledger
/// reference. Applied to the whole requested set regardless of prior state.
pub async fn set_unpaid(
    conn: &mut SqliteConnection,
    ids: &[ReimbursementId],
) -> Result<(), ServiceError> {
    if ids.is_empty() {
        return Ok(());
    }

    let sql = format!(
        "UPDATE reimbursements SET paid = 0, entry_id = NULL WHERE id IN ({})",
        placeholders(ids.len())
    );

    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id.to_string());
    }
    query.execute(conn).await?;
    Ok(())
}

/// Revert any reimbursement pointing at one of the deleted entries, keeping
/// the paid/entry invariant from dangling.
pub async fn revert_entry_refs(
    conn: &mut SqliteConnection,
    entry_ids: &[EntryId],
) -> Result<(), ServiceError> {
    if entry_ids.is_empty() {
        return Ok(());
    }

    let sql = format!(
        "UPDATE reimbursements SET paid = 0, entry_id = NULL WHERE entry_id IN ({})",
        placeholders(entry_ids.len())
    );

    let mut query = sqlx::query(&sql);
    for id in entry_ids {
        query = query.bind(id.to_string());
    }
    query.execute(conn).await?;
    Ok(())
}

fn expense_ids_json(ids: &[ExpenseId]) -> String {
    serde_json::to_string(&ids.iter().map(|id| id.to_string()).collect::<Vec<_>>())
        .unwrap_or_else(|_| "[]".to_string())
}

fn row_to_reimbursement(row: &SqliteRow) -> Result<Reimbursement, ServiceError> {
    let expense_ids: Vec<String> = serde_json::from_str(&row.try_get::<String, _>("expense_ids")?)?;
    let expense_ids = expense_ids
        .iter()
        .map(|s| s.parse())
        .collect::<Result<Vec<ExpenseId>, _>>()?;

    Ok(Reimbursement {
        id: row.try_get::<String, _>("id")?.parse()?,
        project_id: row.try_get::<String, _>("project_id")?.parse()?,
        expense_ids,
        project_head: row.try_get("project_head")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        total_amount: row.try_get("total_amount")?,
        reference_url: row.try_get("reference_url")?,
        paid: row.try_get("paid")?,
        entry_id: row
            .try_get::<Option<String>, _>("entry_id")?
            .map(|s| s.parse())
            .transpose()?,
        year_or_installment: row.try_get::<i64, _>("year_or_installment")? as u32,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
    })
}
