//! Account entry queries.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use labfunds_core::EntryId;
use labfunds_finance::{AccountEntry, EntryRemarks};

use crate::error::ServiceError;
use crate::sql::parse_timestamp;

const COLUMNS: &str = "id, amount, kind, credited, transferable, remarks, transfer_id, created_at";

pub async fn insert(
    conn: &mut SqliteConnection,
    entry: &AccountEntry,
) -> Result<(), ServiceError> {
    sqlx::query(
        r#"
        INSERT INTO account_entries (id, amount, kind, credited, transferable, remarks, transfer_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry.id.to_string())
    .bind(entry.amount)
    .bind(entry.kind.as_str())
    .bind(entry.credited)
    .bind(entry.transferable)
    .bind(remarks_json(&entry.remarks)?)
    .bind(entry.transfer.map(|id| id.to_string()))
    .bind(entry.created_at.to_rfc3339())
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn get(
    conn: &mut SqliteConnection,
    id: EntryId,
) -> Result<Option<AccountEntry>, ServiceError> {
    let sql = format!("SELECT {COLUMNS} FROM account_entries WHERE id = ?");
    let row = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_optional(conn)
        .await?;

    row.as_ref().map(row_to_entry).transpose()
}

pub async fn update(
    conn: &mut SqliteConnection,
    entry: &AccountEntry,
) -> Result<(), ServiceError> {
    sqlx::query(
        r#"
        UPDATE account_entries
        SET amount = ?, kind = ?, credited = ?, transferable = ?, remarks = ?, transfer_id = ?
        WHERE id = ?
        "#,
    )
    .bind(entry.amount)
    .bind(entry.kind.as_str())
    .bind(entry.credited)
    .bind(entry.transferable)
    .bind(remarks_json(&entry.remarks)?)
    .bind(entry.transfer.map(|id| id.to_string()))
    .bind(entry.id.to_string())
    .execute(conn)
    .await?;
    Ok(())
}

/// Delete an entry. Returns `false` if it was already gone.
pub async fn delete(conn: &mut SqliteConnection, id: EntryId) -> Result<bool, ServiceError> {
    let result = sqlx::query("DELETE FROM account_entries WHERE id = ?")
        .bind(id.to_string())
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// All entries, newest first.
pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<AccountEntry>, ServiceError> {
    let sql = format!("SELECT {COLUMNS} FROM account_entries ORDER BY created_at DESC");
    let rows = sqlx::query(&sql).fetch_all(conn).await?;
    rows.iter().map(row_to_entry).collect()
}

/// Entries whose `transfer` link points at `id`.
pub async fn holders_of_transfer(
    conn: &mut SqliteConnection,
    id: EntryId,
) -> Result<Vec<AccountEntry>, ServiceError> {
    let sql = format!("SELECT {COLUMNS} FROM account_entries WHERE transfer_id = ?");
    let rows = sqlx::query(&sql)
        .bind(id.to_string())
        .fetch_all(conn)
        .await?;
    rows.iter().map(row_to_entry).collect()
}

fn remarks_json(remarks: &EntryRemarks) -> Result<String, ServiceError> {
    Ok(serde_json::to_string(remarks)?)
}

fn row_to_entry(row: &SqliteRow) -> Result<AccountEntry, ServiceError> {
    Ok(AccountEntry {
        id: row.try_get::<String, _>("id")?.parse()?,
        amount: row.try_get("amount")?,
        kind: row.try_get::<String, _>("kind")?.parse()?,
        credited: row.try_get("credited")?,
        transferable: row.try_get("transferable")?,
        remarks: serde_json::from_str(&row.try_get::<String, _>("remarks")?)?,
        transfer: row
            .try_get::<Option<String>, _>("transfer_id")?
            .map(|s| s.parse())
            .transpose()?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
    })
}
