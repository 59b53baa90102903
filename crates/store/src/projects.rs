//! Project queries.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use labfunds_core::ProjectId;
use labfunds_finance::Project;

use crate::error::ServiceError;
use crate::sql::parse_timestamp;

pub async fn insert(conn: &mut SqliteConnection, project: &Project) -> Result<(), ServiceError> {
    sqlx::query(
        r#"
        INSERT INTO projects (id, name, title, funding_agency, kind, start_date, current_installment, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(project.id.to_string())
    .bind(&project.name)
    .bind(&project.title)
    .bind(&project.funding_agency)
    .bind(project.kind.as_str())
    .bind(project.start_date.to_rfc3339())
    .bind(project.current_installment as i64)
    .bind(project.created_at.to_rfc3339())
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn get(
    conn: &mut SqliteConnection,
    id: ProjectId,
) -> Result<Option<Project>, ServiceError> {
    let row = sqlx::query(
        r#"
        SELECT id, name, title, funding_agency, kind, start_date, current_installment, created_at
        FROM projects
        WHERE id = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(conn)
    .await?;

    row.as_ref().map(row_to_project).transpose()
}

fn row_to_project(row: &SqliteRow) -> Result<Project, ServiceError> {
    Ok(Project {
        id: row.try_get::<String, _>("id")?.parse()?,
        name: row.try_get("name")?,
        title: row.try_get("title")?,
        funding_agency: row.try_get("funding_agency")?,
        kind: row.try_get::<String, _>("kind")?.parse()?,
        start_date: parse_timestamp(&row.try_get::<String, _>("start_date")?)?,
        current_installment: row.try_get::<i64, _>("current_installment")? as u32,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
    })
}
