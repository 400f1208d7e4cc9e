/// Back-reference list primitives
///
/// Each operation is a single `UPDATE`, so concurrent pushes and pulls on
/// the same parent do not lose each other's writes. Sequences of these
/// operations are still not atomic.
///
/// Table and column names come from [`BackRef`], never from user input.

use sqlx::PgPool;
use uuid::Uuid;

use super::BackRef;

/// Appends `child` to the parent's list
///
/// # Returns
///
/// `false` if the parent row does not exist
pub async fn push(
    pool: &PgPool,
    list: BackRef,
    parent: Uuid,
    child: Uuid,
) -> Result<bool, sqlx::Error> {
    let query = format!(
        "UPDATE {table} SET {column} = array_append({column}, $2) WHERE id = $1",
        table = list.table(),
        column = list.column(),
    );

    let result = sqlx::query(&query)
        .bind(parent)
        .bind(child)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Removes every occurrence of `child` from one parent's list
///
/// # Returns
///
/// `false` if the parent row does not exist
pub async fn pull(
    pool: &PgPool,
    list: BackRef,
    parent: Uuid,
    child: Uuid,
) -> Result<bool, sqlx::Error> {
    let query = format!(
        "UPDATE {table} SET {column} = array_remove({column}, $2) WHERE id = $1",
        table = list.table(),
        column = list.column(),
    );

    let result = sqlx::query(&query)
        .bind(parent)
        .bind(child)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Removes `child` from every parent list that contains it
///
/// # Returns
///
/// Number of parents touched
pub async fn pull_everywhere(
    pool: &PgPool,
    list: BackRef,
    child: Uuid,
) -> Result<u64, sqlx::Error> {
    let query = format!(
        "UPDATE {table} SET {column} = array_remove({column}, $1) WHERE $1 = ANY({column})",
        table = list.table(),
        column = list.column(),
    );

    let result = sqlx::query(&query).bind(child).execute(pool).await?;

    Ok(result.rows_affected())
}

/// Overwrites the parent's list
pub async fn replace(
    pool: &PgPool,
    list: BackRef,
    parent: Uuid,
    children: &[Uuid],
) -> Result<bool, sqlx::Error> {
    let query = format!(
        "UPDATE {table} SET {column} = $2 WHERE id = $1",
        table = list.table(),
        column = list.column(),
    );

    let result = sqlx::query(&query)
        .bind(parent)
        .bind(children)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
