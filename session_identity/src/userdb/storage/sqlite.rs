use sqlx::{Pool, Sqlite};

use crate::storage::{DB_TABLE_IDENTITIES, DB_TABLE_USERS};
use crate::userdb::{errors::UserError, types::Identity, types::User};

use super::map_unique_violation;

// SQLite implementations

pub(super) async fn create_user_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT,
            name TEXT NOT NULL,
            avatar_url TEXT,
            refresh_fingerprint TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
        table_name
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn create_identity_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let table_name = DB_TABLE_IDENTITIES.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            user_id TEXT NOT NULL,
            provider TEXT NOT NULL,
            provider_id TEXT NOT NULL,
            profile_data TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL,
            UNIQUE (provider, provider_id)
        )
        "#,
        table_name
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn get_user_sqlite(
    pool: &Pool<Sqlite>,
    id: &str,
) -> Result<Option<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {} WHERE id = ?
        "#,
        table_name
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn get_user_by_email_sqlite(
    pool: &Pool<Sqlite>,
    email: &str,
) -> Result<Option<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {} WHERE email = ?
        "#,
        table_name
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn create_user_sqlite(pool: &Pool<Sqlite>, user: &User) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (id, email, password_hash, name, avatar_url, refresh_fingerprint, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        table_name
    ))
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.name)
    .bind(&user.avatar_url)
    .bind(&user.refresh_fingerprint)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, UserError::EmailTaken))?;

    Ok(())
}

pub(super) async fn set_refresh_fingerprint_sqlite(
    pool: &Pool<Sqlite>,
    user_id: &str,
    fingerprint: Option<&str>,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        UPDATE {} SET refresh_fingerprint = ?, updated_at = ? WHERE id = ?
        "#,
        table_name
    ))
    .bind(fingerprint)
    .bind(chrono::Utc::now())
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn get_identity_sqlite(
    pool: &Pool<Sqlite>,
    provider: &str,
    provider_id: &str,
) -> Result<Option<Identity>, UserError> {
    let table_name = DB_TABLE_IDENTITIES.as_str();

    sqlx::query_as::<_, Identity>(&format!(
        r#"
        SELECT * FROM {} WHERE provider = ? AND provider_id = ?
        "#,
        table_name
    ))
    .bind(provider)
    .bind(provider_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn add_identity_sqlite(
    pool: &Pool<Sqlite>,
    identity: &Identity,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_IDENTITIES.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (user_id, provider, provider_id, profile_data, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
        table_name
    ))
    .bind(&identity.user_id)
    .bind(&identity.provider)
    .bind(&identity.provider_id)
    .bind(&identity.profile_data)
    .bind(identity.created_at)
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, UserError::IdentityTaken))?;

    Ok(())
}

pub(super) async fn get_identities_sqlite(
    pool: &Pool<Sqlite>,
    user_id: &str,
) -> Result<Vec<Identity>, UserError> {
    let table_name = DB_TABLE_IDENTITIES.as_str();

    sqlx::query_as::<_, Identity>(&format!(
        r#"
        SELECT * FROM {} WHERE user_id = ? ORDER BY created_at
        "#,
        table_name
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}
