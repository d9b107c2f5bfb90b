use sqlx::{Pool, Postgres};

use crate::storage::{DB_TABLE_IDENTITIES, DB_TABLE_USERS};
use crate::userdb::{errors::UserError, types::Identity, types::User};

use super::map_unique_violation;

// PostgreSQL implementations

pub(super) async fn create_user_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
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
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
        table_name
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn create_identity_tables_postgres(
    pool: &Pool<Postgres>,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_IDENTITIES.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            user_id TEXT NOT NULL,
            provider TEXT NOT NULL,
            provider_id TEXT NOT NULL,
            profile_data JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
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

pub(super) async fn get_user_postgres(
    pool: &Pool<Postgres>,
    id: &str,
) -> Result<Option<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {} WHERE id = $1
        "#,
        table_name
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn get_user_by_email_postgres(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {} WHERE email = $1
        "#,
        table_name
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn create_user_postgres(
    pool: &Pool<Postgres>,
    user: &User,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (id, email, password_hash, name, avatar_url, refresh_fingerprint, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
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

pub(super) async fn set_refresh_fingerprint_postgres(
    pool: &Pool<Postgres>,
    user_id: &str,
    fingerprint: Option<&str>,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        UPDATE {} SET refresh_fingerprint = $1, updated_at = $2 WHERE id = $3
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

pub(super) async fn get_identity_postgres(
    pool: &Pool<Postgres>,
    provider: &str,
    provider_id: &str,
) -> Result<Option<Identity>, UserError> {
    let table_name = DB_TABLE_IDENTITIES.as_str();

    sqlx::query_as::<_, Identity>(&format!(
        r#"
        SELECT * FROM {} WHERE provider = $1 AND provider_id = $2
        "#,
        table_name
    ))
    .bind(provider)
    .bind(provider_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn add_identity_postgres(
    pool: &Pool<Postgres>,
    identity: &Identity,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_IDENTITIES.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (user_id, provider, provider_id, profile_data, created_at)
        VALUES ($1, $2, $3, $4, $5)
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

pub(super) async fn get_identities_postgres(
    pool: &Pool<Postgres>,
    user_id: &str,
) -> Result<Vec<Identity>, UserError> {
    let table_name = DB_TABLE_IDENTITIES.as_str();

    sqlx::query_as::<_, Identity>(&format!(
        r#"
        SELECT * FROM {} WHERE user_id = $1 ORDER BY created_at
        "#,
        table_name
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}
