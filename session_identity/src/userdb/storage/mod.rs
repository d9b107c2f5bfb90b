mod postgres;
mod sqlite;

use crate::storage::{DataStore, GENERIC_DATA_STORE};
use crate::userdb::{errors::UserError, types::Identity, types::User};

use postgres::*;
use sqlite::*;

/// Map a unique-index violation onto a domain conflict error, everything else
/// onto a storage error.
pub(super) fn map_unique_violation(err: sqlx::Error, conflict: UserError) -> UserError {
    match &err {
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation => {
            conflict
        }
        _ => UserError::Storage(err.to_string()),
    }
}

pub(crate) struct UserStore;

impl UserStore {
    /// Initialize the users table
    pub(crate) async fn init() -> Result<(), UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            create_user_tables_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            create_user_tables_postgres(pool).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Get a user by their ID
    pub(crate) async fn get_user(id: &str) -> Result<Option<User>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_user_sqlite(pool, id).await
        } else if let Some(pool) = store.as_postgres() {
            get_user_postgres(pool, id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Get a user by their (case-normalized) email
    pub(crate) async fn get_user_by_email(email: &str) -> Result<Option<User>, UserError> {
        let email = crate::userdb::types::normalize_email(email);
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_user_by_email_sqlite(pool, &email).await
        } else if let Some(pool) = store.as_postgres() {
            get_user_by_email_postgres(pool, &email).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Create a new user. Fails with `EmailTaken` when the email is already
    /// registered, including when a concurrent create wins the race.
    pub(crate) async fn create_user(user: User) -> Result<User, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            create_user_sqlite(pool, &user).await?;
        } else if let Some(pool) = store.as_postgres() {
            create_user_postgres(pool, &user).await?;
        } else {
            return Err(UserError::Storage("Unsupported database type".to_string()));
        }

        Ok(user)
    }

    /// Overwrite the stored refresh-token fingerprint in one atomic update.
    ///
    /// `None` clears it, ending the user's refresh session. This is the only
    /// writer of that column.
    pub(crate) async fn set_refresh_fingerprint(
        user_id: &str,
        fingerprint: Option<&str>,
    ) -> Result<(), UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            set_refresh_fingerprint_sqlite(pool, user_id, fingerprint).await
        } else if let Some(pool) = store.as_postgres() {
            set_refresh_fingerprint_postgres(pool, user_id, fingerprint).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }
}

pub(crate) struct IdentityStore;

impl IdentityStore {
    /// Initialize the identities table
    pub(crate) async fn init() -> Result<(), UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            create_identity_tables_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            create_identity_tables_postgres(pool).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Look up an identity by its globally unique (provider, provider_id) pair
    pub(crate) async fn get_identity(
        provider: &str,
        provider_id: &str,
    ) -> Result<Option<Identity>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_identity_sqlite(pool, provider, provider_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_identity_postgres(pool, provider, provider_id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Link an identity. Fails with `IdentityTaken` when the
    /// (provider, provider_id) pair is already bound to a user.
    pub(crate) async fn add_identity(identity: Identity) -> Result<Identity, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            add_identity_sqlite(pool, &identity).await?;
        } else if let Some(pool) = store.as_postgres() {
            add_identity_postgres(pool, &identity).await?;
        } else {
            return Err(UserError::Storage("Unsupported database type".to_string()));
        }

        Ok(identity)
    }

    /// All identities owned by a user, oldest first
    pub(crate) async fn get_identities(user_id: &str) -> Result<Vec<Identity>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_identities_sqlite(pool, user_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_identities_postgres(pool, user_id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Provider names linked to a user, for display
    pub(crate) async fn get_providers(user_id: &str) -> Result<Vec<String>, UserError> {
        let identities = Self::get_identities(user_id).await?;
        Ok(identities.into_iter().map(|i| i.provider).collect())
    }
}
