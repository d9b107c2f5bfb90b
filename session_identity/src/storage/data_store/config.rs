//! Data store selection and table naming

use std::{env, str::FromStr, sync::LazyLock};
use tokio::sync::Mutex;

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};

// Configuration
static GENERIC_DATA_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_TYPE").expect("GENERIC_DATA_STORE_TYPE must be set")
});

static GENERIC_DATA_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_URL").expect("GENERIC_DATA_STORE_URL must be set")
});

pub(crate) static GENERIC_DATA_STORE: LazyLock<Mutex<Box<dyn DataStore>>> = LazyLock::new(|| {
    let store_type = GENERIC_DATA_STORE_TYPE.as_str();
    let store_url = GENERIC_DATA_STORE_URL.as_str();

    tracing::info!(
        "Initializing data store with type: {}, url: {}",
        store_type,
        store_url
    );

    let store = match store_type {
        "sqlite" => {
            let opts = sqlx::sqlite::SqliteConnectOptions::from_str(store_url)
                .expect("Failed to parse SQLite connection string")
                .create_if_missing(true);

            Box::new(SqliteDataStore {
                pool: sqlx::sqlite::SqlitePool::connect_lazy_with(opts),
            }) as Box<dyn DataStore>
        }
        "postgres" => Box::new(PostgresDataStore {
            pool: sqlx::PgPool::connect_lazy(store_url).expect("Failed to create Postgres pool"),
        }) as Box<dyn DataStore>,
        t => panic!(
            "Unsupported store type: {}. Supported types are 'sqlite' and 'postgres'",
            t
        ),
    };

    Mutex::new(store)
});

/// Table prefix from environment variable
static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "si_".to_string()));

/// Users table name
pub(crate) static DB_TABLE_USERS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_USERS").unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "users"))
});

/// Identities table name
pub(crate) static DB_TABLE_IDENTITIES: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_IDENTITIES")
        .unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "identities"))
});

#[cfg(test)]
mod tests {
    use std::env;

    #[test]
    fn test_db_table_prefix_default() {
        unsafe {
            let original = env::var("DB_TABLE_PREFIX").ok();
            env::remove_var("DB_TABLE_PREFIX");

            let prefix = env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "si_".to_string());
            assert_eq!(prefix, "si_");

            if let Some(value) = original {
                env::set_var("DB_TABLE_PREFIX", value);
            }
        }
    }

    #[test]
    fn test_unsupported_store_type() {
        // Simplified version of the store initialization dispatch
        let store_type = "mongodb";
        let supported = matches!(store_type, "sqlite" | "postgres");
        assert!(!supported);
    }
}
