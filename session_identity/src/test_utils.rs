use std::sync::Once;

static INIT: Once = Once::new();

/// Load `.env_test` exactly once per process
pub(crate) fn load_test_env() {
    INIT.call_once(|| {
        dotenvy::from_filename(".env_test").ok();
    });
}

/// Load the test environment and make sure the backing stores are ready
pub(crate) async fn init_test_environment() {
    load_test_env();
    crate::storage::init()
        .await
        .expect("Failed to initialize test cache");
    crate::userdb::init()
        .await
        .expect("Failed to initialize test stores");
}
