mod errors;
mod storage;
mod types;

pub use errors::UserError;
pub use types::{Identity, User};

pub(crate) use storage::{IdentityStore, UserStore};
pub(crate) use types::PLACEHOLDER_NAME;

pub(crate) async fn init() -> Result<(), UserError> {
    UserStore::init().await?;
    IdentityStore::init().await?;
    Ok(())
}
