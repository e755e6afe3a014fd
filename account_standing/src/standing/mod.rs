mod errors;
mod storage;
mod types;

pub use errors::StandingError;
pub(crate) use storage::StandingStore;
pub(crate) use types::StandingSearchField;
pub use types::{AccountAction, AccountStatus, UserStanding};

pub(crate) async fn init() -> Result<(), StandingError> {
    StandingStore::init().await
}
