//! Session lifecycle: where the credential lives and whether it is still valid.

pub mod guard;
pub mod token;

pub use self::guard::{SessionGuard, SessionState};
pub use self::token::{FileTokenStore, MemoryTokenStore, TokenStore};

use crate::api::ClientError;
use tracing::info;

/// Ends the session by dropping the stored credential.
///
/// # Errors
/// Returns `ClientError::Storage` if persisted state cannot be removed.
pub fn logout(store: &dyn TokenStore) -> Result<(), ClientError> {
    store.clear()?;
    info!("logged out");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn logout_clears_credential() {
        let store = MemoryTokenStore::new();
        store.set(SecretString::from("token")).unwrap();
        logout(&store).unwrap();
        assert!(store.get().is_none());
    }
}
