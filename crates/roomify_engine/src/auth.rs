use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use roomify_core::NavbarView;
use roomify_logging::{roomify_error, roomify_info};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("sign-in was cancelled by the user")]
    Cancelled,
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

/// Authentication capability injected into the upload flow.
/// The flow only reads the flag; it never signs in or out itself.
#[async_trait::async_trait]
pub trait AuthContext: Send + Sync {
    fn is_signed_in(&self) -> bool;

    fn user_name(&self) -> Option<String> {
        None
    }

    async fn sign_in(&self) -> Result<(), AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    fn navbar(&self) -> NavbarView {
        NavbarView::from_auth(self.is_signed_in(), self.user_name().as_deref())
    }
}

/// Outcome of the navbar's log in / log out button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignedIn,
    SignedOut,
    Failed,
}

/// Signs out when signed in, signs in otherwise. Failures are logged and
/// reported as [`AuthAction::Failed`]; they never reach the upload flow.
pub async fn toggle_auth(auth: &dyn AuthContext) -> AuthAction {
    if auth.is_signed_in() {
        match auth.sign_out().await {
            Ok(()) => AuthAction::SignedOut,
            Err(err) => {
                roomify_error!("Error signing out: {}", err);
                AuthAction::Failed
            }
        }
    } else {
        match auth.sign_in().await {
            Ok(()) => AuthAction::SignedIn,
            Err(err) => {
                roomify_error!("Error signing in: {}", err);
                AuthAction::Failed
            }
        }
    }
}

/// In-process auth provider: signing in always succeeds for the configured user.
#[derive(Debug, Default)]
pub struct LocalAuth {
    signed_in: AtomicBool,
    user_name: RwLock<Option<String>>,
}

impl LocalAuth {
    pub fn new(user_name: Option<String>) -> Self {
        Self {
            signed_in: AtomicBool::new(false),
            user_name: RwLock::new(user_name),
        }
    }

    pub fn signed_in(user_name: Option<String>) -> Self {
        let auth = Self::new(user_name);
        auth.signed_in.store(true, Ordering::SeqCst);
        auth
    }

    /// Flip the flag without going through the async operations.
    pub fn set_signed_in(&self, signed_in: bool) {
        self.signed_in.store(signed_in, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl AuthContext for LocalAuth {
    fn is_signed_in(&self) -> bool {
        self.signed_in.load(Ordering::SeqCst)
    }

    fn user_name(&self) -> Option<String> {
        if !self.is_signed_in() {
            return None;
        }
        self.user_name.read().ok().and_then(|name| name.clone())
    }

    async fn sign_in(&self) -> Result<(), AuthError> {
        self.signed_in.store(true, Ordering::SeqCst);
        roomify_info!("Signed in as {}", self.user_name().as_deref().unwrap_or("guest"));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.signed_in.store(false, Ordering::SeqCst);
        roomify_info!("Signed out");
        Ok(())
    }
}
