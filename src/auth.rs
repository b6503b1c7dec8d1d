use crate::FinderError;
use async_trait::async_trait;
use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

/// A signed-in account as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl User {
    /// Name shown next to comments
    pub fn display_name_or_default(&self) -> &str {
        self.display_name.as_deref().unwrap_or("User")
    }
}

/// Capabilities of the hosted authentication service
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Get the provider name (e.g., "memory")
    fn provider_name(&self) -> &str;

    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<User, FinderError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, FinderError>;

    async fn sign_out(&self) -> Result<(), FinderError>;

    fn current_user(&self) -> Option<User>;

    /// Observe sign-in and sign-out; the receiver holds the latest user
    fn subscribe(&self) -> watch::Receiver<Option<User>>;
}

struct Account {
    password: String,
    user: User,
}

/// Process-local auth provider; passwords are held in plain memory
pub struct MemoryAuth {
    accounts: RwLock<HashMap<String, Account>>,
    state: watch::Sender<Option<User>>,
}

impl Default for MemoryAuth {
    fn default() -> Self {
        let (state, _) = watch::channel(None);
        MemoryAuth {
            accounts: RwLock::new(HashMap::new()),
            state,
        }
    }
}

impl MemoryAuth {
    pub fn new() -> Self {
        MemoryAuth::default()
    }
}

const MIN_PASSWORD_LEN: usize = 6;

#[async_trait]
impl AuthProvider for MemoryAuth {
    fn provider_name(&self) -> &str {
        "memory"
    }

    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<User, FinderError> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(FinderError::Auth("The email address is badly formatted.".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FinderError::Auth(
                "Password should be at least 6 characters".to_string(),
            ));
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&email) {
            return Err(FinderError::Auth(
                "The email address is already in use by another account.".to_string(),
            ));
        }

        let user = User {
            uid: format!("user{:04}", accounts.len() + 1),
            display_name: Some(name.to_string()).filter(|n| !n.trim().is_empty()),
            email: Some(email.clone()),
            photo_url: None,
        };
        accounts.insert(
            email,
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        drop(accounts);

        info!("Account created for {}", user.uid);
        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, FinderError> {
        let email = email.trim().to_lowercase();
        let accounts = self.accounts.read().await;
        let user = match accounts.get(&email) {
            Some(account) if account.password == password => account.user.clone(),
            _ => {
                return Err(FinderError::Auth(
                    "Invalid email or password.".to_string(),
                ))
            }
        };
        drop(accounts);

        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), FinderError> {
        self.state.send_replace(None);
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        (*self.state.borrow()).clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.state.subscribe()
    }
}

/// The signed-in state shared by the activity operations
#[derive(Clone)]
pub struct Session {
    auth: Arc<dyn AuthProvider>,
}

impl Session {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Session { auth }
    }

    pub fn auth(&self) -> &dyn AuthProvider {
        self.auth.as_ref()
    }

    pub fn current_user(&self) -> Option<User> {
        self.auth.current_user()
    }

    pub fn user_id(&self) -> Option<String> {
        self.current_user().map(|u| u.uid)
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// The current user, or [`FinderError::NotSignedIn`]
    pub fn require_user(&self) -> Result<User, FinderError> {
        self.current_user().ok_or(FinderError::NotSignedIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_signs_in() {
        let auth = MemoryAuth::new();
        let user = auth.sign_up("Asha@Example.com", "secret1", "Asha").await.unwrap();
        assert_eq!(user.email.as_deref(), Some("asha@example.com"));
        assert_eq!(auth.current_user(), Some(user));
    }

    #[tokio::test]
    async fn test_sign_up_validation() {
        let auth = MemoryAuth::new();
        assert!(auth.sign_up("not-an-email", "secret1", "A").await.is_err());
        assert!(auth.sign_up("a@b.in", "short", "A").await.is_err());
        auth.sign_up("a@b.in", "secret1", "A").await.unwrap();
        let duplicate = auth.sign_up("A@B.in", "secret2", "B").await;
        assert!(matches!(duplicate, Err(FinderError::Auth(msg)) if msg.contains("already in use")));
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let auth = MemoryAuth::new();
        auth.sign_up("a@b.in", "secret1", "A").await.unwrap();
        auth.sign_out().await.unwrap();
        assert!(auth.current_user().is_none());

        assert!(auth.sign_in("a@b.in", "wrong-pass").await.is_err());
        assert!(auth.current_user().is_none());

        let user = auth.sign_in("a@b.in", "secret1").await.unwrap();
        assert_eq!(user.display_name_or_default(), "A");
    }

    #[tokio::test]
    async fn test_subscribe_observes_changes() {
        let auth = MemoryAuth::new();
        let mut rx = auth.subscribe();
        assert!(rx.borrow().is_none());

        auth.sign_up("a@b.in", "secret1", "A").await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());

        auth.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn test_session_requires_user() {
        let session = Session::new(Arc::new(MemoryAuth::new()));
        assert!(matches!(session.require_user(), Err(FinderError::NotSignedIn)));
        session.auth().sign_up("a@b.in", "secret1", "").await.unwrap();
        assert!(session.is_signed_in());
        assert_eq!(
            session.require_user().unwrap().display_name_or_default(),
            "User"
        );
    }
}
