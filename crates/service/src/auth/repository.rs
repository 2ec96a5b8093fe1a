use async_trait::async_trait;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for account persistence: credentials and grants.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn user_exists(&self, user_id: i32) -> Result<bool, AuthError>;

    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(&self, user_id: i32, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError>;

    /// Granted permission names, alphabetical.
    async fn permissions(&self, user_id: i32) -> Result<Vec<String>, AuthError>;
    /// Swap the whole grant set atomically.
    async fn replace_permissions(&self, user_id: i32, permissions: &[String]) -> Result<(), AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{BTreeSet, HashMap};
    use std::sync::{Mutex, PoisonError};

    #[derive(Default)]
    pub struct MockAccountRepository {
        users: Mutex<HashMap<String, AuthUser>>,            // key: email
        creds: Mutex<HashMap<i32, Credentials>>,            // key: user_id
        grants: Mutex<HashMap<i32, BTreeSet<String>>>,      // key: user_id
    }

    impl MockAccountRepository {
        pub fn with_user(self, user: AuthUser) -> Self {
            self.users
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(user.email.clone(), user);
            self
        }
    }

    #[async_trait]
    impl AccountRepository for MockAccountRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(users.get(email).cloned())
        }

        async fn user_exists(&self, user_id: i32) -> Result<bool, AuthError> {
            let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(users.values().any(|u| u.id == user_id))
        }

        async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(creds.get(&user_id).cloned())
        }

        async fn upsert_password(&self, user_id: i32, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
            let mut creds = self.creds.lock().unwrap_or_else(PoisonError::into_inner);
            let c = Credentials { user_id, password_hash, password_algorithm };
            creds.insert(user_id, c.clone());
            Ok(c)
        }

        async fn permissions(&self, user_id: i32) -> Result<Vec<String>, AuthError> {
            let grants = self.grants.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(grants.get(&user_id).map(|g| g.iter().cloned().collect()).unwrap_or_default())
        }

        async fn replace_permissions(&self, user_id: i32, permissions: &[String]) -> Result<(), AuthError> {
            let mut grants = self.grants.lock().unwrap_or_else(PoisonError::into_inner);
            grants.insert(user_id, permissions.iter().cloned().collect());
            Ok(())
        }
    }
}
