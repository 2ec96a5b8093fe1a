//! Domain records handed between handlers and repositories.
//!
//! These are plain values: the store owns the rows, a domain value is a
//! request-scoped copy. Identity `0` marks a record that has not been
//! persisted yet.

pub mod reference;
pub mod user;

pub use reference::{Court, Management, Prison};
pub use user::User;

/// Anything a [`crate::repository::Repository`] can store.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human name used in log lines and `NotFound` messages.
    const NAME: &'static str;

    fn id(&self) -> i32;

    /// Return the same record carrying `id`. Only repositories call this.
    fn with_id(self, id: i32) -> Self;

    fn is_transient(&self) -> bool {
        self.id() == 0
    }
}
