//! Service layer providing business-oriented operations on top of models.
//! - Domain records and the generic repository / unit of work over sea-orm.
//! - User commands dispatched through the mediator.
//! - Authentication (argon2 + JWT) and claim-based authorization.

pub mod auth;
pub mod domain;
pub mod errors;
pub mod mediator;
pub mod pagination;
pub mod reference;
pub mod repo;
pub mod repository;
pub mod unit_of_work;
pub mod users;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use mediator::Mediator;
