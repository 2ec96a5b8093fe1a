//! Auth module: login, JWT tokens, the permission catalog and the policies
//! built on it. Layered as domain, repository and service like the rest of
//! the crate.

pub mod domain;
pub mod errors;
pub mod permissions;
pub mod policy;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use errors::AuthError;
pub use policy::PolicyRegistry;
pub use repo::seaorm::SeaOrmAccountRepository;
pub use service::AuthService;
pub use token::{AuthClaims, IssuedToken, TokenService, TokenSettings};
