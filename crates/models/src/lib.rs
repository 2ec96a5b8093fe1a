//! sea-orm entities for the PMS schema, plus the row-level helpers and
//! field validation shared by the service layer.

pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod user_permission;
pub mod prison;
pub mod management;
pub mod court;

#[cfg(test)]
mod tests;
