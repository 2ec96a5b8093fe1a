//! User commands, queries and the handlers that execute them.

pub mod commands;
pub mod handlers;

pub use commands::{CreateUserCommand, DeleteUserCommand, GetUserQuery, ListUsersQuery, UpdateUserCommand};
pub use handlers::{CreateUserHandler, DeleteUserHandler, GetUserHandler, ListUsersHandler, UpdateUserHandler};
