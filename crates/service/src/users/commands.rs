use serde::Deserialize;

use crate::domain::User;
use crate::mediator::Command;
use crate::pagination::Pagination;

/// Data for a new user. Carries no identity; the store assigns one.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreateUserCommand {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

/// Full replacement of a user's editable fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateUserCommand {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl UpdateUserCommand {
    /// Same fields as a create, aimed at an existing id.
    pub fn new(id: i32, fields: CreateUserCommand) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            phone_number: fields.phone_number,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeleteUserCommand {
    pub id: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GetUserQuery {
    pub id: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListUsersQuery {
    pub pagination: Pagination,
}

impl Command for CreateUserCommand {
    type Output = i32;
    const NAME: &'static str = "create_user";
}

impl Command for UpdateUserCommand {
    type Output = User;
    const NAME: &'static str = "update_user";
}

impl Command for DeleteUserCommand {
    type Output = ();
    const NAME: &'static str = "delete_user";
}

impl Command for GetUserQuery {
    type Output = User;
    const NAME: &'static str = "get_user";
}

impl Command for ListUsersQuery {
    type Output = Vec<User>;
    const NAME: &'static str = "list_users";
}
