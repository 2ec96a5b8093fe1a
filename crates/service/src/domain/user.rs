use serde::Serialize;

use super::Entity;

/// A system user. The id is assigned by the store and never changes
/// afterwards; every other field has a setter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
}

impl User {
    /// A transient user (id `0`) ready to be added to a repository.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.first_name = value.into();
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.last_name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    pub fn set_phone_number(&mut self, value: impl Into<String>) {
        self.phone_number = value.into();
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for User {
    const NAME: &'static str = "user";

    fn id(&self) -> i32 {
        self.id
    }

    fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}
