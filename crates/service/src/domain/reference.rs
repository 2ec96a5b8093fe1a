//! Reference data: plain containers looked up by the rest of the system.
//! They carry no business rules beyond basic field checks.

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::errors::ServiceError;

/// Field checks applied before a record reaches the store.
pub trait Validate {
    fn validate(&self) -> Result<(), ServiceError>;
}

fn required(entity: &str, field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{entity}.{field} required")));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prison {
    #[serde(default, skip_deserializing)]
    id: i32,
    pub name: String,
    pub code: String,
    pub location: String,
    pub capacity: i32,
}

impl Prison {
    pub fn new(name: impl Into<String>, code: impl Into<String>, location: impl Into<String>, capacity: i32) -> Self {
        Self { id: 0, name: name.into(), code: code.into(), location: location.into(), capacity }
    }
}

impl Entity for Prison {
    const NAME: &'static str = "prison";

    fn id(&self) -> i32 {
        self.id
    }

    fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

impl Validate for Prison {
    fn validate(&self) -> Result<(), ServiceError> {
        required(Self::NAME, "name", &self.name)?;
        required(Self::NAME, "code", &self.code)?;
        required(Self::NAME, "location", &self.location)?;
        if self.capacity < 0 {
            return Err(ServiceError::Validation("prison.capacity must not be negative".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Management {
    #[serde(default, skip_deserializing)]
    id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Management {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self { id: 0, name: name.into(), description }
    }
}

impl Entity for Management {
    const NAME: &'static str = "management";

    fn id(&self) -> i32 {
        self.id
    }

    fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

impl Validate for Management {
    fn validate(&self) -> Result<(), ServiceError> {
        required(Self::NAME, "name", &self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    #[serde(default, skip_deserializing)]
    id: i32,
    pub name: String,
    pub location: String,
}

impl Court {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self { id: 0, name: name.into(), location: location.into() }
    }
}

impl Entity for Court {
    const NAME: &'static str = "court";

    fn id(&self) -> i32 {
        self.id
    }

    fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

impl Validate for Court {
    fn validate(&self) -> Result<(), ServiceError> {
        required(Self::NAME, "name", &self.name)?;
        required(Self::NAME, "location", &self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_bodies_cannot_pick_an_id() {
        let p: Prison = serde_json::from_str(
            r#"{"id": 77, "name": "Kober", "code": "KB-1", "location": "Khartoum North", "capacity": 500}"#,
        )
        .unwrap();
        assert_eq!(p.id(), 0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(Court::new(" ", "Omdurman").validate().is_err());
        assert!(Management::new("", None).validate().is_err());
        assert!(Prison::new("Kober", "KB-1", "Khartoum", -1).validate().is_err());
    }

    #[test]
    fn management_description_is_optional() {
        let m: Management = serde_json::from_str(r#"{"name": "Central"}"#).unwrap();
        assert_eq!(m.description, None);
    }
}
