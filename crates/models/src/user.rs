use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const NAME_MAX_LEN: usize = 128;
pub const EMAIL_MAX_LEN: usize = 255;
const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=15;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Non-blank, at most [`NAME_MAX_LEN`] characters.
pub fn validate_name(field: &str, value: &str) -> Result<(), ModelError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    if value.chars().count() > NAME_MAX_LEN {
        return Err(ModelError::Validation(format!("{field} longer than {NAME_MAX_LEN} characters")));
    }
    Ok(())
}

/// `local@domain.tld` shape; no whitespace, one `@`, no empty domain labels.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let invalid = || ModelError::Validation(format!("invalid email: {email}"));
    if email.len() > EMAIL_MAX_LEN || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

/// Optional leading `+`, then digits separated by spaces or dashes; 7 to 15 digits.
pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    let invalid = || ModelError::Validation(format!("invalid phone number: {phone}"));
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    if rest.chars().any(|c| !(c.is_ascii_digit() || c == ' ' || c == '-')) {
        return Err(invalid());
    }
    let digits = rest.chars().filter(char::is_ascii_digit).count();
    if !PHONE_DIGITS.contains(&digits) {
        return Err(invalid());
    }
    Ok(())
}
