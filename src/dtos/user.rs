//! User DTOs - Data Transfer Objects for accounts and profiles

use crate::entities::User;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::{Validate, ValidationError};

lazy_static! {
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").unwrap();
    static ref MOBILE_REGEX: Regex = Regex::new(r"^\+?[0-9 ]{6,20}$").unwrap();
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !USERNAME_REGEX.is_match(username) {
        return Err(validation_error(
            "invalid_username",
            "Username must be 3-32 characters of letters, digits, '_', '.' or '-'",
        ));
    }
    Ok(())
}

fn validate_mobile(mobile: Option<&str>) -> Result<(), ValidationError> {
    match mobile {
        Some(m) if !MOBILE_REGEX.is_match(m) => Err(validation_error(
            "invalid_mobile",
            "Mobile must contain 6-20 digits, optionally prefixed by '+'",
        )),
        _ => Ok(()),
    }
}

fn validate_register_schema(dto: &RegisterDTO) -> Result<(), ValidationError> {
    validate_mobile(dto.mobile.as_deref())
}

fn validate_profile_schema(dto: &UpdateProfileDTO) -> Result<(), ValidationError> {
    if let Some(ref username) = dto.username {
        validate_username(username)?;
    }
    validate_mobile(dto.mobile.as_deref())
}

/// Public view of a user
#[derive(Serialize, Deserialize, Debug)]
pub struct UserDTO {
    pub id: i32,
    pub username: String,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.user_id,
            username: value.username,
        }
    }
}

/// Full profile, only ever returned to its owner
#[derive(Serialize, Deserialize, Debug)]
pub struct ProfileDTO {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub mobile: Option<String>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub dob: Option<NaiveDate>,
    pub travel_styles: Vec<String>,
    pub interests: Vec<String>,
}

impl From<User> for ProfileDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.user_id,
            username: value.username,
            email: value.email,
            mobile: value.mobile,
            gender: value.gender,
            language: value.language,
            dob: value.dob,
            travel_styles: value.travel_styles.0.into_iter().collect(),
            interests: value.interests.0.into_iter().collect(),
        }
    }
}

/// Signup body
#[derive(Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_register_schema"))]
pub struct RegisterDTO {
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,

    #[validate(email(message = "Email is not valid"))]
    pub email: String,

    pub mobile: Option<String>,

    #[validate(length(max = 32))]
    pub gender: Option<String>,

    #[validate(length(max = 64))]
    pub language: Option<String>,

    pub dob: Option<NaiveDate>,

    #[serde(default)]
    pub travel_styles: BTreeSet<String>,

    #[serde(default)]
    pub interests: BTreeSet<String>,
}

/// DTO to create a new user (password already hashed)
#[derive(Debug, Clone)]
pub struct CreateUserDTO {
    pub username: String,
    pub password: String,
    pub email: String,
    pub mobile: Option<String>,
    pub gender: Option<String>,
    pub language: Option<String>,
    pub dob: Option<NaiveDate>,
    pub travel_styles: BTreeSet<String>,
    pub interests: BTreeSet<String>,
}

/// Partial profile update, only `Some(_)` fields are written
#[derive(Deserialize, Debug, Clone, Default, Validate)]
#[validate(schema(function = "validate_profile_schema"))]
pub struct UpdateProfileDTO {
    pub username: Option<String>,

    #[validate(email(message = "Email is not valid"))]
    pub email: Option<String>,

    pub mobile: Option<String>,

    #[validate(length(max = 32))]
    pub gender: Option<String>,

    #[validate(length(max = 64))]
    pub language: Option<String>,

    pub dob: Option<NaiveDate>,

    pub travel_styles: Option<BTreeSet<String>>,

    pub interests: Option<BTreeSet<String>>,
}

impl UpdateProfileDTO {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.mobile.is_none()
            && self.gender.is_none()
            && self.language.is_none()
            && self.dob.is_none()
            && self.travel_styles.is_none()
            && self.interests.is_none()
    }
}

/// Login body
#[derive(Deserialize, Debug)]
pub struct LoginDTO {
    pub username: String,
    pub password: String,
}

/// Ranked companion suggestion
#[derive(Serialize, Deserialize, Debug)]
pub struct MatchDTO {
    pub id: i32,
    pub username: String,
    pub score: usize,
}
