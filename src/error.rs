//! Validation errors
//!
//! Record validation reports the first failing field as a typed error so
//! callers can map it to a message next to the right input. Everything
//! else in the crate propagates `anyhow::Error`; a `ValidationError` raised
//! by the registry can be recovered with `downcast_ref`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must have at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} must have 11 digits")]
    IncompleteCpf { field: &'static str },

    #[error("{field} is not a valid CPF, check the digits")]
    InvalidCpf { field: &'static str },

    #[error("{field} is not a valid CEP ({value}), expected 00000-000")]
    InvalidCep { field: &'static str, value: String },

    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("password must have at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("site code {0} already exists")]
    DuplicateCode(String),
}

/// Operator sign-up and login failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("an operator with CPF {0} is already registered")]
    AlreadyRegistered(String),

    #[error("incorrect CPF or password, only registered operators can log in")]
    InvalidCredentials,
}
