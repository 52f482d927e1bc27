//! Operator sign-up and login
//!
//! Back-office operators log in with their masked CPF and a password.
//! [`Accounts`] holds the registered operators in memory.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::error::{AuthError, ValidationError};
use crate::utils::formatting::format_cpf;
use crate::utils::validation::{require, require_cpf};

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUp {
    pub nome: String,
    pub cpf: String,
    pub senha: String,
    pub confirmacao: String,
}

impl SignUp {
    pub fn normalize(&mut self) {
        self.cpf = format_cpf(&self.cpf);
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("nome", &self.nome)?;
        require_cpf("cpf", &self.cpf)?;
        if self.senha != self.confirmacao {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.senha.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}

/// A registered operator
#[derive(Clone, PartialEq, Eq)]
pub struct Operator {
    pub nome: String,
    /// Masked CPF, the login name
    pub cpf: String,
    senha: String,
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("nome", &self.nome)
            .field("cpf", &self.cpf)
            .finish_non_exhaustive()
    }
}

/// Operators allowed to log in
#[derive(Debug, Default)]
pub struct Accounts {
    operators: Vec<Operator>,
}

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operators available before anyone signs up
    ///
    /// Their CPFs predate check-digit validation and are only compared as
    /// masked text.
    pub fn with_sample_operators() -> Self {
        let operators = [
            ("Administrador", "123.456.789-00", "123456"),
            ("Supervisor", "987.654.321-00", "senha123"),
        ]
        .into_iter()
        .map(|(nome, cpf, senha)| Operator {
            nome: nome.to_string(),
            cpf: cpf.to_string(),
            senha: senha.to_string(),
        })
        .collect();

        Self { operators }
    }

    /// Validates a sign-up form and registers the operator
    ///
    /// # Errors
    /// Returns [`AuthError::Invalid`] with the first failing field, or
    /// [`AuthError::AlreadyRegistered`] if the CPF is taken.
    pub fn sign_up(&mut self, mut form: SignUp) -> Result<&Operator, AuthError> {
        form.normalize();
        form.validate()?;
        if self.operators.iter().any(|o| o.cpf == form.cpf) {
            return Err(AuthError::AlreadyRegistered(form.cpf));
        }

        info!(cpf = %form.cpf, "registered operator");
        let index = self.operators.len();
        self.operators.push(Operator {
            nome: form.nome,
            cpf: form.cpf,
            senha: form.senha,
        });
        Ok(&self.operators[index])
    }

    /// Finds the operator with this CPF and password
    ///
    /// The CPF is masked first, so raw digits and the masked form both work.
    pub fn login(&self, cpf: &str, senha: &str) -> Result<&Operator, AuthError> {
        let cpf = format_cpf(cpf);
        match self
            .operators
            .iter()
            .find(|o| o.cpf == cpf && o.senha == senha)
        {
            Some(operator) => Ok(operator),
            None => {
                warn!(%cpf, "rejected login");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
