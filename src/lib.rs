//! Cadastro library
//!
//! Records, validation and backend access for the back-office registry.
//! Modules are exposed for integration testing.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod stores;
pub mod traits;
pub mod utils;

// Re-export commonly used types for testing
pub use client::RestClient;
pub use config::Config;
pub use error::{AuthError, ValidationError};
pub use registry::Registry;
pub use stores::MemoryBackend;
pub use traits::RegistryBackend;
pub use utils::formatting::{format_cep, format_cpf};
pub use utils::validation::{is_valid_cep, is_valid_cpf};
