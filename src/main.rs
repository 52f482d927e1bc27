//! Cadastro - back-office registry client
//!
//! Command-line front for the registration screens:
//! - CPF and CEP masking and validation
//! - Operator sign-up validation and login
//! - Listing and searching construction sites, workers, lodgings,
//!   materials and vehicles
//! - Registering, updating and removing records through the REST API
//! - Offline mode backed by an in-memory store with sample data
//!
//! Records are read from and printed as JSON. Logs go to stderr and are
//! controlled with `RUST_LOG`.

use anyhow::{Context, Result};
use cadastro::config::Config;
use cadastro::model::{Accounts, ConstructionSite, Material, Republic, SignUp, Vehicle, Worker};
use cadastro::utils::formatting::{format_cep, format_cpf};
use cadastro::utils::validation::{is_valid_cep, is_valid_cpf};
use cadastro::{MemoryBackend, Registry, RegistryBackend, RestClient};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Override the configured API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Use an in-memory store with sample data instead of the API
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Format or check a CPF
    Cpf {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Format or check a CEP
    Cep {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Validate a sign-up form read from a JSON file
    SignUp { file: PathBuf },
    /// Check a CPF and password against the registered operators
    Login {
        #[arg(long)]
        cpf: String,
        #[arg(long)]
        password: String,
    },
    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(flatten)]
    Registry(RegistryCommand),
}

/// Subcommands that go through a registry backend
#[derive(Subcommand, Debug)]
enum RegistryCommand {
    /// List records, optionally filtered by a search term
    List {
        kind: Kind,
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Validate and register a record read from a JSON file
    Register { kind: Kind, file: PathBuf },
    /// Validate and replace a record with one read from a JSON file
    Update {
        kind: Kind,
        id: String,
        file: PathBuf,
    },
    /// Remove a record
    Delete { kind: Kind, id: String },
    /// List storage locations for materials
    Locations,
    /// List lodgings workers can be allocated to
    Lodgings,
}

#[derive(Subcommand, Debug)]
enum DocumentAction {
    /// Print the masked value
    Format { raw: String },
    /// Exit with status 1 unless the value is valid
    Check { raw: String },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the configuration file path and contents
    Show,
    /// Persist a new API base URL
    SetApiUrl { url: String },
}

/// Registry collection selectable from the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Sites,
    Workers,
    Republics,
    Materials,
    Vehicles,
}

/// Runs `$body` with `$r` bound to the record type of `$kind`
macro_rules! with_record_type {
    ($kind:expr, $r:ident => $body:expr) => {
        match $kind {
            Kind::Sites => {
                type $r = ConstructionSite;
                $body
            }
            Kind::Workers => {
                type $r = Worker;
                $body
            }
            Kind::Republics => {
                type $r = Republic;
                $body
            }
            Kind::Materials => {
                type $r = Material;
                $body
            }
            Kind::Vehicles => {
                type $r = Vehicle;
                $body
            }
        }
    };
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Cpf { action } => Ok(document(action, format_cpf, is_valid_cpf)),
        Command::Cep { action } => Ok(document(action, format_cep, is_valid_cep)),
        Command::SignUp { file } => sign_up(&file),
        Command::Login { cpf, password } => Ok(login(&cpf, &password)),
        Command::Config { action } => {
            configure(action)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Registry(command) if args.offline => {
            debug!("using in-memory backend");
            run(Registry::new(MemoryBackend::with_sample_data()), command).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Registry(command) => {
            let mut config = Config::load()?;
            if let Some(url) = args.api_url {
                config.api.base_url = url;
            }
            debug!(base_url = %config.api.base_url, "using REST backend");
            let client = RestClient::new(&config.api.base_url, config.api.timeout())?;
            run(Registry::new(client), command).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn document(action: DocumentAction, format: fn(&str) -> String, check: fn(&str) -> bool) -> ExitCode {
    match action {
        DocumentAction::Format { raw } => {
            println!("{}", format(&raw));
            ExitCode::SUCCESS
        }
        DocumentAction::Check { raw } => {
            if check(&raw) {
                println!("valid");
                ExitCode::SUCCESS
            } else {
                println!("invalid");
                ExitCode::FAILURE
            }
        }
    }
}

fn sign_up(path: &Path) -> Result<ExitCode> {
    let form: SignUp = read_record(path)?;
    match Accounts::with_sample_operators().sign_up(form) {
        Ok(operator) => {
            println!("{} {}", operator.cpf, operator.nome);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("invalid: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn login(cpf: &str, password: &str) -> ExitCode {
    match Accounts::with_sample_operators().login(cpf, password) {
        Ok(operator) => {
            println!("logged in as {}", operator.cpf);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn configure(action: ConfigAction) -> Result<()> {
    let path = Config::config_path()?;
    let mut config = Config::load_from(&path)?;

    match action {
        ConfigAction::Show => {
            println!("# {}", path.display());
            print!("{}", serde_yaml::to_string(&config)?);
        }
        ConfigAction::SetApiUrl { url } => {
            config.api.base_url = url;
            config.save_to(&path)?;
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}

async fn run<B: RegistryBackend>(registry: Registry<B>, command: RegistryCommand) -> Result<()> {
    match command {
        RegistryCommand::List { kind, search } => {
            let term = search.unwrap_or_default();
            with_record_type!(kind, R => print_json(&registry.search::<R>(&term).await?))
        }
        RegistryCommand::Register { kind, file } => {
            with_record_type!(kind, R => {
                let record: R = read_record(&file)?;
                print_json(&registry.register(record).await?)
            })
        }
        RegistryCommand::Update { kind, id, file } => {
            with_record_type!(kind, R => {
                let record: R = read_record(&file)?;
                print_json(&registry.update(&id, record).await?)
            })
        }
        RegistryCommand::Delete { kind, id } => {
            with_record_type!(kind, R => registry.remove::<R>(&id).await?);
            println!("Removed {}", id);
            Ok(())
        }
        RegistryCommand::Locations => print_json(&registry.storage_locations().await?),
        RegistryCommand::Lodgings => print_json(&registry.lodging_options().await?),
    }
}

fn read_record<R: serde::de::DeserializeOwned>(path: &Path) -> Result<R> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse record in {:?}", path))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_registry_subcommands_parse_into_registry_command() {
        let args = Args::try_parse_from(["cadastro", "--offline", "list", "sites", "-s", "bh"]).unwrap();
        assert!(args.offline);
        assert!(matches!(
            args.command,
            Command::Registry(RegistryCommand::List { kind: Kind::Sites, search: Some(_) })
        ));

        let args = Args::try_parse_from(["cadastro", "delete", "vehicles", "v1"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Registry(RegistryCommand::Delete { kind: Kind::Vehicles, .. })
        ));
    }

    #[test]
    fn test_local_subcommands_stay_outside_the_registry() {
        let args = Args::try_parse_from(["cadastro", "cpf", "check", "12345678909"]).unwrap();
        assert!(matches!(args.command, Command::Cpf { action: DocumentAction::Check { .. } }));

        let args = Args::try_parse_from([
            "cadastro",
            "login",
            "--cpf",
            "123.456.789-00",
            "--password",
            "123456",
        ])
        .unwrap();
        let Command::Login { cpf, password } = args.command else {
            panic!("expected login");
        };
        assert_eq!(login(&cpf, &password), ExitCode::SUCCESS);
        assert_eq!(login(&cpf, "wrong"), ExitCode::FAILURE);
    }
}
