use figment::{Figment, providers::Env};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing_subscriber::prelude::*;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),
    #[error("failed to build application context: {0}")]
    Context(String),
}

impl From<figment::Error> for BootstrapError {
    fn from(e: figment::Error) -> Self {
        Self::Config(Box::new(e))
    }
}

pub trait ContextProvider<Config>: Sized {
    fn new(config: Config)
    -> impl Future<Output = Result<Self, BootstrapError>> + Send;
}

/// Initialize the application context with configuration from environment
/// variables.
/// A `.env` file in the working directory (or any parent) is loaded first;
/// variables already present in the process environment take precedence.
/// The configuration is extracted using figment.
///
/// # Returns
/// The application context as specified by the trait.
///
/// # Errors
/// If the configuration cannot be extracted from the environment variables,
/// or the context rejects it.
///
pub async fn create_app_context<A, Config: DeserializeOwned>()
-> Result<A, BootstrapError>
where
    A: ContextProvider<Config>,
{
    // loaded before the tracer so RUST_LOG may come from the file
    let dotenv = dotenvy::dotenv();

    init_tracer();

    match dotenv {
        Ok(path) => {
            tracing::info!("loaded environment from {}", path.display());
        }
        Err(e) => tracing::debug!("no .env file loaded: {e}"),
    }

    let config: Config = load_config()?;

    let context = A::new(config).await?;

    Ok(context)
}

/// Extract `Config` from the raw process environment.
///
/// Variable names map to lower-cased field names, so `OPENAI_API_KEY` fills
/// `openai_api_key`.
///
/// # Errors
/// If a variable cannot be parsed into its field type, or a field without a
/// default is missing.
pub fn load_config<Config: DeserializeOwned>()
-> Result<Config, figment::Error> {
    let figment = Figment::new().merge(Env::raw());

    figment.extract()
}

fn init_tracer() {
    let fmt_layer = tracing_subscriber::fmt::layer();

    // allow log level to be overridden by RUST_LOG env var
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();
}
