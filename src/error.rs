use crate::color::table::ColorTableError;
use crate::config::ConfigError;
use crate::counter::CounterError;
use crate::form::FormError;
use crate::generator::builder::GeneratorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    ColorTable(#[from] ColorTableError),
    #[error(transparent)]
    Counter(#[from] CounterError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error("Failed to set up logging: {0}")]
    Logging(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
