use thiserror::Error;
use tg_core::TgError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("simulation already torn down at {0}")]
    Finished(tg_core::Step),

    #[error("model error: {0}")]
    Model(#[from] TgError),
}

pub type SimResult<T> = Result<T, SimError>;
