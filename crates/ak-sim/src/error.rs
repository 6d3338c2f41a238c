use ak_agent::AgentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("run configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("could not start worker pool: {0}")]
    ThreadPool(String),
}

pub type SimResult<T> = Result<T, SimError>;
