use ak_schedule::ConfigurationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {agent:?}: {source}")]
    Configuration {
        agent:  String,
        #[source]
        source: ConfigurationError,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    pub fn configuration(agent: &str, source: ConfigurationError) -> Self {
        AgentError::Configuration { agent: agent.to_owned(), source }
    }

    /// The underlying configuration defect, if this is one.
    pub fn as_configuration(&self) -> Option<&ConfigurationError> {
        match self {
            AgentError::Configuration { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
