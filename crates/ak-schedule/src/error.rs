use ak_core::ComponentId;
use thiserror::Error;

/// A structural defect in an agent's configuration.
///
/// Always fatal and always reported before the first cycle: an agent that
/// fails to build never executes a component.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("cyclic dependency between components {components:?}")]
    CyclicDependency { components: Vec<String> },

    #[error("component {name:?} referenced by {referenced_by:?} does not exist")]
    UnknownComponent { name: String, referenced_by: String },

    #[error("channel {channel:?} referenced by component {component:?} does not exist")]
    UnknownChannel { channel: String, component: String },

    #[error("component {0:?} declared more than once")]
    DuplicateComponent(String),

    #[error("channel {0:?} declared more than once")]
    DuplicateChannel(String),

    #[error("channel {channel:?} has more than one writer: {writers:?}")]
    MultipleWriters { channel: String, writers: Vec<String> },

    #[error("channel {0:?} has no writer")]
    NoWriter(String),

    #[error("channel {channel:?} and component {component:?} disagree: {reason}")]
    InconsistentWiring {
        channel:   String,
        component: String,
        reason:    String,
    },

    #[error("component {component:?} uses unknown model {model:?}")]
    UnknownModel { component: String, model: String },

    #[error("component {component:?} could not be built: {reason}")]
    ModelConstruction { component: String, reason: String },

    #[error("component {component:?} has invalid timing: {reason}")]
    InvalidTiming { component: String, reason: String },

    #[error("link {producer} -> {consumer} names a component outside the graph")]
    InvalidLink { producer: ComponentId, consumer: ComponentId },
}

pub type ScheduleResult<T> = Result<T, ConfigurationError>;
