use agora_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Governance(#[from] agora_governance::GovernanceError),

    #[error(transparent)]
    Lending(#[from] agora_lending::LendingError),

    #[error("store error: {0}")]
    Store(#[from] agora_store::StoreError),

    #[error("unknown {entity} method {method:?}")]
    UnknownMethod { entity: &'static str, method: String },

    #[error("{method}: expected {expected} arguments, got {got}")]
    Arity {
        method: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{method}: argument {index} {reason}")]
    BadArgument {
        method: &'static str,
        index: usize,
        reason: String,
    },

    #[error("{0} requires an entity id")]
    MissingId(&'static str),

    #[error("create does not take an entity id")]
    UnexpectedId,

    #[error("invalid identity {0:?}")]
    InvalidIdentity(String),

    #[error("malformed call: {0}")]
    MalformedCall(String),

    #[error("record encoding failed: {0}")]
    Codec(String),

    #[error("config error: {0}")]
    Config(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Governance(e) => e.kind(),
            Self::Lending(e) => e.kind(),
            Self::Store(e) => e.kind(),
            Self::UnknownMethod { .. }
            | Self::Arity { .. }
            | Self::BadArgument { .. }
            | Self::MissingId(_)
            | Self::UnexpectedId
            | Self::InvalidIdentity(_)
            | Self::MalformedCall(_) => ErrorKind::Validation,
            Self::Codec(_) => ErrorKind::Storage,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}
