use agora_types::{ErrorKind, Identity};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{sender} is not authorized: requires {required}")]
    Unauthorized { sender: Identity, required: String },
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Unauthorized
    }
}
