use thiserror::Error;

use domain::admin::AdminError;
use domain::ban::BanError;
use domain::name::NameError;
use domain::neuron::SnsError;
use domain::permission::PermissionError;
use domain::time::Timestamp;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error(transparent)]
    Ban(#[from] BanError),

    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Sns(#[from] SnsError),

    #[error("Caller is banned: {reason}")]
    Banned {
        reason: String,
        expires_at: Option<Timestamp>,
    },

    #[error("Anonymous callers are not allowed")]
    AnonymousCaller,

    #[error("Neuron oracle error: {message}")]
    Oracle { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

pub type AuthResult<T> = Result<T, AuthError>;
