use std::sync::Arc;

use thiserror::Error;

use crate::error::AuthError;
use domain::{identity::NeuronId, neuron::Neuron, principal::Principal};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Neuron oracle error: {message}")]
pub struct OracleError {
    pub message: String,
}

impl OracleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<OracleError> for AuthError {
    fn from(error: OracleError) -> Self {
        Self::Oracle {
            message: error.message,
        }
    }
}

#[async_trait::async_trait]
pub trait NeuronOraclePort: Send + Sync {
    async fn list_neurons(&self, of: &Principal) -> Result<Vec<Neuron>, OracleError>;

    async fn get_neuron(&self, id: &NeuronId) -> Result<Option<Neuron>, OracleError>;
}

pub type DynNeuronOraclePort = Arc<dyn NeuronOraclePort>;
