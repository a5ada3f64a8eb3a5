use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::NeuronId;
use crate::principal::Principal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeuronPermission {
    pub principal: Option<Principal>,
    pub permission_types: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neuron {
    pub id: Option<NeuronId>,
    pub cached_stake: u64,
    pub voting_power_multiplier: u64,
    pub permissions: Vec<NeuronPermission>,
}

impl Neuron {
    pub fn voting_power(&self) -> u128 {
        u128::from(self.cached_stake) * u128::from(self.voting_power_multiplier) / 100
    }

    pub fn involves(&self, principal: &Principal) -> bool {
        self.permissions
            .iter()
            .any(|entry| entry.principal.as_ref() == Some(principal))
    }

    pub fn owner(&self) -> Option<&Principal> {
        let mut best: Option<(&Principal, usize)> = None;
        for entry in &self.permissions {
            let Some(principal) = entry.principal.as_ref() else {
                continue;
            };
            let tags = entry.permission_types.len();
            match best {
                Some((_, best_tags)) if tags <= best_tags => {}
                _ => best = Some((principal, tags)),
            }
        }
        best.map(|(principal, _)| principal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsThreshold {
    pub min_voting_power: u64,
    pub max_duration: Option<u64>,
    pub default_duration: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnsError {
    #[error("No threshold is configured for this governance and permission")]
    ThresholdNotFound,

    #[error("No neuron oracle is configured")]
    OracleUnavailable,

    #[error("Caller lacks the {required} permission")]
    NotAuthorized { required: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(tag: u8) -> Principal {
        Principal::from_bytes(vec![tag]).unwrap()
    }

    fn neuron_with_permissions(permissions: Vec<NeuronPermission>) -> Neuron {
        Neuron {
            id: Some(NeuronId::from_slice(&[1, 2, 3])),
            cached_stake: 100,
            voting_power_multiplier: 100,
            permissions,
        }
    }

    #[test]
    fn voting_power_scales_by_multiplier() {
        let neuron = Neuron {
            id: None,
            cached_stake: 10_000_000_000,
            voting_power_multiplier: 150,
            permissions: Vec::new(),
        };
        assert_eq!(neuron.voting_power(), 15_000_000_000);
    }

    #[test]
    fn voting_power_does_not_wrap() {
        let neuron = Neuron {
            id: None,
            cached_stake: u64::MAX,
            voting_power_multiplier: u64::MAX,
            permissions: Vec::new(),
        };
        assert_eq!(
            neuron.voting_power(),
            u128::from(u64::MAX) * u128::from(u64::MAX) / 100
        );
    }

    #[test]
    fn owner_is_the_principal_with_most_tags() {
        let neuron = neuron_with_permissions(vec![
            NeuronPermission {
                principal: Some(principal(1)),
                permission_types: vec![1, 2],
            },
            NeuronPermission {
                principal: Some(principal(2)),
                permission_types: vec![1, 2, 3],
            },
        ]);
        assert_eq!(neuron.owner(), Some(&principal(2)));
    }

    #[test]
    fn owner_ties_resolve_to_first_seen() {
        let neuron = neuron_with_permissions(vec![
            NeuronPermission {
                principal: Some(principal(1)),
                permission_types: vec![1, 2],
            },
            NeuronPermission {
                principal: Some(principal(2)),
                permission_types: vec![3, 4],
            },
        ]);
        assert_eq!(neuron.owner(), Some(&principal(1)));
    }

    #[test]
    fn entries_without_principals_are_ignored() {
        let neuron = neuron_with_permissions(vec![
            NeuronPermission {
                principal: None,
                permission_types: vec![1, 2, 3, 4],
            },
            NeuronPermission {
                principal: Some(principal(2)),
                permission_types: vec![1],
            },
        ]);
        assert_eq!(neuron.owner(), Some(&principal(2)));
        assert!(neuron.involves(&principal(2)));
        assert!(!neuron.involves(&principal(1)));
    }
}
