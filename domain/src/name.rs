use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::SubjectIndex;
use crate::principal::Principal;
use crate::time::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name: String,
    pub verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Principal,
    pub updated_by: Principal,
}

impl NameRecord {
    pub fn new(name: impl Into<String>, now: Timestamp, author: Principal) -> Self {
        Self {
            name: name.into(),
            verified: false,
            created_at: now,
            updated_at: now,
            created_by: author.clone(),
            updated_by: author,
        }
    }

    pub fn renamed(&self, name: impl Into<String>, now: Timestamp, author: Principal) -> Self {
        let name = name.into();
        Self {
            verified: self.verified && name == self.name,
            name,
            created_at: self.created_at,
            updated_at: now,
            created_by: self.created_by.clone(),
            updated_by: author,
        }
    }

    pub fn with_verified(&self, verified: bool, now: Timestamp, author: Principal) -> Self {
        Self {
            verified,
            updated_at: now,
            updated_by: author,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameClaim {
    Claimed { previous: Option<NameRecord> },
    Taken { holder: SubjectIndex },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub holder: Option<Principal>,
    pub record: NameRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSettings {
    pub min_length: usize,
    pub max_length: usize,
    pub allow_special_chars: bool,
    pub allow_unicode: bool,
}

impl Default for NameSettings {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 32,
            allow_special_chars: false,
            allow_unicode: false,
        }
    }
}

impl NameSettings {
    pub fn validate(&self) -> Result<(), NameError> {
        if self.min_length < 1 {
            return Err(NameError::InvalidSettings {
                message: "min_length must be at least 1".to_string(),
            });
        }
        if self.min_length > self.max_length {
            return Err(NameError::InvalidSettings {
                message: "min_length cannot exceed max_length".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannedWordEntry {
    pub added_by: Principal,
    pub added_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Invalid name: {reason}")]
    InvalidName { reason: String },

    #[error("Name contains the banned word {word}")]
    BannedWord { word: String },

    #[error("The name {name} is already taken")]
    NameAlreadyTaken {
        name: String,
        taken_by: Option<Principal>,
    },

    #[error("Name not found")]
    NameNotFound,

    #[error("Neuron not found")]
    NeuronNotFound,

    #[error("Subaccounts must be exactly 32 bytes, got {length}")]
    InvalidSubaccount { length: usize },

    #[error("Invalid name settings: {message}")]
    InvalidSettings { message: String },

    #[error("Caller lacks the {required} permission")]
    NotAuthorized { required: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> Principal {
        Principal::from_bytes(vec![9]).unwrap()
    }

    #[test]
    fn renaming_resets_verification() {
        let record = NameRecord::new("alice", Timestamp::from_nanos(1), author())
            .with_verified(true, Timestamp::from_nanos(2), author());
        let renamed = record.renamed("bob", Timestamp::from_nanos(3), author());

        assert!(!renamed.verified);
        assert_eq!(renamed.created_at, Timestamp::from_nanos(1));
        assert_eq!(renamed.updated_at, Timestamp::from_nanos(3));
    }

    #[test]
    fn rewriting_the_same_name_keeps_verification() {
        let record = NameRecord::new("alice", Timestamp::from_nanos(1), author())
            .with_verified(true, Timestamp::from_nanos(2), author());
        let rewritten = record.renamed("alice", Timestamp::from_nanos(3), author());

        assert!(rewritten.verified);
    }

    #[test]
    fn settings_bounds_are_checked() {
        let settings = NameSettings {
            min_length: 0,
            ..NameSettings::default()
        };
        assert!(settings.validate().is_err());

        let settings = NameSettings {
            min_length: 10,
            max_length: 5,
            ..NameSettings::default()
        };
        assert!(settings.validate().is_err());

        assert!(NameSettings::default().validate().is_ok());
    }
}
