use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::principal::Principal;
use crate::time::Timestamp;

pub mod well_known {
    pub const ADD_ADMIN: &str = "add_admin";
    pub const REMOVE_ADMIN: &str = "remove_admin";
    pub const BAN_USER: &str = "ban_user";
    pub const UNBAN_USER: &str = "unban_user";
    pub const MANAGE_BAN_SETTINGS: &str = "manage_ban_settings";
    pub const EDIT_ANY_NAME: &str = "edit_any_name";
    pub const VERIFY_NAME: &str = "verify_name";
    pub const UNVERIFY_NAME: &str = "unverify_name";
    pub const SET_SNS_NEURON_NAME: &str = "set_sns_neuron_name";
    pub const REMOVE_SNS_NEURON_NAME: &str = "remove_sns_neuron_name";
    pub const SET_SNS_PRINCIPAL_NAME: &str = "set_sns_principal_name";
    pub const REMOVE_SNS_PRINCIPAL_NAME: &str = "remove_sns_principal_name";
    pub const VERIFY_SNS_NEURON_NAME: &str = "verify_sns_neuron_name";
    pub const UNVERIFY_SNS_NEURON_NAME: &str = "unverify_sns_neuron_name";
    pub const SET_ACCOUNT_NAME: &str = "set_account_name";
    pub const REMOVE_ACCOUNT_NAME: &str = "remove_account_name";
    pub const ADD_BANNED_WORD: &str = "add_banned_word";
    pub const REMOVE_BANNED_WORD: &str = "remove_banned_word";
    pub const VIEW_BANNED_WORDS: &str = "view_banned_words";
    pub const MANAGE_NAME_SETTINGS: &str = "manage_name_settings";

    pub const ALL: [&str; 20] = [
        ADD_ADMIN,
        REMOVE_ADMIN,
        BAN_USER,
        UNBAN_USER,
        MANAGE_BAN_SETTINGS,
        EDIT_ANY_NAME,
        VERIFY_NAME,
        UNVERIFY_NAME,
        SET_SNS_NEURON_NAME,
        REMOVE_SNS_NEURON_NAME,
        SET_SNS_PRINCIPAL_NAME,
        REMOVE_SNS_PRINCIPAL_NAME,
        VERIFY_SNS_NEURON_NAME,
        UNVERIFY_SNS_NEURON_NAME,
        SET_ACCOUNT_NAME,
        REMOVE_ACCOUNT_NAME,
        ADD_BANNED_WORD,
        REMOVE_BANNED_WORD,
        VIEW_BANNED_WORDS,
        MANAGE_NAME_SETTINGS,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionType {
    pub description: String,
    pub max_duration: Option<u64>,
    pub default_duration: Option<u64>,
}

impl PermissionType {
    pub fn new(
        description: impl Into<String>,
        max_duration: Option<u64>,
        default_duration: Option<u64>,
    ) -> Self {
        Self {
            description: description.into(),
            max_duration,
            default_duration,
        }
    }

    pub fn durations_consistent(&self) -> bool {
        match (self.default_duration, self.max_duration) {
            (Some(default), Some(max)) => default <= max,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub created_by: Principal,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

impl PermissionGrant {
    pub fn new(created_by: Principal, created_at: Timestamp, expires_at: Option<Timestamp>) -> Self {
        Self {
            created_by,
            created_at,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at.is_past(now),
            None => false,
        }
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        !self.is_expired(now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantLookup {
    NoTable,
    NotGranted,
    Granted(PermissionGrant),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionCheck {
    Allowed,
    Banned {
        reason: String,
        expires_at: Option<Timestamp>,
    },
    PermissionNotGranted,
    PermissionExpired {
        expired_at: Timestamp,
    },
    PermissionTypeNotFound {
        name: String,
    },
    NoPrincipalPermissions,
    PermissionTypeExists {
        name: String,
    },
}

impl PermissionCheck {
    pub fn allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    #[error("Permission type {name} does not exist")]
    PermissionTypeNotFound { name: String },

    #[error("Permission type {name} already exists")]
    PermissionTypeExists { name: String },

    #[error("No such permission grant")]
    PermissionNotFound,

    #[error("Requested expiry exceeds the maximum of {max_expiry}")]
    ExpiryExceedsMax { max_expiry: Timestamp },

    #[error("Default duration exceeds the maximum duration")]
    InvalidDurations,

    #[error("Caller lacks the {required} permission")]
    NotAuthorized { required: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_consistency() {
        assert!(PermissionType::new("x", None, None).durations_consistent());
        assert!(PermissionType::new("x", Some(10), Some(10)).durations_consistent());
        assert!(PermissionType::new("x", None, Some(99)).durations_consistent());
        assert!(!PermissionType::new("x", Some(10), Some(11)).durations_consistent());
    }

    #[test]
    fn only_allowed_projects_to_true() {
        assert!(PermissionCheck::Allowed.allowed());
        assert!(!PermissionCheck::PermissionNotGranted.allowed());
        assert!(
            !PermissionCheck::Banned {
                reason: "spam".to_string(),
                expires_at: None,
            }
            .allowed()
        );
    }
}
