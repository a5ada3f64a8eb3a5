use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::SubjectIndex;
use crate::principal::Principal;
use crate::time::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanRecord {
    pub expires_at: Timestamp,
    pub reason: String,
}

impl BanRecord {
    pub fn new(expires_at: Timestamp, reason: impl Into<String>) -> Self {
        Self {
            expires_at,
            reason: reason.into(),
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_past(now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanLogEntry {
    pub user: SubjectIndex,
    pub admin: SubjectIndex,
    pub banned_at: Timestamp,
    pub expires_at: Timestamp,
    pub reason: String,
}

impl BanLogEntry {
    pub fn is_offense(&self) -> bool {
        self.expires_at > self.banned_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanLogRecord {
    pub user: Principal,
    pub admin: Principal,
    pub banned_at: Timestamp,
    pub expires_at: Timestamp,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenseTier {
    pub offense_count: u32,
    pub duration_hours: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanSettings {
    pub min_duration_hours: u64,
    pub escalation: Vec<OffenseTier>,
}

impl Default for BanSettings {
    fn default() -> Self {
        Self {
            min_duration_hours: 24,
            escalation: vec![
                OffenseTier {
                    offense_count: 1,
                    duration_hours: 24,
                },
                OffenseTier {
                    offense_count: 2,
                    duration_hours: 72,
                },
                OffenseTier {
                    offense_count: 3,
                    duration_hours: 168,
                },
                OffenseTier {
                    offense_count: 5,
                    duration_hours: 720,
                },
            ],
        }
    }
}

impl BanSettings {
    pub fn validate(&self) -> Result<(), BanError> {
        if self.min_duration_hours == 0 {
            return Err(BanError::InvalidSettings {
                message: "min_duration_hours must be at least 1".to_string(),
            });
        }

        if self.escalation.is_empty() {
            return Err(BanError::InvalidSettings {
                message: "escalation must contain at least one tier".to_string(),
            });
        }

        for window in self.escalation.windows(2) {
            let [previous, next] = window else {
                continue;
            };
            if next.offense_count <= previous.offense_count {
                return Err(BanError::InvalidSettings {
                    message: "escalation offense counts must be strictly increasing".to_string(),
                });
            }
            if next.duration_hours < previous.duration_hours {
                return Err(BanError::InvalidSettings {
                    message: "escalation durations must be non-decreasing".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn duration_hours_for(&self, offenses: u32) -> u64 {
        self.escalation
            .iter()
            .filter(|tier| tier.offense_count <= offenses)
            .next_back()
            .map(|tier| tier.duration_hours)
            .unwrap_or(self.min_duration_hours)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BanError {
    #[error("User is not banned")]
    UserNotBanned,

    #[error("Admins cannot be banned")]
    CannotBanAdmin,

    #[error("The controller cannot be banned")]
    CannotBanController,

    #[error("Invalid ban settings: {message}")]
    InvalidSettings { message: String },

    #[error("Caller lacks the {required} permission")]
    NotAuthorized { required: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        assert!(BanSettings::default().validate().is_ok());
    }

    #[test]
    fn settings_reject_empty_escalation() {
        let settings = BanSettings {
            min_duration_hours: 24,
            escalation: Vec::new(),
        };
        assert!(matches!(
            settings.validate(),
            Err(BanError::InvalidSettings { .. })
        ));
    }

    #[test]
    fn settings_reject_non_increasing_offense_counts() {
        let settings = BanSettings {
            min_duration_hours: 24,
            escalation: vec![
                OffenseTier {
                    offense_count: 2,
                    duration_hours: 24,
                },
                OffenseTier {
                    offense_count: 2,
                    duration_hours: 48,
                },
            ],
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn settings_reject_decreasing_durations() {
        let settings = BanSettings {
            min_duration_hours: 24,
            escalation: vec![
                OffenseTier {
                    offense_count: 1,
                    duration_hours: 48,
                },
                OffenseTier {
                    offense_count: 2,
                    duration_hours: 24,
                },
            ],
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn escalation_picks_the_highest_matching_tier() {
        let settings = BanSettings::default();
        assert_eq!(settings.duration_hours_for(0), 24);
        assert_eq!(settings.duration_hours_for(1), 24);
        assert_eq!(settings.duration_hours_for(2), 72);
        assert_eq!(settings.duration_hours_for(4), 168);
        assert_eq!(settings.duration_hours_for(9), 720);
    }

    #[test]
    fn unban_entries_are_not_offenses() {
        let ban = BanLogEntry {
            user: SubjectIndex(1),
            admin: SubjectIndex(2),
            banned_at: Timestamp::from_nanos(10),
            expires_at: Timestamp::from_nanos(20),
            reason: "spam".to_string(),
        };
        let unban = BanLogEntry {
            expires_at: Timestamp::from_nanos(10),
            ..ban.clone()
        };
        assert!(ban.is_offense());
        assert!(!unban.is_offense());
    }
}
