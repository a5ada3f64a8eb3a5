use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use domain::{ban::BanSettings, name::NameSettings, principal::Principal};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    pub controller: Principal,
    pub ban: BanSettings,
    pub names: NameSettings,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            controller: Principal::anonymous(),
            ban: BanSettings::default(),
            names: NameSettings::default(),
        }
    }
}

impl CoreConfig {
    pub fn new(controller: Principal) -> Self {
        Self {
            controller,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> AuthResult<()> {
        if self.controller.is_anonymous() {
            return Err(AuthError::Config {
                message: "controller must not be the anonymous principal".to_string(),
            });
        }

        self.ban.validate().map_err(|e| AuthError::Config {
            message: e.to_string(),
        })?;

        self.names.validate().map_err(|e| AuthError::Config {
            message: e.to_string(),
        })?;

        Ok(())
    }

    pub fn load() -> AuthResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if Path::new("namehub.toml").exists() {
            figment = figment.merge(Toml::file("namehub.toml"));
        }

        if Path::new("namehub.json").exists() {
            figment = figment.merge(Json::file("namehub.json"));
        }

        let config: Self = figment
            .merge(Env::prefixed("NAMEHUB_").split("__"))
            .extract()
            .map_err(|e| AuthError::Config {
                message: format!("Failed to load configuration: {e}"),
            })?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_lacks_a_controller() {
        assert!(CoreConfig::default().validate().is_err());
    }

    #[test]
    fn config_with_controller_validates() {
        let config = CoreConfig::new(Principal::from_bytes(vec![1, 2, 3]).unwrap());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_ban_settings_are_rejected() {
        let mut config = CoreConfig::new(Principal::from_bytes(vec![1]).unwrap());
        config.ban.escalation.clear();
        assert!(matches!(
            config.validate(),
            Err(AuthError::Config { .. })
        ));
    }
}
