use domain::name::{NameError, NameSettings};

#[derive(Debug, Clone, Copy, Default)]
pub struct NameValidator;

impl NameValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, name: &str, settings: &NameSettings) -> Result<(), NameError> {
        let length = name.chars().count();

        if length < settings.min_length {
            return Err(NameError::InvalidName {
                reason: format!(
                    "name is too short: minimum length is {}",
                    settings.min_length
                ),
            });
        }

        if length > settings.max_length {
            return Err(NameError::InvalidName {
                reason: format!("name is too long: maximum length is {}", settings.max_length),
            });
        }

        if !settings.allow_special_chars
            && name.chars().any(|character| !character.is_alphanumeric())
        {
            return Err(NameError::InvalidName {
                reason: "name contains special characters, which are not allowed".to_string(),
            });
        }

        if !settings.allow_unicode && !name.is_ascii() {
            return Err(NameError::InvalidName {
                reason: "name contains unicode characters, which are not allowed".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> NameSettings {
        NameSettings {
            min_length: 3,
            max_length: 20,
            allow_special_chars: false,
            allow_unicode: false,
        }
    }

    fn reason(result: Result<(), NameError>) -> String {
        match result {
            Err(NameError::InvalidName { reason }) => reason,
            other => panic!("expected InvalidName, got {other:?}"),
        }
    }

    #[test]
    fn accepts_plain_names_within_bounds() {
        let validator = NameValidator::new();
        assert!(validator.validate("validname", &settings()).is_ok());
        assert!(validator.validate("abc", &settings()).is_ok());
    }

    #[test]
    fn rejects_short_and_long_names() {
        let validator = NameValidator::new();
        assert!(reason(validator.validate("ab", &settings())).contains("too short"));
        assert!(
            reason(validator.validate(&"a".repeat(21), &settings())).contains("too long")
        );
    }

    #[test]
    fn rejects_special_characters_when_disallowed() {
        let validator = NameValidator::new();
        assert!(reason(validator.validate("test-name", &settings())).contains("special"));

        let mut relaxed = settings();
        relaxed.allow_special_chars = true;
        assert!(validator.validate("test-name", &relaxed).is_ok());
    }

    #[test]
    fn rejects_unicode_when_disallowed() {
        let validator = NameValidator::new();
        assert!(reason(validator.validate("séname", &settings())).contains("unicode"));

        let mut relaxed = settings();
        relaxed.allow_unicode = true;
        assert!(validator.validate("séname", &relaxed).is_ok());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut relaxed = settings();
        relaxed.allow_unicode = true;
        relaxed.max_length = 4;

        let validator = NameValidator::new();
        assert!(validator.validate("éééé", &relaxed).is_ok());
        assert!(validator.validate("ééééé", &relaxed).is_err());
    }
}
