use super::models::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

/// Settings that let the server start but will not deliver requests.
pub fn check_delivery(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if config.mail.uses_default_credentials() {
        warnings.push_with_hint(
            "mail credentials are placeholders",
            "Set EMAIL_USER and EMAIL_PASS",
        );
    }

    if config.mail.relay_url.is_none() {
        warnings.push_with_hint(
            "no mail relay configured; requests will only be logged",
            "Set MAIL_RELAY_URL to forward requests",
        );
    }

    warnings
}
