use std::{
    hash::{Hash, Hasher},
    sync::LazyLock,
};

use regex::Regex;
use secrecy::{ExposeSecret, Secret};

use super::validation_error::ValidationError;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const BLACKLISTED_DOMAINS: [&str; 3] = ["tempmail.com", "mailinator.com", "dispostable.com"];

/// Canonicalized email address.
///
/// Two addresses are equal when their canonical forms are equal, so
/// `Jane.Doe+test@gmail.com` and `janedoe@gmail.com` compare equal.
#[derive(Debug, Clone)]
pub struct EmailAddress(Secret<String>);

impl EmailAddress {
    pub fn create(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::EmailRequired);
        }

        let normalized = normalize(raw);

        if !EMAIL_REGEX.is_match(&normalized) {
            return Err(ValidationError::InvalidEmailFormat);
        }

        if let Some((_, domain)) = normalized.split_once('@') {
            if BLACKLISTED_DOMAINS.contains(&domain) {
                return Err(ValidationError::BlacklistedEmailDomain(domain.to_owned()));
            }
        }

        Ok(Self(Secret::new(normalized)))
    }

    pub fn local_part(&self) -> &str {
        let value = self.0.expose_secret();
        value.split_once('@').map_or(value.as_str(), |(local, _)| local)
    }

    pub fn domain(&self) -> &str {
        let value = self.0.expose_secret();
        value.split_once('@').map_or("", |(_, domain)| domain)
    }
}

// Gmail ignores dots and `+tag` suffixes in the local part.
fn normalize(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let Some((local, domain)) = lowered.split_once('@') else {
        return lowered;
    };
    if local.is_empty() || domain.is_empty() {
        return lowered;
    }

    if domain == "gmail.com" {
        let untagged = local.split('+').next().unwrap_or_default();
        return format!("{}@{}", untagged.replace('.', ""), domain);
    }

    lowered
}

impl TryFrom<Secret<String>> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Self::create(value.expose_secret())
    }
}

impl AsRef<Secret<String>> for EmailAddress {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for EmailAddress {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for EmailAddress {}

impl Hash for EmailAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}
