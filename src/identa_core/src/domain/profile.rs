use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::{
    role::{Role, UserStatus},
    user::User,
    user_id::UserId,
};

/// Externally visible view of an account. Carries neither the password
/// hash nor any verification token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub status: UserStatus,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountProfile {
    /// Data-minimized copy for administrators viewing other accounts.
    pub fn masked(self) -> Self {
        Self {
            email: mask_email(&self.email),
            phone: mask_phone(&self.phone),
            ..self
        }
    }
}

impl From<&User> for AccountProfile {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            full_name: user.full_name().as_str().to_owned(),
            email: user.email().as_ref().expose_secret().clone(),
            phone: user.phone().as_ref().expose_secret().clone(),
            status: user.status(),
            roles: user.roles().iter().copied().collect(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

const PHONE_VISIBLE_PREFIX: usize = 5;
const PHONE_VISIBLE_SUFFIX: usize = 2;

/// `+8801712345678` becomes `+8801*******78`.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= PHONE_VISIBLE_PREFIX + PHONE_VISIBLE_SUFFIX {
        return phone.to_owned();
    }

    let hidden = chars.len() - PHONE_VISIBLE_PREFIX - PHONE_VISIBLE_SUFFIX;
    let prefix: String = chars[..PHONE_VISIBLE_PREFIX].iter().collect();
    let suffix: String = chars[chars.len() - PHONE_VISIBLE_SUFFIX..].iter().collect();
    format!("{prefix}{}{suffix}", "*".repeat(hidden))
}

/// `janedoe@gmail.com` becomes `j***@gmail.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{first}***@{domain}")
        }
        None => "***".to_owned(),
    }
}
