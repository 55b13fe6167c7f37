use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::{
    email::EmailAddress,
    full_name::FullName,
    password::Password,
    phone_number::PhoneNumber,
    profile::AccountProfile,
    role::{Role, UserStatus},
    user_error::UserError,
    user_id::UserId,
    verification_token::VerificationToken,
};

/// An outstanding proof-of-control challenge for an email address.
///
/// A pending email can only exist together with its token.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingVerification {
    /// Confirms the address the account registered with.
    Email { token: VerificationToken },
    /// Confirms a new address before it replaces the active one.
    EmailChange {
        token: VerificationToken,
        new_email: EmailAddress,
    },
}

impl PendingVerification {
    pub fn token(&self) -> &VerificationToken {
        match self {
            Self::Email { token } | Self::EmailChange { token, .. } => token,
        }
    }

    pub fn new_email(&self) -> Option<&EmailAddress> {
        match self {
            Self::Email { .. } => None,
            Self::EmailChange { new_email, .. } => Some(new_email),
        }
    }
}

/// Validated fields for a brand-new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: FullName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub password: Password,
    pub terms_version: String,
    pub privacy_version: String,
}

/// Flat snapshot used to move a `User` in and out of storage.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub full_name: FullName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub password: Password,
    pub status: UserStatus,
    pub roles: BTreeSet<Role>,
    pub terms_version: String,
    pub privacy_version: String,
    pub verification_token: Option<VerificationToken>,
    pub pending_email: Option<EmailAddress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account aggregate. State only changes through the guarded methods
/// below, each of which refreshes `updated_at`.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    full_name: FullName,
    email: EmailAddress,
    phone: PhoneNumber,
    password: Password,
    status: UserStatus,
    roles: BTreeSet<Role>,
    terms_version: String,
    privacy_version: String,
    pending: Option<PendingVerification>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates an account awaiting verification of its registration email.
    pub fn register(new_user: NewUser, token: VerificationToken) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            full_name: new_user.full_name,
            email: new_user.email,
            phone: new_user.phone,
            password: new_user.password,
            status: UserStatus::PendingVerification,
            roles: BTreeSet::from([Role::User]),
            terms_version: new_user.terms_version,
            privacy_version: new_user.privacy_version,
            pending: Some(PendingVerification::Email { token }),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds an account from storage, rejecting snapshots that break
    /// the aggregate's invariants.
    pub fn restore(record: UserRecord) -> Result<Self, UserError> {
        if !record.roles.contains(&Role::User) {
            return Err(UserError::CorruptRecord(format!(
                "account {} is missing the USER role",
                record.id
            )));
        }

        let pending = match (record.verification_token, record.pending_email) {
            (None, None) => None,
            (Some(token), None) => Some(PendingVerification::Email { token }),
            (Some(token), Some(new_email)) => {
                Some(PendingVerification::EmailChange { token, new_email })
            }
            (None, Some(_)) => {
                return Err(UserError::CorruptRecord(format!(
                    "account {} has a pending email without a token",
                    record.id
                )));
            }
        };

        Ok(Self {
            id: record.id,
            full_name: record.full_name,
            email: record.email,
            phone: record.phone,
            password: record.password,
            status: record.status,
            roles: record.roles,
            terms_version: record.terms_version,
            privacy_version: record.privacy_version,
            pending,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            password: self.password.clone(),
            status: self.status,
            roles: self.roles.clone(),
            terms_version: self.terms_version.clone(),
            privacy_version: self.privacy_version.clone(),
            verification_token: self.verification_token().cloned(),
            pending_email: self.pending_email().cloned(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Consumes the outstanding token. A mismatch leaves the account untouched.
    pub fn verify_email(&mut self, token: &str) -> Result<(), UserError> {
        match &self.pending {
            Some(pending) if pending.token().matches(token) => {}
            _ => return Err(UserError::TokenMismatch),
        }

        if let Some(PendingVerification::EmailChange { new_email, .. }) = self.pending.take() {
            self.email = new_email;
        }
        self.status = UserStatus::Active;
        self.touch();
        Ok(())
    }

    /// Parks `new_email` until `verify_email` is called with `token`.
    /// Uniqueness of the new address is the caller's concern.
    pub fn initiate_email_change(&mut self, new_email: EmailAddress, token: VerificationToken) {
        self.pending = Some(PendingVerification::EmailChange { token, new_email });
        self.touch();
    }

    pub fn update_profile(&mut self, full_name: &str) -> Result<(), UserError> {
        self.full_name = FullName::parse(full_name)?;
        self.touch();
        Ok(())
    }

    pub fn deactivate(&mut self) -> Result<(), UserError> {
        if self.status == UserStatus::Deactivated {
            return Err(UserError::AlreadyDeactivated);
        }
        self.status = UserStatus::Deactivated;
        self.touch();
        Ok(())
    }

    /// Reverses a deactivation. An account whose registration email was
    /// never verified goes back to `PendingVerification`.
    pub fn activate(&mut self) -> Result<(), UserError> {
        if self.status != UserStatus::Deactivated {
            return Err(UserError::NotDeactivated);
        }
        self.status = match self.pending {
            Some(PendingVerification::Email { .. }) => UserStatus::PendingVerification,
            _ => UserStatus::Active,
        };
        self.touch();
        Ok(())
    }

    pub fn grant_role(&mut self, role: Role) {
        if self.roles.insert(role) {
            self.touch();
        }
    }

    pub fn profile(&self) -> AccountProfile {
        AccountProfile::from(self)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn terms_version(&self) -> &str {
        &self.terms_version
    }

    pub fn privacy_version(&self) -> &str {
        &self.privacy_version
    }

    pub fn pending_verification(&self) -> Option<&PendingVerification> {
        self.pending.as_ref()
    }

    pub fn verification_token(&self) -> Option<&VerificationToken> {
        self.pending.as_ref().map(PendingVerification::token)
    }

    pub fn pending_email(&self) -> Option<&EmailAddress> {
        self.pending.as_ref().and_then(PendingVerification::new_email)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use secrecy::{ExposeSecret, Secret};

    use super::*;
    use crate::domain::{phone_number::Country, validation_error::ValidationError};

    fn new_user() -> NewUser {
        NewUser {
            full_name: FullName::parse("Jane Doe").unwrap(),
            email: EmailAddress::create("jane@example.com").unwrap(),
            phone: PhoneNumber::create("01712345678", Country::Bd).unwrap(),
            password: Password::from_hashed(Secret::new("$argon2id$stub".to_owned())),
            terms_version: "v1".to_owned(),
            privacy_version: "v1".to_owned(),
        }
    }

    fn token_value(user: &User) -> String {
        user.verification_token()
            .unwrap()
            .as_ref()
            .expose_secret()
            .clone()
    }

    #[test]
    fn registration_starts_pending_with_user_role() {
        let user = User::register(new_user(), VerificationToken::generate());
        assert_eq!(user.status(), UserStatus::PendingVerification);
        assert_eq!(user.roles(), &BTreeSet::from([Role::User]));
        assert_eq!(token_value(&user).len(), 64);
        assert!(user.pending_email().is_none());
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn wrong_token_leaves_state_untouched() {
        let mut user = User::register(new_user(), VerificationToken::generate());
        let token = user.verification_token().cloned();
        let updated_at = user.updated_at();

        assert_eq!(user.verify_email("deadbeef"), Err(UserError::TokenMismatch));
        assert_eq!(user.status(), UserStatus::PendingVerification);
        assert_eq!(user.verification_token().cloned(), token);
        assert_eq!(user.updated_at(), updated_at);
    }

    #[test]
    fn correct_token_activates_and_is_single_use() {
        let mut user = User::register(new_user(), VerificationToken::generate());
        let token = token_value(&user);

        user.verify_email(&token).unwrap();
        assert_eq!(user.status(), UserStatus::Active);
        assert!(user.verification_token().is_none());
        assert_eq!(user.verify_email(&token), Err(UserError::TokenMismatch));
    }

    #[test]
    fn email_change_is_promoted_on_verification() {
        let mut user = User::register(new_user(), VerificationToken::generate());
        let first = token_value(&user);
        user.verify_email(&first).unwrap();

        let new_email = EmailAddress::create("jane.new@example.com").unwrap();
        user.initiate_email_change(new_email.clone(), VerificationToken::generate());
        assert_eq!(user.status(), UserStatus::Active);
        assert_eq!(user.email(), &EmailAddress::create("jane@example.com").unwrap());
        assert_eq!(user.pending_email(), Some(&new_email));

        assert_eq!(user.verify_email(&first), Err(UserError::TokenMismatch));
        assert_eq!(user.pending_email(), Some(&new_email));

        let second = token_value(&user);
        user.verify_email(&second).unwrap();
        assert_eq!(user.email(), &new_email);
        assert!(user.pending_email().is_none());
        assert!(user.verification_token().is_none());
    }

    #[test]
    fn second_deactivation_fails() {
        let mut user = User::register(new_user(), VerificationToken::generate());
        user.deactivate().unwrap();
        assert_eq!(user.deactivate(), Err(UserError::AlreadyDeactivated));
        assert_eq!(user.status(), UserStatus::Deactivated);

        user.activate().unwrap();
        assert_eq!(user.status(), UserStatus::PendingVerification);
        assert!(user.verification_token().is_some());
    }

    #[test]
    fn activate_only_reverses_a_deactivation() {
        let mut user = User::register(new_user(), VerificationToken::generate());
        assert_eq!(user.activate(), Err(UserError::NotDeactivated));
        assert_eq!(user.status(), UserStatus::PendingVerification);

        let token = token_value(&user);
        user.verify_email(&token).unwrap();
        assert_eq!(user.activate(), Err(UserError::NotDeactivated));

        user.deactivate().unwrap();
        user.activate().unwrap();
        assert_eq!(user.status(), UserStatus::Active);
    }

    #[test]
    fn update_profile_revalidates_name() {
        let mut user = User::register(new_user(), VerificationToken::generate());
        assert_eq!(
            user.update_profile("1234"),
            Err(UserError::Validation(ValidationError::FullNameNotAlphabetic))
        );
        assert_eq!(user.full_name().as_str(), "Jane Doe");

        user.update_profile("Jane Smith").unwrap();
        assert_eq!(user.full_name().as_str(), "Jane Smith");
    }

    #[test]
    fn record_round_trip_preserves_pending_change() {
        let mut user = User::register(new_user(), VerificationToken::generate());
        user.initiate_email_change(
            EmailAddress::create("other@example.com").unwrap(),
            VerificationToken::generate(),
        );

        let restored = User::restore(user.to_record()).unwrap();
        assert_eq!(restored.pending_verification(), user.pending_verification());
        assert_eq!(restored.id(), user.id());
    }

    #[test]
    fn restore_rejects_pending_email_without_token() {
        let user = User::register(new_user(), VerificationToken::generate());
        let mut record = user.to_record();
        record.verification_token = None;
        record.pending_email = Some(EmailAddress::create("x@example.com").unwrap());

        assert!(matches!(
            User::restore(record),
            Err(UserError::CorruptRecord(_))
        ));
    }
}
