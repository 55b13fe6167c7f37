use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use identa_core::{
    AccountStore, AccountStoreError, Country, EmailAddress, FullName, Password, PhoneNumber, Role,
    User, UserId, UserRecord, UserStatus, VerificationToken,
};
use secrecy::{ExposeSecret, Secret};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const EMAIL_CONSTRAINT: &str = "accounts_email_key";
const PHONE_CONSTRAINT: &str = "accounts_phone_key";

const SELECT_ACCOUNT: &str = r#"
    SELECT id, full_name, email, phone, password_hash, status, roles,
           terms_version, privacy_version, verification_token, pending_email,
           created_at, updated_at
    FROM accounts
"#;

pub struct PostgresAccountStore {
    pool: sqlx::PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresAccountStore { pool }
    }

    async fn find_one(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<User>, AccountStoreError> {
        let sql = format!("{SELECT_ACCOUNT} WHERE {column} = $1");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }
}

#[async_trait::async_trait]
impl AccountStore for PostgresAccountStore {
    #[tracing::instrument(name = "Saving account to PostgreSQL", skip_all)]
    async fn save(&self, user: &User) -> Result<(), AccountStoreError> {
        let record = user.to_record();
        let roles: Vec<&str> = record.roles.iter().map(Role::as_str).collect();

        let query = sqlx::query(
            r#"
                INSERT INTO accounts (
                    id, full_name, email, phone, password_hash, status, roles,
                    terms_version, privacy_version, verification_token, pending_email,
                    created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                ON CONFLICT (id) DO UPDATE SET
                    full_name = EXCLUDED.full_name,
                    email = EXCLUDED.email,
                    phone = EXCLUDED.phone,
                    password_hash = EXCLUDED.password_hash,
                    status = EXCLUDED.status,
                    roles = EXCLUDED.roles,
                    terms_version = EXCLUDED.terms_version,
                    privacy_version = EXCLUDED.privacy_version,
                    verification_token = EXCLUDED.verification_token,
                    pending_email = EXCLUDED.pending_email,
                    updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.full_name.as_str())
        .bind(record.email.as_ref().expose_secret())
        .bind(record.phone.as_ref().expose_secret())
        .bind(record.password.hashed_value().expose_secret())
        .bind(record.status.as_str())
        .bind(&roles)
        .bind(&record.terms_version)
        .bind(&record.privacy_version)
        .bind(
            record
                .verification_token
                .as_ref()
                .map(|token| token.as_ref().expose_secret()),
        )
        .bind(
            record
                .pending_email
                .as_ref()
                .map(|email| email.as_ref().expose_secret()),
        )
        .bind(record.created_at)
        .bind(record.updated_at);

        query.execute(&self.pool).await.map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                match db_err.constraint() {
                    Some(EMAIL_CONSTRAINT) => return AccountStoreError::DuplicateEmail,
                    Some(PHONE_CONSTRAINT) => return AccountStoreError::DuplicatePhone,
                    _ => {}
                }
            }
            AccountStoreError::UnexpectedError(e.to_string())
        })?;

        Ok(())
    }

    #[tracing::instrument(name = "Retrieving account by id from PostgreSQL", skip_all)]
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountStoreError> {
        let sql = format!("{SELECT_ACCOUNT} WHERE id = $1");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    #[tracing::instrument(name = "Retrieving account by email from PostgreSQL", skip_all)]
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, AccountStoreError> {
        self.find_one("email", email.as_ref().expose_secret()).await
    }

    #[tracing::instrument(name = "Retrieving account by phone from PostgreSQL", skip_all)]
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<User>, AccountStoreError> {
        self.find_one("phone", phone.as_ref().expose_secret()).await
    }

    #[tracing::instrument(name = "Deleting account from PostgreSQL", skip_all)]
    async fn delete(&self, id: &UserId) -> Result<(), AccountStoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountStoreError::AccountNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Listing accounts from PostgreSQL", skip_all)]
    async fn find_all(&self, limit: usize, offset: usize) -> Result<Vec<User>, AccountStoreError> {
        let sql = format!("{SELECT_ACCOUNT} ORDER BY created_at, id LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AccountStoreError::UnexpectedError(e.to_string()))?;

        rows.into_iter().map(User::try_from).collect()
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    full_name: String,
    email: String,
    phone: String,
    password_hash: String,
    status: String,
    roles: Vec<String>,
    terms_version: String,
    privacy_version: String,
    verification_token: Option<String>,
    pending_email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for User {
    type Error = AccountStoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let corrupt = |e: &dyn std::fmt::Display| {
            AccountStoreError::UnexpectedError(format!("corrupt account {}: {e}", row.id))
        };

        let roles: BTreeSet<Role> = row
            .roles
            .iter()
            .map(|role| role.parse::<Role>())
            .collect::<Result<_, _>>()
            .map_err(|e| corrupt(&e))?;
        let verification_token = row
            .verification_token
            .as_deref()
            .map(VerificationToken::parse)
            .transpose()
            .map_err(|e| corrupt(&e))?;
        let pending_email = row
            .pending_email
            .as_deref()
            .map(EmailAddress::create)
            .transpose()
            .map_err(|e| corrupt(&e))?;

        let record = UserRecord {
            id: UserId::from(row.id),
            full_name: FullName::parse(&row.full_name).map_err(|e| corrupt(&e))?,
            email: EmailAddress::try_from(Secret::from(row.email))
                .map_err(|e| corrupt(&e))?,
            phone: PhoneNumber::create(&row.phone, Country::default()).map_err(|e| corrupt(&e))?,
            password: Password::from_hashed(Secret::from(row.password_hash)),
            status: row.status.parse::<UserStatus>().map_err(|e| corrupt(&e))?,
            roles,
            terms_version: row.terms_version,
            privacy_version: row.privacy_version,
            verification_token,
            pending_email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        User::restore(record).map_err(|e| corrupt(&e))
    }
}
