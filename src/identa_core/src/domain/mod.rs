pub mod audit_log;
pub mod email;
pub mod full_name;
pub mod password;
pub mod phone_number;
pub mod profile;
pub mod role;
pub mod user;
pub mod user_error;
pub mod user_id;
pub mod validation_error;
pub mod verification_token;
