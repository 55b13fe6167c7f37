use thiserror::Error;

/// Rejection reasons raised by the value-object smart constructors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email format")]
    InvalidEmailFormat,
    #[error("Email domain is not allowed: {0}")]
    BlacklistedEmailDomain(String),
    #[error("Phone number is required")]
    PhoneRequired,
    #[error("Unsupported phone number country: {0}")]
    UnsupportedCountry(String),
    #[error("Invalid {country} phone number length")]
    InvalidPhoneLength { country: &'static str },
    #[error("Invalid {country} operator prefix")]
    InvalidOperatorPrefix { country: &'static str },
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
    #[error(
        "Password must include at least 3 of 4 categories: uppercase, lowercase, digits, symbols"
    )]
    PasswordTooWeak,
    #[error("Full name must be between {min} and {max} characters")]
    FullNameLength { min: usize, max: usize },
    #[error("Full name cannot contain only symbols or digits")]
    FullNameNotAlphabetic,
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),
    #[error("Invalid verification token")]
    InvalidVerificationToken,
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    #[error("Unknown account status: {0}")]
    UnknownStatus(String),
}
