pub mod authorization;
pub mod error;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use authorization::{Access, authorize};
pub use error::{AccountError, ErrorKind, Identifier};
pub use use_cases::*;
