pub mod email_notifier;
pub mod mock_email_client;
pub mod postmark_email_client;

pub use email_notifier::EmailNotifier;
pub use mock_email_client::{MockEmailClient, SentEmail};
pub use postmark_email_client::{PostmarkEmailClient, PostmarkError};
