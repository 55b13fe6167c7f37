pub mod authenticate_user;
pub mod change_email;
pub mod delete_account;
pub mod register_user;
pub mod set_account_status;
pub mod update_profile;
pub mod verify_email;
pub mod view_profile;

pub use authenticate_user::{AuthenticateUserInput, AuthenticateUserUseCase, AuthenticatedUser};
pub use change_email::{ChangeEmailInput, ChangeEmailUseCase};
pub use delete_account::{DeleteAccountInput, DeleteAccountUseCase};
pub use register_user::{RegisterUserInput, RegisterUserUseCase};
pub use set_account_status::{SetAccountStatusInput, SetAccountStatusUseCase, StatusChange};
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};
pub use verify_email::{VerifyEmailInput, VerifyEmailUseCase};
pub use view_profile::{ViewProfileInput, ViewProfileUseCase};
