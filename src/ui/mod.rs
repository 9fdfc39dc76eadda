pub mod dashboard;
pub mod dialogs;
pub mod form_field;
pub mod home;
pub mod keybindings;
pub mod login;
pub mod paginated_list;
pub mod profile;
pub mod terminal_guard;
pub mod wizard;

pub use dashboard::{DashboardAction, DashboardScreen};
pub use dialogs::{ConfirmDialog, ConfirmOutcome, HelpDialog};
pub use home::{HomeAction, HomeScreen};
pub use login::{LoginAction, LoginScreen};
pub use profile::{ProfileAction, ProfileScreen};
pub use wizard::{WizardAction, WizardScreen};
