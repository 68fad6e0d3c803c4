// Library root
// -----------
// This crate exposes the stores and the menu controller behind the
// binary. `main.rs` only wires configuration, logging and a
// prompter together and hands them to `menu::App`.
//
// Module responsibilities:
// - `store`: one flat file of line records (load all / append / rewrite all).
// - `accounts`: system-access accounts (register, authenticate, change
//   password, list).
// - `credentials`: saved per-service credentials (add, list, search).
// - `validate`: field limits and the password strength policy.
// - `menu`: the Unauthenticated / Authenticated session loop.
// - `ui`: terminal and line-oriented prompters used by the menu.
// - `config`: where the two record files live.
pub mod accounts;
pub mod config;
pub mod credentials;
pub mod error;
pub mod menu;
pub mod store;
pub mod ui;
pub mod validate;

pub use accounts::{Account, AccountStore};
pub use config::StoreConfig;
pub use credentials::{Credential, CredentialStore};
pub use error::{ChangePasswordError, CredentialError, RegisterError, StoreError, ValidationError};
pub use validate::is_strong_password;
