// Menu controller: a two-state session that sequences the account and
// credential stores.
//
// Store and validation failures are reported once and control returns to the
// menu. Only prompter failures leave the loop, and running out of input ends
// the session normally.

use anyhow::Result;

use crate::accounts::AccountStore;
use crate::credentials::CredentialStore;
use crate::ui::{MenuInput, Prompter, Tone};

/// Where the foreground loop currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Unauthenticated,
    Authenticated { user: String },
}

// Outcome of one menu turn. `None` from a prompt means input ran out.
enum Step {
    Stay,
    Login(String),
    Logout,
    Quit,
}

const MAIN_TITLE: &str = "Simple Login System";
const MAIN_OPTIONS: &[(u32, &str)] = &[
    (1, "Register new user"),
    (2, "Login"),
    (3, "Change password"),
    (4, "Show all users (usernames only)"),
    (0, "Exit"),
];

const VAULT_OPTIONS: &[(u32, &str)] = &[
    (1, "Add credential"),
    (2, "List credentials"),
    (3, "Search by service"),
    (4, "Back (logout)"),
];

// Unwrap a prompt answer or end the session.
macro_rules! answer {
    ($prompt:expr) => {
        match $prompt? {
            Some(value) => value,
            None => return Ok(Step::Quit),
        }
    };
}

pub struct App<P> {
    accounts: AccountStore,
    credentials: CredentialStore,
    prompter: P,
}

impl<P: Prompter> App<P> {
    pub fn new(accounts: AccountStore, credentials: CredentialStore, prompter: P) -> Self {
        Self {
            accounts,
            credentials,
            prompter,
        }
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Run until the operator exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        self.prompter.say(
            Tone::Info,
            &format!(
                "Note: credentials are stored in plain text in '{}'.",
                self.accounts.path().display()
            ),
        )?;

        let mut session = Session::Unauthenticated;
        loop {
            let step = match &session {
                Session::Unauthenticated => self.main_turn()?,
                Session::Authenticated { user } => {
                    let user = user.clone();
                    self.vault_turn(&user)?
                }
            };
            session = match step {
                Step::Stay => session,
                Step::Login(user) => Session::Authenticated { user },
                Step::Logout => Session::Unauthenticated,
                Step::Quit => break,
            };
        }

        self.prompter.say(Tone::Info, "Exiting program. Goodbye!")?;
        Ok(())
    }

    fn main_turn(&mut self) -> Result<Step> {
        let choice = answer!(self.prompter.menu(MAIN_TITLE, MAIN_OPTIONS));
        match choice {
            MenuInput::Choice(1) => self.register(),
            MenuInput::Choice(2) => self.login(),
            MenuInput::Choice(3) => self.change_password(),
            MenuInput::Choice(4) => self.show_users(),
            MenuInput::Choice(0) => Ok(Step::Quit),
            _ => self.invalid_option(),
        }
    }

    fn vault_turn(&mut self, user: &str) -> Result<Step> {
        let title = format!("Credential Vault ({user})");
        let choice = answer!(self.prompter.menu(&title, VAULT_OPTIONS));
        match choice {
            MenuInput::Choice(1) => self.add_credential(),
            MenuInput::Choice(2) => self.list_credentials(),
            MenuInput::Choice(3) => self.search_credential(),
            MenuInput::Choice(4) => {
                self.prompter.say(Tone::Info, &format!("Logged out {user}."))?;
                Ok(Step::Logout)
            }
            _ => self.invalid_option(),
        }
    }

    fn invalid_option(&mut self) -> Result<Step> {
        self.prompter.say(Tone::Error, "Invalid option. Please try again.")?;
        Ok(Step::Stay)
    }

    fn register(&mut self) -> Result<Step> {
        let username = answer!(self.prompter.text("Enter username (no spaces)"));
        let password = answer!(self
            .prompter
            .secret("Enter password (no spaces, min 6 chars, must contain a digit)"));

        match self.accounts.register(&username, &password) {
            Ok(()) => self
                .prompter
                .say(Tone::Success, &format!("User '{username}' registered successfully!"))?,
            Err(e) => self.prompter.say(Tone::Error, &format!("Registration failed: {e}"))?,
        }
        Ok(Step::Stay)
    }

    fn login(&mut self) -> Result<Step> {
        let username = answer!(self.prompter.text("Enter username"));
        let password = answer!(self.prompter.secret("Enter password"));

        match self.accounts.authenticate(&username, &password) {
            Ok(true) => {
                self.prompter
                    .say(Tone::Success, &format!("Login successful! Welcome, {username}"))?;
                Ok(Step::Login(username))
            }
            Ok(false) => {
                self.prompter
                    .say(Tone::Error, "Login failed. Invalid username or password.")?;
                Ok(Step::Stay)
            }
            Err(e) => {
                self.prompter.say(Tone::Error, &format!("Login failed: {e}"))?;
                Ok(Step::Stay)
            }
        }
    }

    // The new password is only asked for once the current one checks out.
    fn change_password(&mut self) -> Result<Step> {
        let username = answer!(self.prompter.text("Enter username"));
        let old_password = answer!(self.prompter.secret("Enter current password"));

        match self.accounts.authenticate(&username, &old_password) {
            Ok(true) => {}
            Ok(false) => {
                self.prompter.say(
                    Tone::Error,
                    "Username or password incorrect. Cannot change password.",
                )?;
                return Ok(Step::Stay);
            }
            Err(e) => {
                self.prompter
                    .say(Tone::Error, &format!("Cannot change password: {e}"))?;
                return Ok(Step::Stay);
            }
        }

        let new_password = answer!(self
            .prompter
            .secret("Enter new password (min 6 chars, must contain a digit)"));
        let accounts = &self.accounts;
        let result = self.prompter.busy("Saving...", || {
            accounts.change_password(&username, &old_password, &new_password)
        });
        match result {
            Ok(()) => self.prompter.say(
                Tone::Success,
                &format!("Password changed successfully for user '{username}'."),
            )?,
            Err(e) => self
                .prompter
                .say(Tone::Error, &format!("Cannot change password: {e}"))?,
        }
        Ok(Step::Stay)
    }

    fn show_users(&mut self) -> Result<Step> {
        match self.accounts.list() {
            Ok(users) if users.is_empty() => {
                self.prompter.say(Tone::Info, "No users registered yet.")?
            }
            Ok(users) => {
                self.prompter.say(Tone::Info, "\n=== List of Registered Users ===")?;
                for (idx, user) in users.iter().enumerate() {
                    self.prompter.say(Tone::Info, &format!("{}. {user}", idx + 1))?;
                }
            }
            Err(e) => self
                .prompter
                .say(Tone::Error, &format!("Cannot list users: {e}"))?,
        }
        Ok(Step::Stay)
    }

    fn add_credential(&mut self) -> Result<Step> {
        let service = answer!(self.prompter.text("Service name"));
        let username = answer!(self.prompter.text("Username for the service"));
        let password = answer!(self.prompter.secret("Password for the service"));

        match self.credentials.add(&service, &username, &password) {
            Ok(()) => self
                .prompter
                .say(Tone::Success, &format!("Credential for '{}' saved.", service.trim()))?,
            Err(e) => self
                .prompter
                .say(Tone::Error, &format!("Cannot save credential: {e}"))?,
        }
        Ok(Step::Stay)
    }

    fn list_credentials(&mut self) -> Result<Step> {
        match self.credentials.list() {
            Ok(creds) if creds.is_empty() => {
                self.prompter.say(Tone::Info, "No credentials saved yet.")?
            }
            Ok(creds) => {
                self.prompter.say(Tone::Info, "\n=== Saved Credentials ===")?;
                self.prompter.say(
                    Tone::Info,
                    &format!("{:<20} {:<20} {}", "Service", "Username", "Password"),
                )?;
                for cred in &creds {
                    self.prompter.say(
                        Tone::Info,
                        &format!("{:<20} {:<20} {}", cred.service, cred.username, cred.password),
                    )?;
                }
            }
            Err(e) => self
                .prompter
                .say(Tone::Error, &format!("Cannot list credentials: {e}"))?,
        }
        Ok(Step::Stay)
    }

    fn search_credential(&mut self) -> Result<Step> {
        let service = answer!(self.prompter.text("Service to search for"));

        match self.credentials.find_by_service(service.trim()) {
            Ok(Some(cred)) => self.prompter.say(
                Tone::Success,
                &format!(
                    "Service: {}\nUsername: {}\nPassword: {}",
                    cred.service, cred.username, cred.password
                ),
            )?,
            Ok(None) => self
                .prompter
                .say(Tone::Error, &format!("No credential found for '{}'.", service.trim()))?,
            Err(e) => self
                .prompter
                .say(Tone::Error, &format!("Search failed: {e}"))?,
        }
        Ok(Step::Stay)
    }
}
