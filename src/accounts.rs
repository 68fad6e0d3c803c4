// Account store: the system-access accounts an operator logs in with.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{ChangePasswordError, RegisterError, StoreError};
use crate::store::{Record, RecordFile};
use crate::validate::{check_password, check_present, check_token};

/// One registered account. Usernames are unique within a store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Record for Account {
    const FIELDS: usize = 2;

    fn from_tokens(tokens: &[&str]) -> Option<Self> {
        match tokens {
            [username, password] => Some(Account {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => None,
        }
    }
}

/// Handle on the account file.
#[derive(Debug, Clone)]
pub struct AccountStore {
    file: RecordFile<Account>,
}

impl AccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: RecordFile::new(path),
        }
    }

    pub fn open(config: &StoreConfig) -> Self {
        Self::new(&config.accounts_path)
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    /// Validate and append a new account. Existing lines are never rewritten.
    pub fn register(&self, username: &str, password: &str) -> Result<(), RegisterError> {
        check_present(&[("username", username), ("password", password)])?;
        check_token("username", username)?;
        check_password(password)?;

        if self.file.find(|a| a.username == username)?.is_some() {
            return Err(RegisterError::DuplicateUsername(username.to_string()));
        }

        self.file.append(&Account {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        info!(%username, "registered account");
        Ok(())
    }

    /// True on the first record matching both fields exactly.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        let found = self
            .file
            .find(|a| a.username == username && a.password == password)?
            .is_some();
        debug!(%username, success = found, "authentication attempt");
        Ok(found)
    }

    /// Replace the password of the account matching `username` and
    /// `old_password`, then rewrite the file with every other line unchanged.
    ///
    /// If several records match, the last one in file order is updated.
    /// Registration never produces such duplicates, so this only matters for
    /// files edited by hand.
    pub fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ChangePasswordError> {
        let mut entries = self.file.load()?;
        let index = entries
            .iter()
            .rposition(|e| e.record().username == username && e.record().password == old_password)
            .ok_or(ChangePasswordError::NotFound)?;

        check_password(new_password)?;

        entries[index].replace(Account {
            username: username.to_string(),
            password: new_password.to_string(),
        })?;
        self.file.rewrite(&entries)?;
        info!(%username, "changed account password");
        Ok(())
    }

    /// Usernames in file order. Passwords are not returned.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.file.records()?.into_iter().map(|a| a.username).collect())
    }
}
