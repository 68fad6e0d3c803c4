// Credential store: saved (service, username, password) triples.
// Append-only; a service may appear more than once.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::StoreConfig;
use crate::error::{CredentialError, StoreError};
use crate::store::{Record, RecordFile};
use crate::validate::check_field;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub service: String,
    pub username: String,
    pub password: String,
}

impl Record for Credential {
    const FIELDS: usize = 3;

    fn from_tokens(tokens: &[&str]) -> Option<Self> {
        match tokens {
            [service, username, password] => Some(Credential {
                service: service.to_string(),
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    file: RecordFile<Credential>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: RecordFile::new(path),
        }
    }

    pub fn open(config: &StoreConfig) -> Self {
        Self::new(&config.credentials_path)
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    /// Trim and validate the three fields, then append them. Spaces inside a
    /// field are kept.
    pub fn add(&self, service: &str, username: &str, password: &str) -> Result<(), CredentialError> {
        let (service, username, password) = (service.trim(), username.trim(), password.trim());
        check_field("service", service)?;
        check_field("username", username)?;
        check_field("password", password)?;

        self.file.append(&Credential {
            service: service.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })?;
        info!(%service, "saved credential");
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Credential>, StoreError> {
        self.file.records()
    }

    /// First credential whose service matches exactly (case-sensitive).
    pub fn find_by_service(&self, service: &str) -> Result<Option<Credential>, StoreError> {
        self.file.find(|c| c.service == service)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::error::ValidationError;

    fn store(dir: &TempDir) -> CredentialStore {
        CredentialStore::new(dir.path().join("credentials.txt"))
    }

    fn cred(service: &str, username: &str, password: &str) -> Credential {
        Credential {
            service: service.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn add_then_find() {
        let dir = TempDir::new().unwrap();
        let creds = store(&dir);
        creds.add("Mail", "bob", "pw1").unwrap();

        assert_eq!(creds.find_by_service("Mail").unwrap(), Some(cred("Mail", "bob", "pw1")));
        assert_eq!(creds.find_by_service("mail").unwrap(), None);
    }

    #[test]
    fn first_match_wins() {
        let dir = TempDir::new().unwrap();
        let creds = store(&dir);
        creds.add("Mail", "bob", "pw1").unwrap();
        creds.add("Mail", "alice", "pw2").unwrap();

        assert_eq!(creds.find_by_service("Mail").unwrap().unwrap().username, "bob");
        assert_eq!(creds.list().unwrap().len(), 2);
    }

    #[test]
    fn missing_service_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let creds = store(&dir);
        assert_eq!(creds.find_by_service("Bank").unwrap(), None);
        assert!(!creds.path().exists());

        creds.add("Mail", "bob", "pw1").unwrap();
        let before = fs::read_to_string(creds.path()).unwrap();
        assert_eq!(creds.find_by_service("Bank").unwrap(), None);
        assert_eq!(fs::read_to_string(creds.path()).unwrap(), before);
    }

    #[test]
    fn fields_are_trimmed_and_may_hold_spaces() {
        let dir = TempDir::new().unwrap();
        let creds = store(&dir);
        creds.add("  Online Bank ", " bob ", "correct horse 1 ").unwrap();

        assert_eq!(
            creds.list().unwrap(),
            vec![cred("Online Bank", "bob", "correct horse 1")]
        );
    }

    #[test]
    fn blank_fields_are_rejected() {
        let dir = TempDir::new().unwrap();
        let creds = store(&dir);

        assert!(matches!(
            creds.add("Mail", "   ", "pw1"),
            Err(CredentialError::Invalid(ValidationError::EmptyField { field: "username" }))
        ));
        assert!(matches!(
            creds.add(&"s".repeat(80), "bob", "pw1"),
            Err(CredentialError::Invalid(ValidationError::TooLong { field: "service", .. }))
        ));
        assert!(creds.list().unwrap().is_empty());
    }

    #[test]
    fn legacy_service_starting_with_brace() {
        let dir = TempDir::new().unwrap();
        let creds = store(&dir);
        fs::write(creds.path(), "{work} bob pw1\nMail bob pw2\n").unwrap();

        assert_eq!(
            creds.list().unwrap(),
            vec![cred("{work}", "bob", "pw1"), cred("Mail", "bob", "pw2")]
        );
        assert_eq!(creds.find_by_service("Mail").unwrap(), Some(cred("Mail", "bob", "pw2")));
        assert_eq!(creds.find_by_service("{work}").unwrap(), Some(cred("{work}", "bob", "pw1")));
    }

    #[test]
    fn reads_legacy_records() {
        let dir = TempDir::new().unwrap();
        let creds = store(&dir);
        fs::write(creds.path(), "Mail bob pw1\nBank carol pw2\n").unwrap();

        assert_eq!(
            creds.list().unwrap(),
            vec![cred("Mail", "bob", "pw1"), cred("Bank", "carol", "pw2")]
        );
    }
}
