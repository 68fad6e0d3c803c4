use std::fs;
use std::io::Cursor;

use passkeep_cli::menu::App;
use passkeep_cli::ui::LinePrompter;
use passkeep_cli::{AccountStore, CredentialStore};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn accounts(&self) -> AccountStore {
        AccountStore::new(self.dir.path().join("users.txt"))
    }

    fn credentials(&self) -> CredentialStore {
        CredentialStore::new(self.dir.path().join("credentials.txt"))
    }

    fn run(&self, script: &[&str]) -> String {
        let mut input = script.join("\n");
        input.push('\n');
        let prompter = LinePrompter::new(Cursor::new(input), Vec::new());
        let mut app = App::new(self.accounts(), self.credentials(), prompter);
        app.run().unwrap();
        String::from_utf8(app.into_prompter().into_output()).unwrap()
    }
}

#[test]
fn register_login_and_manage_credentials() {
    let fx = Fixture::new();
    let out = fx.run(&[
        "1", "alice", "secret1", // register
        "2", "alice", "secret1", // login
        "1", "Mail", "bob", "pw1", // add
        "1", "Online Bank", "alice", "hunter 22", // add, spaces allowed
        "2",               // list
        "3", "Mail",       // search hit
        "3", "Nowhere",    // search miss
        "4",               // back
        "0",
    ]);

    assert!(out.contains("User 'alice' registered successfully!"));
    assert!(out.contains("Login successful! Welcome, alice"));
    assert!(out.contains("===== Credential Vault (alice) ====="));
    assert!(out.contains("Credential for 'Online Bank' saved."));
    assert!(out.contains("Service: Mail\nUsername: bob\nPassword: pw1"));
    assert!(out.contains("No credential found for 'Nowhere'."));
    assert!(out.contains("Logged out alice."));
    assert!(out.ends_with("Exiting program. Goodbye!\n"));

    let creds = fx.credentials().list().unwrap();
    assert_eq!(creds.len(), 2);
    assert_eq!(creds[1].service, "Online Bank");
    assert_eq!(creds[1].password, "hunter 22");
}

#[test]
fn credential_menu_requires_login() {
    let fx = Fixture::new();
    let out = fx.run(&["2", "alice", "secret1", "0"]);

    assert!(out.contains("Login failed. Invalid username or password."));
    assert!(!out.contains("Credential Vault"));
    assert!(!fx.dir.path().join("credentials.txt").exists());
}

#[test]
fn change_password_through_menu() {
    let fx = Fixture::new();
    fx.accounts().register("bob", "hunter22").unwrap();
    let out = fx.run(&[
        "1", "alice", "secret1",
        "3", "alice", "secret1", "fresh99",
        "4",
        "0",
    ]);

    assert!(out.contains("Password changed successfully for user 'alice'."));
    assert!(out.contains("1. bob\n2. alice\n"));
    assert!(!out.contains("secret1"));

    let accounts = fx.accounts();
    assert!(!accounts.authenticate("alice", "secret1").unwrap());
    assert!(accounts.authenticate("alice", "fresh99").unwrap());
    assert!(accounts.authenticate("bob", "hunter22").unwrap());
}

#[test]
fn errors_are_reported_and_loop_continues() {
    let fx = Fixture::new();
    let out = fx.run(&[
        "1", "alice", "weak",      // weak password
        "1", "alice", "secret1",
        "1", "alice", "secret2",   // duplicate
        "4",
        "0",
    ]);

    assert!(out.contains("Registration failed: weak password"));
    assert!(out.contains("Registration failed: username 'alice' already exists"));
    assert_eq!(fx.accounts().list().unwrap(), vec!["alice".to_string()]);
}

#[test]
fn malformed_store_is_reported_not_fatal() {
    let fx = Fixture::new();
    fs::write(fx.dir.path().join("users.txt"), "just-one-token\n").unwrap();
    let out = fx.run(&["4", "0"]);

    assert!(out.contains("Cannot list users: malformed record"));
    assert!(out.contains("Goodbye"));
    assert_eq!(
        fs::read_to_string(fx.dir.path().join("users.txt")).unwrap(),
        "just-one-token\n"
    );
}

#[test]
fn unreadable_store_is_reported_not_fatal() {
    let fx = Fixture::new();
    let users_dir = fx.dir.path().join("users_dir");
    fs::create_dir(&users_dir).unwrap();

    let prompter = LinePrompter::new(Cursor::new("4\n1\nalice\nsecret1\n0\n"), Vec::new());
    let mut app = App::new(AccountStore::new(&users_dir), fx.credentials(), prompter);
    app.run().unwrap();
    let out = String::from_utf8(app.into_prompter().into_output()).unwrap();

    assert!(out.contains("Cannot list users: cannot access"));
    assert!(out.contains("Registration failed: cannot access"));
    assert!(out.ends_with("Exiting program. Goodbye!\n"));
    assert!(users_dir.is_dir());
}

#[test]
fn empty_listings() {
    let fx = Fixture::new();
    fx.accounts().register("alice", "secret1").unwrap();
    let out = fx.run(&["4", "2", "alice", "secret1", "2", "4", "0"]);

    assert!(out.contains("1. alice"));
    assert!(out.contains("No credentials saved yet."));
}
