// Entrypoint for the CLI application.
// - Keeps `main` small: resolve the store paths, set up logging, pick a
//   prompter and hand everything to the menu loop.
// - Logs go to stderr so they never mix with the menus on stdout.

use std::io::{self, IsTerminal};

use passkeep_cli::menu::App;
use passkeep_cli::ui::{LinePrompter, TerminalPrompter};
use passkeep_cli::{AccountStore, CredentialStore, StoreConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // `RUST_LOG` overrides the default of warnings only.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = StoreConfig::from_env();
    tracing::debug!(?config, "resolved store paths");
    let accounts = AccountStore::open(&config);
    let credentials = CredentialStore::open(&config);

    // Interactive menus on a terminal, plain numbered prompts otherwise.
    if io::stdin().is_terminal() {
        App::new(accounts, credentials, TerminalPrompter).run()?;
    } else {
        let prompter = LinePrompter::new(io::stdin().lock(), io::stdout());
        App::new(accounts, credentials, prompter).run()?;
    }
    Ok(())
}
