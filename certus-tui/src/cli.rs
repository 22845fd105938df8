use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "certus")]
#[command(about = "Terminal time clock: clock in, clock out, review monthly hours")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the hosted backend (default)
    Run,
    /// Run with an in-memory ledger and seeded history, no network
    Dev,
    /// Sign in on the terminal and store the session
    Login,
    /// Sign out and remove the stored session
    Logout,
    /// Print config path and create default file if missing
    ConfigPath,
}

impl Cli {
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Run)
    }
}
