use anyhow::{Context, Result};
use certus_ledger::domain::AuthSession;
use certus_ledger::AuthClient;
use std::io::{self, BufRead, Write};

/// Prompt for email and password on the terminal, sign in and store the session.
pub async fn run_login(auth: &AuthClient) -> Result<AuthSession> {
    print!("Email: ");
    io::stdout().flush()?;
    let mut email = String::new();
    io::stdin()
        .lock()
        .read_line(&mut email)
        .context("Failed to read email")?;
    let email = email.trim();
    if email.is_empty() {
        anyhow::bail!("Email is required");
    }

    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    let session = auth
        .sign_in_with_password(email, &password)
        .await
        .context("Sign-in failed")?;

    crate::session_store::save_session(&session)?;
    println!(
        "Signed in as {}. Session saved.",
        session.user.email.as_deref().unwrap_or(email)
    );

    Ok(session)
}
