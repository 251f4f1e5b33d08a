//! Authentication commands.

use std::io::Write as _;

use secrecy::SecretString;

use campus_client::require_authenticated;
use campus_client::services::AuthService;
use campus_core::Role;

use super::{CommandError, Context};

fn auth_service(ctx: &Context) -> AuthService {
    AuthService::new(
        ctx.http.clone(),
        ctx.config.users_url.clone(),
        ctx.session.clone(),
    )
}

/// Prompt for a password without echoing concerns beyond the terminal's own.
fn read_password() -> Result<SecretString, CommandError> {
    eprint!("Password: ");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| CommandError::InvalidArgument(format!("could not read password: {e}")))?;
    Ok(SecretString::from(line.trim_end().to_owned()))
}

/// Log in and persist the issued credential.
pub async fn login(ctx: &Context, username: &str) -> Result<(), CommandError> {
    let password = read_password()?;
    let identity = auth_service(ctx).login(username, &password).await?;
    println!(
        "Logged in as subject {} ({})",
        identity.claims.subject_id, identity.claims.role
    );
    Ok(())
}

/// Register a new user and log in with the returned credential.
pub async fn register(
    ctx: &Context,
    username: &str,
    email: &str,
    role: &str,
) -> Result<(), CommandError> {
    let role = Role::parse(role).map_err(|e| CommandError::InvalidArgument(e.to_string()))?;
    let password = read_password()?;
    let identity = auth_service(ctx)
        .register(username, email, &password, role)
        .await?;
    println!(
        "Registered and logged in as subject {} ({})",
        identity.claims.subject_id, identity.claims.role
    );
    Ok(())
}

/// Drop the session and the persisted record together.
pub fn logout(ctx: &Context) -> Result<(), CommandError> {
    auth_service(ctx).logout()?;
    println!("Logged out.");
    Ok(())
}

/// Show the current identity.
pub fn whoami(ctx: &Context) -> Result<(), CommandError> {
    let session = ctx.session.current();
    ctx.enforce(require_authenticated(&session))?;

    // enforce() already rejected the unauthenticated case.
    if let Some(identity) = &session.identity {
        println!(
            "subject {} role {}",
            identity.claims.subject_id, identity.claims.role
        );
        if let Some(expires_at) = identity.claims.expires_at {
            // Shown for information only; expiry is not enforced client-side.
            println!("credential expires at {expires_at}");
        }
    }
    Ok(())
}
