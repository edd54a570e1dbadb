use std::io::Write;

use clap::Args;
use vastrakala_core::{Email, Identity};
use vastrakala_storefront::AppState;
use vastrakala_storefront::api::LoginCredentials;

use crate::error::CliError;

#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    email: String,

    /// Display name
    #[arg(short, long)]
    name: String,

    /// Subject id issued by the identity provider
    #[arg(long)]
    google_id: String,

    /// Avatar URL
    #[arg(long)]
    picture: Option<String>,
}

pub async fn login(state: &AppState, out: &mut impl Write, args: LoginArgs) -> Result<(), CliError> {
    let email = Email::parse(&args.email)?;
    let mut credentials = LoginCredentials::new(email, args.name, args.google_id);
    if let Some(picture) = args.picture {
        credentials = credentials.with_picture(picture);
    }

    let user = state.login(&credentials).await?;
    writeln!(out, "Signed in as {} <{}>", user.name, user.email)?;
    let cart = state.cart();
    writeln!(out, "{} item(s) in your cart", cart.count())?;
    Ok(())
}

pub async fn logout(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    if state.identity().is_guest() {
        writeln!(out, "Not signed in")?;
        return Ok(());
    }
    state.logout().await;
    writeln!(out, "Signed out")?;
    Ok(())
}

pub fn whoami(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    match state.identity() {
        Identity::Guest => writeln!(out, "guest")?,
        Identity::Authenticated(user) => {
            writeln!(out, "{} <{}>", user.name, user.email)?;
            writeln!(out, "id: {}", user.id)?;
        }
    }
    Ok(())
}
