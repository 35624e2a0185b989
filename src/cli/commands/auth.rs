use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::auth;
use crate::cli::utils::{output_error, output_success, resolve_password};
use crate::cli::OutputFormat;
use crate::client::{AuthApi, Credentials, HttpAuthApi};
use crate::config;
use crate::error::ClientError;
use crate::session::company::CompanyStore;
use crate::session::elevation::ElevationStore;
use crate::session::{Role, SessionStore};
use crate::store::FileStore;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the IMA backend")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Re-verify credentials for time-boxed admin access")]
    Elevate {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Clear session, elevation and company selection")]
    Logout,

    #[command(about = "Show current session and elevation status")]
    Status,

    #[command(about = "Show current user information from the server")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = resolve_password(password)?;
            let api = HttpAuthApi::from_config()?;
            let mut session = SessionStore::open(FileStore::open_default()?)?;
            let mut company = CompanyStore::open(FileStore::open_default()?)?;
            let retry_delay = config::config().security.login_retry_delay();

            let credentials = Credentials::new(username, password);
            let profile =
                auth::login(&api, &mut session, &mut company, &credentials, retry_delay).await?;

            output_success(
                &output_format,
                &format!("Logged in as '{}'", profile.username),
                Some(json!({
                    "role": session.role().map(|r| r.as_str()),
                    "company": company.current().map(|c| c.name.clone()),
                })),
            )
        }

        AuthCommands::Elevate { username, password } => {
            let password = resolve_password(password)?;
            let api = HttpAuthApi::from_config()?;
            let mut session = SessionStore::open(FileStore::open_default()?)?;
            let mut elevation = ElevationStore::open(FileStore::open_default()?)?;
            let security = &config::config().security;

            let credentials = Credentials::new(username, password);
            let until = auth::elevated_login(
                &api,
                &mut session,
                &mut elevation,
                &credentials,
                security.login_retry_delay(),
                security.elevation_window(),
            )
            .await?;

            output_success(
                &output_format,
                &format!("Admin elevation granted until {}", until.to_rfc3339()),
                Some(json!({ "valid_until": until })),
            )
        }

        AuthCommands::Logout => {
            let mut session = SessionStore::open(FileStore::open_default()?)?;
            let mut elevation = ElevationStore::open(FileStore::open_default()?)?;
            let mut company = CompanyStore::open(FileStore::open_default()?)?;
            auth::logout(&mut session, &mut elevation, &mut company)?;

            output_success(&output_format, "Logged out", None)
        }

        AuthCommands::Status => {
            let session = SessionStore::open(FileStore::open_default()?)?;
            let elevation = ElevationStore::open(FileStore::open_default()?)?;
            let company = CompanyStore::open(FileStore::open_default()?)?;

            let elevation_remaining_secs = elevation
                .valid_until()
                .filter(|until| *until > Utc::now())
                .map(|until| (until - Utc::now()).num_seconds());

            output_success(
                &output_format,
                if session.is_authenticated() {
                    "Session active"
                } else {
                    "No active session"
                },
                Some(json!({
                    "authenticated": session.is_authenticated(),
                    "username": session.user().map(|u| u.username.clone()),
                    "role": session.role().map(|r| r.as_str()),
                    "company": company.current().map(|c| c.name.clone()),
                    "elevated": elevation.is_valid(),
                    "elevation_remaining_secs": elevation_remaining_secs,
                })),
            )
        }

        AuthCommands::Whoami => {
            let session = SessionStore::open(FileStore::open_default()?)?;
            // Any authenticated role may ask who it is; the guard still
            // runs so an anonymous invocation is turned away like any
            // other protected region.
            if let Err(err) = super::require_role(&session, &Role::ALL) {
                output_error(&output_format, &err.to_string(), Some("UNAUTHENTICATED"))?;
                return Err(err.into());
            }
            let token = session
                .token()
                .ok_or(ClientError::Unauthenticated)?
                .to_string();

            let api = HttpAuthApi::from_config()?;
            let who = api.whoami(&token).await?;

            output_success(
                &output_format,
                &format!("Authenticated as '{}' ({})", who.username, who.role),
                Some(json!({
                    "id": who.id,
                    "username": who.username,
                    "email": who.email,
                    "role": who.role.as_str(),
                })),
            )
        }
    }
}
