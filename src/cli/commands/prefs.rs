use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::error::ClientError;
use crate::session::elevation::ElevationStore;
use crate::session::prefs::PreferencesStore;
use crate::session::SessionStore;
use crate::store::FileStore;

#[derive(Subcommand)]
pub enum PrefsCommands {
    #[command(about = "Set the UI theme")]
    Theme {
        #[arg(help = "Theme name, e.g. light or dark")]
        name: String,
    },

    #[command(about = "Turn a feature flag on or off (admin only)")]
    Flag {
        #[arg(help = "Flag name")]
        name: String,
        #[arg(value_parser = ["on", "off"], help = "Flag state")]
        state: String,
    },

    #[command(about = "Show current preferences")]
    Show,
}

pub async fn handle(cmd: PrefsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        PrefsCommands::Theme { name } => {
            let mut prefs = PreferencesStore::open(FileStore::open_default()?)?;
            prefs.set_theme(name.clone())?;
            output_success(
                &output_format,
                &format!("Theme set to '{}'", name),
                Some(json!({ "theme": name })),
            )
        }

        PrefsCommands::Flag { name, state } => {
            // Feature flags are company configuration: privileged role
            // plus a live elevation, checked on every invocation.
            let session = SessionStore::open(FileStore::open_default()?)?;
            let elevation = ElevationStore::open(FileStore::open_default()?)?;
            if let Err(err) = super::require_admin(&session, &elevation) {
                match &err {
                    ClientError::ElevationExpired => output_error(
                        &output_format,
                        "Admin elevation required: run 'ima auth elevate <username>'",
                        Some("RE_ELEVATE"),
                    )?,
                    _ => output_error(&output_format, &err.to_string(), Some("FORBIDDEN"))?,
                }
                return Err(err.into());
            }

            let enabled = state == "on";
            let mut prefs = PreferencesStore::open(FileStore::open_default()?)?;
            prefs.set_flag(name.clone(), enabled)?;
            output_success(
                &output_format,
                &format!("Flag '{}' turned {}", name, state),
                Some(json!({ "flag": name, "enabled": enabled })),
            )
        }

        PrefsCommands::Show => {
            let prefs = PreferencesStore::open(FileStore::open_default()?)?;
            let flags = prefs.flags();

            let flag_summary = if flags.is_empty() {
                "none".to_string()
            } else {
                let mut entries: Vec<String> = flags
                    .iter()
                    .map(|(name, enabled)| {
                        format!("{}={}", name, if *enabled { "on" } else { "off" })
                    })
                    .collect();
                entries.sort();
                entries.join(", ")
            };

            output_success(
                &output_format,
                &format!("Theme: {}, flags: {}", prefs.theme(), flag_summary),
                Some(json!({ "theme": prefs.theme(), "flags": flags })),
            )
        }
    }
}
