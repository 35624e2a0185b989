use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::session::company::CompanyStore;
use crate::store::FileStore;

#[derive(Subcommand)]
pub enum CompanyCommands {
    #[command(about = "Show the currently selected company")]
    Show,

    #[command(about = "Clear the company selection")]
    Clear,
}

pub async fn handle(cmd: CompanyCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        CompanyCommands::Show => {
            let company = CompanyStore::open(FileStore::open_default()?)?;
            match company.current() {
                Some(current) => output_success(
                    &output_format,
                    &format!("Current company: {}", current.name),
                    Some(json!({
                        "id": current.id,
                        "name": current.name,
                        "primary_color": current.branding.primary_color,
                        "logo_url": current.branding.logo_url,
                    })),
                ),
                None => output_success(&output_format, "No company selected", None),
            }
        }

        CompanyCommands::Clear => {
            let mut company = CompanyStore::open(FileStore::open_default()?)?;
            company.clear()?;
            output_success(&output_format, "Company selection cleared", None)
        }
    }
}
