use std::path::PathBuf;

use clap::Args as ClapArgs;
use miette::IntoDiagnostic as _;

use crate::api::{ApiClient, ScanReport};
use crate::config::RootConfig;
use crate::render;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Task id
    pub id: String,

    /// Write the raw report JSON to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: Args, config: &RootConfig) -> miette::Result<()> {
    let client = ApiClient::new(&config.server.base_url, config.http_timeout())?;

    let task = client.get_task(&args.id).await?;

    if !task.report_ready() {
        miette::bail!(
            help = "only completed scans have a stored report; check progress with 'scanq show'",
            "no report stored for task {} (status: {})",
            task.id,
            render::status_label(&task.status)
        );
    }

    let bytes = client.download_report(&task.id).await?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &bytes).into_diagnostic()?;
            println!("Report written to {}", path.display());

            if let Ok(report) = serde_json::from_slice::<ScanReport>(&bytes) {
                println!("Full report: {}", report.deep_link());
            }
        }
        None => {
            // Raw JSON only, so the output stays pipeable.
            let text = String::from_utf8(bytes).into_diagnostic()?;
            println!("{text}");
        }
    }

    Ok(())
}
