use std::path::PathBuf;

use clap::Args as ClapArgs;
use inquire::Text;
use miette::IntoDiagnostic as _;
use tracing::debug;

use crate::api::ApiClient;
use crate::config::RootConfig;
use crate::render;
use crate::upload::UploadForm;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// PDF file to scan
    pub file: PathBuf,

    /// Description of the document; prompted for when omitted
    #[arg(long, short)]
    pub description: Option<String>,
}

pub async fn run(args: Args, config: &RootConfig) -> miette::Result<()> {
    let mut form = UploadForm::new();

    form.select_file(&args.file)?;

    let description = match args.description {
        Some(text) => text,
        None => Text::new("Description:").prompt().into_diagnostic()?,
    };
    form.set_description(description);

    let pending = form.validate()?;

    let bytes = std::fs::read(&pending.path).into_diagnostic()?;
    debug!(
        file = %pending.path.display(),
        size = bytes.len(),
        "submitting PDF for scanning"
    );

    let client = ApiClient::new(&config.server.base_url, config.http_timeout())?;
    let created = client
        .create_task(&pending.description, &pending.filename, bytes)
        .await?;

    println!(
        "Task {} created ({})",
        created.task_id,
        render::status_label(&created.status)
    );
    println!("Run 'scanq watch --task {}' to follow the scan.", created.task_id);

    Ok(())
}
