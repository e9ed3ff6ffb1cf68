use clap::Args as ClapArgs;
use inquire::Select;
use miette::IntoDiagnostic as _;

use crate::api::ApiClient;
use crate::api::model::Task;
use crate::config::RootConfig;
use crate::render;
use crate::report::ReportFetcher;
use crate::store::TaskStore;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Task id; opens a picker when omitted
    pub id: Option<String>,

    /// Include clean engine verdicts in the report table
    #[arg(long)]
    pub engines: bool,
}

pub async fn run(args: Args, config: &RootConfig) -> miette::Result<()> {
    let client = ApiClient::new(&config.server.base_url, config.http_timeout())?;

    let task = match &args.id {
        Some(id) => client.get_task(id).await?,
        None => pick_task(&client).await?,
    };

    // The report is fetched only for a completed task with a stored
    // report; everything else renders a placeholder line.
    let mut fetcher = ReportFetcher::new();
    fetcher.on_select(Some(&task));
    if let Some(ticket) = fetcher.plan_fetch(&task) {
        let outcome = client.fetch_report(&ticket.task_id).await;
        fetcher.resolve(ticket, outcome);
    }

    let details = render::build_task_details_view(&task);
    render::print_markdown(&render::task_details_markdown(&details));

    match render::report_placeholder(&task, fetcher.state()) {
        Some(line) => println!("{line}"),
        None => {
            if let Some(report) = fetcher.report() {
                let view = render::build_report_view(report, args.engines);
                render::print_markdown(&render::report_summary_markdown(&view));
            }
        }
    }

    Ok(())
}

async fn pick_task(client: &ApiClient) -> miette::Result<Task> {
    let tasks = client.list_tasks().await?;

    let mut store = TaskStore::new();
    store.apply_refresh(1, tasks);

    if store.tasks().is_empty() {
        miette::bail!(
            help = "submit a PDF first with 'scanq submit <file>'",
            "no tasks on the server yet"
        );
    }

    let options = store
        .tasks()
        .iter()
        .map(|task| {
            format!(
                "{}  {} ({})",
                task.id,
                task.description,
                render::status_label(&task.status)
            )
        })
        .collect();

    let choice = Select::new("Task:", options).raw_prompt().into_diagnostic()?;

    Ok(store.tasks()[choice.index].clone())
}
