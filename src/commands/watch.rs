use clap::Args as ClapArgs;
use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::api::model::Task;
use crate::config::RootConfig;
use crate::poller::{Poller, ViewEvent};
use crate::render;
use crate::report::{ReportFetcher, ReportState};
use crate::store::TaskStore;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Follow a single task and print its report once the scan completes
    #[arg(long)]
    pub task: Option<String>,
}

pub async fn run(args: Args, config: &RootConfig) -> miette::Result<()> {
    let client = ApiClient::new(&config.server.base_url, config.http_timeout())?;

    match args.task {
        Some(id) => follow_task(client, config, id).await,
        None => watch_all(client, config).await,
    }
}

/// Live feed over the whole task list: full table once, then one line
/// per appearance, status transition, or removal.
async fn watch_all(client: ApiClient, config: &RootConfig) -> miette::Result<()> {
    let (tx, mut rx) = mpsc::channel(16);
    let poller = Poller::spawn(client, config.poll_interval(), tx);

    let mut store = TaskStore::new();
    let mut primed = false;

    println!(
        "Watching tasks on {} (ctrl-c to stop)",
        config.server.base_url
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            event = rx.recv() => {
                let Some(event) = event else { break };

                if let ViewEvent::Tasks { seq, tasks } = event {
                    let before = store.tasks().to_vec();
                    if !store.apply_refresh(seq, tasks) {
                        continue;
                    }

                    if !primed {
                        let view = render::build_task_list_view(store.tasks());
                        render::print_markdown(&render::task_list_markdown(&view));
                        primed = true;
                        continue;
                    }

                    for line in feed_lines(&before, store.tasks()) {
                        println!("{line}");
                    }
                }
            }
        }
    }

    poller.shutdown().await;
    Ok(())
}

/// Follow one task until it settles: print status transitions as they
/// happen, fetch the report as soon as the scan completes, then render
/// the final details and exit.
async fn follow_task(client: ApiClient, config: &RootConfig, id: String) -> miette::Result<()> {
    // Fail fast on a typo before any polling starts.
    let initial = client.get_task(&id).await?;

    let (tx, mut rx) = mpsc::channel(16);
    let poller = Poller::spawn(client.clone(), config.poll_interval(), tx.clone());

    let mut store = TaskStore::new();
    store.select(initial.clone());

    let mut fetcher = ReportFetcher::new();
    let mut last_status = initial.status.clone();

    println!(
        "Following task {} ({}, ctrl-c to stop)",
        id,
        render::status_label(&last_status)
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let settled = loop {
        tokio::select! {
            _ = &mut ctrl_c => break None,
            event = rx.recv() => {
                let Some(event) = event else { break None };

                match event {
                    ViewEvent::Tasks { seq, tasks } => {
                        if !store.apply_refresh(seq, tasks) {
                            continue;
                        }

                        store.reselect();
                        let Some(task) = store.selected().cloned() else {
                            println!("{}", render::removal_line(&id));
                            break None;
                        };

                        if task.status != last_status {
                            println!("{}", render::transition_line(&task, &last_status));
                            last_status = task.status.clone();
                        }

                        fetcher.on_select(Some(&task));
                        if let Some(ticket) = fetcher.plan_fetch(&task) {
                            let fetch_client = client.clone();
                            let events = tx.clone();
                            tokio::spawn(async move {
                                let outcome = fetch_client.fetch_report(&ticket.task_id).await;
                                let _ = events.send(ViewEvent::Report { ticket, outcome }).await;
                            });
                        } else if task.is_terminal()
                            && !task.report_ready()
                            && fetcher.state() == &ReportState::Idle
                        {
                            break Some(task);
                        }
                    }
                    ViewEvent::Report { ticket, outcome } => {
                        fetcher.resolve(ticket, outcome);

                        if matches!(
                            fetcher.state(),
                            ReportState::Available(_) | ReportState::Unavailable
                        ) {
                            break store.selected().cloned();
                        }
                    }
                }
            }
        }
    };

    poller.shutdown().await;

    if let Some(task) = settled {
        let details = render::build_task_details_view(&task);
        render::print_markdown(&render::task_details_markdown(&details));

        if let Some(report) = fetcher.report() {
            let view = render::build_report_view(report, false);
            render::print_markdown(&render::report_summary_markdown(&view));
        } else if let Some(line) = render::report_placeholder(&task, fetcher.state()) {
            println!("{line}");
        }
    }

    Ok(())
}

fn feed_lines(before: &[Task], after: &[Task]) -> Vec<String> {
    let mut lines = Vec::new();

    for task in after {
        match before.iter().find(|prev| prev.id == task.id) {
            None => lines.push(render::appearance_line(task)),
            Some(prev) if prev.status != task.status => {
                lines.push(render::transition_line(task, &prev.status));
            }
            Some(_) => {}
        }
    }

    for prev in before {
        if !after.iter().any(|task| task.id == prev.id) {
            lines.push(render::removal_line(&prev.id));
        }
    }

    lines
}
