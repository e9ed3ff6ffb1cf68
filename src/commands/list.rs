use clap::Args as ClapArgs;

use crate::api::ApiClient;
use crate::config::RootConfig;
use crate::render;
use crate::store::TaskStore;

#[derive(ClapArgs, Debug)]
pub struct Args {}

pub async fn run(_args: Args, config: &RootConfig) -> miette::Result<()> {
    let client = ApiClient::new(&config.server.base_url, config.http_timeout())?;
    let tasks = client.list_tasks().await?;

    let mut store = TaskStore::new();
    store.apply_refresh(1, tasks);

    let view = render::build_task_list_view(store.tasks());
    render::print_markdown(&render::task_list_markdown(&view));

    Ok(())
}
