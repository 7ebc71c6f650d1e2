use crate::output::{print_json, print_table};
use anyhow::Context;
use gitodo_core::{file_store::FileTodoStore, repo::RepoRegistry};
use std::path::Path;

/// Open/done counts per tracked repository, in the user's repo order.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let registry = RepoRegistry::load(root).context("failed to load repositories")?;
    let store = FileTodoStore::open(root).context("failed to open todo store")?;
    let summaries = registry
        .summaries(&store)
        .context("failed to summarize todo lists")?;

    if json {
        return print_json(&summaries);
    }
    if summaries.is_empty() {
        println!("No repositories tracked.");
        return Ok(());
    }

    let rows = summaries
        .into_iter()
        .map(|s| {
            vec![
                s.symbol,
                s.nickname,
                s.open.to_string(),
                s.done.to_string(),
            ]
        })
        .collect();
    print_table(&["", "REPO", "OPEN", "DONE"], rows);
    Ok(())
}
