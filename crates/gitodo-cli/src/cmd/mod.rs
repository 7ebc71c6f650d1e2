pub mod config;
pub mod init;
pub mod repo;
pub mod todo;
pub mod widget;

use anyhow::Context;
use gitodo_core::{file_store::FileTodoStore, repo::RepoRegistry, TodoListController};
use std::path::Path;

/// Open the on-disk store and select `repo_id` in a fresh controller.
pub(crate) fn open_list(
    root: &Path,
    repo_id: u64,
) -> anyhow::Result<TodoListController<FileTodoStore>> {
    let registry = RepoRegistry::load(root).context("failed to load repositories")?;
    let repo = registry
        .get(repo_id)
        .with_context(|| format!("repository {repo_id} is not tracked"))?
        .clone();
    let store = FileTodoStore::open(root).context("failed to open todo store")?;

    let mut ctl = TodoListController::new(store);
    ctl.select_context(repo)
        .with_context(|| format!("failed to read todos for repository {repo_id}"))?;
    Ok(ctl)
}

/// First 8 hex digits of a todo id, enough to type back on the command line.
pub(crate) fn short_id(id: &gitodo_core::types::TodoId) -> String {
    id.simple().to_string()[..8].to_string()
}
