use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use gitodo_core::{
    config::Config, file_store::FileTodoStore, repo::RepoRegistry, types::RepositoryContext,
};
use std::path::Path;

#[derive(Subcommand)]
pub enum RepoSubcommand {
    /// Track a repository
    Add {
        /// Numeric repository id
        id: u64,
        /// Full name, owner/name
        full_name: String,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        symbol: Option<String>,
        /// Palette name or #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },
    /// List tracked repositories
    List,
    /// Change how a repository is displayed
    Edit {
        id: u64,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Stop tracking a repository and delete its todos
    Remove { id: u64 },
    /// Set the repository order; repositories not listed are untracked
    Reorder {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
}

pub fn run(root: &Path, subcmd: RepoSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        RepoSubcommand::Add {
            id,
            full_name,
            nickname,
            symbol,
            color,
        } => add(root, id, &full_name, nickname, symbol, color.as_deref(), json),
        RepoSubcommand::List => list(root, json),
        RepoSubcommand::Edit {
            id,
            nickname,
            symbol,
            color,
        } => edit(root, id, nickname, symbol, color.as_deref(), json),
        RepoSubcommand::Remove { id } => remove(root, id, json),
        RepoSubcommand::Reorder { ids } => reorder(root, &ids, json),
    }
}

fn add(
    root: &Path,
    id: u64,
    full_name: &str,
    nickname: Option<String>,
    symbol: Option<String>,
    color: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let mut registry = RepoRegistry::load(root).context("failed to load repositories")?;

    let tint = match color {
        Some(c) => config.resolve_color(c)?,
        None => config.default_tint,
    };
    let mut repo = RepositoryContext::new(id, full_name).with_tint(tint);
    if let Some(n) = nickname {
        repo.nickname = n;
    }
    if let Some(s) = symbol {
        repo.symbol = s;
    }

    registry.add(repo.clone())?;
    registry.save(root).context("failed to save repositories")?;

    if json {
        print_json(&repo)?;
    } else {
        println!("Tracking [{}] {} as '{}'", repo.id, repo.full_name, repo.nickname);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let registry = RepoRegistry::load(root).context("failed to load repositories")?;

    if json {
        return print_json(registry.list());
    }
    if registry.list().is_empty() {
        println!("No repositories tracked.");
        return Ok(());
    }

    let rows = registry
        .list()
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.symbol.clone(),
                r.nickname.clone(),
                r.full_name.clone(),
                r.tint_color.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "", "NICKNAME", "FULL NAME", "TINT"], rows);
    Ok(())
}

fn edit(
    root: &Path,
    id: u64,
    nickname: Option<String>,
    symbol: Option<String>,
    color: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let mut registry = RepoRegistry::load(root).context("failed to load repositories")?;
    let mut repo = registry.get(id)?.clone();

    if let Some(n) = nickname {
        repo.nickname = n;
    }
    if let Some(s) = symbol {
        repo.symbol = s;
    }
    if let Some(c) = color {
        repo.tint_color = config.resolve_color(c)?;
    }

    registry.update(&repo);
    registry.save(root).context("failed to save repositories")?;

    if json {
        print_json(&repo)?;
    } else {
        println!("Updated [{id}] {}", repo.nickname);
    }
    Ok(())
}

fn remove(root: &Path, id: u64, json: bool) -> anyhow::Result<()> {
    let mut registry = RepoRegistry::load(root).context("failed to load repositories")?;
    let removed = registry.remove(id)?;

    // Todos go first: a failure here leaves the repo tracked, not orphaned.
    let mut store = FileTodoStore::open(root).context("failed to open todo store")?;
    drop_todos(&mut store, id)?;
    registry.save(root).context("failed to save repositories")?;

    if json {
        print_json(&serde_json::json!({ "removed": removed.id }))?;
    } else {
        println!("Removed [{id}] {}", removed.full_name);
    }
    Ok(())
}

fn reorder(root: &Path, ids: &[u64], json: bool) -> anyhow::Result<()> {
    let mut registry = RepoRegistry::load(root).context("failed to load repositories")?;
    let dropped = registry.reorder(ids);

    if !dropped.is_empty() {
        let mut store = FileTodoStore::open(root).context("failed to open todo store")?;
        for repo in &dropped {
            drop_todos(&mut store, repo.id)?;
        }
    }
    registry.save(root).context("failed to save repositories")?;

    let order: Vec<u64> = registry.list().iter().map(|r| r.id).collect();
    let dropped: Vec<u64> = dropped.iter().map(|r| r.id).collect();
    if json {
        print_json(&serde_json::json!({ "order": order, "untracked": dropped }))?;
    } else {
        let order: Vec<String> = order.iter().map(u64::to_string).collect();
        println!("Order: {}", order.join(", "));
        for id in dropped {
            println!("Untracked [{id}] (not listed)");
        }
    }
    Ok(())
}

fn drop_todos(store: &mut FileTodoStore, id: u64) -> anyhow::Result<()> {
    store
        .remove_context(id)
        .with_context(|| format!("failed to delete todos for repository {id}"))
}
