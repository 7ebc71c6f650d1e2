use anyhow::Context;
use gitodo_core::{config::Config, io, paths, repo::RepoRegistry};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing gitodo in: {}", root.display());

    for dir in [paths::GITODO_DIR, paths::TODOS_DIR] {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    let config = Config::default().to_yaml()?;
    let created = io::write_if_missing(&paths::config_path(root), config.as_bytes())
        .context("failed to write config.yaml")?;
    report(created, paths::CONFIG_FILE);

    let repos = RepoRegistry::new().to_yaml()?;
    let created = io::write_if_missing(&paths::repos_path(root), repos.as_bytes())
        .context("failed to write repos.yaml")?;
    report(created, paths::REPOS_FILE);

    println!("\nNext: gitodo repo add <id> <owner/name>");
    Ok(())
}

fn report(created: bool, name: &str) {
    if created {
        println!("  created: {name}");
    } else {
        println!("  exists:  {name}");
    }
}
