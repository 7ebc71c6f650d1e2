use super::{open_list, short_id};
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use gitodo_core::{
    file_store::FileTodoStore,
    types::{resolve_todo_id, TodoId},
    TodoEvent, TodoListController,
};
use std::cell::Cell;
use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

#[derive(Subcommand)]
pub enum TodoSubcommand {
    /// List a repository's todos, open ones first
    List { repo: u64 },
    /// Add a todo at the end of the open group, or below another todo
    Add {
        repo: u64,
        #[arg(required = true)]
        text: Vec<String>,
        /// Insert directly below this todo (id or unique prefix)
        #[arg(long)]
        after: Option<String>,
    },
    /// Flip a todo between open and done
    Toggle { repo: u64, id: String },
    /// Replace a todo's text; empty text deletes it
    Edit {
        repo: u64,
        id: String,
        text: Vec<String>,
    },
    /// Delete a todo
    Delete { repo: u64, id: String },
}

pub fn run(root: &Path, subcmd: TodoSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TodoSubcommand::List { repo } => list(root, repo, json),
        TodoSubcommand::Add { repo, text, after } => {
            add(root, repo, &text.join(" "), after.as_deref(), json)
        }
        TodoSubcommand::Toggle { repo, id } => toggle(root, repo, &id, json),
        TodoSubcommand::Edit { repo, id, text } => edit(root, repo, &id, &text.join(" "), json),
        TodoSubcommand::Delete { repo, id } => delete(root, repo, &id, json),
    }
}

type Controller = TodoListController<FileTodoStore>;

fn resolve(ctl: &Controller, prefix: &str) -> anyhow::Result<TodoId> {
    let id = resolve_todo_id(ctl.items().iter().map(|c| c.id()), prefix)?;
    Ok(id)
}

/// Record the row of the most recent focus request.
fn watch_focus(ctl: &mut Controller) -> Rc<Cell<Option<usize>>> {
    let focus = Rc::new(Cell::new(None));
    let sink = Rc::clone(&focus);
    ctl.subscribe(move |event| {
        if let TodoEvent::FocusRequested(row) = event {
            sink.set(*row);
        }
    });
    focus
}

fn list(root: &Path, repo: u64, json: bool) -> anyhow::Result<()> {
    let ctl = open_list(root, repo)?;

    if json {
        return print_json(ctl.items());
    }
    if ctl.items().is_empty() {
        println!("No todos for repository {repo}.");
        return Ok(());
    }

    let rows = ctl
        .items()
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                i.to_string(),
                short_id(&c.id()),
                if c.is_complete() { "[x]" } else { "[ ]" }.to_string(),
                c.text().to_string(),
            ]
        })
        .collect();
    print_table(&["#", "ID", "DONE", "TODO"], rows);
    Ok(())
}

fn add(
    root: &Path,
    repo: u64,
    text: &str,
    after: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("todo text must not be empty");
    }
    let mut ctl = open_list(root, repo)?;
    let focus = watch_focus(&mut ctl);

    // Focus rows are derived from timestamps and store positions, so the new
    // row is identified by the id that was not there before.
    let before: HashSet<TodoId> = ctl.items().iter().map(|c| c.id()).collect();
    match after {
        None => ctl.append_item(),
        Some(prefix) => {
            let reference_id = resolve(&ctl, prefix)?;
            let reference = ctl
                .items()
                .iter()
                .find(|c| c.id() == reference_id)
                .map(|c| c.item.clone())
                .with_context(|| format!("todo '{prefix}' not found"))?;
            if reference.is_blank() {
                anyhow::bail!("cannot insert below a blank todo");
            }
            ctl.append_item_after(&reference);
        }
    }
    let id = ctl
        .items()
        .iter()
        .map(|c| c.id())
        .find(|id| !before.contains(id))
        .context("failed to add todo")?;

    // Type the text into the new row and leave it, as the app would.
    ctl.begin_editing(id);
    ctl.end_editing(id, Some(text));
    let saved = ctl.store().get(id).map(|t| t.text.as_str()) == Some(text);
    if !saved {
        anyhow::bail!("failed to save todo text");
    }

    if json {
        print_json(&serde_json::json!({
            "repo": repo,
            "id": id,
            "text": text,
            "focus_row": focus.get(),
        }))?;
    } else {
        println!("Added todo [{}]: {text}", short_id(&id));
    }
    Ok(())
}

fn toggle(root: &Path, repo: u64, prefix: &str, json: bool) -> anyhow::Result<()> {
    let mut ctl = open_list(root, repo)?;
    let id = resolve(&ctl, prefix)?;
    let was_complete = ctl.store().get(id).map(|t| t.is_complete);

    ctl.toggle_complete(id);
    let is_complete = ctl.store().get(id).map(|t| t.is_complete);
    if is_complete == was_complete {
        anyhow::bail!("failed to toggle todo '{prefix}'");
    }
    let done = is_complete.unwrap_or(false);

    if json {
        print_json(&serde_json::json!({ "repo": repo, "id": id, "is_complete": done }))?;
    } else {
        let state = if done { "done" } else { "open" };
        println!("Marked [{}] {state}", short_id(&id));
    }
    Ok(())
}

fn edit(root: &Path, repo: u64, prefix: &str, text: &str, json: bool) -> anyhow::Result<()> {
    let mut ctl = open_list(root, repo)?;
    let id = resolve(&ctl, prefix)?;

    ctl.begin_editing(id);
    ctl.end_editing(id, Some(text));

    let stored = ctl.store().get(id).map(|t| t.text.clone());
    let deleted = text.is_empty();
    let ok = if deleted {
        stored.is_none()
    } else {
        stored.as_deref() == Some(text)
    };
    if !ok {
        anyhow::bail!("failed to update todo '{prefix}'");
    }

    if json {
        print_json(&serde_json::json!({
            "repo": repo,
            "id": id,
            "text": text,
            "deleted": deleted,
        }))?;
    } else if deleted {
        println!("Deleted [{}] (empty text)", short_id(&id));
    } else {
        println!("Updated [{}]: {text}", short_id(&id));
    }
    Ok(())
}

fn delete(root: &Path, repo: u64, prefix: &str, json: bool) -> anyhow::Result<()> {
    let mut ctl = open_list(root, repo)?;
    let id = resolve(&ctl, prefix)?;

    ctl.delete_item(id);
    if ctl.store().get(id).is_some() {
        anyhow::bail!("failed to delete todo '{prefix}'");
    }

    if json {
        print_json(&serde_json::json!({ "repo": repo, "deleted": id }))?;
    } else {
        println!("Deleted [{}]", short_id(&id));
    }
    Ok(())
}
