use crate::types::ContextId;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const GITODO_DIR: &str = ".gitodo";
pub const TODOS_DIR: &str = ".gitodo/todos";

pub const CONFIG_FILE: &str = ".gitodo/config.yaml";
pub const REPOS_FILE: &str = ".gitodo/repos.yaml";

const TODO_LIST_EXT: &str = "yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn gitodo_dir(root: &Path) -> PathBuf {
    root.join(GITODO_DIR)
}

pub fn todos_dir(root: &Path) -> PathBuf {
    root.join(TODOS_DIR)
}

pub fn todo_list_path(root: &Path, context: ContextId) -> PathBuf {
    todos_dir(root).join(format!("{context}.{TODO_LIST_EXT}"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn repos_path(root: &Path) -> PathBuf {
    root.join(REPOS_FILE)
}

/// Inverse of [`todo_list_path`]: `todos/42.yaml` -> `42`.
pub fn context_from_list_path(path: &Path) -> Option<ContextId> {
    if path.extension()? != TODO_LIST_EXT {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

pub fn is_initialized(root: &Path) -> bool {
    gitodo_dir(root).is_dir()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.gitodo/config.yaml")
        );
        assert_eq!(
            todo_list_path(root, 42),
            PathBuf::from("/tmp/proj/.gitodo/todos/42.yaml")
        );
        assert_eq!(repos_path(root), PathBuf::from("/tmp/proj/.gitodo/repos.yaml"));
    }

    #[test]
    fn context_round_trips_through_file_name() {
        let root = Path::new("/tmp/proj");
        assert_eq!(context_from_list_path(&todo_list_path(root, 7)), Some(7));
        assert_eq!(context_from_list_path(Path::new("todos/7.yml")), None);
        assert_eq!(context_from_list_path(Path::new("todos/notes.yaml")), None);
        assert_eq!(context_from_list_path(Path::new("todos/.yaml")), None);
    }
}
