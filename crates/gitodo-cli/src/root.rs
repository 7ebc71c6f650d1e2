use gitodo_core::paths::GITODO_DIR;
use std::path::{Path, PathBuf};

/// Resolve the gitodo root directory.
///
/// Priority:
/// 1. `--root` flag / `GITODO_ROOT` env var (passed in as `explicit`)
/// 2. Nearest ancestor of `cwd` (inclusive) containing `.gitodo/`
/// 3. `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_marked_ancestor(&cwd).unwrap_or(cwd)
}

fn find_marked_ancestor(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(GITODO_DIR).is_dir())
        .map(Path::to_path_buf)
}
