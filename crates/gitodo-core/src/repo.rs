use crate::error::{GitodoError, Result};
use crate::paths;
use crate::store::TodoStore;
use crate::types::{validate_full_name, ContextId, HexColor, RepositoryContext};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The repositories the user tracks, in the order they arranged them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoRegistry {
    #[serde(default)]
    repos: Vec<RepositoryContext>,
}

/// Per-repository counts shown on the home-screen widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoSummary {
    pub id: ContextId,
    pub nickname: String,
    pub symbol: String,
    pub tint_color: HexColor,
    pub open: usize,
    pub done: usize,
}

impl RepoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Missing `repos.yaml` in an initialized root means no repos yet.
    pub fn load(root: &Path) -> Result<Self> {
        if !paths::is_initialized(root) {
            return Err(GitodoError::NotInitialized);
        }
        let path = paths::repos_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let registry: RepoRegistry = serde_yaml::from_str(&data)?;
        Ok(registry)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        crate::io::atomic_write(&paths::repos_path(root), self.to_yaml()?.as_bytes())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    // ---------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------

    pub fn list(&self) -> &[RepositoryContext] {
        &self.repos
    }

    pub fn get(&self, id: ContextId) -> Result<&RepositoryContext> {
        self.repos
            .iter()
            .find(|r| r.id == id)
            .ok_or(GitodoError::RepoNotFound(id))
    }

    pub fn summaries<S: TodoStore>(&self, store: &S) -> Result<Vec<RepoSummary>> {
        self.repos
            .iter()
            .map(|repo| {
                let items = store.fetch_all(repo.id).map_err(GitodoError::StoreRead)?;
                let done = items.iter().filter(|t| t.is_complete).count();
                Ok::<_, GitodoError>(RepoSummary {
                    id: repo.id,
                    nickname: repo.nickname.clone(),
                    symbol: repo.symbol.clone(),
                    tint_color: repo.tint_color,
                    open: items.len() - done,
                    done,
                })
            })
            .collect()
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    pub fn add(&mut self, repo: RepositoryContext) -> Result<()> {
        validate_full_name(&repo.full_name)?;
        if self.repos.iter().any(|r| r.id == repo.id) {
            return Err(GitodoError::RepoExists(repo.id));
        }
        self.repos.push(repo);
        Ok(())
    }

    /// Copy nickname, symbol and tint onto the tracked repo with the same id.
    /// Returns false when no such repo is tracked.
    pub fn update(&mut self, repo: &RepositoryContext) -> bool {
        let Some(slot) = self.repos.iter_mut().find(|r| r.id == repo.id) else {
            return false;
        };
        slot.nickname = repo.nickname.clone();
        slot.symbol = repo.symbol.clone();
        slot.tint_color = repo.tint_color;
        true
    }

    pub fn remove(&mut self, id: ContextId) -> Result<RepositoryContext> {
        let idx = self
            .repos
            .iter()
            .position(|r| r.id == id)
            .ok_or(GitodoError::RepoNotFound(id))?;
        Ok(self.repos.remove(idx))
    }

    /// Rebuild the list in `ids` order. Unknown ids are skipped and repos not
    /// named in `ids` are dropped from the registry.
    pub fn reorder(&mut self, ids: &[ContextId]) -> Vec<RepositoryContext> {
        let mut remaining = std::mem::take(&mut self.repos);
        for id in ids {
            if let Some(idx) = remaining.iter().position(|r| r.id == *id) {
                self.repos.push(remaining.remove(idx));
            }
        }
        remaining
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
