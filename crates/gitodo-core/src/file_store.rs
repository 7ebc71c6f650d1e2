use crate::error::{GitodoError, Result, StoreError};
use crate::paths;
use crate::store::{MemoryTodoStore, StoreResult, TodoStore};
use crate::types::{ContextId, TodoId, TodoItem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct TodoListFile {
    #[serde(default)]
    items: Vec<TodoItem>,
}

/// YAML-backed store: one `.gitodo/todos/<context>.yaml` per repository.
///
/// Every list is loaded at open. Each mutation rewrites only the affected
/// context's file; if that write fails the in-memory change is rolled back.
#[derive(Debug)]
pub struct FileTodoStore {
    root: PathBuf,
    mem: MemoryTodoStore,
}

impl FileTodoStore {
    pub fn open(root: &Path) -> Result<Self> {
        if !paths::is_initialized(root) {
            return Err(GitodoError::NotInitialized);
        }
        let mut mem = MemoryTodoStore::new();
        let dir = paths::todos_dir(root);
        if dir.is_dir() {
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                let Some(context) = paths::context_from_list_path(&path) else {
                    continue;
                };
                let data = std::fs::read_to_string(&path)?;
                let file: TodoListFile = serde_yaml::from_str(&data)?;
                debug!(context, items = file.items.len(), "loaded todo list");
                mem.seed(context, file.items);
            }
        }
        Ok(Self {
            root: root.to_path_buf(),
            mem,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.mem.get(id)
    }

    /// Drop a context's list and its file.
    pub fn remove_context(&mut self, context: ContextId) -> Result<()> {
        self.mem.remove_context(context);
        crate::io::remove_if_exists(&paths::todo_list_path(&self.root, context))
    }

    fn persist(&self, context: ContextId) -> StoreResult<()> {
        let file = TodoListFile {
            items: self.mem.list(context).to_vec(),
        };
        let data = serde_yaml::to_string(&file).map_err(|e| StoreError::Write(e.to_string()))?;
        crate::io::atomic_write(&paths::todo_list_path(&self.root, context), data.as_bytes())
            .map_err(|e| StoreError::Write(e.to_string()))
    }

    fn apply(
        &mut self,
        context: ContextId,
        op: impl FnOnce(&mut MemoryTodoStore) -> StoreResult<()>,
    ) -> StoreResult<()> {
        let before = self.mem.clone();
        op(&mut self.mem)?;
        if let Err(e) = self.persist(context) {
            self.mem = before;
            return Err(e);
        }
        Ok(())
    }

    fn context_of(&self, id: TodoId) -> StoreResult<ContextId> {
        self.mem.context_of(id).ok_or(StoreError::NotFound(id))
    }
}

impl TodoStore for FileTodoStore {
    fn fetch_all(&self, context: ContextId) -> StoreResult<Vec<TodoItem>> {
        self.mem.fetch_all(context)
    }

    fn append(&mut self, item: TodoItem, context: ContextId) -> StoreResult<()> {
        self.apply(context, |mem| mem.append(item, context))
    }

    fn append_after(&mut self, item: TodoItem, after: TodoId) -> StoreResult<()> {
        let context = self.context_of(after)?;
        self.apply(context, |mem| mem.append_after(item, after))
    }

    fn update(&mut self, item: &TodoItem) -> StoreResult<()> {
        let context = self.context_of(item.id)?;
        self.apply(context, |mem| mem.update(item))
    }

    fn delete(&mut self, id: TodoId) -> StoreResult<()> {
        let context = self.context_of(id)?;
        self.apply(context, |mem| mem.delete(id))
    }

    fn toggle_complete_status(&mut self, id: TodoId) -> StoreResult<()> {
        let context = self.context_of(id)?;
        self.apply(context, |mem| mem.toggle_complete_status(id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
