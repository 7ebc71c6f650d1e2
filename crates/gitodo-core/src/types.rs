use crate::error::GitodoError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

pub type TodoId = Uuid;
pub type ContextId = u64;

// ---------------------------------------------------------------------------
// HexColor
// ---------------------------------------------------------------------------

/// 24-bit RGB tint, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(u32);

impl HexColor {
    pub const fn new(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    pub fn rgb(self) -> u32 {
        self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::new(0xB5D3FF)
    }
}

static HEX_RE: OnceLock<Regex> = OnceLock::new();

fn hex_re() -> &'static Regex {
    HEX_RE.get_or_init(|| Regex::new(r"^#?[0-9A-Fa-f]{6}$").unwrap())
}

impl std::str::FromStr for HexColor {
    type Err = GitodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !hex_re().is_match(s) {
            return Err(GitodoError::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(s.trim_start_matches('#'), 16)
            .map(Self::new)
            .map_err(|_| GitodoError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for HexColor {
    type Error = GitodoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<HexColor> for String {
    fn from(c: HexColor) -> Self {
        c.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TodoItem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub order: usize,
    pub status_changed_at: DateTime<Utc>,
}

impl TodoItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_complete: false,
            order: 0,
            status_changed_at: Utc::now(),
        }
    }

    /// An empty, incomplete row waiting for the user to type into it.
    pub fn placeholder() -> Self {
        Self::new("")
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Resolve a full id or unique id prefix (as typed on the command line).
pub fn resolve_todo_id(
    ids: impl IntoIterator<Item = TodoId>,
    prefix: &str,
) -> crate::error::Result<TodoId> {
    let needle = prefix.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Err(GitodoError::TodoNotFound(prefix.to_string()));
    }
    let mut matches = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (Some(_), Some(_)) => Err(GitodoError::AmbiguousTodoId(prefix.to_string())),
        (None, _) => Err(GitodoError::TodoNotFound(prefix.to_string())),
    }
}

// ---------------------------------------------------------------------------
// RepositoryContext
// ---------------------------------------------------------------------------

static REPO_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn repo_name_re() -> &'static Regex {
    REPO_NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]+/[A-Za-z0-9_.\-]+$").unwrap())
}

pub fn validate_full_name(full_name: &str) -> crate::error::Result<()> {
    if !repo_name_re().is_match(full_name) {
        return Err(GitodoError::InvalidRepoName(full_name.to_string()));
    }
    Ok(())
}

/// A tracked repository. The controller only looks at `id` and `tint_color`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryContext {
    pub id: ContextId,
    pub full_name: String,
    pub nickname: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub tint_color: HexColor,
}

impl RepositoryContext {
    /// Nickname defaults to the repository part of `owner/name`.
    pub fn new(id: ContextId, full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let nickname = full_name
            .rsplit('/')
            .next()
            .unwrap_or(full_name.as_str())
            .to_string();
        Self {
            id,
            full_name,
            nickname,
            symbol: String::new(),
            tint_color: HexColor::default(),
        }
    }

    pub fn with_tint(mut self, tint: HexColor) -> Self {
        self.tint_color = tint;
        self
    }
}

// ---------------------------------------------------------------------------
// TodoCell
// ---------------------------------------------------------------------------

/// Presentation record: an item plus the tint of the context it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoCell {
    pub item: TodoItem,
    pub tint_color: HexColor,
}

impl TodoCell {
    pub fn id(&self) -> TodoId {
        self.item.id
    }

    pub fn text(&self) -> &str {
        &self.item.text
    }

    pub fn is_complete(&self) -> bool {
        self.item.is_complete
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
