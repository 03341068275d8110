use log::debug;
use std::fmt;
use std::str::FromStr;

use crate::error::BrowserError;
use crate::navigator::ListContext;

/// The three views of the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Search,
    /// `/gallery`
    Gallery,
    /// `/detail/<id>`
    Detail { id: String },
}

impl FromStr for Route {
    type Err = BrowserError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Ok(Route::Search),
            "/gallery" => Ok(Route::Gallery),
            _ => match trimmed.strip_prefix("/detail/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Ok(Route::Detail {
                    id: id.to_string(),
                }),
                _ => Err(BrowserError::InvalidRoute(path.to_string())),
            },
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Search => f.write_str("/"),
            Route::Gallery => f.write_str("/gallery"),
            Route::Detail { id } => write!(f, "/detail/{}", id),
        }
    }
}

/// A visited route and the list context it was opened with, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub route: Route,
    pub context: Option<ListContext>,
}

/// Back-stack of visited routes. Going back never triggers a fetch; the
/// caller restores whatever view state it kept for the returned entry.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// A history whose first entry is `root`.
    pub fn new(root: Route) -> Self {
        Self {
            entries: vec![HistoryEntry {
                route: root,
                context: None,
            }],
        }
    }

    pub fn push(&mut self, route: Route, context: Option<ListContext>) {
        debug!("Navigating to {}", route);
        self.entries.push(HistoryEntry { route, context });
    }

    /// Swap the current entry, e.g. when stepping between recipes of one list.
    pub fn replace(&mut self, route: Route, context: Option<ListContext>) {
        debug!("Replacing current route with {}", route);
        if let Some(current) = self.entries.last_mut() {
            *current = HistoryEntry { route, context };
        }
    }

    /// Pop the current entry and return the one below it. At the root this
    /// does nothing and returns the root.
    pub fn back(&mut self) -> &HistoryEntry {
        if self.entries.len() > 1 {
            self.entries.pop();
        }
        self.current()
    }

    pub fn current(&self) -> &HistoryEntry {
        // Never empty: the root entry is never popped
        &self.entries[self.entries.len() - 1]
    }

    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Search)
    }
}
