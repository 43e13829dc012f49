use std::collections::HashSet;

use common::types::{Session, SessionStatus};
use ratatui::widgets::ListState;

/// One column of the dashboard: the sessions currently rendered, newest first.
#[derive(Debug, Default)]
pub struct SessionList {
    pub sessions: Vec<Session>,
    pub state: ListState,
}

impl SessionList {
    /// Prepends the sessions from `fetched` that are not rendered yet.
    ///
    /// Entries already on screen are left exactly as they are, including the
    /// operator's selection, which is shifted to keep pointing at the same
    /// session. Returns how many sessions were added.
    pub fn merge(&mut self, fetched: Vec<Session>) -> usize {
        let mut seen: HashSet<String> = self.sessions.iter().map(|s| s.id.clone()).collect();
        let fresh: Vec<Session> = fetched
            .into_iter()
            .filter(|session| seen.insert(session.id.clone()))
            .collect();

        let added = fresh.len();
        if added > 0 {
            self.sessions.splice(0..0, fresh);
            if let Some(selected) = self.state.selected() {
                self.state.select(Some(selected.saturating_add(added)));
            }
        }

        added
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.iter().any(|s| s.id == session_id)
    }

    pub fn remove(&mut self, session_id: &str) -> Option<Session> {
        let index = self.sessions.iter().position(|s| s.id == session_id)?;
        let removed = self.sessions.remove(index);

        match self.state.selected() {
            Some(selected) if selected > index => self.state.select(Some(selected - 1)),
            Some(selected) if selected >= self.sessions.len() => {
                self.state.select(self.sessions.len().checked_sub(1))
            }
            _ => (),
        }

        Some(removed)
    }

    /// Replaces the rendered copy of `session` if it is present.
    pub fn update(&mut self, session: &Session) -> bool {
        match self.sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => {
                *existing = session.clone();
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<&Session> {
        self.state.selected().and_then(|i| self.sessions.get(i))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.sessions.iter().map(|s| s.id.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardColumn {
    Pending,
    Active,
}

/// The pending and active session lists.
#[derive(Debug)]
pub struct Dashboard {
    pub pending: SessionList,
    pub active: SessionList,
    pub focus: DashboardColumn,
    /// Set once the pending list has been loaded for the first time.
    pending_seeded: bool,
}

impl Default for Dashboard {
    fn default() -> Self {
        Dashboard {
            pending: SessionList::default(),
            active: SessionList::default(),
            focus: DashboardColumn::Pending,
            pending_seeded: false,
        }
    }
}

impl Dashboard {
    pub fn focused(&mut self) -> &mut SessionList {
        match self.focus {
            DashboardColumn::Pending => &mut self.pending,
            DashboardColumn::Active => &mut self.active,
        }
    }

    /// Merges a fetched pending list and returns how many sessions should be
    /// announced as new. The first successful fetch only fills the list: the
    /// sessions already waiting at startup are not news.
    pub fn merge_pending(&mut self, fetched: Vec<Session>) -> usize {
        let added = self.pending.merge(fetched);
        if !self.pending_seeded {
            self.pending_seeded = true;
            return 0;
        }
        added
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            DashboardColumn::Pending => DashboardColumn::Active,
            DashboardColumn::Active => DashboardColumn::Pending,
        };
    }

    pub fn selected_session(&self) -> Option<&Session> {
        match self.focus {
            DashboardColumn::Pending => self.pending.selected(),
            DashboardColumn::Active => self.active.selected(),
        }
    }

    /// Reflects a local status change: closed sessions are evicted, newly
    /// active ones move from the pending column to the active column.
    pub fn apply_status(&mut self, session_id: &str, status: &SessionStatus) {
        match status {
            SessionStatus::Closed => {
                self.pending.remove(session_id);
                self.active.remove(session_id);
            }
            SessionStatus::Active => {
                if let Some(mut session) = self.pending.remove(session_id) {
                    session.status = SessionStatus::Active;
                    self.active.merge(vec![session]);
                }
            }
            _ => {
                for list in [&mut self.pending, &mut self.active] {
                    if let Some(session) = list.sessions.iter_mut().find(|s| s.id == session_id) {
                        session.status = status.clone();
                    }
                }
            }
        }
    }

    /// Replaces the copy of `session` in whichever column holds it.
    pub fn update(&mut self, session: &Session) {
        self.pending.update(session);
        self.active.update(session);
    }
}
