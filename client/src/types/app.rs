use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;
use tui_textarea::TextArea;

use crate::types::{Dashboard, DetailView, LogMessage, ProductPanel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    NORMAL,
    /// Composing a reply to the open session.
    INSERT,
    COMMAND,
    /// Typing into the product search field.
    SEARCH,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panels {
    Main,
    SideBar,
}

pub struct AppState {
    pub mode: EditorMode,
    pub active_panel: Panels,

    pub dashboard: Dashboard,
    pub detail: Option<DetailView>,
    pub products: ProductPanel,

    pub input: TextArea<'static>,
    pub log: Option<LogMessage>,
    /// Incremented for every shown notification so a stale hide timer
    /// cannot clear a newer message.
    pub log_seq: u64,
}

/// ### The console state shared by the terminal loop and background tasks.
pub type SharedState = Arc<AsyncMutex<AppState>>;

impl Default for AppState {
    fn default() -> Self {
        AppState::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            mode: EditorMode::NORMAL,
            active_panel: Panels::SideBar,

            dashboard: Dashboard::default(),
            detail: None,
            products: ProductPanel::default(),

            input: TextArea::default(),
            log: None,
            log_seq: 0,
        }
    }

    pub fn shared() -> SharedState {
        Arc::new(AsyncMutex::new(AppState::new()))
    }

    pub fn switch_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    pub fn switch_panel(&mut self, panel: Panels) {
        if self.active_panel != panel {
            self.active_panel = panel;
        }
    }

    /// Text in the input line, joined across lines.
    pub fn input_text(&self) -> String {
        self.input.lines().join("\n")
    }

    /// Takes the input text and leaves the field empty.
    pub fn take_input(&mut self) -> String {
        let text = self.input_text();
        self.clear_input();
        text
    }

    pub fn clear_input(&mut self) {
        self.input = TextArea::default();
    }

    pub fn open_session_id(&self) -> Option<&str> {
        self.detail.as_ref().map(DetailView::session_id)
    }

    /// Drops the open detail view, which stops its polling, and hides the
    /// product panel that belonged to it.
    pub fn close_detail(&mut self) -> bool {
        let closed = self.detail.take().is_some();
        self.products.close();
        if matches!(self.mode, EditorMode::INSERT | EditorMode::SEARCH) {
            self.switch_mode(EditorMode::NORMAL);
            self.clear_input();
        }
        closed
    }

    pub fn show_log(&mut self, message: LogMessage) -> u64 {
        self.log_seq += 1;
        self.log = Some(message);
        self.log_seq
    }

    pub fn hide_log(&mut self, seq: u64) {
        if self.log_seq == seq {
            self.log = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogLevel;
    use std::time::Duration;

    #[test]
    fn take_input_clears_the_field() {
        let mut app = AppState::new();
        app.input.insert_str("hello there");

        assert_eq!(app.take_input(), "hello there");
        assert_eq!(app.input_text(), "");
    }

    #[test]
    fn stale_hide_does_not_clear_newer_log() {
        let mut app = AppState::new();
        let first = app.show_log(LogMessage {
            level: LogLevel::INFO,
            msg: "one".into(),
            hide_after: Duration::from_secs(5),
        });
        app.show_log(LogMessage {
            level: LogLevel::ERROR,
            msg: "two".into(),
            hide_after: Duration::from_secs(5),
        });

        app.hide_log(first);
        assert_eq!(app.log.as_ref().map(|l| l.msg.as_str()), Some("two"));
    }
}
