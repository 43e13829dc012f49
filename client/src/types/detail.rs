use std::{path::PathBuf, sync::Arc};

use common::types::{Message, Session, SessionId};
use ratatui::widgets::ListState;
use tokio::sync::Mutex as AsyncMutex;

use crate::{
    handlers::{DeskContext, PollingController},
    types::Visibility,
};

/// Client-side copy of the open session's messages.
///
/// Every successful fetch replaces the whole contents; there is no
/// incremental merge.
///
/// Fetches are numbered when they start. A fetch that finishes after a
/// newer one has already been applied is dropped, so a slow poll cannot roll
/// the conversation back past a refresh that followed a send.
#[derive(Debug)]
pub struct MessageStore {
    session_id: SessionId,
    messages: Vec<Message>,
    revision: u64,
    issued: u64,
    applied: u64,
}

impl MessageStore {
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        MessageStore {
            session_id: session_id.into(),
            messages: Vec::new(),
            revision: 0,
            issued: 0,
            applied: 0,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Messages oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Bumped on every replace.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn replace(&mut self, mut messages: Vec<Message>) {
        messages.sort_by_key(|m| m.timestamp);
        self.messages = messages;
        self.revision += 1;
    }

    /// Numbers a fetch that is about to start.
    pub fn begin_fetch(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Replaces the contents with the result of fetch `ticket`, unless a
    /// fetch that started later has already been applied.
    pub fn apply_fetch(&mut self, ticket: u64, messages: Vec<Message>) -> bool {
        if ticket <= self.applied {
            return false;
        }

        self.applied = ticket;
        self.replace(messages);
        true
    }
}

/// ### A shared handle to the open session's [`MessageStore`].
///
/// The polling task writes through it, the renderer reads through it.
pub type SharedStore = Arc<AsyncMutex<MessageStore>>;

/// Everything the session detail panel needs while it is open.
///
/// Owns the polling task for its session. Dropping the view hides it and
/// stops polling, so closing or replacing the view is enough to cancel the
/// refresh timer.
pub struct DetailView {
    pub session: Session,
    pub store: SharedStore,
    /// File picked with `:file` that has not been uploaded successfully yet.
    pub pending_file: Option<PathBuf>,
    pub message_state: ListState,
    pub auto_scroll: bool,
    /// Store revision the message list last followed.
    seen_revision: u64,
    visibility: Visibility,
    polling: PollingController,
}

impl DetailView {
    pub fn new(session: Session, ctx: &DeskContext) -> Self {
        let store = Arc::new(AsyncMutex::new(MessageStore::new(session.id.clone())));

        DetailView {
            session,
            store,
            pending_file: None,
            message_state: ListState::default(),
            auto_scroll: true,
            seen_revision: 0,
            visibility: Visibility::visible(),
            polling: PollingController::new(ctx.poll_interval),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session.id
    }

    /// Jumps back to the newest message whenever the store has been refreshed
    /// since the last call. Between refreshes the operator's scroll position
    /// is kept.
    pub fn follow_store(&mut self, revision: u64) {
        if revision > self.seen_revision {
            self.seen_revision = revision;
            self.auto_scroll = true;
        }

        if self.auto_scroll {
            self.message_state.select_last();
        }
    }

    pub fn start_polling(&mut self, ctx: &DeskContext) {
        self.polling.start_polling(
            ctx.clone(),
            self.store.clone(),
            self.session.id.clone(),
            self.visibility.clone(),
        );
    }

    pub fn stop_polling(&mut self) {
        self.polling.stop_polling();
    }

    pub fn is_polling(&self) -> bool {
        self.polling.is_active()
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }
}

impl Drop for DetailView {
    fn drop(&mut self) {
        self.visibility.hide();
        self.polling.stop_polling();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::types::SenderType;

    fn message(secs: i64, text: &str) -> Message {
        Message {
            sender_type: SenderType::Visitor,
            sender_name: "Ada".into(),
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            is_file: false,
            message: Some(text.into()),
            file: None,
        }
    }

    #[test]
    fn replace_orders_oldest_first() {
        let mut store = MessageStore::new("7");
        store.replace(vec![message(30, "c"), message(10, "a"), message(20, "b")]);

        let texts: Vec<&str> = store.messages().iter().map(Message::text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn replace_keeps_arrival_order_for_equal_timestamps() {
        let mut store = MessageStore::new("7");
        store.replace(vec![message(10, "first"), message(10, "second")]);

        let texts: Vec<&str> = store.messages().iter().map(Message::text).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn replace_discards_previous_contents() {
        let mut store = MessageStore::new("7");
        store.replace(vec![message(10, "old"), message(11, "older")]);
        store.replace(vec![message(12, "new")]);

        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn fetch_that_started_earlier_cannot_overwrite_a_later_one() {
        let mut store = MessageStore::new("7");
        let poll = store.begin_fetch();
        let reload = store.begin_fetch();

        assert!(store.apply_fetch(reload, vec![message(10, "hello"), message(20, "reply")]));
        assert!(!store.apply_fetch(poll, vec![message(10, "hello")]));

        assert_eq!(store.messages().len(), 2);
        assert_eq!(store.revision(), 1);
    }
}
