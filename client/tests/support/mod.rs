#![allow(dead_code)]

use std::{
    collections::HashMap,
    io,
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chat_desk_client::{
    handlers::{Desk, DeskContext},
    types::{ClientConfig, LogLevel, LogMessage, Notifier},
    utils::NotificationSound,
};
use chrono::{DateTime, TimeZone, Utc};
use common::{
    net::{BackendError, BackendResult, ChatBackend, FileUpload},
    types::{Message, Product, SenderType, Session, SessionStatus},
};
use tokio::sync::mpsc::UnboundedReceiver;

/// What the fake server answers and what it has been asked.
#[derive(Default)]
pub struct Script {
    pub sessions: HashMap<String, Session>,
    pub pending: Vec<Session>,
    pub active: Vec<Session>,
    pub messages: HashMap<String, Vec<Message>>,
    pub products: Vec<Product>,

    pub fail_messages: bool,
    pub fail_send: bool,
    pub fail_upload: bool,
    pub fail_pending: bool,
    pub fail_product_link: bool,
    /// The next message fetch answers this late, with the messages as they
    /// were when it was asked.
    pub fetch_delay: Option<Duration>,

    pub pending_fetches: usize,
    pub message_fetches: HashMap<String, usize>,
    pub sent: Vec<(String, String)>,
    pub uploads: Vec<(String, FileUpload)>,
    pub statuses: Vec<(String, SessionStatus)>,
    pub assigned: Vec<String>,
    pub searches: Vec<String>,
    pub product_links: Vec<(String, String)>,
}

#[derive(Default)]
pub struct FakeBackend {
    pub script: Mutex<Script>,
}

fn rejected() -> BackendError {
    BackendError::Application { message: None }
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(FakeBackend::default())
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut script = self.script.lock().unwrap();
        f(&mut script)
    }

    pub fn add_session(&self, session: Session) {
        self.with(|s| s.sessions.insert(session.id.clone(), session));
    }

    pub fn fetches(&self, session_id: &str) -> usize {
        self.with(|s| s.message_fetches.get(session_id).copied().unwrap_or(0))
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn get_session(&self, session_id: &str) -> BackendResult<Session> {
        self.with(|s| s.sessions.get(session_id).cloned())
            .ok_or_else(|| BackendError::Application {
                message: Some("Session not found".into()),
            })
    }

    async fn get_messages(&self, session_id: &str) -> BackendResult<Vec<Message>> {
        let (delay, answer) = self.with(|s| {
            *s.message_fetches.entry(session_id.to_string()).or_default() += 1;
            let answer = if s.fail_messages {
                Err(rejected())
            } else {
                Ok(s.messages.get(session_id).cloned().unwrap_or_default())
            };
            (s.fetch_delay.take(), answer)
        });

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        answer
    }

    async fn send_message(&self, session_id: &str, text: &str) -> BackendResult<()> {
        self.with(|s| {
            if s.fail_send {
                return Err(rejected());
            }
            s.sent.push((session_id.to_string(), text.to_string()));
            let conversation = s.messages.entry(session_id.to_string()).or_default();
            let secs = 100 + conversation.len() as i64;
            conversation.push(text_message(secs, SenderType::Admin, text));
            Ok(())
        })
    }

    async fn upload_file(&self, session_id: &str, upload: FileUpload) -> BackendResult<()> {
        self.with(|s| {
            if s.fail_upload {
                return Err(rejected());
            }
            s.uploads.push((session_id.to_string(), upload));
            Ok(())
        })
    }

    async fn get_all_sessions(&self, status: &SessionStatus) -> BackendResult<Vec<Session>> {
        self.with(|s| match status {
            SessionStatus::Pending => {
                s.pending_fetches += 1;
                if s.fail_pending {
                    return Err(rejected());
                }
                Ok(s.pending.clone())
            }
            SessionStatus::Active => Ok(s.active.clone()),
            _ => Ok(Vec::new()),
        })
    }

    async fn update_session_status(
        &self,
        session_id: &str,
        status: &SessionStatus,
    ) -> BackendResult<()> {
        self.with(|s| {
            s.statuses.push((session_id.to_string(), status.clone()));
            if let Some(session) = s.sessions.get_mut(session_id) {
                session.status = status.clone();
            }
            Ok(())
        })
    }

    async fn assign_session(&self, session_id: &str) -> BackendResult<()> {
        self.with(|s| {
            s.assigned.push(session_id.to_string());
            if let Some(session) = s.sessions.get_mut(session_id) {
                session.assigned_admin_name = Some("Operator".into());
            }
            Ok(())
        })
    }

    async fn search_products(&self, term: &str) -> BackendResult<Vec<Product>> {
        self.with(|s| {
            s.searches.push(term.to_string());
            Ok(s.products.clone())
        })
    }

    async fn send_product_link(&self, session_id: &str, product_id: &str) -> BackendResult<()> {
        self.with(|s| {
            if s.fail_product_link {
                return Err(rejected());
            }
            s.product_links
                .push((session_id.to_string(), product_id.to_string()));
            Ok(())
        })
    }
}

/// A sound that counts plays and can be told to fail.
#[derive(Default)]
pub struct RecordingSound {
    pub plays: AtomicUsize,
    pub broken: bool,
}

impl NotificationSound for RecordingSound {
    fn play(&self) -> io::Result<()> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(io::Error::other("no audio device"));
        }
        Ok(())
    }
}

pub fn config() -> ClientConfig {
    ClientConfig {
        endpoint: "http://shop.test/wp-admin/admin-ajax.php".into(),
        nonce: "abc123".into(),
        operator_name: "Operator".into(),
        poll_interval_secs: 5,
        dashboard_interval_secs: 30,
        request_timeout_secs: 15,
        log_file: PathBuf::from("chat-desk.log"),
        sound: false,
    }
}

pub fn context(backend: Arc<FakeBackend>) -> (DeskContext, UnboundedReceiver<LogMessage>) {
    let (notifier, log_rx) = Notifier::channel();
    (DeskContext::new(backend, notifier, &config()), log_rx)
}

pub fn desk(backend: Arc<FakeBackend>) -> (Desk, UnboundedReceiver<LogMessage>) {
    let (ctx, log_rx) = context(backend);
    (Desk::new(ctx), log_rx)
}

/// Everything notified so far.
pub fn drain(log_rx: &mut UnboundedReceiver<LogMessage>) -> Vec<(LogLevel, String)> {
    let mut out = Vec::new();
    while let Ok(message) = log_rx.try_recv() {
        out.push((message.level, message.msg));
    }
    out
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub fn session(id: &str, status: SessionStatus) -> Session {
    Session {
        id: id.into(),
        full_name: format!("Visitor {id}"),
        email: format!("visitor{id}@example.com"),
        phone_number: None,
        status,
        assigned_admin_name: None,
        started_at: at(0),
        updated_at: at(0),
        is_online: true,
    }
}

pub fn text_message(secs: i64, sender_type: SenderType, text: &str) -> Message {
    Message {
        sender_type,
        sender_name: String::new(),
        timestamp: at(secs),
        is_file: false,
        message: Some(text.into()),
        file: None,
    }
}

pub fn product(id: &str, title: &str) -> Product {
    Product {
        id: id.into(),
        title: title.into(),
        sku: Some(format!("SKU-{id}")),
        price: Some("19.99".into()),
        image: None,
        url: format!("https://shop.test/product/{id}"),
    }
}

/// Lets spawned tasks run without moving the paused clock far.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
