use std::{path::PathBuf, sync::Arc, time::Duration};

use common::{
    net::ChatBackend,
    types::{SessionId, SessionStatus},
};
use tracing::{info, warn};

use crate::{
    handlers::{dashboard, load_messages, messages, products},
    types::{
        AppState, ClientConfig, DetailView, EditorMode, Notifier, Panels, Redraw, SharedState,
        SharedStore,
    },
    utils::{NotificationSound, Silent, TerminalBell},
};

const NO_SESSION: &str = "No session is open";

/// Collaborators shared by every operation: the backend boundary, the
/// notification channel, the redraw flag, and the timing settings.
#[derive(Clone)]
pub struct DeskContext {
    pub backend: Arc<dyn ChatBackend>,
    pub notifier: Notifier,
    pub redraw: Redraw,
    pub sound: Arc<dyn NotificationSound>,
    pub operator_name: String,
    pub poll_interval: Duration,
    pub dashboard_interval: Duration,
}

impl DeskContext {
    pub fn new(backend: Arc<dyn ChatBackend>, notifier: Notifier, config: &ClientConfig) -> Self {
        let sound: Arc<dyn NotificationSound> = if config.sound {
            Arc::new(TerminalBell)
        } else {
            Arc::new(Silent)
        };

        DeskContext {
            backend,
            notifier,
            redraw: Redraw::new(),
            sound,
            operator_name: config.operator_name.clone(),
            poll_interval: config.poll_interval(),
            dashboard_interval: config.dashboard_interval(),
        }
    }
}

/// The operator console: shared state plus the operations that drive it.
///
/// Every operation locks the state only to read or apply changes; network
/// calls happen with the lock released. `Desk` is cheap to clone so key
/// handlers can hand operations off to spawned tasks.
#[derive(Clone)]
pub struct Desk {
    pub ctx: DeskContext,
    pub state: SharedState,
}

impl Desk {
    pub fn new(ctx: DeskContext) -> Self {
        Desk {
            ctx,
            state: AppState::shared(),
        }
    }

    /// The open session's id and message store.
    async fn open_view(&self) -> Option<(SessionId, SharedStore)> {
        let app = self.state.lock().await;
        app.detail
            .as_ref()
            .map(|view| (view.session.id.clone(), view.store.clone()))
    }

    async fn require_open_view(&self) -> Option<(SessionId, SharedStore)> {
        let view = self.open_view().await;
        if view.is_none() {
            self.ctx.notifier.error(NO_SESSION);
        }
        view
    }

    /// Opens the detail view for `session_id`, replacing any open view, and
    /// starts polling its messages.
    pub async fn open_session(&self, session_id: &str) -> bool {
        let session = match self.ctx.backend.get_session(session_id).await {
            Ok(session) => session,
            Err(err) => {
                warn!(session_id, %err, "failed to load session");
                self.ctx
                    .notifier
                    .error(err.user_message("Failed to load session"));
                return false;
            }
        };

        {
            let mut app = self.state.lock().await;
            // Dropping the previous view cancels its polling task first.
            app.close_detail();

            let mut view = DetailView::new(session, &self.ctx);
            view.start_polling(&self.ctx);
            app.detail = Some(view);
            app.switch_panel(Panels::Main);
        }

        info!(session_id, "session opened");
        self.ctx.redraw.request();
        true
    }

    /// Closes the detail view and stops its polling.
    pub async fn close_session(&self) -> bool {
        let mut app = self.state.lock().await;
        let closed = app.close_detail();
        if closed {
            app.switch_panel(Panels::SideBar);
            self.ctx.redraw.request();
        }
        closed
    }

    /// Reloads the open session's messages now.
    pub async fn load_messages(&self) -> bool {
        match self.require_open_view().await {
            Some((session_id, store)) => load_messages(&self.ctx, &store, &session_id).await,
            None => false,
        }
    }

    /// Sends the compose field as a reply to the open session.
    ///
    /// The field is cleared before the request goes out and is not restored
    /// if the request fails.
    pub async fn send_message(&self) -> bool {
        let (session_id, store, text) = {
            let mut app = self.state.lock().await;
            let Some(view) = app.detail.as_ref() else {
                self.ctx.notifier.error(NO_SESSION);
                return false;
            };
            let (session_id, store) = (view.session.id.clone(), view.store.clone());

            let text = app.take_input();
            (session_id, store, text.trim().to_string())
        };
        self.ctx.redraw.request();

        if text.is_empty() {
            return false;
        }

        messages::send_message(&self.ctx, &store, &session_id, &text).await
    }

    /// Uploads a file into the open session.
    ///
    /// With `None`, retries the file whose previous upload failed.
    pub async fn send_file(&self, path: Option<PathBuf>) -> bool {
        let (session_id, store, path) = {
            let mut app = self.state.lock().await;
            let Some(view) = app.detail.as_mut() else {
                self.ctx.notifier.error(NO_SESSION);
                return false;
            };

            let Some(path) = path.or_else(|| view.pending_file.clone()) else {
                self.ctx.notifier.error("No file selected");
                return false;
            };
            view.pending_file = Some(path.clone());
            (view.session.id.clone(), view.store.clone(), path)
        };
        self.ctx.redraw.request();

        let sent = messages::send_file(&self.ctx, &store, &session_id, &path).await;
        if sent {
            let mut app = self.state.lock().await;
            if let Some(view) = app.detail.as_mut() {
                if view.session.id == session_id {
                    view.pending_file = None;
                }
            }
        }

        self.ctx.redraw.request();
        sent
    }

    /// Re-reads the open session's header.
    pub async fn refresh_session(&self) -> bool {
        let Some((session_id, _)) = self.require_open_view().await else {
            return false;
        };

        let session = match self.ctx.backend.get_session(&session_id).await {
            Ok(session) => session,
            Err(err) => {
                warn!(session_id, %err, "failed to refresh session");
                self.ctx
                    .notifier
                    .error(err.user_message("Failed to load session"));
                return false;
            }
        };

        {
            let mut app = self.state.lock().await;
            app.dashboard.update(&session);
            if let Some(view) = app.detail.as_mut() {
                if view.session.id == session.id {
                    view.session = session;
                }
            }
        }

        self.ctx.redraw.request();
        true
    }

    /// Changes the open session's status.
    pub async fn update_status(&self, status: SessionStatus) -> bool {
        let Some((session_id, _)) = self.require_open_view().await else {
            return false;
        };

        if let Err(err) = self
            .ctx
            .backend
            .update_session_status(&session_id, &status)
            .await
        {
            warn!(session_id, %err, "failed to update session status");
            self.ctx
                .notifier
                .error(err.user_message("Failed to update session status"));
            return false;
        }

        {
            let mut app = self.state.lock().await;
            app.dashboard.apply_status(&session_id, &status);
            if let Some(view) = app.detail.as_mut() {
                if view.session.id == session_id {
                    view.session.status = status.clone();
                }
            }
        }

        info!(session_id, %status, "session status updated");
        self.ctx.notifier.info("Session status updated");
        self.ctx.redraw.request();
        true
    }

    /// Assigns the open session to the current operator.
    pub async fn assign(&self) -> bool {
        let Some((session_id, _)) = self.require_open_view().await else {
            return false;
        };

        if let Err(err) = self.ctx.backend.assign_session(&session_id).await {
            warn!(session_id, %err, "failed to assign session");
            self.ctx
                .notifier
                .error(err.user_message("Failed to assign session"));
            return false;
        }

        info!(session_id, operator = %self.ctx.operator_name, "session assigned");
        self.ctx
            .notifier
            .info(format!("Session assigned to {}", self.ctx.operator_name));
        self.refresh_session().await;
        true
    }

    /// Shows the product panel for the open session with an empty, focused
    /// search field.
    pub async fn open_products(&self) -> bool {
        let mut app = self.state.lock().await;
        let Some(session_id) = app.open_session_id().map(String::from) else {
            self.ctx.notifier.error(NO_SESSION);
            return false;
        };

        app.products.open(session_id);
        app.clear_input();
        app.switch_mode(EditorMode::SEARCH);
        self.ctx.redraw.request();
        true
    }

    pub async fn close_products(&self) {
        let mut app = self.state.lock().await;
        app.products.close();
        if app.mode == EditorMode::SEARCH {
            app.switch_mode(EditorMode::NORMAL);
            app.clear_input();
        }
        self.ctx.redraw.request();
    }

    pub async fn search_products(&self, term: &str) -> bool {
        products::search_products(&self.ctx, &self.state, term).await
    }

    /// Sends the product at `index` of the current results, or the
    /// highlighted one when `index` is `None`.
    pub async fn select_product(&self, index: Option<usize>) -> bool {
        let picked = {
            let app = self.state.lock().await;
            let product = match index {
                Some(i) => app.products.products().get(i),
                None => app.products.selected_product(),
            };
            product
                .cloned()
                .zip(app.products.session_id.clone())
        };

        match picked {
            Some((product, session_id)) => {
                products::select_product(&self.ctx, &self.state, &session_id, &product).await
            }
            None => {
                self.ctx.notifier.error("No product selected");
                false
            }
        }
    }

    pub async fn refresh_dashboard(&self) -> usize {
        dashboard::refresh_dashboard(&self.ctx, &self.state).await
    }
}
