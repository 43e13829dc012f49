use std::path::Path;

use common::net::FileUpload;
use tracing::{debug, warn};

use crate::{handlers::DeskContext, types::SharedStore};

/// Fetches every message of `session_id` and replaces the store contents.
///
/// On failure the store is left as it was and the operator is notified.
/// Nothing is fetched for a session other than the one the store holds, and
/// a result that a later fetch has already superseded is dropped.
pub async fn load_messages(ctx: &DeskContext, store: &SharedStore, session_id: &str) -> bool {
    let ticket = {
        let mut store = store.lock().await;
        if store.session_id() != session_id {
            debug!(session_id, "discarding messages for a session no longer shown");
            return false;
        }
        store.begin_fetch()
    };

    let messages = match ctx.backend.get_messages(session_id).await {
        Ok(messages) => messages,
        Err(err) => {
            warn!(session_id, %err, "failed to load messages");
            ctx.notifier.error(err.user_message("Failed to load messages"));
            return false;
        }
    };

    if !store.lock().await.apply_fetch(ticket, messages) {
        debug!(session_id, ticket, "discarding an outdated message fetch");
        return false;
    }

    ctx.redraw.request();
    true
}

/// Posts `text` to the session and reloads the conversation on success.
///
/// The new message only shows up through the reload; nothing is inserted
/// into the store optimistically.
pub async fn send_message(
    ctx: &DeskContext,
    store: &SharedStore,
    session_id: &str,
    text: &str,
) -> bool {
    if let Err(err) = ctx.backend.send_message(session_id, text).await {
        warn!(session_id, %err, "failed to send message");
        ctx.notifier.error(err.user_message("Failed to send message"));
        return false;
    }

    load_messages(ctx, store, session_id).await;
    true
}

/// Uploads the file at `path` as an attachment and reloads on success.
pub async fn send_file(
    ctx: &DeskContext,
    store: &SharedStore,
    session_id: &str,
    path: &Path,
) -> bool {
    let upload = match FileUpload::from_path(path).await {
        Ok(upload) => upload,
        Err(err) => {
            warn!(session_id, path = %path.display(), %err, "cannot read attachment");
            ctx.notifier
                .error(format!("Cannot read file {}: {err}", path.display()));
            return false;
        }
    };

    let file_name = upload.file_name.clone();
    if let Err(err) = ctx.backend.upload_file(session_id, upload).await {
        warn!(session_id, %err, "failed to upload file");
        ctx.notifier.error(err.user_message("Failed to upload file"));
        return false;
    }

    ctx.notifier.info(format!("Sent {file_name}"));
    load_messages(ctx, store, session_id).await;
    true
}
