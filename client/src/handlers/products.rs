use common::types::Product;
use tracing::{debug, warn};

use crate::{
    handlers::{DeskContext, load_messages},
    types::{EditorMode, SharedState},
};

/// Runs a product search and shows its outcome in the product panel.
///
/// Returns `false` when nothing was searched (empty term) or the result was
/// superseded by a newer search.
pub async fn search_products(ctx: &DeskContext, state: &SharedState, term: &str) -> bool {
    let generation = {
        let mut app = state.lock().await;
        app.products.begin_search(term)
    };
    ctx.redraw.request();

    let Some(generation) = generation else {
        return false;
    };

    let outcome = ctx
        .backend
        .search_products(term.trim())
        .await
        .map_err(|err| {
            warn!(%err, "product search failed");
            err.user_message("Error searching products")
        });

    let applied = state.lock().await.products.finish_search(generation, outcome);
    if !applied {
        debug!(generation, "discarding superseded product search");
    }

    ctx.redraw.request();
    applied
}

/// Sends a link to `product` into `session_id`.
///
/// On success the panel closes and the conversation reloads once; on
/// failure the panel stays open.
pub async fn select_product(
    ctx: &DeskContext,
    state: &SharedState,
    session_id: &str,
    product: &Product,
) -> bool {
    if let Err(err) = ctx.backend.send_product_link(session_id, &product.id).await {
        warn!(session_id, product_id = %product.id, %err, "failed to send product link");
        ctx.notifier
            .error(err.user_message("Failed to send product link"));
        return false;
    }

    let store = {
        let mut app = state.lock().await;
        app.products.close();
        if app.mode == EditorMode::SEARCH {
            app.switch_mode(EditorMode::NORMAL);
            app.clear_input();
        }

        app.detail
            .as_ref()
            .filter(|view| view.session_id() == session_id)
            .map(|view| view.store.clone())
    };

    ctx.notifier.info(format!("Sent link to {}", product.title));
    if let Some(store) = store {
        load_messages(ctx, &store, session_id).await;
    }

    ctx.redraw.request();
    true
}
