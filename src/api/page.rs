//! Server-rendered profile page.

use axum::{extract::State, response::Html};

use crate::models::default_document;
use crate::render;
use crate::AppState;

/// GET / - The profile page, rendered from the stored (or default) document.
pub async fn profile_page(State(state): State<AppState>) -> Html<String> {
    let document = match state.repo.get_config().await {
        Ok(Some(doc)) => doc,
        Ok(None) => default_document(),
        Err(e) => {
            tracing::warn!("Config read failed, rendering default document: {}", e);
            default_document()
        }
    };

    Html(render::render_page(&document))
}
