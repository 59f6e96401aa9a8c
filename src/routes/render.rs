use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use uuid::Uuid;

use crate::{
    dto::export_dto::RenderQuery,
    error::{Error, Result},
    routes::extract::{Path, Query},
    AppState,
};

/// Print view loaded by the headless browser. Only reachable with a valid signature.
#[axum::debug_handler]
pub async fn render_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RenderQuery>,
) -> Result<impl IntoResponse> {
    let signed = query
        .sig
        .as_deref()
        .is_some_and(|sig| state.pdf_service.is_signed(id, sig));
    if !signed {
        return Err(Error::NotFound("Not found".into()));
    }

    let resume = state.resume_service.get_by_id(id).await?;
    let content = state.resume_service.get_content(resume.id).await?;
    let html = state.render_service.render_resume(&resume, &content)?;
    Ok(Html(html))
}

/// One-shot page staged by the HTML export. Gone after the first read.
#[axum::debug_handler]
pub async fn render_staged_page(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    Query(query): Query<RenderQuery>,
) -> Result<impl IntoResponse> {
    let sig = query.sig.unwrap_or_default();
    match state.pdf_service.take_staged_page(token, &sig).await {
        Some(html) => Ok(Html(html)),
        None => Err(Error::NotFound("Not found".into())),
    }
}
