use crate::error::Result;
use crate::model::{CreateUrlRequest, UrlResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use tinylink_core::ShortCode;
use tracing::info;

pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UrlResponse>)> {
    let Json(request) = payload?;
    let cancel = state.request_token();

    let record = state
        .shortener()
        .create_short_url(&request.original_url, &cancel)
        .await?;
    info!(code = %record.short_code, "short url ready");

    let short_url = state.short_url(&record.short_code);
    Ok((StatusCode::CREATED, Json(UrlResponse::new(record, short_url))))
}

pub async fn get_url_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<UrlResponse>> {
    let code = ShortCode::new(short_code)?;
    let cancel = state.request_token();

    let record = state.shortener().get_original_url(&code, &cancel).await?;

    let short_url = state.short_url(&code);
    Ok(Json(UrlResponse::new(record, short_url)))
}

pub async fn record_click_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<StatusCode> {
    let code = ShortCode::new(short_code)?;
    let cancel = state.request_token();

    state.shortener().increment_clicks(&code, &cancel).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Redirect> {
    let code = ShortCode::new(short_code)?;
    let cancel = state.request_token();

    let record = state.shortener().visit(&code, &cancel).await?;
    Ok(Redirect::temporary(&record.original_url))
}
