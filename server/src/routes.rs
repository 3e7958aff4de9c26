use std::{path::Path, sync::Arc};

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header::CONTENT_TYPE},
    response::{Html, IntoResponse},
};
use serde_json::Value;
use tokio::fs::{read, read_to_string};

use crate::{
    error::AppError,
    profile::{load_profile, save_profile},
    state::AppState,
    utils::parse_profile_fields,
};

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let page = read_to_string(Path::new(&state.config.assets_dir).join("index.html")).await?;

    Ok(Html(page))
}

pub async fn profile_picture_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let image = read(Path::new(&state.config.assets_dir).join("profile.jpg")).await?;

    // the page expects the original's exact (if nonstandard) subtype
    Ok(([(CONTENT_TYPE, "image/jpg")], image))
}

pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let fields = parse_profile_fields(&headers, &body)?;
    let merged = save_profile(&state.database, fields).await?;

    Ok(Json(Value::Object(merged)))
}

pub async fn get_profile_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(Value::Object(load_profile(&state.database).await))
}
