use crate::auth::{ApiKeyAuth, WriteAccess};
use crate::config::Config;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use imgstore_core::{
    ContentId, DeleteBlobOperation, DeleteBlobOperationOutcome, DeleteBlobOperationRequest,
    DeleteNameOperation, DeleteNameOperationOutcome, DeleteNameOperationRequest, ImgStoreError,
    ListNamesOperation, NameIndex, ObjectStore, PutBlobOperation, PutBlobOperationOutcome,
    PutBlobOperationRequest, PutNamedBlobOperation, PutNamedBlobOperationOutcome,
    PutNamedBlobOperationRequest, ReadBlobOperation, ReadBlobOperationOutcome,
    ReadBlobOperationRequest, ReadNamedBlobOperation, ReadNamedBlobOperationOutcome,
    ReadNamedBlobOperationRequest, Result,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const CONTENT_ID_HEADER: &str = "x-content-id";

pub struct ServerState {
    pub auth: ApiKeyAuth,
    pub put_blob: PutBlobOperation,
    pub read_blob: ReadBlobOperation,
    pub delete_blob: DeleteBlobOperation,
    pub put_named_blob: PutNamedBlobOperation,
    pub read_named_blob: ReadNamedBlobOperation,
    pub delete_name: DeleteNameOperation,
    pub list_names: ListNamesOperation,
}

impl ServerState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let layout = config.storage.layout();
        let base_dir = &config.storage.base_dir;

        let object_store = Arc::new(ObjectStore::new(base_dir.clone(), layout)?);
        let name_index = Arc::new(NameIndex::new(base_dir, layout)?);

        Ok(Self {
            auth: ApiKeyAuth::new(config.api_key.clone()),
            put_blob: PutBlobOperation::new(object_store.clone()),
            read_blob: ReadBlobOperation::new(object_store.clone()),
            delete_blob: DeleteBlobOperation::new(object_store.clone()),
            put_named_blob: PutNamedBlobOperation::new(object_store.clone(), name_index.clone()),
            read_named_blob: ReadNamedBlobOperation::new(object_store, name_index.clone()),
            delete_name: DeleteNameOperation::new(name_index.clone()),
            list_names: ListNamesOperation::new(name_index),
        })
    }
}

pub fn build_router(state: Arc<ServerState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/images", post(upload_blob))
        .route("/images/:id", get(download_blob).delete(delete_blob))
        .route("/names", get(list_names))
        .route(
            "/names/:name",
            get(download_named_blob)
                .put(upload_named_blob)
                .post(upload_named_blob)
                .delete(delete_name),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> Result<()> {
    let state = Arc::new(ServerState::from_config(&config)?);

    if !state.auth.is_configured() {
        tracing::warn!("No API key configured; uploads and deletes will be rejected");
    }

    let app = build_router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(
        "Server listening on {}, storage directory {:?}",
        config.bind_addr,
        config.storage.base_dir
    );

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "img-store",
        })),
    )
}

async fn upload_blob(
    _access: WriteAccess,
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Response {
    match state.put_blob.run(PutBlobOperationRequest { body }).await {
        Ok(PutBlobOperationOutcome::Stored(result)) => (
            StatusCode::CREATED,
            Json(json!({
                "id": result.id,
                "status": "uploaded",
                "size": result.size,
            })),
        )
            .into_response(),
        Ok(PutBlobOperationOutcome::AlreadyExists(result)) => (
            StatusCode::OK,
            Json(json!({
                "id": result.id,
                "status": "exists",
            })),
        )
            .into_response(),
        Err(error) => failure_response(error),
    }
}

async fn download_blob(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Response {
    match state.read_blob.run(ReadBlobOperationRequest { id }).await {
        Ok(ReadBlobOperationOutcome::Found(result)) => {
            blob_response(result.content_type, &result.id, result.body)
        }
        Ok(ReadBlobOperationOutcome::NotFound) => not_found(json!({ "error": "Image not found" })),
        Err(error) => failure_response(error),
    }
}

async fn delete_blob(
    _access: WriteAccess,
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Response {
    match state.delete_blob.run(DeleteBlobOperationRequest { id }).await {
        Ok(DeleteBlobOperationOutcome::Deleted(id)) => (
            StatusCode::OK,
            Json(json!({
                "id": id,
                "status": "deleted",
            })),
        )
            .into_response(),
        Ok(DeleteBlobOperationOutcome::NotFound) => {
            not_found(json!({ "error": "Image not found" }))
        }
        Err(error) => failure_response(error),
    }
}

async fn upload_named_blob(
    _access: WriteAccess,
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let request = PutNamedBlobOperationRequest { name, body };

    match state.put_named_blob.run(request).await {
        Ok(PutNamedBlobOperationOutcome::Created(result)) => (
            StatusCode::CREATED,
            Json(json!({
                "name": result.name,
                "id": result.id,
                "status": "created",
                "size": result.size,
            })),
        )
            .into_response(),
        Ok(PutNamedBlobOperationOutcome::Updated {
            result,
            previous_id,
        }) => (
            StatusCode::OK,
            Json(json!({
                "name": result.name,
                "id": result.id,
                "status": "updated",
                "size": result.size,
                "previous_id": previous_id,
            })),
        )
            .into_response(),
        Err(error) => failure_response(error),
    }
}

async fn download_named_blob(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Response {
    match state
        .read_named_blob
        .run(ReadNamedBlobOperationRequest { name })
        .await
    {
        Ok(ReadNamedBlobOperationOutcome::Found(result)) => {
            blob_response(result.content_type, &result.id, result.body)
        }
        Ok(ReadNamedBlobOperationOutcome::NameNotFound) => {
            not_found(json!({ "error": "Name not found" }))
        }
        Ok(ReadNamedBlobOperationOutcome::DataNotFound(id)) => not_found(json!({
            "error": "Image data not found",
            "id": id,
        })),
        Err(error) => failure_response(error),
    }
}

async fn delete_name(
    _access: WriteAccess,
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Response {
    match state
        .delete_name
        .run(DeleteNameOperationRequest { name })
        .await
    {
        Ok(DeleteNameOperationOutcome::Deleted(name)) => (
            StatusCode::OK,
            Json(json!({
                "name": name,
                "status": "deleted",
            })),
        )
            .into_response(),
        Ok(DeleteNameOperationOutcome::NameNotFound) => {
            not_found(json!({ "error": "Name not found" }))
        }
        Err(error) => failure_response(error),
    }
}

async fn list_names(State(state): State<Arc<ServerState>>) -> Response {
    match state.list_names.run().await {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({
                "count": result.names.len(),
                "names": result.names,
            })),
        )
            .into_response(),
        Err(error) => failure_response(error),
    }
}

fn blob_response(content_type: &'static str, id: &ContentId, body: Bytes) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (HeaderName::from_static(CONTENT_ID_HEADER), id.to_string()),
        ],
        body,
    )
        .into_response()
}

fn not_found(body: serde_json::Value) -> Response {
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// Invalid input is echoed back; anything else is logged and reported
/// without internal detail.
fn failure_response(error: ImgStoreError) -> Response {
    match error {
        ImgStoreError::InvalidRequest(message) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": message })),
        )
            .into_response(),
        other => {
            tracing::error!("Request failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}
