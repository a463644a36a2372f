//! Serve command - exposes the tree page handlers as a JSON API.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::Mutex;

use nestree::{
    Attributes, InMemory, NodeId, TreePage,
    page::{self, NodeMoved, TreeBranch},
};

use crate::backend::{build_page, open_store, save_store};
use crate::cli::ServeArgs;

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<InMemory>,
    /// Page operations run one at a time.
    page: Arc<Mutex<TreePage>>,
}

/// Query of GET /api/parents
#[derive(Deserialize)]
struct ParentsQuery {
    for_node: Option<NodeId>,
}

/// Body of POST /api/nodes
#[derive(Deserialize)]
struct CreateRequest {
    parent: Option<NodeId>,
    #[serde(default)]
    attributes: Attributes,
}

/// Body of PUT /api/nodes/{id}
#[derive(Deserialize)]
struct EditRequest {
    parent: Option<NodeId>,
    #[serde(default)]
    attributes: Attributes,
}

/// Library errors mapped onto HTTP statuses.
struct ApiError(nestree::Error);

impl From<nestree::Error> for ApiError {
    fn from(err: nestree::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.0.is_operation_rejected() || self.0.is_logical_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else if self.0.is_structural_corruption() {
            StatusCode::CONFLICT
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self.0);
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Run the nestree server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&args.store)?;
    let page = build_page(store.clone(), &args.store)?;
    tracing::info!("Serving {} nodes from {}", store.len(), args.store.file.display());

    let app_state = AppState {
        store,
        page: Arc::new(Mutex::new(page)),
    };

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/tree", get(handle_tree))
        .route("/api/parents", get(handle_parents))
        .route("/api/move", post(handle_move))
        .route("/api/fix", post(handle_fix))
        .route("/api/nodes", post(handle_create))
        .route("/api/nodes/{id}", axum::routing::put(handle_edit).delete(handle_delete))
        .route("/api/nodes/{id}/toggle", post(handle_toggle))
        .with_state(app_state.clone());

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    println!("nestree server listening on http://{local_addr}");
    println!();
    println!("Available endpoints:");
    println!("  GET    /health                - Health check");
    println!("  GET    /api/tree              - Nested tree");
    println!("  GET    /api/parents           - Parent options (?for_node=ID)");
    println!("  POST   /api/move              - Drag-and-drop move");
    println!("  POST   /api/fix               - Rebuild tree structure");
    println!("  POST   /api/nodes             - Create node");
    println!("  PUT    /api/nodes/{{id}}        - Edit node");
    println!("  DELETE /api/nodes/{{id}}        - Delete node");
    println!("  POST   /api/nodes/{{id}}/toggle - Collapse or expand a row");
    println!();
    println!("Press Ctrl+C to shutdown");

    let store_args = args.store.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;

            // Save the store on shutdown
            match save_store(&app_state.store, &store_args) {
                Ok(()) => {
                    tracing::info!("Store saved to {}", store_args.file.display());
                    println!("\nStore saved successfully");
                }
                Err(e) => {
                    tracing::error!("Failed to save store: {e}");
                    eprintln!("Failed to save store: {e}");
                }
            }
        })
        .await?;

    println!("Server shut down");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => Some(sigterm),
        Err(e) => {
            tracing::warn!("Failed to set up SIGTERM handler: {e}");
            None
        }
    };
    let terminate = async {
        match sigterm.as_mut() {
            Some(sigterm) => {
                sigterm.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
        _ = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// Handler for GET /health
async fn handle_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "nodes": state.store.len(),
    }))
}

/// Handler for GET /api/tree
async fn handle_tree(State(state): State<AppState>) -> ApiResult<Vec<TreeBranch>> {
    let page = state.page.lock().await;
    Ok(Json(page.tree()?))
}

/// Handler for GET /api/parents
async fn handle_parents(
    State(state): State<AppState>,
    Query(query): Query<ParentsQuery>,
) -> ApiResult<serde_json::Value> {
    let page = state.page.lock().await;
    let for_node = query.for_node.map(|id| page.scope().find(id)).transpose()?;
    let select = page.parent_select()?;

    let eligible: HashSet<NodeId> = select
        .eligible_options(for_node.as_ref())?
        .into_iter()
        .map(|option| option.id)
        .collect();
    let options: Vec<serde_json::Value> = select
        .options()
        .iter()
        .map(|option| {
            serde_json::json!({
                "id": option.id,
                "label": option.label,
                "disabled": !eligible.contains(&option.id),
            })
        })
        .collect();
    Ok(Json(serde_json::json!({
        "label": select.label(),
        "options": options,
    })))
}

/// Handler for POST /api/move
async fn handle_move(
    State(state): State<AppState>,
    Json(moved): Json<NodeMoved>,
) -> ApiResult<page::Response> {
    let page = state.page.lock().await;
    Ok(Json(page.on_node_moved(moved)?))
}

/// Handler for POST /api/fix
async fn handle_fix(State(state): State<AppState>) -> Json<page::Response> {
    let page = state.page.lock().await;
    Json(page.on_fix_tree_requested())
}

/// Handler for POST /api/nodes
async fn handle_create(
    State(state): State<AppState>,
    Json(request): Json<CreateRequest>,
) -> ApiResult<serde_json::Value> {
    let page = state.page.lock().await;
    let (node, response) = page.create_node(request.parent, request.attributes)?;
    Ok(Json(serde_json::json!({ "node": node, "response": response })))
}

/// Handler for PUT /api/nodes/{id}
async fn handle_edit(
    State(state): State<AppState>,
    Path(id): Path<NodeId>,
    Json(request): Json<EditRequest>,
) -> ApiResult<serde_json::Value> {
    let page = state.page.lock().await;
    let (node, response) = page.edit_node(id, request.attributes, request.parent)?;
    Ok(Json(serde_json::json!({ "node": node, "response": response })))
}

/// Handler for DELETE /api/nodes/{id}
async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<NodeId>,
) -> ApiResult<page::Response> {
    let page = state.page.lock().await;
    Ok(Json(page.delete_node(id)?))
}

/// Handler for POST /api/nodes/{id}/toggle
async fn handle_toggle(
    State(state): State<AppState>,
    Path(id): Path<NodeId>,
) -> Json<serde_json::Value> {
    let page = state.page.lock().await;
    let collapsed = page.toggle_collapsed(id);
    Json(serde_json::json!({ "id": id, "collapsed": collapsed }))
}
