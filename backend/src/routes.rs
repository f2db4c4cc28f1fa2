use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use todo_shared::{Empty, Envelope, HealthStatus, TodoInput};

use crate::error::TodoError;
use crate::service::TodoService;

#[derive(Clone)]
pub struct AppState {
    pub service: TodoService,
}

/// Which endpoint produced an outcome; selects the envelope texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn success_message(self) -> &'static str {
        match self {
            Operation::List => "Todos read successfully",
            Operation::Read => "Todo read successfully",
            Operation::Create => "Todo created successfully",
            Operation::Update => "Todo updated successfully",
            Operation::Delete => "Todo deleted successfully",
        }
    }

    fn failure_label(self) -> &'static str {
        match self {
            Operation::List => "Error reading todos",
            Operation::Read => "Error reading todo",
            Operation::Create => "Error creating todo",
            Operation::Update => "Error updating todo",
            Operation::Delete => "Error deleting todo",
        }
    }

    fn empty_data(self) -> Value {
        match self {
            Operation::List => json!([]),
            _ => json!({}),
        }
    }
}

/// Envelope for a failed operation.
pub fn failure(operation: Operation, err: &TodoError) -> Envelope<Value> {
    if err.is_not_found() {
        tracing::debug!(?operation, "Todo not found");
        let message = err.to_string();
        return Envelope::failed(json!({}), message.clone(), message);
    }

    tracing::error!(?operation, "{}: {}", operation.failure_label(), err);
    Envelope::failed(
        operation.empty_data(),
        operation.failure_label(),
        err.to_string(),
    )
}

/// Wraps an operation outcome in the envelope. Failures still answer 200.
pub fn respond<T: Serialize>(operation: Operation, result: Result<T, TodoError>) -> Response {
    match result {
        Ok(data) => Json(Envelope::success(data, operation.success_message())).into_response(),
        Err(err) => Json(failure(operation, &err)).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

#[tracing::instrument]
pub async fn health_check_handler() -> Json<HealthStatus> {
    Json(HealthStatus::running())
}

#[tracing::instrument(skip(state))]
pub async fn list_todos(State(state): State<AppState>) -> Response {
    respond(Operation::List, state.service.list().await)
}

#[tracing::instrument(skip(state))]
pub async fn get_todo(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(Operation::Read, state.service.get(&id).await)
}

#[tracing::instrument(skip(state))]
pub async fn get_todo_by_title(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> Response {
    respond(Operation::Read, state.service.get_by_title(&query.title).await)
}

#[tracing::instrument(skip(state))]
pub async fn create_todo(
    State(state): State<AppState>,
    Json(payload): Json<TodoInput>,
) -> Response {
    respond(Operation::Create, state.service.create(payload).await)
}

#[tracing::instrument(skip(state))]
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TodoInput>,
) -> Response {
    let result = state.service.update(&id, payload).await.map(|()| Empty {});
    respond(Operation::Update, result)
}

#[tracing::instrument(skip(state))]
pub async fn delete_todo(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.service.delete(&id).await.map(|()| Empty {});
    respond(Operation::Delete, result)
}

/// Creates the router for the todo endpoints and the root health check.
pub fn create_router(service: TodoService) -> Router {
    Router::new()
        .route("/", get(health_check_handler))
        .route("/todos", get(list_todos))
        .route("/todos/:id", get(get_todo))
        .route("/fetch_todo_by_title", get(get_todo_by_title))
        .route("/create_todo", post(create_todo))
        .route("/update_todo/:id", put(update_todo))
        .route("/delete_todo/:id", delete(delete_todo))
        .with_state(AppState { service })
}
