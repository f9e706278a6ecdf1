//! Todo list handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

use super::{ApiFailure, ErrorResponse, failure, json_payload};
use crate::api::AppState;
use crate::db::{DbError, DocumentStore, TodoItem, TodoList};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    #[schema(example = "3f9c2a7b1d4e6f80")]
    pub id: String,
    #[schema(example = "Groceries")]
    pub title: String,
    /// Opaque token for sharing the list by link
    pub share_token: String,
    #[schema(example = "2025-03-01T12:00:00.000Z")]
    pub created_at: String,
}

impl From<TodoList> for ListResponse {
    fn from(list: TodoList) -> Self {
        Self {
            id: list.id,
            title: list.title,
            share_token: list.share_token,
            created_at: list.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: String,
    #[schema(example = "Buy milk")]
    pub text: String,
    pub completed: bool,
    pub order: Option<i64>,
    pub created_at: String,
}

impl From<TodoItem> for ItemResponse {
    fn from(item: TodoItem) -> Self {
        Self {
            id: item.id,
            text: item.text,
            completed: item.completed,
            order: item.order,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListDetailResponse {
    pub list: ListResponse,
    /// Items ordered by `order` ascending
    pub items: Vec<ItemResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListRequest {
    #[schema(example = "Groceries")]
    pub title: String,
}

/// Item mutation. `action` is one of `add`, `toggle` or `delete`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListRequest {
    #[schema(example = "add")]
    pub action: String,
    /// Target item for `toggle` and `delete`
    pub item_id: Option<String>,
    /// Item text for `add`
    pub text: Option<String>,
    /// New completed state for `toggle`
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddedItemResponse {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub order: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum UpdateListResponse {
    Added(AddedItemResponse),
    Success(SuccessResponse),
}

const LIST_NOT_FOUND: &str = "List not found";
const FETCH_FAILED: &str = "Failed to fetch list";
const UPDATE_FAILED: &str = "Failed to update list";

// =============================================================================
// Handlers
// =============================================================================

/// Get a list and its items
#[utoipa::path(
    get,
    path = "/api/todos/{list_id}",
    tag = "todos",
    params(("list_id" = String, Path, description = "List ID")),
    responses(
        (status = 200, description = "List with items", body = ListDetailResponse),
        (status = 404, description = "List not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_list<D: DocumentStore>(
    State(state): State<AppState<D>>,
    Path(list_id): Path<String>,
) -> Result<Json<ListDetailResponse>, ApiFailure> {
    let todos = state.store().todos();

    let backend_error = |e: DbError| {
        error!(list_id = %list_id, error = %e, "Failed to fetch list");
        failure(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED)
    };

    let list = todos
        .get_list(&list_id)
        .await
        .map_err(backend_error)?
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, LIST_NOT_FOUND))?;

    let items = todos
        .items_by_order(&list_id)
        .await
        .map_err(backend_error)?;

    Ok(Json(ListDetailResponse {
        list: list.into(),
        items: items.into_iter().map(ItemResponse::from).collect(),
    }))
}

/// Create a list
#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "todos",
    request_body = CreateListRequest,
    responses(
        (status = 201, description = "List created", body = ListResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_list<D: DocumentStore>(
    State(state): State<AppState<D>>,
    payload: Result<Json<CreateListRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ListResponse>), ApiFailure> {
    let req = json_payload(payload)?;
    let title = req.title.trim();
    if title.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "Title is required"));
    }

    let list = state
        .store()
        .todos()
        .create_list(title)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create list");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create list")
        })?;

    Ok((StatusCode::CREATED, Json(list.into())))
}

/// Add, toggle or delete an item
#[utoipa::path(
    post,
    path = "/api/todos/{list_id}",
    tag = "todos",
    params(("list_id" = String, Path, description = "List ID")),
    request_body = UpdateListRequest,
    responses(
        (status = 200, description = "Added item, or success flag", body = UpdateListResponse),
        (status = 400, description = "Invalid action or missing field", body = ErrorResponse),
        (status = 404, description = "List not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_list<D: DocumentStore>(
    State(state): State<AppState<D>>,
    Path(list_id): Path<String>,
    payload: Result<Json<UpdateListRequest>, JsonRejection>,
) -> Result<Json<UpdateListResponse>, ApiFailure> {
    let req = json_payload(payload)?;
    let todos = state.store().todos();

    let backend_error = |e: DbError| match e {
        DbError::NotFound { .. } => failure(StatusCode::NOT_FOUND, LIST_NOT_FOUND),
        e => {
            error!(list_id = %list_id, error = %e, "Failed to update list");
            failure(StatusCode::INTERNAL_SERVER_ERROR, UPDATE_FAILED)
        }
    };

    match req.action.as_str() {
        "add" => {
            let text = req
                .text
                .as_deref()
                .filter(|text| !text.trim().is_empty())
                .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "Text is required"))?;

            let item = todos
                .add_item(&list_id, text)
                .await
                .map_err(backend_error)?;

            Ok(Json(UpdateListResponse::Added(AddedItemResponse {
                id: item.id,
                text: item.text,
                completed: item.completed,
                order: item.order,
            })))
        }
        "toggle" => {
            let item_id = require_item_id(&req)?;
            let completed = req
                .completed
                .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "completed is required"))?;

            let matched = todos
                .set_completed(&list_id, item_id, completed)
                .await
                .map_err(backend_error)?;
            if !matched {
                debug!(list_id = %list_id, item_id = %item_id, "Toggle matched no item");
            }

            Ok(Json(UpdateListResponse::Success(SuccessResponse {
                success: true,
            })))
        }
        "delete" => {
            let item_id = require_item_id(&req)?;

            let deleted = todos
                .delete_item(&list_id, item_id)
                .await
                .map_err(backend_error)?;
            if !deleted {
                debug!(list_id = %list_id, item_id = %item_id, "Delete matched no item");
            }

            Ok(Json(UpdateListResponse::Success(SuccessResponse {
                success: true,
            })))
        }
        _ => Err(failure(StatusCode::BAD_REQUEST, "Invalid action")),
    }
}

fn require_item_id(req: &UpdateListRequest) -> Result<&str, ApiFailure> {
    req.item_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "itemId is required"))
}
