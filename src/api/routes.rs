//! API route configuration.

use axum::Router;
use axum::routing::{get, post};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::handlers::{
    self, AddedItemResponse, CreateListRequest, ErrorResponse, HealthResponse, ItemResponse,
    ListDetailResponse, ListResponse, SuccessResponse, UpdateListRequest, UpdateListResponse,
};
use super::state::AppState;
use super::static_assets;
use crate::db::DocumentStore;

/// Build routes with generic store type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the DocumentStore trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo MCP API",
        version = "0.1.0",
        description = "Shareable todo lists",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::health,
        handlers::get_list,
        handlers::create_list,
        handlers::update_list,
    ),
    components(
        schemas(
            HealthResponse,
            ListResponse,
            ItemResponse,
            ListDetailResponse,
            CreateListRequest,
            UpdateListRequest,
            AddedItemResponse,
            SuccessResponse,
            UpdateListResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "todos", description = "Todo list endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router, optionally with Scalar docs at `/docs`.
pub fn create_router<D: DocumentStore>(state: AppState<D>, enable_docs: bool) -> Router {
    let todo_routes = routes!(D => {
        get "/health" => handlers::health,
        post "/api/todos" => handlers::create_list,
        get "/api/todos/{list_id}" => handlers::get_list,
        post "/api/todos/{list_id}" => handlers::update_list,
    });

    let widget_routes = Router::new()
        .route("/todos/widget", get(static_assets::serve_widget))
        .route(
            "/todos/widget/{*file}",
            get(static_assets::serve_widget_asset),
        );

    let router = todo_routes.merge(widget_routes);
    let router = if enable_docs {
        router.merge(Scalar::with_url("/docs", ApiDoc::openapi()))
    } else {
        router
    };

    router.with_state(state)
}
