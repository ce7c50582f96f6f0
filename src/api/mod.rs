pub mod dto;
pub mod handlers;
pub mod page;

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::poller::PollService;
use handlers::ApiDoc;

pub fn router(poller: PollService) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/refresh", post(handlers::refresh))
        .with_state(poller)
        .split_for_parts();

    router
        .route("/", get(page::index))
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
