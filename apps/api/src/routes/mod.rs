pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::courses::handlers as courses;
use crate::learning_plan::handlers as plans;
use crate::state::AppState;
use crate::users::handlers as users;
use crate::users::resume::MAX_RESUME_BYTES;

/// Multipart framing on top of the PDF itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Users
        .route("/api/v1/users", post(users::handle_create_user))
        .route("/api/v1/users/:id", get(users::handle_get_user))
        .route(
            "/api/v1/users/:id/resume",
            post(users::handle_upload_resume)
                .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES + MULTIPART_OVERHEAD)),
        )
        // Learning plans
        .route(
            "/api/v1/learning-plans/current",
            get(plans::handle_get_current),
        )
        .route(
            "/api/v1/learning-plans/regenerate",
            post(plans::handle_regenerate),
        )
        .route(
            "/api/v1/learning-plans/progress",
            patch(plans::handle_update_progress),
        )
        // Course catalog
        .route("/api/v1/courses", get(courses::handle_list_courses))
        .route("/api/v1/courses/:slug", get(courses::handle_get_course))
        .route("/api/v1/lessons/:slug", get(courses::handle_get_lesson))
        .with_state(state)
}
