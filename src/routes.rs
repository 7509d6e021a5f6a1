use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{creations, generation};

/// Ceiling on multipart request bodies. Generous on purpose: the resume size
/// rule is a domain decision and must be reported through the envelope, not
/// as a transport 413.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub fn api_routes() -> Router {
    Router::new()
        .route("/api/ai/generate-article", post(generation::generate_article))
        .route(
            "/api/ai/generate-blog-title",
            post(generation::generate_blog_title),
        )
        .route("/api/ai/generate-image", post(generation::generate_image))
        .route(
            "/api/ai/remove-image-background",
            post(generation::remove_image_background),
        )
        .route(
            "/api/ai/remove-image-object",
            post(generation::remove_image_object),
        )
        .route("/api/ai/resume-review", post(generation::resume_review))
        .route(
            "/api/user/get-user-creations",
            get(creations::get_user_creations),
        )
        .route(
            "/api/user/get-published-creations",
            get(creations::get_published_creations),
        )
        .route(
            "/api/user/toggle-like-creations",
            post(creations::toggle_like_creations),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
