use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};
use tracing::error;
use uuid::Uuid;

use crate::envelope::{ListResponse, MessageResponse};
use crate::extractor::AuthUser;

/// One persisted AI-generated or AI-edited artifact. Immutable after insert
/// except for the like set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Creation {
    pub id: Uuid,
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    pub kind: String,
    pub publish: bool,
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationKind {
    Article,
    BlogTitle,
    Image,
    ResumeReview,
}

impl CreationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationKind::Article => "article",
            CreationKind::BlogTitle => "blog-title",
            CreationKind::Image => "image",
            CreationKind::ResumeReview => "resume-review",
        }
    }
}

/// Inserts one creation inside the caller's transaction.
pub async fn insert_creation(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
    prompt: &str,
    content: &str,
    kind: CreationKind,
    publish: bool,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO creations (id, user_id, prompt, content, kind, publish) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(user_id)
    .bind(prompt)
    .bind(content)
    .bind(kind.as_str())
    .bind(publish)
    .execute(&mut **tx)
    .await?;
    Ok(id)
}

/// Flips the caller's membership in a creation's like set. A single
/// conditional UPDATE, so concurrent toggles for the same record serialize on
/// the row instead of losing updates. Returns the post-toggle membership, or
/// `None` when the record does not exist.
pub async fn toggle_like(
    pool: &PgPool,
    creation_id: Uuid,
    user_id: &str,
) -> Result<Option<bool>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE creations
        SET likes = CASE
            WHEN $2 = ANY(likes) THEN array_remove(likes, $2)
            ELSE array_append(likes, $2)
        END
        WHERE id = $1
        RETURNING $2 = ANY(likes) AS liked
        "#,
    )
    .bind(creation_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| r.get("liked")))
}

/// All published creations, newest first, across all users.
pub async fn list_published(pool: &PgPool) -> Result<Vec<Creation>, sqlx::Error> {
    sqlx::query_as::<_, Creation>(
        "SELECT * FROM creations WHERE publish = TRUE ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

/// One user's creations, newest first, regardless of publish state.
pub async fn list_own(pool: &PgPool, user_id: &str) -> Result<Vec<Creation>, sqlx::Error> {
    sqlx::query_as::<_, Creation>(
        "SELECT * FROM creations WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_user_creations(
    Extension(pool): Extension<PgPool>,
    AuthUser { user_id, .. }: AuthUser,
) -> Json<ListResponse> {
    match list_own(&pool, &user_id).await {
        Ok(creations) => Json(ListResponse::ok(creations)),
        Err(err) => {
            error!(error = %err, "failed to list user creations");
            Json(ListResponse::fail("Failed to load creations."))
        }
    }
}

pub async fn get_published_creations(
    Extension(pool): Extension<PgPool>,
    _user: AuthUser,
) -> Json<ListResponse> {
    match list_published(&pool).await {
        Ok(creations) => Json(ListResponse::ok(creations)),
        Err(err) => {
            error!(error = %err, "failed to list published creations");
            Json(ListResponse::fail("Failed to load creations."))
        }
    }
}

#[derive(Deserialize)]
pub struct ToggleLikeRequest {
    #[serde(rename = "creationId")]
    pub creation_id: String,
}

pub async fn toggle_like_creations(
    Extension(pool): Extension<PgPool>,
    AuthUser { user_id, .. }: AuthUser,
    Json(payload): Json<ToggleLikeRequest>,
) -> Json<MessageResponse> {
    let Ok(creation_id) = Uuid::parse_str(payload.creation_id.trim()) else {
        return Json(MessageResponse::fail("Creation not found."));
    };
    match toggle_like(&pool, creation_id, &user_id).await {
        Ok(Some(true)) => Json(MessageResponse::ok("Creation liked.")),
        Ok(Some(false)) => Json(MessageResponse::ok("Like removed.")),
        Ok(None) => Json(MessageResponse::fail("Creation not found.")),
        Err(err) => {
            error!(error = %err, %creation_id, "failed to toggle like");
            Json(MessageResponse::fail("Failed to update like."))
        }
    }
}
