//! Notification routes.
//!
//! The session holds a `NotificationCenter` carrying locally raised
//! notifications and tombstones for deleted server ones. Reads merge the
//! server feed into it; the center enforces the cap, ordering, dedup
//! window, and tombstone filtering in one place.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use boutique_core::{Notification, NotificationCenter, NotificationId, NotificationKind};

use crate::db::notifications::NotificationRepository;
use crate::error::AppError;
use crate::middleware::auth::OptionalAuth;
use crate::models::session::keys;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequest {
    pub message: String,
    #[serde(default)]
    pub kind: NotificationKind,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedView {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

async fn load_center(session: &Session) -> Result<NotificationCenter, AppError> {
    Ok(session
        .get(keys::LOCAL_NOTIFICATIONS)
        .await?
        .unwrap_or_default())
}

async fn save_center(session: &Session, center: &NotificationCenter) -> Result<(), AppError> {
    session.insert(keys::LOCAL_NOTIFICATIONS, center).await?;
    Ok(())
}

fn view(center: &NotificationCenter) -> FeedView {
    FeedView {
        notifications: center.notifications().to_vec(),
        unread_count: center.unread_count(),
    }
}

/// `GET /api/notifications` - The merged notification feed.
///
/// For signed-in users the server feed is fetched and merged in;
/// tombstoned ids stay gone and local notifications are kept.
pub async fn feed(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<FeedView>, AppError> {
    let mut center = load_center(&session).await?;

    if let Some(user) = user {
        let fetched = NotificationRepository::new(state.pool())
            .list_for_user(user.id)
            .await?;
        center.merge_server(fetched);
        save_center(&session, &center).await?;
    }

    Ok(Json(view(&center)))
}

/// `POST /api/notifications` - Raise a local notification.
///
/// A duplicate `(message, kind)` inside the dedup window is dropped and
/// answered with the unchanged feed.
pub async fn push(
    session: Session,
    Json(body): Json<PushRequest>,
) -> Result<(StatusCode, Json<FeedView>), AppError> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message is required".to_owned()));
    }

    let mut center = load_center(&session).await?;
    let accepted = center.push(Notification::local(message, body.kind));
    save_center(&session, &center).await?;

    let status = if accepted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(view(&center))))
}

/// `PATCH /api/notifications/{id}/read` - Mark one notification read.
pub async fn mark_read(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<NotificationId>,
) -> Result<Json<FeedView>, AppError> {
    let mut center = load_center(&session).await?;

    let is_server = center
        .notifications()
        .iter()
        .any(|n| n.id == id && n.server_origin);

    if !center.mark_read(id) {
        return Err(AppError::NotFound("notification"));
    }
    save_center(&session, &center).await?;

    if is_server && let Some(user) = user {
        // Session already reflects the read; a missing row is not an error
        match NotificationRepository::new(state.pool())
            .mark_read(user.id, id)
            .await
        {
            Ok(()) | Err(crate::db::RepositoryError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Json(view(&center)))
}

/// `POST /api/notifications/read-all` - Mark every notification read.
pub async fn mark_all_read(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<FeedView>, AppError> {
    let mut center = load_center(&session).await?;
    center.mark_all_read();
    save_center(&session, &center).await?;

    if let Some(user) = user {
        NotificationRepository::new(state.pool())
            .mark_all_read(user.id)
            .await?;
    }

    Ok(Json(view(&center)))
}

/// `DELETE /api/notifications/{id}` - Remove a notification.
///
/// Server-origin removals are tombstoned in both the session and the
/// database so a later merge can't resurrect them.
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<NotificationId>,
) -> Result<Json<FeedView>, AppError> {
    let mut center = load_center(&session).await?;

    let is_server = center
        .notifications()
        .iter()
        .any(|n| n.id == id && n.server_origin);

    if !center.remove(id) {
        return Err(AppError::NotFound("notification"));
    }
    save_center(&session, &center).await?;

    if is_server && let Some(user) = user {
        NotificationRepository::new(state.pool())
            .delete(user.id, id)
            .await?;
    }

    Ok(Json(view(&center)))
}

/// `DELETE /api/notifications` - Clear the whole feed.
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<StatusCode, AppError> {
    let mut center = load_center(&session).await?;
    center.clear_all();
    save_center(&session, &center).await?;

    if let Some(user) = user {
        NotificationRepository::new(state.pool())
            .delete_all(user.id)
            .await?;
    }

    Ok(StatusCode::NO_CONTENT)
}
