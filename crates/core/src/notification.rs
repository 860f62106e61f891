//! Bounded, de-duplicated notification center.
//!
//! Notifications come from two sources: locally generated events and
//! server-fetched notifications. The center merges both, newest first,
//! capped at [`MAX_NOTIFICATIONS`] entries. Identical `(message, kind)`
//! pairs arriving within [`DEDUP_WINDOW_MS`] are suppressed as
//! duplicates. Deleting a server-origin notification records its id in a
//! tombstone set so a later fetch cannot resurrect it.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::NotificationId;

/// Maximum entries the center retains.
pub const MAX_NOTIFICATIONS: usize = 50;

/// Duplicate suppression window in milliseconds.
pub const DEDUP_WINDOW_MS: i64 = 2000;

/// Notification severity / styling category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    /// Stable string form, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Parse the stable string form. Unknown values fall back to `Info`.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    /// Whether this notification was fetched from the server (as opposed
    /// to generated locally). Server-origin deletions are tombstoned.
    pub server_origin: bool,
}

impl Notification {
    /// Create a locally generated, unread notification stamped now.
    #[must_use]
    pub fn local(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            id: NotificationId::new(),
            message: message.into(),
            kind,
            timestamp: Utc::now(),
            read: false,
            server_origin: false,
        }
    }
}

/// Holds the merged notification list and the deleted-id tombstones.
///
/// ## Invariants
///
/// - At most [`MAX_NOTIFICATIONS`] entries, ordered newest first.
/// - No two entries share `(message, kind)` within the dedup window.
/// - No entry's id appears in the tombstone set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCenter {
    notifications: Vec<Notification>,
    deleted_server_ids: HashSet<NotificationId>,
}

impl NotificationCenter {
    /// Create an empty center.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entries, newest first.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Tombstoned server notification ids.
    #[must_use]
    pub const fn deleted_server_ids(&self) -> &HashSet<NotificationId> {
        &self.deleted_server_ids
    }

    /// Number of unread entries.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Add a notification, newest first.
    ///
    /// Returns `false` (and stores nothing) when an existing entry has
    /// the same `(message, kind)` and a timestamp within the last
    /// [`DEDUP_WINDOW_MS`] milliseconds, or when the id is tombstoned.
    /// The list is truncated to [`MAX_NOTIFICATIONS`], evicting the
    /// oldest entries.
    pub fn push(&mut self, notification: Notification) -> bool {
        if self.deleted_server_ids.contains(&notification.id) {
            return false;
        }

        let window = Duration::milliseconds(DEDUP_WINDOW_MS);
        let duplicate = self.notifications.iter().any(|existing| {
            existing.message == notification.message
                && existing.kind == notification.kind
                && (notification.timestamp - existing.timestamp).abs() < window
        });
        if duplicate {
            return false;
        }

        self.notifications.insert(0, notification);
        self.notifications.truncate(MAX_NOTIFICATIONS);
        true
    }

    /// Merge server-fetched notifications with the local ones.
    ///
    /// Locally generated entries are kept as-is; the server subset is
    /// replaced wholesale by `fetched` minus any tombstoned ids. The
    /// result is sorted by timestamp descending and truncated to
    /// [`MAX_NOTIFICATIONS`].
    pub fn merge_server(&mut self, fetched: Vec<Notification>) {
        let mut merged: Vec<Notification> = self
            .notifications
            .drain(..)
            .filter(|n| !n.server_origin)
            .collect();

        merged.extend(
            fetched
                .into_iter()
                .filter(|n| !self.deleted_server_ids.contains(&n.id))
                .map(|mut n| {
                    n.server_origin = true;
                    n
                }),
        );

        merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        merged.truncate(MAX_NOTIFICATIONS);
        self.notifications = merged;
    }

    /// Mark one entry read. Returns whether it was found.
    pub fn mark_read(&mut self, id: NotificationId) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    /// Mark every entry read.
    pub fn mark_all_read(&mut self) {
        for n in &mut self.notifications {
            n.read = true;
        }
    }

    /// Remove one entry. Server-origin removals are tombstoned so a
    /// subsequent [`Self::merge_server`] cannot reintroduce the id.
    ///
    /// Returns whether the entry was found.
    pub fn remove(&mut self, id: NotificationId) -> bool {
        let Some(pos) = self.notifications.iter().position(|n| n.id == id) else {
            return false;
        };
        let removed = self.notifications.remove(pos);
        if removed.server_origin {
            self.deleted_server_ids.insert(removed.id);
        }
        true
    }

    /// Remove every entry, tombstoning the server-origin ones.
    pub fn clear_all(&mut self) {
        for n in self.notifications.drain(..) {
            if n.server_origin {
                self.deleted_server_ids.insert(n.id);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(offset_ms: i64, message: &str, kind: NotificationKind) -> Notification {
        Notification {
            timestamp: Utc::now() + Duration::milliseconds(offset_ms),
            ..Notification::local(message, kind)
        }
    }

    fn server(offset_ms: i64, message: &str) -> Notification {
        Notification {
            server_origin: true,
            ..at(offset_ms, message, NotificationKind::Info)
        }
    }

    #[test]
    fn test_duplicate_within_window_suppressed() {
        // Property: same (message, kind) twice within 2s stores one entry.
        let mut center = NotificationCenter::new();
        assert!(center.push(at(0, "Added to cart", NotificationKind::Success)));
        assert!(!center.push(at(500, "Added to cart", NotificationKind::Success)));
        assert_eq!(center.notifications().len(), 1);
    }

    #[test]
    fn test_same_message_different_kind_kept() {
        let mut center = NotificationCenter::new();
        assert!(center.push(at(0, "Stock low", NotificationKind::Warning)));
        assert!(center.push(at(100, "Stock low", NotificationKind::Error)));
        assert_eq!(center.notifications().len(), 2);
    }

    #[test]
    fn test_duplicate_after_window_kept() {
        let mut center = NotificationCenter::new();
        assert!(center.push(at(0, "Saved", NotificationKind::Success)));
        assert!(center.push(at(2500, "Saved", NotificationKind::Success)));
        assert_eq!(center.notifications().len(), 2);
    }

    #[test]
    fn test_older_message_outside_window_kept() {
        // The window bounds the difference in both directions; a message
        // stamped long before an existing entry is not a duplicate.
        let mut center = NotificationCenter::new();
        assert!(center.push(at(60_000, "Saved", NotificationKind::Success)));
        assert!(center.push(at(0, "Saved", NotificationKind::Success)));
        assert!(!center.push(at(59_000, "Saved", NotificationKind::Success)));
        assert_eq!(center.notifications().len(), 2);
    }

    #[test]
    fn test_cap_never_exceeded() {
        // Property: length never exceeds 50 after any push sequence.
        let mut center = NotificationCenter::new();
        for i in 0..120 {
            center.push(at(
                i64::from(i) * 3000,
                &format!("event {i}"),
                NotificationKind::Info,
            ));
        }
        assert_eq!(center.notifications().len(), MAX_NOTIFICATIONS);
        // Newest first: the last pushed event is at the head.
        assert_eq!(center.notifications()[0].message, "event 119");
    }

    #[test]
    fn test_removed_server_id_never_resurrected() {
        // Property: removing a server-origin id and re-fetching never
        // reintroduces that id.
        let mut center = NotificationCenter::new();
        let fetched = vec![server(0, "Order shipped"), server(100, "Sale started")];
        let shipped_id = fetched[0].id;
        center.merge_server(fetched.clone());
        assert_eq!(center.notifications().len(), 2);

        assert!(center.remove(shipped_id));
        center.merge_server(fetched);

        assert_eq!(center.notifications().len(), 1);
        assert!(center.notifications().iter().all(|n| n.id != shipped_id));
    }

    #[test]
    fn test_merge_keeps_local_and_sorts_descending() {
        let mut center = NotificationCenter::new();
        center.push(at(50, "local event", NotificationKind::Success));
        center.merge_server(vec![server(0, "older"), server(100, "newer")]);

        let messages: Vec<_> = center
            .notifications()
            .iter()
            .map(|n| n.message.as_str())
            .collect();
        assert_eq!(messages, vec!["newer", "local event", "older"]);
    }

    #[test]
    fn test_local_removal_not_tombstoned() {
        let mut center = NotificationCenter::new();
        let n = at(0, "local", NotificationKind::Info);
        let id = n.id;
        center.push(n);

        assert!(center.remove(id));
        assert!(center.deleted_server_ids().is_empty());
    }

    #[test]
    fn test_mark_read_and_unread_count() {
        let mut center = NotificationCenter::new();
        let first = at(0, "one", NotificationKind::Info);
        let first_id = first.id;
        center.push(first);
        center.push(at(3000, "two", NotificationKind::Info));

        assert_eq!(center.unread_count(), 2);
        assert!(center.mark_read(first_id));
        assert_eq!(center.unread_count(), 1);
        center.mark_all_read();
        assert_eq!(center.unread_count(), 0);
    }

    #[test]
    fn test_clear_all_tombstones_server_entries() {
        let mut center = NotificationCenter::new();
        let s = server(0, "server one");
        let server_id = s.id;
        center.merge_server(vec![s]);
        center.push(at(100, "local one", NotificationKind::Info));

        center.clear_all();
        assert!(center.notifications().is_empty());
        assert!(center.deleted_server_ids().contains(&server_id));
        assert_eq!(center.deleted_server_ids().len(), 1);
    }
}
