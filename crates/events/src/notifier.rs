//! Single-slot transient notification with timed lifecycle.
//!
//! [`Notifier`] owns at most one live [`Notification`]. Each notification
//! moves through `Created -> Visible -> Dismissing -> Gone`:
//!
//! - `Created -> Visible` after the short show delay (entrance animation).
//! - `Visible -> Dismissing` on auto-expiry or an explicit
//!   [`dismiss`](Notifier::dismiss), whichever comes first. The loser is a
//!   no-op because the live-id/phase check under the slot lock fails.
//! - `Dismissing -> Gone` after the exit transition, freeing the slot.
//!
//! A new [`notify`](Notifier::notify) removes the previous notification on
//! the spot (no queueing) and cancels its timer.
//!
//! State changes are published as [`NotifierEvent`]s on a
//! [`tokio::sync::broadcast`] channel. Call [`Notifier::subscribe`] to
//! receive them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tourdesk_core::types::Timestamp;

/// How long a notification stays up, measured from creation.
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_millis(5000);

/// Length of the exit transition before the notification is released.
pub const DEFAULT_EXIT_TRANSITION: Duration = Duration::from_millis(300);

/// Delay between mounting and the entrance transition.
pub const DEFAULT_SHOW_DELAY: Duration = Duration::from_millis(10);

/// Broadcast channel capacity for notifier events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    /// Font Awesome icon class rendered next to the message.
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => "fa-check-circle",
            NotificationKind::Error => "fa-exclamation-circle",
            NotificationKind::Info => "fa-info-circle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPhase {
    Created,
    Visible,
    Dismissing,
    Gone,
}

/// Why a notification left the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DismissCause {
    Expired,
    Dismissed,
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    Shown(Notification),
    Visible(NotificationId),
    Dismissing { id: NotificationId, cause: DismissCause },
    Removed { id: NotificationId, cause: DismissCause },
}

/// Returned by [`Notifier::notify`]; pass to [`Notifier::dismiss`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationHandle {
    id: NotificationId,
}

impl NotificationHandle {
    pub fn id(&self) -> NotificationId {
        self.id
    }
}

impl From<NotificationId> for NotificationHandle {
    fn from(id: NotificationId) -> Self {
        Self { id }
    }
}

/// The live notification and where it is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationSnapshot {
    #[serde(flatten)]
    pub notification: Notification,
    pub phase: NotificationPhase,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    pub show_delay: Duration,
    pub display_duration: Duration,
    pub exit_transition: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            show_delay: DEFAULT_SHOW_DELAY,
            display_duration: DEFAULT_DISPLAY_DURATION,
            exit_transition: DEFAULT_EXIT_TRANSITION,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Notifier must be created inside a Tokio runtime")]
    NoRuntime,
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

struct Slot {
    notification: Notification,
    phase: NotificationPhase,
    /// Cancels the entrance/expiry task.
    timer: CancellationToken,
}

struct Shared {
    config: NotifierConfig,
    slot: Mutex<Option<Slot>>,
    next_id: AtomicU64,
    events: broadcast::Sender<NotifierEvent>,
    runtime: Handle,
}

/// Owner of the single notification slot.
///
/// Cheap to clone; clones share the same slot. Timers run on the Tokio
/// runtime the notifier was created in.
#[derive(Clone)]
pub struct Notifier {
    shared: Arc<Shared>,
}

impl Notifier {
    /// Create a notifier bound to the current Tokio runtime.
    pub fn new(config: NotifierConfig) -> Result<Self, NotifierError> {
        let runtime = Handle::try_current().map_err(|_| NotifierError::NoRuntime)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                slot: Mutex::new(None),
                next_id: AtomicU64::new(1),
                events,
                runtime,
            }),
        })
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.shared.config
    }

    /// Runtime the notifier's timers run on. Form controllers schedule
    /// their simulated submissions here too.
    pub(crate) fn runtime(&self) -> &Handle {
        &self.shared.runtime
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotifierEvent> {
        self.shared.events.subscribe()
    }

    /// Show `message`, replacing whatever is currently displayed.
    ///
    /// Auto-expiry is scheduled `display_duration` after this call.
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationHandle {
        let id = NotificationId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        let notification = Notification {
            id,
            message: message.into(),
            kind,
            created_at: Utc::now(),
        };
        let timer = CancellationToken::new();
        let deadline = Instant::now() + self.shared.config.display_duration;

        {
            let mut slot = self.shared.lock_slot();
            let previous = slot.replace(Slot {
                notification: notification.clone(),
                phase: NotificationPhase::Created,
                timer: timer.clone(),
            });

            if let Some(previous) = previous {
                previous.timer.cancel();
                tracing::debug!(
                    notification_id = %previous.notification.id,
                    replaced_by = %id,
                    "Notification superseded",
                );
                self.shared.publish(NotifierEvent::Removed {
                    id: previous.notification.id,
                    cause: DismissCause::Superseded,
                });
            }

            self.shared.publish(NotifierEvent::Shown(notification));
        }

        tracing::info!(notification_id = %id, kind = ?kind, "Notification shown");

        self.shared
            .runtime
            .spawn(run_lifecycle(Arc::clone(&self.shared), id, timer, deadline));

        NotificationHandle { id }
    }

    /// Start removing the notification behind `handle`.
    ///
    /// Returns `false` (and does nothing) when the handle is stale or the
    /// notification is already on its way out.
    pub fn dismiss(&self, handle: &NotificationHandle) -> bool {
        self.shared.begin_dismiss(handle.id, DismissCause::Dismissed)
    }

    /// The live notification, if any.
    pub fn current(&self) -> Option<NotificationSnapshot> {
        self.shared.lock_slot().as_ref().map(|slot| NotificationSnapshot {
            notification: slot.notification.clone(),
            phase: slot.phase,
            icon: slot.notification.kind.icon(),
        })
    }

    /// Lifecycle phase of `handle`. Anything no longer in the slot is `Gone`.
    pub fn phase(&self, handle: &NotificationHandle) -> NotificationPhase {
        self.shared
            .lock_slot()
            .as_ref()
            .filter(|slot| slot.notification.id == handle.id)
            .map_or(NotificationPhase::Gone, |slot| slot.phase)
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn lock_slot(&self) -> MutexGuard<'_, Option<Slot>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: NotifierEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.events.send(event);
    }

    fn mark_visible(&self, id: NotificationId) {
        let mut slot = self.lock_slot();
        if let Some(live) = slot.as_mut() {
            if live.notification.id == id && live.phase == NotificationPhase::Created {
                live.phase = NotificationPhase::Visible;
                self.publish(NotifierEvent::Visible(id));
            }
        }
    }

    fn begin_dismiss(self: &Arc<Self>, id: NotificationId, cause: DismissCause) -> bool {
        {
            let mut slot = self.lock_slot();
            let Some(live) = slot.as_mut().filter(|s| s.notification.id == id) else {
                return false;
            };
            if !matches!(
                live.phase,
                NotificationPhase::Created | NotificationPhase::Visible
            ) {
                return false;
            }

            live.phase = NotificationPhase::Dismissing;
            live.timer.cancel();
            self.publish(NotifierEvent::Dismissing { id, cause });
        }

        tracing::debug!(notification_id = %id, cause = ?cause, "Notification dismissing");

        self.runtime
            .spawn(finish_removal(Arc::clone(self), id, cause));
        true
    }

    fn remove(&self, id: NotificationId, cause: DismissCause) {
        let mut slot = self.lock_slot();
        let is_target = slot.as_ref().is_some_and(|s| {
            s.notification.id == id && s.phase == NotificationPhase::Dismissing
        });
        if is_target {
            *slot = None;
            self.publish(NotifierEvent::Removed { id, cause });
            tracing::debug!(notification_id = %id, cause = ?cause, "Notification removed");
        }
    }
}

/// Entrance then auto-expiry. Exits early when `timer` is cancelled.
async fn run_lifecycle(
    shared: Arc<Shared>,
    id: NotificationId,
    timer: CancellationToken,
    deadline: Instant,
) {
    tokio::select! {
        _ = timer.cancelled() => return,
        _ = tokio::time::sleep(shared.config.show_delay) => {}
    }
    shared.mark_visible(id);

    tokio::select! {
        _ = timer.cancelled() => return,
        _ = tokio::time::sleep_until(deadline) => {}
    }
    shared.begin_dismiss(id, DismissCause::Expired);
}

async fn finish_removal(shared: Arc<Shared>, id: NotificationId, cause: DismissCause) {
    tokio::time::sleep(shared.config.exit_transition).await;
    shared.remove(id, cause);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    async fn at(start: Instant, millis: u64) {
        tokio::time::sleep_until(start + ms(millis)).await;
    }

    fn drain(rx: &mut broadcast::Receiver<NotifierEvent>) -> Vec<NotifierEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn new_outside_runtime_fails() {
        assert!(matches!(
            Notifier::new(NotifierConfig::default()),
            Err(NotifierError::NoRuntime)
        ));
    }

    #[test]
    fn kind_icons() {
        assert_eq!(NotificationKind::Success.icon(), "fa-check-circle");
        assert_eq!(NotificationKind::Error.icon(), "fa-exclamation-circle");
        assert_eq!(NotificationKind::Info.icon(), "fa-info-circle");
    }

    #[tokio::test(start_paused = true)]
    async fn notification_becomes_visible_then_expires() {
        let notifier = Notifier::new(NotifierConfig::default()).unwrap();
        let mut rx = notifier.subscribe();
        let start = Instant::now();

        let handle = notifier.notify("Saved", NotificationKind::Success);
        assert_eq!(notifier.phase(&handle), NotificationPhase::Created);

        at(start, 20).await;
        assert_eq!(notifier.phase(&handle), NotificationPhase::Visible);

        at(start, 4999).await;
        assert_eq!(notifier.phase(&handle), NotificationPhase::Visible);

        at(start, 5001).await;
        assert_eq!(notifier.phase(&handle), NotificationPhase::Dismissing);

        at(start, 5301).await;
        assert_eq!(notifier.phase(&handle), NotificationPhase::Gone);
        assert!(notifier.current().is_none());

        let id = handle.id();
        let events = drain(&mut rx);
        assert_eq!(events.len(), 4);
        assert!(matches!(&events[0], NotifierEvent::Shown(n) if n.id == id && n.message == "Saved"));
        assert_eq!(events[1], NotifierEvent::Visible(id));
        assert_eq!(
            events[2],
            NotifierEvent::Dismissing { id, cause: DismissCause::Expired }
        );
        assert_eq!(
            events[3],
            NotifierEvent::Removed { id, cause: DismissCause::Expired }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_right_after_notify_is_synchronous() {
        let notifier = Notifier::new(NotifierConfig::default()).unwrap();
        let mut rx = notifier.subscribe();
        let start = Instant::now();

        let handle = notifier.notify("Hello", NotificationKind::Info);
        assert!(notifier.dismiss(&handle));
        assert_eq!(notifier.phase(&handle), NotificationPhase::Dismissing);

        at(start, 299).await;
        assert_eq!(notifier.phase(&handle), NotificationPhase::Dismissing);

        at(start, 301).await;
        assert_eq!(notifier.phase(&handle), NotificationPhase::Gone);

        // Well past the original expiry: nothing else happens.
        at(start, 6000).await;
        let id = handle.id();
        let events = drain(&mut rx);
        assert_eq!(
            events[1..],
            [
                NotifierEvent::Dismissing { id, cause: DismissCause::Dismissed },
                NotifierEvent::Removed { id, cause: DismissCause::Dismissed },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn second_dismiss_is_noop() {
        let notifier = Notifier::new(NotifierConfig::default()).unwrap();
        let start = Instant::now();
        let handle = notifier.notify("Hello", NotificationKind::Info);

        at(start, 100).await;
        assert!(notifier.dismiss(&handle));
        assert!(!notifier.dismiss(&handle));

        at(start, 1000).await;
        assert!(!notifier.dismiss(&handle));
        assert_eq!(notifier.phase(&handle), NotificationPhase::Gone);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_after_expiry_is_noop() {
        let notifier = Notifier::new(NotifierConfig::default()).unwrap();
        let start = Instant::now();
        let handle = notifier.notify("Hello", NotificationKind::Info);

        at(start, 5100).await;
        assert_eq!(notifier.phase(&handle), NotificationPhase::Dismissing);
        assert!(!notifier.dismiss(&handle));
    }

    #[tokio::test(start_paused = true)]
    async fn notify_twice_leaves_only_the_second() {
        let notifier = Notifier::new(NotifierConfig::default()).unwrap();
        let mut rx = notifier.subscribe();
        let start = Instant::now();

        let first = notifier.notify("first", NotificationKind::Error);
        at(start, 3000).await;
        let second = notifier.notify("second", NotificationKind::Success);

        assert_eq!(notifier.phase(&first), NotificationPhase::Gone);
        let current = notifier.current().unwrap();
        assert_eq!(current.notification.message, "second");
        assert_eq!(current.notification.id, second.id());

        // The first notification's expiry time passes without effect.
        at(start, 5500).await;
        assert_eq!(notifier.phase(&second), NotificationPhase::Visible);
        assert!(!notifier.dismiss(&first));

        // The second expires on its own schedule.
        at(start, 8001).await;
        assert_eq!(notifier.phase(&second), NotificationPhase::Dismissing);

        let events = drain(&mut rx);
        assert!(events.contains(&NotifierEvent::Removed {
            id: first.id(),
            cause: DismissCause::Superseded,
        }));
        assert!(!events.iter().any(|e| matches!(
            e,
            NotifierEvent::Dismissing { id, .. } if *id == first.id()
        )));
    }

    #[tokio::test(start_paused = true)]
    async fn notify_during_exit_transition_replaces_immediately() {
        let notifier = Notifier::new(NotifierConfig::default()).unwrap();
        let start = Instant::now();

        let first = notifier.notify("first", NotificationKind::Info);
        assert!(notifier.dismiss(&first));
        let second = notifier.notify("second", NotificationKind::Info);

        // The first's pending removal must not take the second down.
        at(start, 400).await;
        assert_eq!(notifier.phase(&second), NotificationPhase::Visible);
        assert_eq!(notifier.phase(&first), NotificationPhase::Gone);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_durations_are_honoured() {
        let notifier = Notifier::new(NotifierConfig {
            show_delay: ms(0),
            display_duration: ms(1000),
            exit_transition: ms(50),
        })
        .unwrap();
        let start = Instant::now();
        let handle = notifier.notify("quick", NotificationKind::Info);

        at(start, 1001).await;
        assert_eq!(notifier.phase(&handle), NotificationPhase::Dismissing);
        at(start, 1051).await;
        assert_eq!(notifier.phase(&handle), NotificationPhase::Gone);
    }

    #[tokio::test]
    async fn snapshot_serializes_flat() {
        let notifier = Notifier::new(NotifierConfig::default()).unwrap();
        notifier.notify("Mohon isi field name.", NotificationKind::Error);
        let json = serde_json::to_value(notifier.current().unwrap()).unwrap();
        assert_eq!(json["message"], "Mohon isi field name.");
        assert_eq!(json["kind"], "error");
        assert_eq!(json["phase"], "created");
        assert_eq!(json["icon"], "fa-exclamation-circle");
        assert!(json["id"].is_u64());
    }
}
