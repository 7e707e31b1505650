use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use roomify_core::{RouteId, RouteState};
use roomify_logging::roomify_warn;

/// Performs the view transition to the destination route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str, state: RouteState);
}

/// Shows user-visible notices such as a rejected file type.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Notifier for hosts without a modal surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        roomify_warn!("alert: {}", message);
    }
}

/// Time-based route ids: epoch milliseconds, bumped so that two ids from the
/// same generator never collide.
#[derive(Debug, Default)]
pub struct RouteIdGenerator {
    last: AtomicI64,
}

impl RouteIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> RouteId {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        RouteId::new(now.max(previous + 1).to_string())
    }
}
