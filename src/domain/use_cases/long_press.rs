use std::time::{Duration, Instant};

use crate::entities::picture::SubResource;

/// A press on one deletable image. The target is fixed when the press
/// starts, so each gesture can only ever arm its own image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongPress {
    target: SubResource,
    started_at: Instant,
    threshold: Duration,
}

impl LongPress {
    pub fn start(target: SubResource, threshold: Duration, started_at: Instant) -> Self {
        LongPress {
            target,
            started_at,
            threshold,
        }
    }

    pub fn target(&self) -> SubResource {
        self.target
    }

    pub fn held_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn is_armed(&self, now: Instant) -> bool {
        self.held_for(now) >= self.threshold
    }

    /// Ends the press. Yields the target only if it was held long enough.
    pub fn release(self, released_at: Instant) -> Option<SubResource> {
        self.is_armed(released_at).then_some(self.target)
    }
}
