use dashmap::DashSet;
use std::sync::Arc;

/// Request ids that currently have an approve/reject call outstanding.
///
/// Shared by every handler, so a row stays marked as processing for all
/// admins until the backend has answered.
#[derive(Clone, Default)]
pub struct InFlightActions {
    ids: Arc<DashSet<i64>>,
}

impl InFlightActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as processing. Returns `None` when another action on the same
    /// request has not finished yet.
    pub fn try_begin(&self, id: i64) -> Option<InFlightGuard> {
        if self.ids.insert(id) {
            Some(InFlightGuard {
                ids: Arc::clone(&self.ids),
                id,
            })
        } else {
            None
        }
    }

    pub fn is_in_flight(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }
}

/// Releases its request id when dropped.
#[must_use = "the request is only marked as processing while the guard is alive"]
pub struct InFlightGuard {
    ids: Arc<DashSet<i64>>,
    id: i64,
}

impl InFlightGuard {
    pub fn id(&self) -> i64 {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids.remove(&self.id);
    }
}
