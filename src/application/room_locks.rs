use crate::domain::catalog::RoomId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per room.
///
/// Holding a room's guard serializes every check-then-commit sequence for that
/// room. Requests for different rooms never contend.
#[derive(Default)]
pub struct RoomLocks {
    locks: DashMap<RoomId, Arc<Mutex<()>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, room_id: RoomId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the shard lock is released before awaiting.
        let lock = self
            .locks
            .entry(room_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
