//! Session identifiers.

use serde::{Deserialize, Serialize};

/// Identifies one motion session of a sampler. Never reused by the same sampler.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u32);

/// Monotonic allocator for SessionId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_session: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_session(&mut self) -> SessionId {
        let id = SessionId(self.next_session);
        self.next_session = self.next_session.wrapping_add(1);
        id
    }
}
