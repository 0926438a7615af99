//! Record id generation.
//!
//! Ids are produced while the owning collection is locked for writing, with
//! the set of ids already present passed in, so a generated id is never a
//! duplicate within its collection.

use std::sync::Mutex;

use chrono::Utc;
use configs::IdStrategy;
use uuid::Uuid;

pub struct IdGenerator {
    strategy: IdStrategy,
    /// Last timestamp id handed out; keeps same-millisecond creates distinct.
    last: Mutex<i64>,
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self { strategy, last: Mutex::new(0) }
    }

    /// Produce an id for which `taken` returns false.
    pub fn next_id<F>(&self, taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        match self.strategy {
            IdStrategy::Timestamp => self.next_timestamp(Utc::now().timestamp_millis(), taken),
            IdStrategy::Uuid => loop {
                let id = Uuid::new_v4().to_string();
                if !taken(&id) {
                    break id;
                }
            },
        }
    }

    fn next_timestamp<F>(&self, now_ms: i64, taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut candidate = now_ms.max(*last + 1);
        while taken(&candidate.to_string()) {
            candidate += 1;
        }
        *last = candidate;
        candidate.to_string()
    }
}
