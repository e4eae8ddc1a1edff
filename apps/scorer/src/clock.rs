//! Sleep injection for the pipeline's fixed pacing delays.
//!
//! The batch loop sleeps between candidates and after a rate-limit
//! rejection. Both sleeps go through this trait so tests run without real
//! delays.

use std::time::Duration;

use async_trait::async_trait;

/// Async sleep seam. Production: `TokioClock`. Tests: a recording fake.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real clock backed by the tokio timer.
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records requested sleep durations instead of waiting.
    pub struct RecordingClock {
        pub slept: Mutex<Vec<Duration>>,
    }

    impl RecordingClock {
        pub fn new() -> Self {
            Self {
                slept: Mutex::new(Vec::new()),
            }
        }

        pub fn recorded(&self) -> Vec<Duration> {
            self.slept.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Clock for RecordingClock {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().unwrap().push(duration);
        }
    }
}
