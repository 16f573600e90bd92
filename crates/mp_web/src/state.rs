use chrono::{DateTime, Utc};
use mp_sources::Pipeline;
use std::time::{Duration, Instant};

pub struct AppState {
    pub pipeline: Pipeline,
    pub started_at: DateTime<Utc>,
    started: Instant,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}
