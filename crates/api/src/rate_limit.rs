use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Sliding-window budget per caller key. Keys idle for a whole window are
/// swept at most once per window, so the table only holds recent callers.
#[derive(Debug, Clone)]
pub struct IpRateLimiter {
    state: Arc<Mutex<WindowState>>,
    window: Duration,
    max_requests: usize,
}

#[derive(Debug, Default)]
struct WindowState {
    hits: HashMap<String, VecDeque<Instant>>,
    last_sweep: Option<Instant>,
}

impl WindowState {
    fn sweep(&mut self, now: Instant, window: Duration) {
        let due = self
            .last_sweep
            .map_or(true, |last| now.duration_since(last) >= window);
        if !due {
            return;
        }

        self.hits.retain(|_, hits| {
            hits.back()
                .is_some_and(|latest| now.duration_since(*latest) <= window)
        });
        self.last_sweep = Some(now);
    }
}

impl IpRateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(WindowState::default())),
            window,
            max_requests,
        }
    }

    /// `Err` carries how long the caller should wait before retrying.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut state = self.state.lock();
        state.sweep(now, self.window);

        let hits = state.hits.entry(key.to_string()).or_default();
        while hits
            .front()
            .is_some_and(|oldest| now.duration_since(*oldest) > self.window)
        {
            hits.pop_front();
        }

        if hits.len() >= self.max_requests {
            let oldest = hits.front().copied().unwrap_or(now);
            return Err(self.window.saturating_sub(now.duration_since(oldest)));
        }

        hits.push_back(now);
        Ok(())
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.state.lock().hits.len()
    }
}

/// Whole seconds for a `Retry-After` header, never zero.
pub fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}
