/// Request pacing for the source site
///
/// Basketball-Reference asks scrapers to stay well under 20 requests per
/// minute. Every uncached search waits for the current delay first; a
/// throttling response doubles the delay (up to a cap) and the next
/// successful search restores it.
use log::debug;
use std::sync::Mutex;
use std::time::Duration;

const MAX_DELAY: Duration = Duration::from_secs(60);

pub struct Pacer {
    base: Duration,
    current: Mutex<Duration>,
}

impl Pacer {
    pub fn new(base: Duration) -> Self {
        Self { base, current: Mutex::new(base) }
    }

    pub fn current_delay(&self) -> Duration {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Block for the current delay
    pub fn wait(&self) {
        let delay = self.current_delay();
        if !delay.is_zero() {
            debug!("pacing: sleeping {:?} before request", delay);
            std::thread::sleep(delay);
        }
    }

    /// The site signalled throttling; back off
    pub fn throttled(&self) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let doubled = if current.is_zero() { Duration::from_secs(1) } else { *current * 2 };
        *current = doubled.min(MAX_DELAY);
        debug!("pacing: backing off to {:?}", *current);
    }

    pub fn succeeded(&self) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = self.base;
    }
}
