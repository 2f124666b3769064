use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Millisecond time source the frame pump paces itself against.
pub trait Clock {
    fn millis(&self) -> u64;
    fn sleep(&self, millis: u64);
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn millis(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep(&self, millis: u64) {
        std::thread::sleep(Duration::from_millis(millis));
    }
}

/// Clock that only moves when slept on or advanced. Clones share time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock::default()
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for ManualClock {
    fn millis(&self) -> u64 {
        self.now.get()
    }

    fn sleep(&self, millis: u64) {
        self.advance(millis.max(1));
    }
}
