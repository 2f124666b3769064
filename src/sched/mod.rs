/*!
## Scheduler Module

The two timer mechanisms and the frame pump that drives them. Timed
events fire subroutines at game-clock seconds; the VGA timer table
continues animation scripts after a number of processing passes.

*/

mod clock;
mod event;
mod lock;
mod pump;
mod vga_timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use event::{EventId, TimeEvent, TimedEventQueue};
pub use lock::LockOut;
pub use pump::FramePump;
pub use vga_timer::{VgaEventKind, VgaTimerEntry, VgaTimerTable};

/// The timers capability handed to opcode handlers.
#[derive(Debug)]
pub struct Timers {
    pub vga: VgaTimerTable,
    pub events: TimedEventQueue,
    pub lock: LockOut,
}

impl Timers {
    pub fn new(vga_capacity: usize) -> Timers {
        Timers {
            vga: VgaTimerTable::new(vga_capacity),
            events: TimedEventQueue::new(),
            lock: LockOut::default(),
        }
    }
}
