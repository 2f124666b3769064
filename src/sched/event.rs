use crate::error;
use crate::error::{Result, SubroutineId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeEvent {
    pub id: EventId,
    /// Fire time on the game clock, which excludes stopped time.
    pub time: u32,
    pub subroutine: SubroutineId,
}

/// ## Timed event queue
///
/// Subroutine invocations at absolute game-clock ticks, kept sorted by
/// fire time. The entry being fired stays queued until its invocation
/// returns; if the invocation cancels it, the pending removal is dropped
/// so it is never removed twice.

#[derive(Debug, Default)]
pub struct TimedEventQueue {
    events: Vec<TimeEvent>,
    next_id: u32,
    firing: Option<EventId>,
    stopped_total: u32,
    stopped_at: Option<u32>,
}

impl TimedEventQueue {
    pub fn new() -> TimedEventQueue {
        TimedEventQueue::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeEvent> {
        self.events.iter()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// `now` with all stopped intervals, including a current one, removed.
    pub fn game_time(&self, now: u32) -> u32 {
        let stopped = match self.stopped_at {
            Some(at) => self.stopped_total + now.saturating_sub(at),
            None => self.stopped_total,
        };
        now.saturating_sub(stopped)
    }

    pub fn stop_clock(&mut self, now: u32) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(now);
        }
    }

    pub fn start_clock(&mut self, now: u32) {
        if let Some(at) = self.stopped_at.take() {
            self.stopped_total += now.saturating_sub(at);
        }
    }

    /// Inserts ahead of the first event due at the same time or later.
    pub fn schedule(&mut self, now: u32, timeout: u32, subroutine: SubroutineId) -> EventId {
        let id = EventId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let time = self.game_time(now) + timeout;
        let pos = self
            .events
            .iter()
            .position(|e| e.time >= time)
            .unwrap_or_else(|| self.events.len());
        self.events.insert(
            pos,
            TimeEvent {
                id,
                time,
                subroutine,
            },
        );
        id
    }

    pub fn cancel(&mut self, id: EventId) -> Result<()> {
        if self.events.is_empty() {
            return Err(error!(NoTimeEvents));
        }
        let pos = match self.events.iter().position(|e| e.id == id) {
            Some(pos) => pos,
            None => return Err(error!(TimeEventNotFound; "{:?}", id)),
        };
        if self.firing == Some(id) {
            self.firing = None;
        }
        self.events.remove(pos);
        Ok(())
    }

    /// Cancels every event targeting `subroutine`.
    pub fn cancel_subroutine(&mut self, subroutine: SubroutineId) -> usize {
        let ids: Vec<EventId> = self
            .events
            .iter()
            .filter(|e| e.subroutine == subroutine)
            .map(|e| e.id)
            .collect();
        for id in &ids {
            if self.firing == Some(*id) {
                self.firing = None;
            }
        }
        self.events.retain(|e| e.subroutine != subroutine);
        ids.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.firing = None;
    }

    pub fn due(&self, now: u32) -> bool {
        match self.events.first() {
            Some(e) => !self.is_stopped() && e.time <= self.game_time(now),
            None => false,
        }
    }

    /// Marks the earliest due event as firing and hands it out. The list
    /// is read from its head every time, so the invocation may add or
    /// cancel any event.
    pub fn begin_firing(&mut self, now: u32) -> Option<TimeEvent> {
        if self.firing.is_some() || !self.due(now) {
            return None;
        }
        let event = *self.events.first()?;
        self.firing = Some(event.id);
        Some(event)
    }

    pub fn finish_firing(&mut self) {
        if let Some(id) = self.firing.take() {
            self.events.retain(|e| e.id != id);
        }
    }

    /// Remaining time and target of every queued event.
    pub fn snapshot(&self, now: u32) -> Vec<(u32, SubroutineId)> {
        let game = self.game_time(now);
        self.events
            .iter()
            .map(|e| (e.time.saturating_sub(game), e.subroutine))
            .collect()
    }

    /// Rebuilds the queue from a snapshot. Events keep their saved order,
    /// including among equal times.
    pub fn restore(&mut self, now: u32, events: &[(u32, SubroutineId)]) {
        self.clear();
        let game = self.game_time(now);
        for (remaining, subroutine) in events {
            let id = EventId(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            let time = game + remaining;
            let pos = self
                .events
                .iter()
                .position(|e| e.time > time)
                .unwrap_or_else(|| self.events.len());
            self.events.insert(
                pos,
                TimeEvent {
                    id,
                    time,
                    subroutine: *subroutine,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn drain(q: &mut TimedEventQueue, now: u32) -> Vec<SubroutineId> {
        let mut fired = vec![];
        while let Some(e) = q.begin_firing(now) {
            fired.push(e.subroutine);
            q.finish_firing();
        }
        fired
    }

    #[test]
    fn test_sorted_insert() {
        let mut q = TimedEventQueue::new();
        q.schedule(0, 10, 1);
        q.schedule(0, 5, 2);
        q.schedule(0, 10, 3);
        q.schedule(0, 20, 4);
        let order: Vec<_> = q.iter().map(|e| e.subroutine).collect();
        assert_eq!(order, vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_drain_in_order() {
        let mut q = TimedEventQueue::new();
        q.schedule(0, 5, 7);
        q.schedule(0, 10, 5);
        assert!(drain(&mut q, 4).is_empty());
        assert_eq!(drain(&mut q, 5), vec![7]);
        assert_eq!(drain(&mut q, 9), Vec::<u16>::new());
        assert_eq!(drain(&mut q, 10), vec![5]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_self_cancel_while_firing() {
        let mut q = TimedEventQueue::new();
        q.schedule(0, 1, 1);
        q.schedule(0, 1, 2);
        let e = q.begin_firing(1).unwrap();
        assert_eq!(e.subroutine, 2);
        q.cancel(e.id).unwrap();
        q.finish_firing();
        assert_eq!(q.len(), 1);
        assert!(q.cancel(e.id).unwrap_err().is(ErrorCode::TimeEventNotFound));
        assert_eq!(drain(&mut q, 1), vec![1]);
        assert!(drain(&mut q, 1).is_empty());
    }

    #[test]
    fn test_cancel_errors() {
        let mut q = TimedEventQueue::new();
        let id = q.schedule(0, 1, 1);
        q.cancel(id).unwrap();
        assert!(q.cancel(id).unwrap_err().is(ErrorCode::NoTimeEvents));
    }

    #[test]
    fn test_stopped_clock() {
        let mut q = TimedEventQueue::new();
        q.schedule(0, 10, 1);
        q.stop_clock(4);
        assert!(!q.due(50));
        q.start_clock(10);
        assert_eq!(q.game_time(10), 4);
        assert!(!q.due(15));
        assert!(q.due(16));
        q.schedule(16, 2, 2);
        assert_eq!(q.iter().last().unwrap().time, 12);
        assert_eq!(q.snapshot(16), vec![(0, 1), (2, 2)]);
    }
}
