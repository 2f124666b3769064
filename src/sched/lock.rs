/// Reentrancy guard bits shared by the tick handler and the VGA timer
/// table. Work that finds a blocking bit set is skipped for
/// this tick rather than nested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockOut(u16);

impl LockOut {
    pub const TABLE: u16 = 0x0001;
    pub const IN_TICK: u16 = 0x0002;
    pub const HALT: u16 = 0x0010;
    /// Any of these makes the tick handler return immediately.
    pub const TICK_BLOCKERS: u16 = LockOut::TABLE;

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn any(self, mask: u16) -> bool {
        self.0 & mask != 0
    }

    /// Sets `mask`, returning whether any of it was already held.
    pub fn hold(&mut self, mask: u16) -> bool {
        let held = self.any(mask);
        self.0 |= mask;
        held
    }

    pub fn release(&mut self, mask: u16) {
        self.0 &= !mask;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_reports_nesting() {
        let mut lock = LockOut::default();
        assert!(!lock.hold(LockOut::TABLE));
        assert!(lock.hold(LockOut::TABLE));
        assert!(lock.any(LockOut::TICK_BLOCKERS));
        lock.release(LockOut::TABLE);
        assert!(!lock.any(LockOut::TICK_BLOCKERS));
        lock.hold(LockOut::HALT | LockOut::IN_TICK);
        assert!(!lock.any(LockOut::TICK_BLOCKERS));
        assert_eq!(lock.bits(), 0x12);
    }
}
