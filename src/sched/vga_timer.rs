use crate::error;
use crate::error::Result;
use crate::gfx::ScriptPtr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VgaEventKind {
    /// Periodic: re-arms itself and runs the compositor.
    AnimateInt,
    /// One-shot continuation of a VGA script.
    AnimateEvent,
    /// One-shot horizontal scroll step.
    ScrollEvent,
    /// Gauge animations; `sprite` carries the target level.
    PlayerDamage,
    MonsterDamage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VgaTimerEntry {
    pub delay: i16,
    pub kind: VgaEventKind,
    pub script: ScriptPtr,
    pub sprite: u16,
    pub zone: u16,
}

/// ## VGA timer table
///
/// Fixed-capacity countdown table. Removal shifts later entries down, so
/// the scan in progress keeps a resume cursor here that every removal
/// adjusts; a payload that adds or removes entries while it runs cannot
/// make the outer scan skip or repeat one.

#[derive(Debug)]
pub struct VgaTimerTable {
    entries: Vec<VgaTimerEntry>,
    capacity: usize,
    resume: usize,
}

impl VgaTimerTable {
    pub fn new(capacity: usize) -> VgaTimerTable {
        VgaTimerTable {
            entries: Vec::with_capacity(capacity),
            capacity,
            resume: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&VgaTimerEntry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut VgaTimerEntry> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VgaTimerEntry> {
        self.entries.iter()
    }

    pub fn resume(&self) -> usize {
        self.resume
    }

    pub fn set_resume(&mut self, index: usize) {
        self.resume = index;
    }

    /// A zero delay would never count down to a fire, so it is raised to 1.
    pub fn add(&mut self, entry: VgaTimerEntry) -> Result<()> {
        if self.entries.len() >= self.capacity {
            return Err(error!(VgaTimerOverflow; "{} entries", self.capacity));
        }
        self.entries.push(VgaTimerEntry {
            delay: entry.delay.max(1),
            ..entry
        });
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<VgaTimerEntry> {
        if index >= self.entries.len() {
            return None;
        }
        if index < self.resume {
            self.resume -= 1;
        }
        Some(self.entries.remove(index))
    }

    /// Drops the pending continuations of one sprite.
    pub fn remove_for_sprite(&mut self, sprite: u16, zone: u16) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.entries.len() {
            let e = self.entries[i];
            if e.kind == VgaEventKind::AnimateEvent && e.sprite == sprite && e.zone == zone {
                self.remove(i);
                removed += 1;
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Drops everything but the periodic animation driver.
    pub fn clear_one_shots(&mut self) {
        self.entries.retain(|e| e.kind == VgaEventKind::AnimateInt);
        self.resume = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn entry(kind: VgaEventKind, sprite: u16) -> VgaTimerEntry {
        VgaTimerEntry {
            delay: 1,
            kind,
            script: ScriptPtr::default(),
            sprite,
            zone: 0,
        }
    }

    #[test]
    fn test_capacity() {
        let mut t = VgaTimerTable::new(2);
        t.add(entry(VgaEventKind::AnimateEvent, 1)).unwrap();
        t.add(entry(VgaEventKind::AnimateEvent, 2)).unwrap();
        let err = t.add(entry(VgaEventKind::AnimateEvent, 3)).unwrap_err();
        assert!(err.is(ErrorCode::VgaTimerOverflow));
    }

    #[test]
    fn test_remove_adjusts_resume_cursor() {
        let mut t = VgaTimerTable::new(8);
        for s in 0..5 {
            t.add(entry(VgaEventKind::AnimateEvent, s)).unwrap();
        }
        t.set_resume(3);
        let removed = t.remove(2).unwrap();
        assert_eq!(removed.sprite, 2);
        assert_eq!(t.resume(), 2);
        assert_eq!(t.get(2).unwrap().sprite, 3);
        t.remove(4);
        assert_eq!(t.resume(), 2);
        t.remove(0);
        assert_eq!(t.resume(), 1);
        assert_eq!(t.get(1).unwrap().sprite, 3);
    }

    #[test]
    fn test_remove_for_sprite_keeps_periodic() {
        let mut t = VgaTimerTable::new(8);
        t.add(entry(VgaEventKind::AnimateInt, 4)).unwrap();
        t.add(entry(VgaEventKind::AnimateEvent, 4)).unwrap();
        t.add(entry(VgaEventKind::AnimateEvent, 5)).unwrap();
        t.add(entry(VgaEventKind::AnimateEvent, 4)).unwrap();
        assert_eq!(t.remove_for_sprite(4, 0), 2);
        assert_eq!(t.len(), 2);
        t.clear_one_shots();
        assert_eq!(t.len(), 1);
    }
}
