use crate::error::Result;
use crate::world::{ItemArena, ItemId};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSlot {
    Subject,
    Object,
}

/// ## Class iteration
///
/// "Run the rest of this subroutine once per item of class X." The call
/// frame owns one of these; after the line loop finishes, the next
/// matching candidate is bound to the slot and the loop resumes at
/// `resume_line`. Candidates are the container's children at the time
/// the loop started, in sibling order; class flags are checked again as
/// each candidate comes up.

#[derive(Debug, Clone)]
pub struct ClassIteration {
    slot: ClassSlot,
    mask: u16,
    remaining: VecDeque<ItemId>,
    resume_line: usize,
}

impl ClassIteration {
    pub fn new(slot: ClassSlot, mask: u16, candidates: Vec<ItemId>, resume_line: usize) -> Self {
        ClassIteration {
            slot,
            mask,
            remaining: candidates.into(),
            resume_line,
        }
    }

    pub fn slot(&self) -> ClassSlot {
        self.slot
    }

    pub fn resume_line(&self) -> usize {
        self.resume_line
    }

    /// Pops candidates until one still carries the class.
    pub fn next_match(&mut self, items: &ItemArena) -> Result<Option<ItemId>> {
        while let Some(id) = self.remaining.pop_front() {
            if self.mask == 0 || items.has_class(id, self.mask)? {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_items_that_lost_their_class() {
        let mut items = ItemArena::new();
        let a = items.create(0, 0);
        let b = items.create(0, 0);
        let c = items.create(0, 0);
        for id in &[a, b, c] {
            items.get_mut(*id).unwrap().class_flags = 4;
        }
        let mut it = ClassIteration::new(ClassSlot::Subject, 4, vec![a, b, c], 3);
        assert_eq!(it.next_match(&items).unwrap(), Some(a));
        items.get_mut(b).unwrap().class_flags = 0;
        assert_eq!(it.next_match(&items).unwrap(), Some(c));
        assert_eq!(it.next_match(&items).unwrap(), None);
        assert_eq!(it.resume_line(), 3);
    }
}
