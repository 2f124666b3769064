use super::{ItemArena, ItemId, World};
use crate::error;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SavedItem {
    pub parent: u16,
    pub next: u16,
    pub state: i16,
    pub class_flags: u16,
}

/// ## Persisted engine state
///
/// Everything an external serializer needs to suspend and resume a game.
/// Sprite and dirty state is never part of it; it is rebuilt from item
/// state after a restore.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedState {
    pub items: Vec<SavedItem>,
    pub vars: Vec<i16>,
    pub bits: Vec<u16>,
    /// `(time remaining, subroutine id)` in firing order.
    pub events: Vec<(u32, u16)>,
}

impl SavedState {
    pub fn capture(world: &World, events: Vec<(u32, u16)>) -> Result<SavedState> {
        let mut items = Vec::with_capacity(world.items.len());
        for id in world.items.ids() {
            let item = world.items.get(id)?;
            items.push(SavedItem {
                parent: item.parent.map_or(0, ItemId::get),
                next: item.next.map_or(0, ItemId::get),
                state: item.state,
                class_flags: item.class_flags,
            });
        }
        Ok(SavedState {
            items,
            vars: world.vars.vars().to_vec(),
            bits: world.vars.bits().to_vec(),
            events,
        })
    }

    pub fn apply(&self, world: &mut World) -> Result<()> {
        if self.items.len() != world.items.len() {
            return Err(error!(BadItem; "saved {} items, world has {}", self.items.len(), world.items.len()));
        }
        restore_links(&mut world.items, &self.items)?;
        world.vars.restore(&self.vars, &self.bits)
    }

    fn encode(&self) -> Vec<u8> {
        let mut out = vec![];
        out.extend_from_slice(&(self.items.len() as u32).to_be_bytes());
        for item in &self.items {
            out.extend_from_slice(&item.parent.to_be_bytes());
            out.extend_from_slice(&item.next.to_be_bytes());
            out.extend_from_slice(&item.state.to_be_bytes());
            out.extend_from_slice(&item.class_flags.to_be_bytes());
        }
        out.extend_from_slice(&(self.vars.len() as u32).to_be_bytes());
        for v in &self.vars {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out.extend_from_slice(&(self.bits.len() as u32).to_be_bytes());
        for b in &self.bits {
            out.extend_from_slice(&b.to_be_bytes());
        }
        out.extend_from_slice(&(self.events.len() as u32).to_be_bytes());
        for (remaining, sub) in &self.events {
            out.extend_from_slice(&remaining.to_be_bytes());
            out.extend_from_slice(&sub.to_be_bytes());
        }
        out
    }

    /// CRC-32 of the encoded state.
    pub fn digest(&self) -> u32 {
        crc::crc32::checksum_ieee(&self.encode())
    }
}

fn restore_links(items: &mut ItemArena, saved: &[SavedItem]) -> Result<()> {
    for id in items.ids().collect::<Vec<_>>() {
        let item = items.get_mut(id)?;
        item.parent = None;
        item.next = None;
        item.child = None;
    }
    for (id, s) in items.ids().zip(saved).collect::<Vec<_>>() {
        let parent = items.id(s.parent)?;
        let next = items.id(s.next)?;
        let item = items.get_mut(id)?;
        item.parent = parent;
        item.next = next;
        item.state = s.state;
        item.class_flags = s.class_flags;
    }
    // A chain head is a child nobody points at with `next`.
    for (id, s) in items.ids().zip(saved).collect::<Vec<_>>() {
        if let Some(parent) = items.id(s.parent)? {
            let pointed_at = saved
                .iter()
                .any(|o| o.parent == s.parent && o.next == id.get());
            if !pointed_at {
                items.get_mut(parent)?.child = Some(id);
            }
        }
    }
    Ok(())
}
