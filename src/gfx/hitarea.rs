use super::Rect;
use crate::world::ItemId;

/// Clickable region registered by scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitArea {
    pub id: u16,
    pub rect: Rect,
    pub priority: i16,
    pub flags: u16,
    pub item: Option<ItemId>,
    pub verb: i16,
    pub enabled: bool,
}

#[derive(Debug, Default)]
pub struct HitAreas {
    areas: Vec<HitArea>,
}

impl HitAreas {
    pub fn new() -> HitAreas {
        HitAreas::default()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn get(&self, id: u16) -> Option<&HitArea> {
        self.areas.iter().find(|a| a.id == id)
    }

    /// Replaces any area with the same id.
    pub fn add(&mut self, area: HitArea) {
        self.delete(area.id);
        self.areas.push(area);
    }

    pub fn delete(&mut self, id: u16) -> bool {
        let before = self.areas.len();
        self.areas.retain(|a| a.id != id);
        before != self.areas.len()
    }

    pub fn set_enabled(&mut self, id: u16, enabled: bool) {
        if let Some(a) = self.areas.iter_mut().find(|a| a.id == id) {
            a.enabled = enabled;
        }
    }

    pub fn move_by(&mut self, id: u16, dx: i16, dy: i16) {
        if let Some(a) = self.areas.iter_mut().find(|a| a.id == id) {
            a.rect.x = a.rect.x.wrapping_add(dx);
            a.rect.y = a.rect.y.wrapping_add(dy);
        }
    }

    /// Highest priority enabled area under the point; earlier
    /// registrations win ties.
    pub fn find(&self, x: i16, y: i16) -> Option<&HitArea> {
        let mut best: Option<&HitArea> = None;
        for a in self.areas.iter().filter(|a| a.enabled && a.rect.contains(x, y)) {
            match best {
                Some(b) if b.priority >= a.priority => {}
                _ => best = Some(a),
            }
        }
        best
    }

    pub fn clear(&mut self) {
        self.areas.clear();
    }
}
