use super::Rect;
use crate::error;
use crate::error::Result;

/// Runtime state of one animated sprite. `(id, zone)` identifies it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VgaSprite {
    pub id: u16,
    pub zone: u16,
    pub image: u16,
    pub palette: u16,
    pub x: i16,
    pub y: i16,
    /// Image extent, taken from the zone when `image` changes.
    pub w: i16,
    pub h: i16,
    pub window: u8,
    pub priority: i16,
    pub flags: u16,
    pub dirty: bool,
}

impl VgaSprite {
    pub fn new(id: u16, zone: u16) -> VgaSprite {
        VgaSprite {
            id,
            zone,
            ..VgaSprite::default()
        }
    }

    /// A sprite with no image still occupies its origin pixel.
    pub fn bounds(&self) -> Rect {
        if self.image == 0 {
            Rect::new(self.x, self.y, 1, 1)
        } else {
            Rect::new(self.x, self.y, self.w, self.h)
        }
    }
}

/// Live sprites in draw order (ascending priority, stable).
#[derive(Debug)]
pub struct SpriteTable {
    sprites: Vec<VgaSprite>,
    capacity: usize,
}

impl SpriteTable {
    pub fn new(capacity: usize) -> SpriteTable {
        SpriteTable {
            sprites: vec![],
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn as_slice(&self) -> &[VgaSprite] {
        &self.sprites
    }

    pub fn as_mut_slice(&mut self) -> &mut [VgaSprite] {
        &mut self.sprites
    }

    pub fn iter(&self) -> impl Iterator<Item = &VgaSprite> {
        self.sprites.iter()
    }

    pub fn find(&self, id: u16, zone: u16) -> Option<&VgaSprite> {
        self.sprites.iter().find(|s| s.id == id && s.zone == zone)
    }

    pub fn find_mut(&mut self, id: u16, zone: u16) -> Option<&mut VgaSprite> {
        self.sprites.iter_mut().find(|s| s.id == id && s.zone == zone)
    }

    pub fn insert(&mut self, sprite: VgaSprite) -> Result<()> {
        if self.sprites.len() >= self.capacity {
            return Err(error!(SpriteTableFull; "{} sprites", self.capacity));
        }
        let pos = self
            .sprites
            .iter()
            .position(|s| s.priority > sprite.priority)
            .unwrap_or_else(|| self.sprites.len());
        self.sprites.insert(pos, sprite);
        Ok(())
    }

    pub fn remove(&mut self, id: u16, zone: u16) -> Option<VgaSprite> {
        let pos = self.sprites.iter().position(|s| s.id == id && s.zone == zone)?;
        Some(self.sprites.remove(pos))
    }

    pub fn set_priority(&mut self, id: u16, zone: u16, priority: i16) {
        if let Some(s) = self.find_mut(id, zone) {
            s.priority = priority;
            s.dirty = true;
        }
        self.sprites.sort_by_key(|s| s.priority);
    }

    pub fn mark_all_dirty(&mut self) {
        for s in self.sprites.iter_mut() {
            s.dirty = true;
        }
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order_is_stable() {
        let mut t = SpriteTable::new(4);
        for (id, p) in &[(1, 5), (2, 1), (3, 5), (4, 0)] {
            let mut s = VgaSprite::new(*id, 0);
            s.priority = *p;
            t.insert(s).unwrap();
        }
        let ids: Vec<u16> = t.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);
        assert!(t.insert(VgaSprite::new(9, 0)).is_err());
        t.set_priority(1, 0, 9);
        let ids: Vec<u16> = t.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
        assert!(t.find(1, 0).unwrap().dirty);
    }
}
