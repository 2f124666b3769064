use super::{Rect, Screen, SpriteTable, Surface, VgaSprite, Zones};
use crate::config::DirtyMode;

/// Background saved from under a drawn sprite, in screen coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub rect: Rect,
    pub window: u8,
    pub pixels: Vec<u8>,
    pub dirty: bool,
}

impl Snapshot {
    fn world_rect(&self, scroll_x: i16) -> Rect {
        Rect {
            x: self.rect.x.wrapping_add(scroll_x),
            ..self.rect
        }
    }
}

/// One axis of the overlap test. A candidate starting exactly at the
/// region's far edge is clear of it; one ending exactly at the region's
/// near edge is not.
pub fn overlaps_axis(c: i16, cw: i16, x: i16, w: i16) -> bool {
    if c >= x {
        c.wrapping_sub(w) < x
    } else {
        c.wrapping_add(cw) >= x
    }
}

pub fn overlaps(candidate: Rect, region: Rect) -> bool {
    overlaps_axis(candidate.x, candidate.w, region.x, region.w)
        && overlaps_axis(candidate.y, candidate.h, region.y, region.h)
}

fn mark_overlapping(region: Rect, sprites: &mut [VgaSprite], snapshots: &mut [Snapshot], scroll_x: i16) -> bool {
    let mut marked = false;
    for s in sprites.iter_mut() {
        if s.dirty || s.image == 0 {
            continue;
        }
        if overlaps(s.bounds(), region) {
            s.dirty = true;
            marked = true;
        }
    }
    for a in snapshots.iter_mut() {
        if a.dirty {
            continue;
        }
        if overlaps(a.world_rect(scroll_x), region) {
            a.dirty = true;
            marked = true;
        }
    }
    marked
}

/// Spreads dirty marks until a pass over every dirty sprite and snapshot
/// adds none. Marks only ever get added, so this takes at most one pass
/// per region plus the final empty one. Returns the number of passes.
pub fn dirty_clips(sprites: &mut [VgaSprite], snapshots: &mut [Snapshot], scroll_x: i16) -> usize {
    let mut passes = 0;
    loop {
        passes += 1;
        let mut marked = false;
        for i in 0..sprites.len() {
            if sprites[i].dirty {
                let region = sprites[i].bounds();
                marked |= mark_overlapping(region, sprites, snapshots, scroll_x);
            }
        }
        for i in 0..snapshots.len() {
            if snapshots[i].dirty {
                let region = snapshots[i].world_rect(scroll_x);
                marked |= mark_overlapping(region, sprites, snapshots, scroll_x);
            }
        }
        if !marked {
            return passes;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeKind {
    Player,
    Monster,
}

/// ## Compositor
///
/// Owns the back buffer. Each frame restores the backgrounds of sprites
/// that must be redrawn (most recent first), redraws them in priority
/// order over fresh snapshots, and grows the dirty rectangle that the
/// next flush presents.

#[derive(Debug)]
pub struct Compositor {
    back: Surface,
    mode: DirtyMode,
    background: Option<(u16, u16)>,
    snapshots: Vec<Snapshot>,
    dirty: Rect,
    full_redraw: bool,
    palette: Option<Vec<u8>>,
    scroll_x: i16,
    scroll_count: i16,
    scroll_limit: i16,
    spell_active: bool,
    frames: u32,
}

impl Compositor {
    pub fn new(width: usize, height: usize, mode: DirtyMode) -> Compositor {
        Compositor {
            back: Surface::new(width, height),
            mode,
            background: None,
            snapshots: vec![],
            dirty: Rect::default(),
            full_redraw: true,
            palette: None,
            scroll_x: 0,
            scroll_count: 0,
            scroll_limit: 0,
            spell_active: false,
            frames: 0,
        }
    }

    pub fn back(&self) -> &Surface {
        &self.back
    }

    pub fn mode(&self) -> DirtyMode {
        self.mode
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn dirty_rect(&self) -> Rect {
        self.dirty
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn background(&self) -> Option<(u16, u16)> {
        self.background
    }

    pub fn scroll_x(&self) -> i16 {
        self.scroll_x
    }

    pub fn scroll_count(&self) -> i16 {
        self.scroll_count
    }

    pub fn request_full_redraw(&mut self) {
        self.full_redraw = true;
    }

    pub fn set_background(&mut self, zone: u16, image: u16) {
        self.background = Some((zone, image));
        self.full_redraw = true;
    }

    pub fn set_palette(&mut self, palette: Vec<u8>) {
        self.palette = Some(palette);
    }

    fn touch(&mut self, rect: Rect) {
        self.dirty = self.dirty.union(&rect);
    }

    /// Forces the background under `rect` back on the next frame.
    pub fn invalidate(&mut self, rect: Rect) {
        let scroll_x = self.scroll_x;
        for a in self.snapshots.iter_mut() {
            if overlaps(a.world_rect(scroll_x), rect) {
                a.dirty = true;
            }
        }
    }

    /// Positive counts scroll right. Scrolling stops at either edge of
    /// the background, whatever count remains.
    pub fn start_scroll(&mut self, count: i16, limit: i16) {
        self.scroll_count = count;
        self.scroll_limit = limit.max(0);
    }

    /// One scroll step; false when scrolling is over.
    pub fn scroll_step(&mut self) -> bool {
        if self.scroll_count > 0 && self.scroll_x < self.scroll_limit {
            self.scroll_x += 1;
            self.scroll_count -= 1;
        } else if self.scroll_count < 0 && self.scroll_x > 0 {
            self.scroll_x -= 1;
            self.scroll_count += 1;
        } else {
            self.scroll_count = 0;
        }
        self.full_redraw = true;
        self.scroll_count != 0
    }

    fn draw_background(&mut self, zones: &Zones) {
        self.back.fill(0);
        if let Some((zone, image)) = self.background {
            if let Some(image) = zones.image(zone, image) {
                self.back.draw_image(image, -self.scroll_x, 0);
            }
        }
        let all = self.back.bounds();
        self.touch(all);
    }

    fn restore_background(&mut self) {
        match self.mode {
            DirtyMode::Full => {
                while let Some(snap) = self.snapshots.pop() {
                    self.back.write_rect(snap.rect, &snap.pixels);
                    self.touch(snap.rect);
                }
            }
            DirtyMode::Clipped => {
                let mut i = self.snapshots.len();
                while i > 0 {
                    i -= 1;
                    if self.snapshots[i].dirty {
                        let snap = self.snapshots.remove(i);
                        self.back.write_rect(snap.rect, &snap.pixels);
                        self.touch(snap.rect);
                    }
                }
            }
        }
    }

    fn draw_spell_effect(&mut self, color: u8) {
        let phase = (self.frames % 4) as usize;
        let width = self.back.width() as i16;
        for y in (phase..self.back.height()).step_by(4) {
            self.back.fill_rect(Rect::new(0, y as i16, width, 1), color);
        }
        let all = self.back.bounds();
        self.touch(all);
    }

    /// Redraws one frame into the back buffer. `spell` is the value of
    /// the spell-effect variable, 0 when inactive. Returns the number of
    /// dirty propagation passes.
    pub fn compose(&mut self, sprites: &mut SpriteTable, zones: &Zones, spell: i16) -> usize {
        self.frames = self.frames.wrapping_add(1);
        let mut passes = 0;
        if self.full_redraw {
            self.full_redraw = false;
            self.snapshots.clear();
            self.draw_background(zones);
            sprites.mark_all_dirty();
        } else {
            if self.mode == DirtyMode::Clipped {
                passes = dirty_clips(sprites.as_mut_slice(), &mut self.snapshots, self.scroll_x);
            } else {
                sprites.mark_all_dirty();
            }
            self.restore_background();
        }
        if spell != 0 {
            self.spell_active = true;
            self.draw_spell_effect(spell as u8);
        } else if self.spell_active {
            self.spell_active = false;
            self.full_redraw = true;
        }
        let scroll_x = self.scroll_x;
        for i in 0..sprites.len() {
            let sprite = sprites.as_slice()[i];
            if !sprite.dirty {
                continue;
            }
            let mut screen_rect = sprite.bounds();
            screen_rect.x = screen_rect.x.wrapping_sub(scroll_x);
            let (rect, pixels) = self.back.read_rect(screen_rect);
            if let Some(image) = zones.image(sprite.zone, sprite.image) {
                self.back.draw_image(image, screen_rect.x, screen_rect.y);
            }
            self.touch(rect);
            self.snapshots.push(Snapshot {
                rect,
                window: sprite.window,
                pixels,
                dirty: false,
            });
            sprites.as_mut_slice()[i].dirty = false;
        }
        passes
    }

    /// Gauge bar at the bottom left (player) or right (monster).
    pub fn draw_gauge(&mut self, kind: GaugeKind, level: i16) {
        let (x, color) = match kind {
            GaugeKind::Player => (8, 12),
            GaugeKind::Monster => (self.back.width() as i16 - 16, 4),
        };
        let base = self.back.height() as i16 - 8;
        let frame = Rect::new(x, base - 32, 8, 32);
        self.back.fill_rect(frame, 0);
        let h = (level.max(0).min(16)) * 2;
        self.back.fill_rect(Rect::new(x, base - h, 8, h), color);
        let clipped = frame.clip(self.back.width(), self.back.height());
        self.touch(clipped);
    }

    pub fn has_pending(&self) -> bool {
        !self.dirty.is_empty() || self.palette.is_some()
    }

    /// Presents the palette and the dirty rectangle, then starts a new
    /// rectangle.
    pub fn flush(&mut self, screen: &mut dyn Screen) -> bool {
        let mut flushed = false;
        if let Some(palette) = self.palette.take() {
            screen.set_palette(&palette);
            flushed = true;
        }
        let rect = self.dirty.clip(self.back.width(), self.back.height());
        self.dirty = Rect::default();
        if !rect.is_empty() {
            screen.blit(&self.back, rect);
            flushed = true;
        }
        flushed
    }

    /// Forgets all drawn state; the next frame starts from the background.
    pub fn reset(&mut self) {
        self.snapshots.clear();
        self.scroll_count = 0;
        self.spell_active = false;
        self.full_redraw = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(id: u16, x: i16, y: i16, w: i16, h: i16) -> VgaSprite {
        VgaSprite {
            image: 1,
            x,
            y,
            w,
            h,
            ..VgaSprite::new(id, 0)
        }
    }

    #[test]
    fn test_edge_rule_is_asymmetric() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!overlaps(b, a));
        assert!(overlaps(a, b));
        assert!(!overlaps(Rect::new(0, 10, 10, 10), a));
        assert!(overlaps(a, Rect::new(0, 10, 10, 10)));
        assert!(!overlaps(Rect::new(0, 0, 9, 10), b));
    }

    #[test]
    fn test_clean_set_takes_one_pass() {
        let mut sprites = vec![sprite(1, 0, 0, 4, 4), sprite(2, 50, 50, 4, 4)];
        assert_eq!(dirty_clips(&mut sprites, &mut [], 0), 1);
        assert!(!sprites[0].dirty && !sprites[1].dirty);
    }

    #[test]
    fn test_snapshot_marks_sprite() {
        let mut sprites = vec![sprite(1, 100, 100, 4, 4)];
        let mut snaps = vec![Snapshot {
            rect: Rect::new(98, 98, 4, 4),
            window: 0,
            pixels: vec![],
            dirty: true,
        }];
        dirty_clips(&mut sprites, &mut snaps, 0);
        assert!(sprites[0].dirty);
        let mut sprites = vec![sprite(1, 100, 100, 4, 4)];
        snaps[0].rect.x = 90;
        dirty_clips(&mut sprites, &mut snaps, 0);
        assert!(!sprites[0].dirty);
        dirty_clips(&mut sprites, &mut snaps, 8);
        assert!(sprites[0].dirty);
    }

    #[test]
    fn test_scroll_stops_at_edges() {
        let mut c = Compositor::new(4, 4, DirtyMode::Clipped);
        c.start_scroll(3, 2);
        assert!(c.scroll_step());
        assert!(c.scroll_step());
        assert!(!c.scroll_step());
        assert_eq!(c.scroll_x(), 2);
        assert_eq!(c.scroll_count(), 0);
        c.start_scroll(-5, 2);
        while c.scroll_step() {}
        assert_eq!(c.scroll_x(), 0);
    }
}
