/*!
## Graphics Module

Sprites, the VGA animation bytecode that moves them, and the compositor
that turns sprite changes into dirty rectangles on the presentation
surface.

*/

mod compositor;
mod hitarea;
mod sprite;
mod surface;
mod vga;
mod zone;

pub use compositor::{dirty_clips, overlaps, overlaps_axis, Compositor, GaugeKind, Snapshot};
pub use hitarea::{HitArea, HitAreas};
pub use sprite::{SpriteTable, VgaSprite};
pub use surface::{MemoryScreen, Rect, Screen, Surface};
pub use vga::{vga_code, vga_lookup, Gauge, Sleeper, VArg, VgaOp, VgaOpDef, VgaState, VGA_OPCODES};
pub use zone::{Image, ScriptPtr, ZoneData, Zones};

use crate::config::EngineConfig;

/// The graphics capability handed to opcode handlers.
#[derive(Debug)]
pub struct Graphics {
    pub sprites: SpriteTable,
    pub compositor: Compositor,
    pub zones: Zones,
    pub vga: VgaState,
    pub gauges: [Gauge; 2],
    pub hit_areas: HitAreas,
}

impl Graphics {
    pub fn new(config: &EngineConfig) -> Graphics {
        Graphics {
            sprites: SpriteTable::new(config.sprite_capacity),
            compositor: Compositor::new(config.screen_width, config.screen_height, config.variant.dirty_mode),
            zones: Zones::new(),
            vga: VgaState::default(),
            gauges: [Gauge::default(); 2],
            hit_areas: HitAreas::new(),
        }
    }

    /// Drops everything derived from running animations. Loaded zones
    /// and hit areas survive.
    pub fn reset(&mut self) {
        self.sprites.clear();
        self.compositor.reset();
        self.vga.sleepers.clear();
        self.gauges = [Gauge::default(); 2];
    }
}
