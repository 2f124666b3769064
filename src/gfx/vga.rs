use super::{ScriptPtr, VgaSprite};
use crate::engine::Engine;
use crate::error;
use crate::error::Result;
use crate::mach::Cursor;
use crate::sched::{VgaEventKind, VgaTimerEntry};
use std::rc::Rc;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VgaOp {
    End,
    Call,
    LoadSprite,
    IfEqual,
    Draw,
    Delay,
    AddToSpriteX,
    AddToSpriteY,
    Sync,
    WaitSync,
    Jump,
    SetPalette,
    SetPriority,
    SetSpriteXY,
    HaltSprite,
    SetBackground,
    SetVar,
    ScrollRight,
    ScrollLeft,
    IfBitSet,
    IfBitClear,
}

/// VGA operand. Every operand is one big-endian word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VArg {
    Word,
    /// Negative literals read variable `-n`.
    Value,
}

#[derive(Debug, Clone, Copy)]
pub struct VgaOpDef {
    pub code: u16,
    pub op: VgaOp,
    pub args: &'static [VArg],
}

macro_rules! vdef {
    ($code:expr, $op:ident, [$($arg:ident),*]) => {
        VgaOpDef {
            code: $code,
            op: VgaOp::$op,
            args: &[$(VArg::$arg),*],
        }
    };
}

pub static VGA_OPCODES: &[VgaOpDef] = &[
    vdef!(0, End, []),
    vdef!(2, Call, [Word]),
    vdef!(3, LoadSprite, [Word, Word, Word, Word, Word]),
    vdef!(5, IfEqual, [Word, Value]),
    vdef!(10, Draw, [Value, Word, Word]),
    vdef!(12, Delay, [Value]),
    vdef!(13, AddToSpriteX, [Word]),
    vdef!(14, AddToSpriteY, [Word]),
    vdef!(15, Sync, [Word]),
    vdef!(16, WaitSync, [Word]),
    vdef!(18, Jump, [Word]),
    vdef!(22, SetPalette, [Word]),
    vdef!(23, SetPriority, [Value]),
    vdef!(24, SetSpriteXY, [Word, Word]),
    vdef!(25, HaltSprite, []),
    vdef!(36, SetBackground, [Word]),
    vdef!(39, SetVar, [Word, Value]),
    vdef!(40, ScrollRight, [Value]),
    vdef!(41, ScrollLeft, [Value]),
    vdef!(43, IfBitSet, [Word]),
    vdef!(44, IfBitClear, [Word]),
];

pub fn vga_lookup(code: u16) -> Result<&'static VgaOpDef> {
    match VGA_OPCODES.iter().find(|d| d.code == code) {
        Some(def) => Ok(def),
        None => Err(error!(InvalidVgaOpcode; "vga opcode {}", code)),
    }
}

pub fn vga_code(op: VgaOp) -> u16 {
    VGA_OPCODES
        .iter()
        .find(|d| d.op == op)
        .map(|d| d.code)
        .unwrap_or_default()
}

/// A VGA script parked until a sync id is signalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sleeper {
    pub sync: u16,
    pub ptr: ScriptPtr,
    pub sprite: u16,
}

#[derive(Debug, Default)]
pub struct VgaState {
    pub sleepers: Vec<Sleeper>,
    depth: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gauge {
    pub level: i16,
    pub falling: bool,
}

fn skip_instruction(cursor: &mut Cursor) -> Result<()> {
    let def = vga_lookup(cursor.word()?)?;
    for _ in def.args {
        cursor.word()?;
    }
    Ok(())
}

impl Engine {
    fn vga_value(&self, raw: u16) -> Result<i16> {
        let v = raw as i16;
        if v < 0 {
            self.world.vars.fetch(-(v as i32) as usize)
        } else {
            Ok(v)
        }
    }

    /// Starts a sprite's animation script. Does nothing if the sprite is
    /// already running or its zone has no such animation.
    pub fn animate(&mut self, window: u8, zone: u16, sprite: u16, x: i16, y: i16, palette: u16) -> Result<()> {
        if self.gfx.sprites.find(sprite, zone).is_some() {
            return Ok(());
        }
        if !self.gfx.zones.load(zone, self.resources.as_ref())? {
            return Err(error!(ZoneNotFound; "zone {}", zone));
        }
        let offset = match self.gfx.zones.get(zone)?.animation(sprite) {
            Some(offset) => offset,
            None => {
                debug!(zone, sprite, "no animation");
                return Ok(());
            }
        };
        self.gfx.sprites.insert(VgaSprite {
            x,
            y,
            window,
            palette,
            dirty: true,
            ..VgaSprite::new(sprite, zone)
        })?;
        self.run_vga_script(ScriptPtr { zone, offset }, sprite)
    }

    /// Removes a sprite with its pending continuations and sleepers.
    pub fn stop_animate(&mut self, sprite: u16, zone: u16) {
        self.timers.lock.hold(crate::sched::LockOut::TABLE);
        self.timers.vga.remove_for_sprite(sprite, zone);
        self.timers.lock.release(crate::sched::LockOut::TABLE);
        self.gfx
            .vga
            .sleepers
            .retain(|s| !(s.sprite == sprite && s.ptr.zone == zone));
        if let Some(old) = self.gfx.sprites.remove(sprite, zone) {
            self.gfx.compositor.invalidate(old.bounds());
        }
    }

    /// Wakes every VGA script sleeping on `sync` and releases a
    /// subroutine waiting for it.
    pub fn send_sync(&mut self, sync: u16) -> Result<()> {
        let mut i = 0;
        while i < self.gfx.vga.sleepers.len() {
            if self.gfx.vga.sleepers[i].sync == sync {
                let s = self.gfx.vga.sleepers.remove(i);
                self.add_vga_event(VgaTimerEntry {
                    delay: self.config.variant.vga_base_delay,
                    kind: VgaEventKind::AnimateEvent,
                    script: s.ptr,
                    sprite: s.sprite,
                    zone: s.ptr.zone,
                })?;
            } else {
                i += 1;
            }
        }
        self.pump.signal(sync);
        Ok(())
    }

    pub(crate) fn add_vga_event(&mut self, entry: VgaTimerEntry) -> Result<()> {
        self.timers.lock.hold(crate::sched::LockOut::TABLE);
        let result = self.timers.vga.add(entry);
        self.timers.lock.release(crate::sched::LockOut::TABLE);
        result
    }

    fn update_sprite<F: FnOnce(&mut VgaSprite)>(&mut self, sprite: u16, zone: u16, f: F) {
        let zones = &self.gfx.zones;
        if let Some(s) = self.gfx.sprites.find_mut(sprite, zone) {
            let old = s.bounds();
            f(s);
            if let Some(image) = zones.image(zone, s.image) {
                s.w = image.width as i16;
                s.h = image.height as i16;
            }
            s.dirty = true;
            self.gfx.compositor.invalidate(old);
        }
    }

    /// Runs VGA bytecode for one sprite until it ends, delays, sleeps or
    /// halts.
    pub fn run_vga_script(&mut self, ptr: ScriptPtr, sprite: u16) -> Result<()> {
        if self.gfx.vga.depth >= self.config.max_call_depth {
            return Err(error!(RecursionError; "vga call (depth {})", self.gfx.vga.depth + 1));
        }
        self.gfx.vga.depth += 1;
        let result = self.run_vga(ptr, sprite);
        self.gfx.vga.depth -= 1;
        result
    }

    fn run_vga(&mut self, ptr: ScriptPtr, sprite: u16) -> Result<()> {
        let zone = ptr.zone;
        let code: Rc<[u8]> = self.gfx.zones.get(zone)?.script.clone();
        let mut cursor = Cursor::at(code, ptr.offset as usize)?;
        let mut args = [0u16; 5];
        loop {
            if self.quit_requested() {
                return Ok(());
            }
            let def = vga_lookup(cursor.word()?)?;
            for (slot, arg) in args.iter_mut().zip(def.args) {
                let raw = cursor.word()?;
                *slot = match arg {
                    VArg::Word => raw,
                    VArg::Value => self.vga_value(raw)? as u16,
                };
            }
            trace!(op = ?def.op, sprite, zone, "vga");
            let here = ScriptPtr {
                zone,
                offset: cursor.pos() as u16,
            };
            match def.op {
                VgaOp::End => return Ok(()),
                VgaOp::Call => {
                    let offset = match self.gfx.zones.get(zone)?.animation(args[0]) {
                        Some(offset) => offset,
                        None => return Err(error!(ZoneNotFound; "animation {} in zone {}", args[0], zone)),
                    };
                    self.run_vga_script(ScriptPtr { zone, offset }, sprite)?;
                }
                VgaOp::LoadSprite => {
                    self.animate(args[1] as u8, zone, args[0], args[2] as i16, args[3] as i16, args[4])?;
                }
                VgaOp::IfEqual => {
                    if self.world.vars.fetch(args[0] as usize)? != args[1] as i16 {
                        skip_instruction(&mut cursor)?;
                    }
                }
                VgaOp::Draw => {
                    let (image, x, y) = (args[0], args[1] as i16, args[2] as i16);
                    self.update_sprite(sprite, zone, |s| {
                        s.image = image;
                        s.x = x;
                        s.y = y;
                    });
                }
                VgaOp::Delay => {
                    // Counted from the next pass, not the one in progress.
                    let delay = (args[0] as i16).wrapping_add(self.config.variant.vga_base_delay);
                    self.add_vga_event(VgaTimerEntry {
                        delay,
                        kind: VgaEventKind::AnimateEvent,
                        script: here,
                        sprite,
                        zone,
                    })?;
                    return Ok(());
                }
                VgaOp::AddToSpriteX => {
                    let dx = args[0] as i16;
                    self.update_sprite(sprite, zone, |s| s.x = s.x.wrapping_add(dx));
                }
                VgaOp::AddToSpriteY => {
                    let dy = args[0] as i16;
                    self.update_sprite(sprite, zone, |s| s.y = s.y.wrapping_add(dy));
                }
                VgaOp::Sync => self.send_sync(args[0])?,
                VgaOp::WaitSync => {
                    self.gfx.vga.sleepers.push(Sleeper {
                        sync: args[0],
                        ptr: here,
                        sprite,
                    });
                    return Ok(());
                }
                VgaOp::Jump => {
                    let target = cursor.pos() as i64 + (args[0] as i16) as i64;
                    if target < 0 {
                        return Err(error!(OutOfCode; "vga jump to {}", target));
                    }
                    cursor = Cursor::at(cursor.code().clone(), target as usize)?;
                }
                VgaOp::SetPalette => {
                    if self.gfx.zones.load(args[0], self.resources.as_ref())? {
                        let palette = self.gfx.zones.get(args[0])?.palette.clone();
                        self.gfx.compositor.set_palette(palette);
                    }
                }
                VgaOp::SetPriority => {
                    self.gfx.sprites.set_priority(sprite, zone, args[0] as i16);
                }
                VgaOp::SetSpriteXY => {
                    let (x, y) = (args[0] as i16, args[1] as i16);
                    self.update_sprite(sprite, zone, |s| {
                        s.x = x;
                        s.y = y;
                    });
                }
                VgaOp::HaltSprite => {
                    self.stop_animate(sprite, zone);
                    return Ok(());
                }
                VgaOp::SetBackground => self.gfx.compositor.set_background(zone, args[0]),
                VgaOp::SetVar => self.world.vars.store(args[0] as usize, args[1] as i16)?,
                VgaOp::ScrollRight => self.start_scroll(args[0] as i16)?,
                VgaOp::ScrollLeft => self.start_scroll(-(args[0] as i16))?,
                VgaOp::IfBitSet => {
                    if !self.world.vars.bit(args[0] as usize)? {
                        skip_instruction(&mut cursor)?;
                    }
                }
                VgaOp::IfBitClear => {
                    if self.world.vars.bit(args[0] as usize)? {
                        skip_instruction(&mut cursor)?;
                    }
                }
            }
        }
    }

    fn start_scroll(&mut self, count: i16) -> Result<()> {
        if !self.config.variant.scrolling {
            debug!(count, "scrolling disabled");
            return Ok(());
        }
        let limit = match self.gfx.compositor.background() {
            Some((zone, image)) => match self.gfx.zones.image(zone, image) {
                Some(image) => image.width as i16 - self.config.screen_width as i16,
                None => 0,
            },
            None => 0,
        };
        self.gfx.compositor.start_scroll(count, limit);
        let pending = self
            .timers
            .vga
            .iter()
            .any(|e| e.kind == VgaEventKind::ScrollEvent);
        if !pending {
            self.add_vga_event(VgaTimerEntry {
                delay: 1,
                kind: VgaEventKind::ScrollEvent,
                script: ScriptPtr::default(),
                sprite: 0,
                zone: 0,
            })?;
        }
        Ok(())
    }

    /// One scroll step; re-arms until the scroll is done.
    pub(crate) fn scroll_event(&mut self) -> Result<()> {
        if self.gfx.compositor.scroll_step() {
            self.add_vga_event(VgaTimerEntry {
                delay: 6,
                kind: VgaEventKind::ScrollEvent,
                script: ScriptPtr::default(),
                sprite: 0,
                zone: 0,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vga_codes_unique() {
        let mut seen = std::collections::HashSet::new();
        for def in VGA_OPCODES {
            assert!(seen.insert(def.code));
            assert!(def.args.len() <= 5);
        }
        assert_eq!(vga_code(VgaOp::Delay), 12);
        assert!(vga_lookup(1).is_err());
    }
}
