use super::{Clock, EventId, LockOut, VgaEventKind, VgaTimerEntry};
use crate::engine::Engine;
use crate::error::{Result, SubroutineId};
use crate::gfx::GaugeKind;
use tracing::{trace, warn};

/// ## Frame pump
///
/// Paces ticks against the wall clock. Ticks only happen inside
/// `Engine::delay`, which is the one place scripts block.

pub struct FramePump {
    clock: Box<dyn Clock>,
    last_tick: u64,
    in_callback: bool,
    parity: bool,
    ticks: u32,
    passes: u32,
    paused: bool,
    wait_for: Option<u16>,
}

impl std::fmt::Debug for FramePump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FramePump(tick {}, pass {})", self.ticks, self.passes)
    }
}

impl FramePump {
    pub fn new(clock: Box<dyn Clock>) -> FramePump {
        let last_tick = clock.millis();
        FramePump {
            clock,
            last_tick,
            in_callback: false,
            parity: false,
            ticks: 0,
            passes: 0,
            paused: false,
            wait_for: None,
        }
    }

    pub fn millis(&self) -> u64 {
        self.clock.millis()
    }

    /// Whole seconds on the engine clock; the unit of timed events.
    pub fn seconds(&self) -> u32 {
        (self.clock.millis() / 1000) as u32
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// VGA timer processing passes run so far.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn parity(&self) -> bool {
        self.parity
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn wait_for(&self) -> Option<u16> {
        self.wait_for
    }

    pub(crate) fn signal(&mut self, sync: u16) {
        if self.wait_for == Some(sync) {
            self.wait_for = None;
        }
    }
}

impl Engine {
    /// Blocks for `millis` of wall-clock time, ticking whenever a period
    /// has elapsed. Never falls more than two periods behind: a late pump
    /// drops the backlog instead of bursting.
    pub fn delay(&mut self, millis: u64) -> Result<()> {
        let period = self.config.period();
        let slice = if self.config.fast_mode { 1 } else { 20 };
        let start = self.pump.millis();
        let mut cur = start;
        loop {
            while !self.pump.in_callback && !self.pump.paused && cur >= self.pump.last_tick + period {
                self.pump.last_tick += period;
                if cur >= self.pump.last_tick + period * 2 {
                    self.pump.last_tick = cur;
                }
                self.pump.in_callback = true;
                let result = self.timer_proc();
                self.pump.in_callback = false;
                result?;
            }
            self.input_state = self.input.poll();
            if millis == 0 {
                break;
            }
            self.pump.clock.sleep(slice.min(millis));
            cur = self.pump.millis();
            if cur >= start + millis || self.quit_requested() {
                break;
            }
        }
        Ok(())
    }

    /// The tick handler.
    pub fn timer_proc(&mut self) -> Result<()> {
        if self.timers.lock.any(LockOut::TICK_BLOCKERS) || self.timers.lock.hold(LockOut::IN_TICK) {
            return Ok(());
        }
        let result = self.tick();
        self.timers.lock.release(LockOut::IN_TICK);
        result
    }

    fn tick(&mut self) -> Result<()> {
        self.pump.ticks = self.pump.ticks.wrapping_add(1);
        let (x, y) = (self.input_state.mouse_x, self.input_state.mouse_y);
        self.hovered = self.gfx.hit_areas.find(x, y).map(|a| a.id);
        if !self.timers.lock.any(LockOut::HALT) {
            self.process_vga_events()?;
            self.process_vga_events()?;
            self.pump.parity = !self.pump.parity;
            if !self.pump.parity {
                self.process_vga_events()?;
            }
        }
        if self.gfx.compositor.has_pending() {
            self.gfx.compositor.flush(self.screen.as_mut());
        }
        Ok(())
    }

    /// One countdown pass over the VGA timer table.
    pub fn process_vga_events(&mut self) -> Result<()> {
        self.pump.passes = self.pump.passes.wrapping_add(1);
        let base = self.config.variant.vga_base_delay;
        let mut i = 0;
        while !self.quit_requested() {
            let entry = match self.timers.vga.get_mut(i) {
                Some(entry) => entry,
                None => break,
            };
            entry.delay -= base;
            if entry.delay > 0 {
                i += 1;
                continue;
            }
            let entry = *entry;
            trace!(kind = ?entry.kind, sprite = entry.sprite, "vga event");
            match entry.kind {
                VgaEventKind::AnimateInt => {
                    if let Some(e) = self.timers.vga.get_mut(i) {
                        e.delay = self.config.variant.rearm_delay;
                    }
                    i += 1;
                    self.animate_sprites()?;
                }
                VgaEventKind::AnimateEvent | VgaEventKind::ScrollEvent => {
                    self.timers.vga.set_resume(i + 1);
                    self.timers.lock.hold(LockOut::TABLE);
                    self.timers.vga.remove(i);
                    self.timers.lock.release(LockOut::TABLE);
                    if entry.kind == VgaEventKind::AnimateEvent {
                        self.run_vga_script(entry.script, entry.sprite)?;
                    } else {
                        self.scroll_event()?;
                    }
                    i = self.timers.vga.resume();
                }
                VgaEventKind::PlayerDamage | VgaEventKind::MonsterDamage => match self.gauge_event(entry) {
                    Some(delay) => {
                        if let Some(e) = self.timers.vga.get_mut(i) {
                            e.delay = delay.max(1);
                        }
                        i += 1;
                    }
                    None => {
                        self.timers.vga.remove(i);
                    }
                },
            }
        }
        Ok(())
    }

    /// Redraws the frame from the sprite table.
    pub fn animate_sprites(&mut self) -> Result<()> {
        let spell = match self.config.variant.spell_effect_var {
            Some(var) => self.world.vars.fetch(var)?,
            None => 0,
        };
        let passes = self
            .gfx
            .compositor
            .compose(&mut self.gfx.sprites, &self.gfx.zones, spell);
        trace!(passes, "compose");
        Ok(())
    }

    /// Ramps a gauge one step up to its target, holds, then ramps it down.
    /// Returns the next delay, or `None` once the gauge is back at zero.
    fn gauge_event(&mut self, entry: VgaTimerEntry) -> Option<i16> {
        let (index, kind) = match entry.kind {
            VgaEventKind::PlayerDamage => (0, GaugeKind::Player),
            _ => (1, GaugeKind::Monster),
        };
        let target = entry.sprite as i16;
        let gauge = &mut self.gfx.gauges[index];
        let next = if !gauge.falling {
            gauge.level += 1;
            if gauge.level >= target {
                gauge.falling = true;
                Some(16 - target)
            } else {
                Some(1)
            }
        } else {
            gauge.level -= 1;
            if gauge.level <= 0 {
                gauge.level = 0;
                gauge.falling = false;
                None
            } else {
                Some(3)
            }
        };
        let level = gauge.level;
        self.gfx.compositor.draw_gauge(kind, level);
        next
    }

    /// Starts a damage gauge unless one of that kind is already running.
    pub fn start_damage(&mut self, kind: GaugeKind, level: i16) -> Result<()> {
        let (index, event) = match kind {
            GaugeKind::Player => (0, VgaEventKind::PlayerDamage),
            GaugeKind::Monster => (1, VgaEventKind::MonsterDamage),
        };
        if self.timers.vga.iter().any(|e| e.kind == event) {
            return Ok(());
        }
        self.gfx.gauges[index] = Default::default();
        self.add_vga_event(VgaTimerEntry {
            delay: 1,
            kind: event,
            script: Default::default(),
            sprite: level.max(1).min(16) as u16,
            zone: 0,
        })
    }

    pub fn schedule_event(&mut self, timeout: u32, subroutine: SubroutineId) -> EventId {
        let now = self.pump.seconds();
        self.timers.events.schedule(now, timeout, subroutine)
    }

    /// Fires every due timed event, earliest first.
    pub fn run_timed_events(&mut self) -> Result<usize> {
        let mut fired = 0;
        while !self.quit_requested() {
            let now = self.pump.seconds();
            let event = match self.timers.events.begin_firing(now) {
                Some(event) => event,
                None => break,
            };
            trace!(subroutine = event.subroutine, time = event.time, "timed event");
            let result = self.run_subroutine_id(event.subroutine);
            self.timers.events.finish_firing();
            result?;
            fired += 1;
        }
        Ok(fired)
    }

    /// Waits out `millis`, then fires due timed events. What a front end
    /// calls between player commands.
    pub fn idle(&mut self, millis: u64) -> Result<usize> {
        self.delay(millis)?;
        self.run_timed_events()
    }

    /// Blocks until a VGA script signals `sync`. Gives up with a warning
    /// after the variant's iteration cap.
    pub fn wait_for_sync(&mut self, sync: u16) -> Result<()> {
        self.pump.wait_for = Some(sync);
        let cap = self.config.variant.sync_iterations;
        let mut count = 0;
        while self.pump.wait_for.is_some() && !self.quit_requested() {
            if count >= cap {
                warn!(sync, "wait for sync timed out");
                self.pump.wait_for = None;
                break;
            }
            count += 1;
            self.delay(1)?;
        }
        Ok(())
    }

    pub fn halt_animation(&mut self) {
        self.timers.lock.hold(LockOut::HALT);
    }

    pub fn restart_animation(&mut self) {
        self.timers.lock.release(LockOut::HALT);
    }

    /// Freezes ticks and the game clock.
    pub fn pause(&mut self) {
        if !self.pump.paused {
            self.pump.paused = true;
            let now = self.pump.seconds();
            self.timers.events.stop_clock(now);
        }
    }

    pub fn resume(&mut self) {
        if self.pump.paused {
            self.pump.paused = false;
            self.pump.last_tick = self.pump.millis();
            let now = self.pump.seconds();
            self.timers.events.start_clock(now);
        }
    }
}
