use super::{Args, ClassSlot, Opcode, Operand, Operation, Output, SCRIPT_RESTART};
use crate::engine::Engine;
use crate::error;
use crate::error::Result;
use crate::gfx::{GaugeKind, HitArea, Rect};
use crate::world::ItemId;
use tracing::debug;

fn value(arg: Operand) -> i16 {
    match arg {
        Operand::Value(v) => v,
        Operand::Item(Some(id)) => id.get() as i16,
        _ => 0,
    }
}

fn var(arg: Operand) -> Result<usize> {
    match arg {
        Operand::Var(index) => Ok(index),
        _ => Err(error!(InternalError; "operand {:?} is not a variable", arg)),
    }
}

fn item(arg: Operand) -> Option<ItemId> {
    match arg {
        Operand::Item(id) => id,
        _ => None,
    }
}

fn some_item(arg: Operand) -> Result<ItemId> {
    match item(arg) {
        Some(id) => Ok(id),
        None => Err(error!(BadItem; "no item")),
    }
}

fn class_mask(class: i16) -> u16 {
    if class < 0 || class >= 16 {
        0
    } else {
        1 << class
    }
}

impl Engine {
    fn fetch(&self, arg: Operand) -> Result<i16> {
        self.world.vars.fetch(var(arg)?)
    }

    fn store(&mut self, arg: Operand, v: i16) -> Result<()> {
        self.world.vars.store(var(arg)?, v)
    }

    fn item_id_value(id: Option<ItemId>) -> i16 {
        id.map(|i| i.get() as i16).unwrap_or(0)
    }

    pub(crate) fn execute(&mut self, op: Opcode, a: &Args) -> Result<()> {
        use Opcode::*;
        match op {
            At => {
                let room = self.world.items.parent(ItemId::PLAYER)?;
                self.script.condition = room.is_some() && room == item(a[0]);
            }
            NotAt => {
                let room = self.world.items.parent(ItemId::PLAYER)?;
                self.script.condition = room.is_none() || room != item(a[0]);
            }
            Carried => {
                let parent = self.world.items.parent(some_item(a[0])?)?;
                self.script.condition = parent == Some(ItemId::PLAYER);
            }
            NotCarried => {
                let parent = self.world.items.parent(some_item(a[0])?)?;
                self.script.condition = parent != Some(ItemId::PLAYER);
            }
            IsAt => {
                let parent = self.world.items.parent(some_item(a[0])?)?;
                self.script.condition = parent.is_some() && parent == item(a[1]);
            }
            State => {
                self.script.condition = self.world.items.get(some_item(a[0])?)?.state == value(a[1]);
            }
            Is => self.script.condition = item(a[0]) == item(a[1]),
            If1 => self.script.condition = self.script.subject.is_some(),
            If2 => self.script.condition = self.script.object.is_some(),
            IsClass => {
                let mask = class_mask(value(a[1]));
                self.script.condition = self.world.items.has_class(some_item(a[0])?, mask)?;
            }
            Zero => self.script.condition = self.fetch(a[0])? == 0,
            NotZero => self.script.condition = self.fetch(a[0])? != 0,
            Eq => self.script.condition = self.fetch(a[0])? == value(a[1]),
            NotEq => self.script.condition = self.fetch(a[0])? != value(a[1]),
            Gt => self.script.condition = self.fetch(a[0])? > value(a[1]),
            Lt => self.script.condition = self.fetch(a[0])? < value(a[1]),
            Eqf => self.script.condition = self.fetch(a[0])? == self.fetch(a[1])?,
            NotEqf => self.script.condition = self.fetch(a[0])? != self.fetch(a[1])?,
            Ltf => self.script.condition = self.fetch(a[0])? < self.fetch(a[1])?,
            Gtf => self.script.condition = self.fetch(a[0])? > self.fetch(a[1])?,
            Chance => self.script.condition = Operation::chance(&mut self.rng, value(a[0])),
            BZero => self.script.condition = !self.world.vars.bit(value(a[0]) as u16 as usize)?,
            BNotZero => self.script.condition = self.world.vars.bit(value(a[0]) as u16 as usize)?,
            IsBox => self.script.condition = self.hovered == Some(value(a[0]) as u16),

            Destroy => self.world.items.set_parent(some_item(a[0])?, None)?,
            Place => self.world.items.set_parent(some_item(a[0])?, item(a[1]))?,
            SetState => self.world.items.get_mut(some_item(a[0])?)?.state = value(a[1]),
            SetClass => {
                let mask = class_mask(value(a[1]));
                self.world.items.get_mut(some_item(a[0])?)?.class_flags |= mask;
            }
            UnsetClass => {
                let mask = class_mask(value(a[1]));
                self.world.items.get_mut(some_item(a[0])?)?.class_flags &= !mask;
            }
            GetParent => {
                let id = self.world.items.get(some_item(a[0])?)?.parent;
                self.store(a[1], Engine::item_id_value(id))?;
            }
            GetNext => {
                let id = self.world.items.get(some_item(a[0])?)?.next;
                self.store(a[1], Engine::item_id_value(id))?;
            }
            GetChildren => {
                let id = self.world.items.get(some_item(a[0])?)?.child;
                self.store(a[1], Engine::item_id_value(id))?;
            }

            Copyff => {
                let v = self.fetch(a[0])?;
                self.store(a[1], v)?;
            }
            Clear => self.store(a[0], 0)?,
            Let => self.store(a[0], value(a[1]))?,
            Add => {
                let v = Operation::add(self.fetch(a[0])?, value(a[1]));
                self.store(a[0], v)?;
            }
            Sub => {
                let v = Operation::subtract(self.fetch(a[0])?, value(a[1]));
                self.store(a[0], v)?;
            }
            Addf => {
                let v = Operation::add(self.fetch(a[0])?, self.fetch(a[1])?);
                self.store(a[0], v)?;
            }
            Subf => {
                let v = Operation::subtract(self.fetch(a[0])?, self.fetch(a[1])?);
                self.store(a[0], v)?;
            }
            Mul => {
                let v = Operation::multiply(self.fetch(a[0])?, value(a[1]));
                self.store(a[0], v)?;
            }
            Div => {
                let v = Operation::divide(self.fetch(a[0])?, value(a[1]))?;
                self.store(a[0], v)?;
            }
            Mulf => {
                let v = Operation::multiply(self.fetch(a[0])?, self.fetch(a[1])?);
                self.store(a[0], v)?;
            }
            Divf => {
                let v = Operation::divide(self.fetch(a[0])?, self.fetch(a[1])?)?;
                self.store(a[0], v)?;
            }
            Mod => {
                let v = Operation::modulo(self.fetch(a[0])?, value(a[1]))?;
                self.store(a[0], v)?;
            }
            Modf => {
                let v = Operation::modulo(self.fetch(a[0])?, self.fetch(a[1])?)?;
                self.store(a[0], v)?;
            }
            Random => {
                let v = Operation::random(&mut self.rng, value(a[1]))?;
                self.store(a[0], v)?;
            }
            // Unsigned counters that stick at their limits.
            Inc => {
                let v = self.fetch(a[0])?;
                if v as u16 != 0xFFFF {
                    self.store(a[0], v.wrapping_add(1))?;
                }
            }
            Dec => {
                let v = self.fetch(a[0])?;
                if v != 0 {
                    self.store(a[0], v.wrapping_sub(1))?;
                }
            }
            BSet => self.world.vars.set_bit(value(a[0]) as u16 as usize, true)?,
            BClear => self.world.vars.set_bit(value(a[0]) as u16 as usize, false)?,

            Print => {
                let v = self.fetch(a[0])?;
                self.output.push(Output::Number(v));
            }
            Message => {
                let id = value(a[0]) as u16;
                match self.resources.text(id) {
                    Some(text) => self.output.push(Output::Message(text)),
                    None => debug!(id, "no such message"),
                }
            }

            End => {
                self.request_quit();
                self.output.push(Output::Quit);
            }
            Done => self.script.ret = 1,
            Rescan => self.script.ret = SCRIPT_RESTART,
            Process => {
                let id = value(a[0]) as u16;
                let result = match self.subroutine(id)? {
                    Some(sub) => self.start_subroutine(&sub)?,
                    None => 0,
                };
                self.script.condition = true;
                self.script.ret = if result > 0 { result } else { 0 };
            }
            DoClass => {
                let container = some_item(a[0])?;
                let slot = if value(a[2]) == 1 {
                    ClassSlot::Subject
                } else {
                    ClassSlot::Object
                };
                let class = match value(a[1]) {
                    255 => -1,
                    c => c,
                };
                self.begin_class(container, class, slot)?;
            }
            When => {
                self.schedule_event(value(a[0]) as u16 as u32, value(a[1]) as u16);
            }
            Unwhen => {
                self.timers.events.cancel_subroutine(value(a[0]) as u16);
            }
            ClearTimers => self.timers.events.clear(),
            Delay => self.delay(value(a[0]) as u16 as u64)?,

            HaltAnimation => self.halt_animation(),
            RestartAnimation => self.restart_animation(),
            LoadZone => {
                let zone = value(a[0]) as u16;
                if !self.gfx.zones.load(zone, self.resources.as_ref())? {
                    debug!(zone, "load zone skipped");
                }
            }
            Animate => {
                let sprite = value(a[0]) as u16;
                let window = value(a[1]) as u8;
                let zone = value(a[2]) as u16;
                self.animate(window, zone, sprite, value(a[3]), value(a[4]), value(a[5]) as u16)?;
            }
            StopAnimate => self.stop_animate(value(a[0]) as u16, value(a[1]) as u16),
            WaitSync => self.wait_for_sync(value(a[0]) as u16)?,
            Sync => self.send_sync(value(a[0]) as u16)?,
            Cls => self.gfx.compositor.request_full_redraw(),
            Damage => {
                let kind = if value(a[0]) == 0 {
                    GaugeKind::Player
                } else {
                    GaugeKind::Monster
                };
                self.start_damage(kind, value(a[1]))?;
            }

            AddBox => self.gfx.hit_areas.add(HitArea {
                id: value(a[0]) as u16,
                rect: Rect::new(value(a[1]), value(a[2]), value(a[3]), value(a[4])),
                priority: value(a[5]),
                flags: value(a[6]) as u16,
                item: item(a[7]),
                verb: value(a[8]),
                enabled: true,
            }),
            DelBox => {
                self.gfx.hit_areas.delete(value(a[0]) as u16);
            }
            EnableBox => self.gfx.hit_areas.set_enabled(value(a[0]) as u16, true),
            DisableBox => self.gfx.hit_areas.set_enabled(value(a[0]) as u16, false),
            MoveBox => self.gfx.hit_areas.move_by(value(a[0]) as u16, value(a[1]), value(a[2])),
        }
        Ok(())
    }
}
