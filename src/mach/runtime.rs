use super::{Arg, ClassIteration, ClassSlot, Cursor, OpcodeDef, Stack, Subroutine, MAX_ARGS};
use crate::engine::Engine;
use crate::error;
use crate::error::{Result, SubroutineId};
use crate::world::ItemId;
use std::rc::Rc;
use tracing::trace;

/// No line of the subroutine ran.
pub const SCRIPT_NO_MATCH: i16 = -1;
/// Run the subroutine again from its first line.
pub const SCRIPT_RESTART: i16 = -10;

/// Decoded operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Value(i16),
    Var(usize),
    Item(Option<ItemId>),
}

impl Default for Operand {
    fn default() -> Self {
        Operand::None
    }
}

pub type Args = [Operand; MAX_ARGS];

/// What a script shows the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Message(String),
    Number(i16),
    /// The verb dispatcher found no line for the command.
    NoMatch,
    Quit,
}

#[derive(Debug)]
pub struct Frame {
    pub subroutine: SubroutineId,
    pub line: usize,
    pub class: Option<ClassIteration>,
}

/// ## Interpreter state
///
/// The command being handled, the bound subject and object items, the
/// condition and return registers of the current line, and the call
/// stack.

#[derive(Debug)]
pub struct ScriptState {
    pub verb: i16,
    pub noun1: i16,
    pub noun2: i16,
    pub subject: Option<ItemId>,
    pub object: Option<ItemId>,
    pub condition: bool,
    pub ret: i16,
    pub frames: Stack<Frame>,
}

impl ScriptState {
    pub fn new(max_depth: usize) -> ScriptState {
        ScriptState {
            verb: -1,
            noun1: -1,
            noun2: -1,
            subject: None,
            object: None,
            condition: true,
            ret: 0,
            frames: Stack::new("subroutine call", max_depth),
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Engine {
    /// Resident, then paged in, then `None`.
    pub fn subroutine(&mut self, id: SubroutineId) -> Result<Option<Rc<Subroutine>>> {
        let format = self.config.variant.format;
        self.tables.get(id, self.resources.as_ref(), format, &self.dispatch)
    }

    /// Runs a subroutine by id. `None` when no table provides it.
    pub fn run_subroutine_id(&mut self, id: SubroutineId) -> Result<Option<i16>> {
        match self.subroutine(id)? {
            Some(sub) => Ok(Some(self.start_subroutine(&sub)?)),
            None => Ok(None),
        }
    }

    /// Runs the verb dispatcher (subroutine 0) for a command.
    pub fn handle_verb(&mut self, verb: i16, noun1: i16, noun2: i16) -> Result<i16> {
        self.script.verb = verb;
        self.script.noun1 = noun1;
        self.script.noun2 = noun2;
        let result = self.run_subroutine_id(0)?.unwrap_or(SCRIPT_NO_MATCH);
        if result == SCRIPT_NO_MATCH {
            self.output.push(Output::NoMatch);
        }
        Ok(result)
    }

    pub fn start_subroutine(&mut self, sub: &Subroutine) -> Result<i16> {
        self.script
            .frames
            .push(Frame {
                subroutine: sub.id,
                line: 0,
                class: None,
            })
            .map_err(|e| e.in_subroutine(sub.id))?;
        let result = self.run_subroutine(sub);
        self.script.frames.pop()?;
        result.map_err(|e| e.in_subroutine(sub.id))
    }

    fn run_subroutine(&mut self, sub: &Subroutine) -> Result<i16> {
        let mut result = SCRIPT_NO_MATCH;
        let mut line = 0;
        loop {
            if self.quit_requested() {
                return Ok(result);
            }
            while line < sub.lines.len() {
                let l = &sub.lines[line];
                if let Some(frame) = self.script.frames.last_mut() {
                    frame.line = line;
                }
                let run = match &l.filter {
                    Some(f) if sub.id == 0 => f.matches(self.script.verb, self.script.noun1, self.script.noun2),
                    _ => true,
                };
                if run {
                    result = self.run_script(Cursor::new(l.code.clone()))?;
                    if result != 0 {
                        break;
                    }
                }
                line += 1;
            }
            if let Some(resume) = self.next_class_item()? {
                self.delay(0)?;
                line = resume;
                continue;
            }
            if result == SCRIPT_RESTART {
                self.delay(0)?;
                line = 0;
                continue;
            }
            return Ok(result);
        }
    }

    /// Binds the next item of an active class loop, returning the line
    /// to resume at.
    fn next_class_item(&mut self) -> Result<Option<usize>> {
        let items = &self.world.items;
        let class = match self.script.frames.last_mut() {
            Some(Frame { class: Some(class), .. }) => class,
            _ => return Ok(None),
        };
        match class.next_match(items)? {
            Some(item) => {
                let (slot, resume) = (class.slot(), class.resume_line());
                match slot {
                    ClassSlot::Subject => self.script.subject = Some(item),
                    ClassSlot::Object => self.script.object = Some(item),
                }
                Ok(Some(resume))
            }
            None => {
                if let Some(frame) = self.script.frames.last_mut() {
                    frame.class = None;
                }
                Ok(None)
            }
        }
    }

    /// Starts a class loop on the current frame and binds its first item.
    pub(crate) fn begin_class(&mut self, container: ItemId, class: i16, slot: ClassSlot) -> Result<()> {
        let mask = if class < 0 || class >= 16 { 0 } else { 1u16 << class };
        let candidates = self.world.items.find_in_by_class(container, mask)?;
        let frame = match self.script.frames.last_mut() {
            Some(frame) => frame,
            None => return Err(error!(InternalError; "class loop outside a subroutine")),
        };
        let mut iteration = ClassIteration::new(slot, mask, candidates, frame.line + 1);
        let first = iteration.next_match(&self.world.items)?;
        frame.class = if first.is_some() { Some(iteration) } else { None };
        match slot {
            ClassSlot::Subject => self.script.subject = first,
            ClassSlot::Object => self.script.object = first,
        }
        Ok(())
    }

    /// Executes one line until the end marker, a failed condition, a set
    /// return code or quit.
    pub fn run_script(&mut self, mut cursor: Cursor) -> Result<i16> {
        let format = self.config.variant.format;
        let (end, invert_marker) = (format.end_marker(), format.invert_marker());
        loop {
            if self.quit_requested() {
                return Ok(1);
            }
            let mut code = cursor.opcode(format)?;
            if code == end {
                return Ok(0);
            }
            let mut invert = false;
            if code == invert_marker {
                invert = true;
                code = cursor.opcode(format)?;
                if code == end {
                    return Ok(0);
                }
            }
            self.script.condition = true;
            self.script.ret = 0;
            let def = self.dispatch.lookup(code)?;
            let args = self.decode_args(def, &mut cursor)?;
            trace!(op = %def.opcode, invert, "opcode");
            self.execute(def.opcode, &args)?;
            if self.script.condition == invert || self.script.ret != 0 || self.quit_requested() {
                break;
            }
        }
        if self.quit_requested() {
            Ok(1)
        } else {
            Ok(self.script.ret)
        }
    }

    fn decode_args(&self, def: &OpcodeDef, cursor: &mut Cursor) -> Result<Args> {
        let format = self.config.variant.format;
        let mut args = Args::default();
        for (slot, arg) in args.iter_mut().zip(def.args) {
            let raw = cursor.sized(arg.size(format))?;
            *slot = match arg {
                Arg::Byte | Arg::Text => Operand::Value(raw as i16),
                Arg::Word | Arg::Sub => Operand::Value(self.var_or_word(raw)?),
                Arg::Var => Operand::Var(raw as usize),
                Arg::Item => Operand::Item(self.item_ref(raw as i16)?),
            };
        }
        Ok(args)
    }

    /// Literals in `30000..30000 + variables` read that variable.
    fn var_or_word(&self, raw: u16) -> Result<i16> {
        let index = raw as usize;
        if index >= 30000 && index < 30000 + self.world.vars.len() {
            self.world.vars.fetch(index - 30000)
        } else {
            Ok(raw as i16)
        }
    }

    fn item_ref(&self, raw: i16) -> Result<Option<ItemId>> {
        let items = &self.world.items;
        match raw {
            -1 => Ok(self.script.subject),
            -3 => Ok(self.script.object),
            -5 => Ok(Some(ItemId::PLAYER)),
            -7 => items.parent(ItemId::PLAYER),
            -9 => match items.parent(ItemId::PLAYER)? {
                Some(room) => items.parent(room),
                None => Ok(None),
            },
            n if n >= 0 => items.id(n as u16),
            n => Err(error!(BadItem; "item reference {}", n)),
        }
    }
}
