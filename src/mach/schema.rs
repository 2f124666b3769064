use super::Opcode;
use crate::error;
use crate::error::Result;

/// Opcode encoding of a game variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    /// One-byte opcodes, `0xFF` ends a line, `0` inverts the next condition.
    Byte,
    /// Big-endian word opcodes, `10000` ends a line, `203` inverts.
    Word,
}

impl ScriptFormat {
    pub fn end_marker(self) -> u16 {
        match self {
            ScriptFormat::Byte => 0xFF,
            ScriptFormat::Word => 10000,
        }
    }

    pub fn invert_marker(self) -> u16 {
        match self {
            ScriptFormat::Byte => 0,
            ScriptFormat::Word => 203,
        }
    }

    pub fn opcode_size(self) -> usize {
        match self {
            ScriptFormat::Byte => 1,
            ScriptFormat::Word => 2,
        }
    }
}

/// Operand descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// Small literal. A word in the word format.
    Byte,
    /// Literal word, or a variable when encoded as `30000 + index`.
    Word,
    /// Variable index.
    Var,
    /// Item number or one of the negative indirect item codes.
    Item,
    /// Subroutine id, read like `Word`.
    Sub,
    /// Text id.
    Text,
}

impl Arg {
    pub fn size(self, format: ScriptFormat) -> usize {
        match (self, format) {
            (Arg::Byte, ScriptFormat::Byte) => 1,
            _ => 2,
        }
    }
}

pub const MAX_ARGS: usize = 9;

#[derive(Clone, Copy)]
pub struct OpcodeDef {
    pub code: u16,
    pub opcode: Opcode,
    pub args: &'static [Arg],
}

impl std::fmt::Debug for OpcodeDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}{:?}", self.code, self.opcode, self.args)
    }
}

/// Per-variant opcode numbering and operand layout.
pub struct OpcodeTable {
    pub name: &'static str,
    /// Number of opcode slots; codes at or above this are invalid.
    pub slots: u16,
    pub defs: &'static [OpcodeDef],
}

impl std::fmt::Debug for OpcodeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OpcodeTable({}, {} of {})", self.name, self.defs.len(), self.slots)
    }
}

impl OpcodeTable {
    pub fn code_of(&self, opcode: Opcode) -> Option<u16> {
        self.defs.iter().find(|d| d.opcode == opcode).map(|d| d.code)
    }
}

/// Dense lookup built once from an `OpcodeTable`.
pub struct Dispatch {
    slots: Vec<Option<&'static OpcodeDef>>,
}

impl Dispatch {
    pub fn new(table: &'static OpcodeTable) -> Dispatch {
        let mut slots = vec![None; table.slots as usize];
        for def in table.defs {
            if let Some(slot) = slots.get_mut(def.code as usize) {
                *slot = Some(def);
            }
        }
        Dispatch { slots }
    }

    pub fn lookup(&self, code: u16) -> Result<&'static OpcodeDef> {
        match self.slots.get(code as usize) {
            None => Err(error!(InvalidOpcode; "opcode {} of {}", code, self.slots.len())),
            Some(None) => Err(error!(UnknownOpcode; "opcode {}", code)),
            Some(Some(def)) => Ok(def),
        }
    }
}

macro_rules! def {
    ($code:expr, $op:ident, [$($arg:ident),*]) => {
        OpcodeDef {
            code: $code,
            opcode: Opcode::$op,
            args: &[$(Arg::$arg),*],
        }
    };
}

pub static STANDARD_OPCODES: OpcodeTable = OpcodeTable {
    name: "standard",
    slots: 256,
    defs: &[
        def!(1, At, [Item]),
        def!(2, NotAt, [Item]),
        def!(5, Carried, [Item]),
        def!(6, NotCarried, [Item]),
        def!(7, IsAt, [Item, Item]),
        def!(11, Zero, [Var]),
        def!(12, NotZero, [Var]),
        def!(13, Eq, [Var, Word]),
        def!(14, NotEq, [Var, Word]),
        def!(15, Gt, [Var, Word]),
        def!(16, Lt, [Var, Word]),
        def!(17, Eqf, [Var, Var]),
        def!(18, NotEqf, [Var, Var]),
        def!(19, Ltf, [Var, Var]),
        def!(20, Gtf, [Var, Var]),
        def!(23, Chance, [Word]),
        def!(27, State, [Item, Word]),
        def!(31, Destroy, [Item]),
        def!(33, Place, [Item, Item]),
        def!(36, Copyff, [Var, Var]),
        def!(41, Clear, [Var]),
        def!(42, Let, [Var, Word]),
        def!(43, Add, [Var, Word]),
        def!(44, Sub, [Var, Word]),
        def!(45, Addf, [Var, Var]),
        def!(46, Subf, [Var, Var]),
        def!(47, Mul, [Var, Word]),
        def!(48, Div, [Var, Word]),
        def!(49, Mulf, [Var, Var]),
        def!(50, Divf, [Var, Var]),
        def!(51, Mod, [Var, Word]),
        def!(52, Modf, [Var, Var]),
        def!(53, Random, [Var, Word]),
        def!(59, Inc, [Var]),
        def!(60, Dec, [Var]),
        def!(61, SetState, [Item, Word]),
        def!(62, Print, [Var]),
        def!(63, Message, [Text]),
        def!(68, End, []),
        def!(69, Done, []),
        def!(71, Process, [Sub]),
        def!(76, When, [Word, Sub]),
        def!(77, If1, []),
        def!(78, If2, []),
        def!(80, Is, [Item, Item]),
        def!(88, HaltAnimation, []),
        def!(89, RestartAnimation, []),
        def!(90, GetParent, [Item, Var]),
        def!(91, GetNext, [Item, Var]),
        def!(92, GetChildren, [Item, Var]),
        def!(97, LoadZone, [Word]),
        def!(98, Animate, [Word, Byte, Word, Word, Word, Word]),
        def!(99, StopAnimate, [Word, Word]),
        def!(103, Cls, []),
        def!(107, AddBox, [Word, Word, Word, Word, Word, Word, Word, Item, Word]),
        def!(108, DelBox, [Word]),
        def!(109, EnableBox, [Word]),
        def!(110, DisableBox, [Word]),
        def!(111, MoveBox, [Word, Word, Word]),
        def!(112, IsBox, [Word]),
        def!(115, IsClass, [Item, Byte]),
        def!(116, SetClass, [Item, Byte]),
        def!(117, UnsetClass, [Item, Byte]),
        def!(119, WaitSync, [Word]),
        def!(120, Sync, [Word]),
        def!(124, Rescan, []),
        def!(131, Delay, [Word]),
        def!(140, ClearTimers, []),
        def!(141, Unwhen, [Sub]),
        def!(153, BSet, [Byte]),
        def!(154, BClear, [Byte]),
        def!(155, BZero, [Byte]),
        def!(156, BNotZero, [Byte]),
        def!(164, DoClass, [Item, Byte, Byte]),
        def!(177, Damage, [Byte, Word]),
    ],
};

pub static CLASSIC_OPCODES: OpcodeTable = OpcodeTable {
    name: "classic",
    slots: 300,
    defs: &[
        def!(0, At, [Item]),
        def!(1, NotAt, [Item]),
        def!(5, Carried, [Item]),
        def!(6, NotCarried, [Item]),
        def!(7, IsAt, [Item, Item]),
        def!(11, Zero, [Var]),
        def!(12, NotZero, [Var]),
        def!(13, Eq, [Var, Word]),
        def!(14, NotEq, [Var, Word]),
        def!(15, Gt, [Var, Word]),
        def!(16, Lt, [Var, Word]),
        def!(17, Eqf, [Var, Var]),
        def!(18, NotEqf, [Var, Var]),
        def!(19, Ltf, [Var, Var]),
        def!(20, Gtf, [Var, Var]),
        def!(29, Chance, [Word]),
        def!(32, State, [Item, Word]),
        def!(39, Destroy, [Item]),
        def!(41, Place, [Item, Item]),
        def!(45, Copyff, [Var, Var]),
        def!(47, Clear, [Var]),
        def!(48, Let, [Var, Word]),
        def!(49, Add, [Var, Word]),
        def!(50, Sub, [Var, Word]),
        def!(51, Addf, [Var, Var]),
        def!(52, Subf, [Var, Var]),
        def!(53, Mul, [Var, Word]),
        def!(54, Div, [Var, Word]),
        def!(55, Mulf, [Var, Var]),
        def!(56, Divf, [Var, Var]),
        def!(57, Mod, [Var, Word]),
        def!(58, Modf, [Var, Var]),
        def!(59, Random, [Var, Word]),
        def!(60, Inc, [Var]),
        def!(61, Dec, [Var]),
        def!(64, SetState, [Item, Word]),
        def!(67, Print, [Var]),
        def!(70, Message, [Text]),
        def!(83, End, []),
        def!(84, Done, []),
        def!(88, Process, [Sub]),
        def!(95, When, [Word, Sub]),
        def!(96, If1, []),
        def!(97, If2, []),
        def!(98, Is, [Item, Item]),
        def!(119, HaltAnimation, []),
        def!(120, RestartAnimation, []),
        def!(128, GetParent, [Item, Var]),
        def!(129, GetNext, [Item, Var]),
        def!(130, GetChildren, [Item, Var]),
        def!(135, LoadZone, [Word]),
        def!(136, Animate, [Word, Byte, Word, Word, Word, Word]),
        def!(137, StopAnimate, [Word, Word]),
        def!(138, Cls, []),
        def!(145, AddBox, [Word, Word, Word, Word, Word, Word, Word, Item, Word]),
        def!(146, DelBox, [Word]),
        def!(147, EnableBox, [Word]),
        def!(148, DisableBox, [Word]),
        def!(149, MoveBox, [Word, Word, Word]),
        def!(150, IsBox, [Word]),
        def!(152, IsClass, [Item, Byte]),
        def!(153, SetClass, [Item, Byte]),
        def!(154, UnsetClass, [Item, Byte]),
        def!(158, WaitSync, [Word]),
        def!(159, Sync, [Word]),
        def!(162, Rescan, []),
        def!(163, Delay, [Word]),
        def!(164, DoClass, [Item, Byte, Byte]),
        def!(176, ClearTimers, []),
        def!(177, Unwhen, [Sub]),
        def!(180, BSet, [Byte]),
        def!(181, BClear, [Byte]),
        def!(182, BZero, [Byte]),
        def!(183, BNotZero, [Byte]),
        def!(199, Damage, [Byte, Word]),
    ],
};
