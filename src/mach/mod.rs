/*!
## Machine Module

The subroutine interpreter: opcode schemas per game variant, the tables
heap that pages subroutines in, the line interpreter with its call stack
and class iteration, and the opcode handlers.

*/

mod class;
mod cursor;
mod handlers;
mod opcode;
mod operation;
mod runtime;
mod schema;
mod stack;
mod table;

pub use class::{ClassIteration, ClassSlot};
pub use cursor::Cursor;
pub use opcode::Opcode;
pub use operation::Operation;
pub use runtime::{Args, Frame, Operand, Output, ScriptState, SCRIPT_NO_MATCH, SCRIPT_RESTART};
pub use schema::{Arg, Dispatch, OpcodeDef, OpcodeTable, ScriptFormat, CLASSIC_OPCODES, MAX_ARGS, STANDARD_OPCODES};
pub use stack::Stack;
pub use table::{parse_table_file, LineFilter, Subroutine, SubroutineLine, SubroutineTable, TableIndex, TablesHeap};

#[cfg(test)]
mod tests;
