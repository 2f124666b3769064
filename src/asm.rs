/*!
## Bytecode writers

Builders for table files and zone blocks, used by tests and by tools
that produce bundles.

```
use adventure::asm::TableWriter;
use adventure::config::Variant;
use adventure::mach::Opcode;

let tables = TableWriter::new(&Variant::standard())
    .subroutine(10)
    .line()
    .op(Opcode::Let)
    .var(3)
    .word(5)
    .end()
    .finish()
    .unwrap();
assert_eq!(&tables[..4], &[0, 0, 0, 10]);
```

*/

use crate::config::Variant;
use crate::error;
use crate::error::{Error, Result};
use crate::gfx::{vga_code, Image, VgaOp, ZoneData};
use crate::mach::{Arg, Opcode, OpcodeTable, ScriptFormat};
use std::rc::Rc;

pub struct TableWriter {
    format: ScriptFormat,
    opcodes: &'static OpcodeTable,
    out: Vec<u8>,
    current: Option<u16>,
    error: Option<Error>,
}

impl TableWriter {
    pub fn new(variant: &Variant) -> TableWriter {
        TableWriter {
            format: variant.format,
            opcodes: variant.opcodes,
            out: vec![],
            current: None,
            error: None,
        }
    }

    fn push_word(&mut self, w: u16) {
        self.out.extend_from_slice(&w.to_be_bytes());
    }

    fn push_code(&mut self, code: u16) {
        match self.format {
            ScriptFormat::Byte => self.out.push(code as u8),
            ScriptFormat::Word => self.push_word(code),
        }
    }

    pub fn subroutine(mut self, id: u16) -> Self {
        if self.current.is_some() {
            self.push_word(1);
        }
        self.push_word(0);
        self.push_word(id);
        self.current = Some(id);
        self
    }

    /// Starts a line. Lines of subroutine 0 match any command.
    pub fn line(self) -> Self {
        self.line_for(-1, -1, -1)
    }

    pub fn line_for(mut self, verb: i16, noun1: i16, noun2: i16) -> Self {
        if self.current.is_none() && self.error.is_none() {
            self.error = Some(error!(InternalError; "line outside a subroutine"));
        }
        self.push_word(0);
        if self.current == Some(0) {
            self.push_word(verb as u16);
            self.push_word(noun1 as u16);
            self.push_word(noun2 as u16);
        }
        self
    }

    pub fn op(mut self, opcode: Opcode) -> Self {
        match self.opcodes.code_of(opcode) {
            Some(code) => self.push_code(code),
            None => {
                if self.error.is_none() {
                    self.error = Some(error!(UnknownOpcode; "{} has no code in {}", opcode, self.opcodes.name));
                }
            }
        }
        self
    }

    /// Inverts the condition of the next opcode.
    pub fn not(mut self) -> Self {
        let marker = self.format.invert_marker();
        self.push_code(marker);
        self
    }

    /// A `Byte` operand.
    pub fn byte(mut self, v: u8) -> Self {
        match Arg::Byte.size(self.format) {
            1 => self.out.push(v),
            _ => self.push_word(v as u16),
        }
        self
    }

    pub fn word(mut self, v: i16) -> Self {
        self.push_word(v as u16);
        self
    }

    /// A `Var` operand.
    pub fn var(self, index: u16) -> Self {
        self.word(index as i16)
    }

    /// A `Word` operand that reads variable `index`.
    pub fn var_ref(mut self, index: u16) -> Self {
        self.push_word(30000 + index);
        self
    }

    /// An `Item` operand: an item number or a negative reference.
    pub fn item(self, raw: i16) -> Self {
        self.word(raw)
    }

    pub fn end(mut self) -> Self {
        let marker = self.format.end_marker();
        self.push_code(marker);
        self
    }

    pub fn finish(mut self) -> Result<Vec<u8>> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        if self.current.is_some() {
            self.push_word(1);
        }
        self.push_word(1);
        Ok(self.out)
    }
}

/// Writes one zone: VGA script, animation entry points, images, palette.
#[derive(Default)]
pub struct VgaWriter {
    zone: ZoneData,
    script: Vec<u8>,
}

impl VgaWriter {
    pub fn new() -> VgaWriter {
        VgaWriter::default()
    }

    pub fn offset(&self) -> u16 {
        self.script.len() as u16
    }

    /// Animation `id` starts at the current offset.
    pub fn animation(mut self, id: u16) -> Self {
        let offset = self.offset();
        self.zone.animations.push((id, offset));
        self
    }

    pub fn op(mut self, op: VgaOp) -> Self {
        self.script.extend_from_slice(&vga_code(op).to_be_bytes());
        self
    }

    pub fn word(mut self, v: i16) -> Self {
        self.script.extend_from_slice(&(v as u16).to_be_bytes());
        self
    }

    /// A `Value` operand that reads variable `index`.
    pub fn var(self, index: u16) -> Self {
        self.word(-(index as i16))
    }

    pub fn image(mut self, image: Image) -> Self {
        self.zone.images.push(image);
        self
    }

    pub fn palette(mut self, palette: Vec<u8>) -> Self {
        self.zone.palette = palette;
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.zone.script = Rc::from(self.script);
        self.zone.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mach::{parse_table_file, Dispatch, LineFilter, STANDARD_OPCODES};

    #[test]
    fn test_tables_parse_back() {
        let v = Variant::standard();
        let data = TableWriter::new(&v)
            .subroutine(0)
            .line_for(3, -1, -2)
            .op(Opcode::Done)
            .end()
            .subroutine(7)
            .line()
            .not()
            .op(Opcode::Zero)
            .var(4)
            .op(Opcode::Let)
            .var(4)
            .var_ref(2)
            .end()
            .line()
            .op(Opcode::IsClass)
            .item(-1)
            .byte(2)
            .end()
            .finish()
            .unwrap();
        let subs = parse_table_file(&data, v.format, &Dispatch::new(&STANDARD_OPCODES)).unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(
            subs[0].lines[0].filter,
            Some(LineFilter {
                verb: 3,
                noun1: -1,
                noun2: -2
            })
        );
        assert_eq!(subs[1].id, 7);
        assert_eq!(subs[1].lines.len(), 2);
        assert_eq!(subs[1].lines[0].code.len(), 1 + 1 + 2 + 1 + 2 + 2 + 1);
        assert_eq!(subs[1].lines[1].code.len(), 1 + 2 + 1 + 1);
    }

    #[test]
    fn test_line_outside_subroutine() {
        let err = TableWriter::new(&Variant::standard())
            .line()
            .finish()
            .unwrap_err();
        assert!(err.is(crate::error::ErrorCode::InternalError));
    }
}
