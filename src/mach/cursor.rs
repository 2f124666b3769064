use super::ScriptFormat;
use crate::error;
use crate::error::Result;
use std::rc::Rc;

/// Read position inside one line of subroutine bytecode. The line keeps
/// its code alive even if the tables heap is repaged underneath it.
#[derive(Debug, Clone)]
pub struct Cursor {
    code: Rc<[u8]>,
    pos: usize,
}

impl Cursor {
    pub fn new(code: Rc<[u8]>) -> Cursor {
        Cursor { code, pos: 0 }
    }

    pub fn at(code: Rc<[u8]>, pos: usize) -> Result<Cursor> {
        if pos > code.len() {
            return Err(error!(OutOfCode; "offset {} of {}", pos, code.len()));
        }
        Ok(Cursor { code, pos })
    }

    pub fn code(&self) -> &Rc<[u8]> {
        &self.code
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn byte(&mut self) -> Result<u8> {
        match self.code.get(self.pos) {
            Some(b) => {
                self.pos += 1;
                Ok(*b)
            }
            None => Err(error!(OutOfCode; "offset {}", self.pos)),
        }
    }

    pub fn word(&mut self) -> Result<u16> {
        let hi = self.byte()? as u16;
        let lo = self.byte()? as u16;
        Ok(hi << 8 | lo)
    }

    pub fn opcode(&mut self, format: ScriptFormat) -> Result<u16> {
        match format {
            ScriptFormat::Byte => Ok(self.byte()? as u16),
            ScriptFormat::Word => self.word(),
        }
    }

    pub fn sized(&mut self, size: usize) -> Result<u16> {
        match size {
            1 => Ok(self.byte()? as u16),
            _ => self.word(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_big_endian_words() {
        let mut c = Cursor::new(Rc::from(vec![0x12u8, 0x34, 0xFF]));
        assert_eq!(c.word().unwrap(), 0x1234);
        assert_eq!(c.opcode(ScriptFormat::Byte).unwrap(), 0xFF);
        assert!(c.byte().unwrap_err().is(ErrorCode::OutOfCode));
    }
}
