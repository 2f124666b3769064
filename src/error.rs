pub type SubroutineId = u16;

/// ## Engine errors
///
/// Every error is fatal to the session that raised it. Conditions that
/// scripts are allowed to provoke (missing optional subroutines, sync
/// timeouts) never produce an `Error`.

pub struct Error {
    code: u16,
    subroutine: Option<SubroutineId>,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::error::Error::new($crate::error::ErrorCode::$err)
    };
    ($err:ident; $($msg:tt)+) => {
        $crate::error::Error::new($crate::error::ErrorCode::$err).message(&format!($($msg)+))
    };
    ($err:ident, $sub:expr) => {
        $crate::error::Error::new($crate::error::ErrorCode::$err).in_subroutine($sub)
    };
    ($err:ident, $sub:expr; $($msg:tt)+) => {
        $crate::error::Error::new($crate::error::ErrorCode::$err)
            .in_subroutine($sub)
            .message(&format!($($msg)+))
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            subroutine: None,
            message: String::new(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    pub fn subroutine(&self) -> Option<SubroutineId> {
        self.subroutine
    }

    pub fn in_subroutine(self, sub: SubroutineId) -> Error {
        if self.subroutine.is_some() {
            return self;
        }
        Error {
            subroutine: Some(sub),
            ..self
        }
    }

    pub fn message(self, message: &str) -> Error {
        debug_assert!(self.message.is_empty());
        Error {
            message: message.to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    RecursionError = 1,
    InvalidOpcode = 2,
    UnknownOpcode = 3,
    OutOfTableMemory = 4,
    TimeEventNotFound = 5,
    NoTimeEvents = 6,
    DivisionByZero = 7,
    VgaTimerOverflow = 8,
    InvalidVgaOpcode = 9,
    BadItem = 10,
    BadVariable = 11,
    BadTableData = 12,
    ZoneNotFound = 13,
    OutOfCode = 14,
    SpriteTableFull = 15,
    InternalError = 51,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            1 => "RECURSION ERROR",
            2 => "INVALID OPCODE",
            3 => "UNKNOWN OPCODE",
            4 => "OUT OF TABLE MEMORY",
            5 => "NO SUCH TIME EVENT",
            6 => "NO TIME EVENTS",
            7 => "DIVISION BY ZERO",
            8 => "VGA TIMER OVERFLOW",
            9 => "INVALID VGA OPCODE",
            10 => "BAD ITEM",
            11 => "BAD VARIABLE",
            12 => "BAD TABLE DATA",
            13 => "ZONE NOT FOUND",
            14 => "OUT OF CODE",
            15 => "SPRITE TABLE FULL",
            51 => "INTERNAL ERROR",
            _ => "",
        };
        let mut suffix = String::new();
        if let Some(sub) = self.subroutine {
            suffix.push_str(&format!(" {}", sub));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if code_str.is_empty() {
            if suffix.is_empty() {
                write!(f, "ENGINE ERROR {}", self.code)
            } else {
                write!(f, "ENGINE ERROR {} IN{}", self.code, suffix)
            }
        } else if self.subroutine.is_none() && !self.message.is_empty() {
            write!(f, "{}; {}", code_str, self.message)
        } else if suffix.is_empty() {
            write!(f, "{}", code_str)
        } else {
            write!(f, "{} IN{}", code_str, suffix)
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_subroutine() {
        let e = error!(RecursionError, 12; "depth {}", 41);
        assert_eq!(e.to_string(), "RECURSION ERROR IN 12; depth 41");
        assert!(e.is(ErrorCode::RecursionError));
    }

    #[test]
    fn test_display_message_only() {
        let e = error!(DivisionByZero; "mod");
        assert_eq!(e.to_string(), "DIVISION BY ZERO; mod");
        assert_eq!(error!(NoTimeEvents).to_string(), "NO TIME EVENTS");
    }

    #[test]
    fn test_first_subroutine_wins() {
        let e = error!(BadItem, 3).in_subroutine(9);
        assert_eq!(e.subroutine(), Some(3));
    }
}
