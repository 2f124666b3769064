use crate::error;
use crate::error::Result;

/// ## Stack enforced and size limited vector
///
/// Pushing past the limit is a fatal error, never a silent truncation.

pub struct Stack<T> {
    overflow_message: &'static str,
    max_len: usize,
    vec: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.vec)
    }
}

impl<T> Stack<T> {
    pub fn new(overflow_message: &'static str, max_len: usize) -> Stack<T> {
        Stack {
            overflow_message,
            max_len,
            vec: vec![],
        }
    }
    pub fn max_len(&self) -> usize {
        self.max_len
    }
    fn underflow_error(&self) -> crate::error::Error {
        error!(InternalError; "UNDERFLOW")
    }
    pub fn clear(&mut self) {
        self.vec.clear()
    }
    pub fn len(&self) -> usize {
        self.vec.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
    pub fn last(&self) -> Option<&T> {
        self.vec.last()
    }
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.vec.last_mut()
    }
    pub fn push(&mut self, val: T) -> Result<()> {
        if self.vec.len() >= self.max_len {
            return Err(error!(RecursionError; "{} (depth {})", self.overflow_message, self.vec.len() + 1));
        }
        self.vec.push(val);
        Ok(())
    }
    pub fn pop(&mut self) -> Result<T> {
        match self.vec.pop() {
            Some(v) => Ok(v),
            None => Err(self.underflow_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_limit_is_exact() {
        let mut s = Stack::new("TOO DEEP", 2);
        s.push(1).unwrap();
        s.push(2).unwrap();
        assert!(s.push(3).unwrap_err().is(ErrorCode::RecursionError));
        assert_eq!(s.len(), 2);
        assert_eq!(s.pop().unwrap(), 2);
    }

    #[test]
    fn test_underflow() {
        let mut s: Stack<u8> = Stack::new("", 1);
        assert!(s.pop().unwrap_err().is(ErrorCode::InternalError));
    }
}
