use crate::error;
use crate::error::Result;

/// ## Variable memory
///
/// Scripts address variables by index. The bit bank packs flags sixteen
/// to a word; flag `n` lives in word `n / 16`, bit `n % 16`.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Var {
    vars: Vec<i16>,
    bits: Vec<u16>,
}

impl Var {
    pub fn new(var_count: usize, bit_words: usize) -> Var {
        Var {
            vars: vec![0; var_count],
            bits: vec![0; bit_words],
        }
    }

    pub fn clear(&mut self) {
        self.vars.iter_mut().for_each(|v| *v = 0);
        self.bits.iter_mut().for_each(|v| *v = 0);
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn fetch(&self, index: usize) -> Result<i16> {
        match self.vars.get(index) {
            Some(val) => Ok(*val),
            None => Err(error!(BadVariable; "variable {} of {}", index, self.vars.len())),
        }
    }

    pub fn store(&mut self, index: usize, value: i16) -> Result<()> {
        let len = self.vars.len();
        match self.vars.get_mut(index) {
            Some(var) => {
                *var = value;
                Ok(())
            }
            None => Err(error!(BadVariable; "variable {} of {}", index, len)),
        }
    }

    pub fn bit(&self, bit: usize) -> Result<bool> {
        match self.bits.get(bit / 16) {
            Some(word) => Ok(word & (1 << (bit % 16)) != 0),
            None => Err(error!(BadVariable; "bit flag {}", bit)),
        }
    }

    pub fn set_bit(&mut self, bit: usize, value: bool) -> Result<()> {
        match self.bits.get_mut(bit / 16) {
            Some(word) => {
                if value {
                    *word |= 1 << (bit % 16);
                } else {
                    *word &= !(1 << (bit % 16));
                }
                Ok(())
            }
            None => Err(error!(BadVariable; "bit flag {}", bit)),
        }
    }

    pub fn vars(&self) -> &[i16] {
        &self.vars
    }

    pub fn bits(&self) -> &[u16] {
        &self.bits
    }

    /// Replaces both banks. Lengths must match the configured sizes.
    pub fn restore(&mut self, vars: &[i16], bits: &[u16]) -> Result<()> {
        if vars.len() != self.vars.len() || bits.len() != self.bits.len() {
            return Err(error!(BadVariable; "bank size mismatch"));
        }
        self.vars.copy_from_slice(vars);
        self.bits.copy_from_slice(bits);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_fetch() {
        let mut v = Var::new(8, 2);
        v.store(3, -7).unwrap();
        assert_eq!(v.fetch(3).unwrap(), -7);
        assert!(v.fetch(8).is_err());
        assert!(v.store(8, 1).is_err());
    }

    #[test]
    fn test_bits() {
        let mut v = Var::new(1, 2);
        v.set_bit(17, true).unwrap();
        assert!(v.bit(17).unwrap());
        assert_eq!(v.bits()[1], 2);
        v.set_bit(17, false).unwrap();
        assert!(!v.bit(17).unwrap());
        assert!(v.bit(32).is_err());
    }
}
