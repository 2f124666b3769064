use crate::error;
use crate::error::Result;
use rand::Rng;

/// Arithmetic on script words. Scripts rely on 16-bit wraparound, so only
/// division by zero is an error.
pub struct Operation {}

impl Operation {
    pub fn add(lhs: i16, rhs: i16) -> i16 {
        lhs.wrapping_add(rhs)
    }

    pub fn subtract(lhs: i16, rhs: i16) -> i16 {
        lhs.wrapping_sub(rhs)
    }

    pub fn multiply(lhs: i16, rhs: i16) -> i16 {
        lhs.wrapping_mul(rhs)
    }

    pub fn divide(lhs: i16, rhs: i16) -> Result<i16> {
        if rhs == 0 {
            return Err(error!(DivisionByZero; "div"));
        }
        Ok(lhs.wrapping_div(rhs))
    }

    pub fn modulo(lhs: i16, rhs: i16) -> Result<i16> {
        if rhs == 0 {
            return Err(error!(DivisionByZero; "mod"));
        }
        Ok(lhs.wrapping_rem(rhs))
    }

    /// Uniform value in `0..range`.
    pub fn random<R: Rng>(rng: &mut R, range: i16) -> Result<i16> {
        if range <= 0 {
            return Err(error!(DivisionByZero; "random {}", range));
        }
        Ok(rng.gen_range(0..range))
    }

    /// Percent chance: 0 never, 100 or more always.
    pub fn chance<R: Rng>(rng: &mut R, percent: i16) -> bool {
        if percent <= 0 {
            return false;
        }
        if percent >= 100 {
            return true;
        }
        rng.gen_range(0..100) < percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_wrapping() {
        assert_eq!(Operation::add(i16::MAX, 1), i16::MIN);
        assert_eq!(Operation::multiply(300, 300), 300i16.wrapping_mul(300));
        assert_eq!(Operation::divide(i16::MIN, -1).unwrap(), i16::MIN);
    }

    #[test]
    fn test_division_by_zero() {
        assert!(Operation::divide(1, 0).unwrap_err().is(ErrorCode::DivisionByZero));
        assert!(Operation::modulo(1, 0).unwrap_err().is(ErrorCode::DivisionByZero));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(Operation::random(&mut rng, 0).is_err());
    }

    #[test]
    fn test_chance_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(!Operation::chance(&mut rng, 0));
            assert!(Operation::chance(&mut rng, 100));
            let r = Operation::random(&mut rng, 6).unwrap();
            assert!((0..6).contains(&r));
        }
    }
}
