use super::Val;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Typed operation table
///
/// One function per arithmetic/comparison/logic opcode. Mixed
/// Integer/Float operands promote to Float; everything else is an
/// explicit TypeMismatch, never a coercion.
pub struct Operation {}

impl Operation {
    pub fn sum(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_add(r) {
                Some(n) => Ok(Integer(n)),
                None => Err(error!(Overflow)),
            },
            (Integer(l), Float(r)) => Ok(Float(l as f64 + r)),
            (Float(l), Integer(r)) => Ok(Float(l + r as f64)),
            (Float(l), Float(r)) => Ok(Float(l + r)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_sub(r) {
                Some(n) => Ok(Integer(n)),
                None => Err(error!(Overflow)),
            },
            (Integer(l), Float(r)) => Ok(Float(l as f64 - r)),
            (Float(l), Integer(r)) => Ok(Float(l - r as f64)),
            (Float(l), Float(r)) => Ok(Float(l - r)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_mul(r) {
                Some(n) => Ok(Integer(n)),
                None => Err(error!(Overflow)),
            },
            (Integer(l), Float(r)) => Ok(Float(l as f64 * r)),
            (Float(l), Integer(r)) => Ok(Float(l * r as f64)),
            (Float(l), Float(r)) => Ok(Float(l * r)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Integer(l), Integer(r)) => match l.checked_div(r) {
                Some(n) => Ok(Integer(n)),
                None if r == 0 => Err(error!(DivisionByZero)),
                None => Err(error!(Overflow)),
            },
            (Integer(_), Float(r)) | (Float(_), Float(r)) if r == 0.0 => {
                Err(error!(DivisionByZero))
            }
            (Float(_), Integer(0)) => Err(error!(DivisionByZero)),
            (Integer(l), Float(r)) => Ok(Float(l as f64 / r)),
            (Float(l), Integer(r)) => Ok(Float(l / r as f64)),
            (Float(l), Float(r)) => Ok(Float(l / r)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Boolean(lhs == rhs))
    }

    pub fn not_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Boolean(lhs != rhs))
    }

    pub fn less(lhs: Val, rhs: Val) -> Result<Val> {
        Self::compare(lhs, rhs).map(|ord| Val::Boolean(ord == std::cmp::Ordering::Less))
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Self::compare(lhs, rhs).map(|ord| Val::Boolean(ord != std::cmp::Ordering::Greater))
    }

    pub fn greater(lhs: Val, rhs: Val) -> Result<Val> {
        Self::compare(lhs, rhs).map(|ord| Val::Boolean(ord == std::cmp::Ordering::Greater))
    }

    pub fn greater_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Self::compare(lhs, rhs).map(|ord| Val::Boolean(ord != std::cmp::Ordering::Less))
    }

    fn compare(lhs: Val, rhs: Val) -> Result<std::cmp::Ordering> {
        use Val::*;
        let (l, r) = match (lhs, rhs) {
            (Integer(l), Integer(r)) => return Ok(l.cmp(&r)),
            (Integer(l), Float(r)) => (l as f64, r),
            (Float(l), Integer(r)) => (l, r as f64),
            (Float(l), Float(r)) => (l, r),
            _ => return Err(error!(TypeMismatch)),
        };
        l.partial_cmp(&r).ok_or_else(|| error!(TypeMismatch))
    }

    pub fn and(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Boolean(l), Boolean(r)) => Ok(Boolean(l && r)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn or(lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Boolean(l), Boolean(r)) => Ok(Boolean(l || r)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn not(val: Val) -> Result<Val> {
        use Val::*;
        match val {
            Boolean(b) => Ok(Boolean(!b)),
            _ => Err(error!(TypeMismatch)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_promotion() {
        assert_eq!(
            Operation::sum(Val::Integer(1), Val::Float(0.5)).unwrap(),
            Val::Float(1.5)
        );
        assert_eq!(
            Operation::multiply(Val::Integer(3), Val::Integer(4)).unwrap(),
            Val::Integer(12)
        );
    }

    #[test]
    fn test_integer_division_truncates() {
        assert_eq!(
            Operation::divide(Val::Integer(15), Val::Integer(3)).unwrap(),
            Val::Integer(5)
        );
        assert_eq!(
            Operation::divide(Val::Integer(7), Val::Integer(2)).unwrap(),
            Val::Integer(3)
        );
        assert_eq!(
            Operation::divide(Val::Float(7.0), Val::Integer(2)).unwrap(),
            Val::Float(3.5)
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert!(
            Operation::divide(Val::Integer(5), Val::Integer(0)).unwrap_err()
                == ErrorCode::DivisionByZero
        );
        assert!(
            Operation::divide(Val::Float(5.0), Val::Float(0.0)).unwrap_err()
                == ErrorCode::DivisionByZero
        );
    }

    #[test]
    fn test_type_mismatch() {
        assert!(
            Operation::sum(Val::String("a".into()), Val::Integer(1)).unwrap_err()
                == ErrorCode::TypeMismatch
        );
        assert!(
            Operation::less(Val::String("a".into()), Val::String("b".into())).unwrap_err()
                == ErrorCode::TypeMismatch
        );
        assert!(Operation::not(Val::Integer(0)).unwrap_err() == ErrorCode::TypeMismatch);
    }

    #[test]
    fn test_equality_never_errors() {
        assert_eq!(
            Operation::equal(Val::Integer(1), Val::String("1".into())).unwrap(),
            Val::Boolean(false)
        );
        assert_eq!(
            Operation::not_equal(Val::Integer(2), Val::Float(2.0)).unwrap(),
            Val::Boolean(false)
        );
    }
}
