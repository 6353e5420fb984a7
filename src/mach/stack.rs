use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Stack enforced and size limited vector

pub struct Stack<T> {
    overflow_message: &'static str,
    vec: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.vec)
    }
}

impl<T> Stack<T> {
    pub fn new(overflow_message: &'static str) -> Stack<T> {
        Stack {
            overflow_message,
            vec: vec![],
        }
    }
    fn max_len(&self) -> usize {
        u16::max_value() as usize
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
        self.vec.push(val);
        if self.vec.len() > self.max_len() {
            Err(error!(StackOverflow; self.overflow_message))
        } else {
            Ok(())
        }
    }
    pub fn pop(&mut self) -> Result<T> {
        match self.vec.pop() {
            Some(v) => Ok(v),
            None => Err(error!(StackUnderflow)),
        }
    }
    pub fn pop_2(&mut self) -> Result<(T, T)> {
        let two = self.pop()?;
        let one = self.pop()?;
        Ok((one, two))
    }
    pub fn pop_n(&mut self, len: usize) -> Result<Vec<T>> {
        if len > self.vec.len() {
            Err(error!(StackUnderflow))
        } else {
            let range = (self.vec.len() - len)..;
            Ok(self.vec.drain(range).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_push_pop() {
        let mut stack: Stack<i64> = Stack::new("TEST STACK");
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        assert_eq!(stack.pop_2().unwrap(), (1, 2));
        assert!(stack.pop().unwrap_err() == ErrorCode::StackUnderflow);
    }

    #[test]
    fn test_pop_n_underflow() {
        let mut stack: Stack<i64> = Stack::new("TEST STACK");
        stack.push(1).unwrap();
        assert!(stack.pop_n(3).unwrap_err() == ErrorCode::StackUnderflow);
    }
}
