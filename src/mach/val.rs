use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// ## Runtime value
///
/// Arrays and dictionaries are reference types: cloning a Val clones
/// the handle, so two bindings may alias one backing store and see each
/// other's mutations.
#[derive(Clone, Debug)]
pub enum Val {
    Integer(i64),
    Float(f64),
    String(Rc<str>),
    Boolean(bool),
    Array(Rc<RefCell<Vec<Val>>>),
    Dict(Rc<RefCell<HashMap<String, Val>>>),
}

impl PartialEq for Val {
    fn eq(&self, other: &Val) -> bool {
        use Val::*;
        match (self, other) {
            (Integer(l), Integer(r)) => l == r,
            (Float(l), Float(r)) => l == r,
            (Integer(l), Float(r)) => *l as f64 == *r,
            (Float(l), Integer(r)) => *l == *r as f64,
            (String(l), String(r)) => l == r,
            (Boolean(l), Boolean(r)) => l == r,
            (Array(l), Array(r)) => Rc::ptr_eq(l, r),
            (Dict(l), Dict(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Val::*;
        match self {
            Integer(n) => write!(f, "{}", n),
            Float(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            String(s) => write!(f, "{}", s),
            Boolean(b) => write!(f, "{}", b),
            Array(a) => {
                write!(f, "[")?;
                for (i, v) in a.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Dict(d) => {
                let d = d.borrow();
                let mut keys: Vec<&str> = d.keys().map(|k| k.as_str()).collect();
                keys.sort_unstable();
                write!(f, "{{")?;
                for (i, k) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, d[*k])?;
                }
                write!(f, "}}")
            }
        }
    }
}
