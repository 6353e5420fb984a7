use super::{Address, Opcode, Operation, Program, Stack, Val};
use crate::error;
use crate::lang::Error;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Bytecode interpreter
///
/// Owns a Program and executes it against an operand stack and a call
/// stack of frames. Frames carry locals; everything outside a frame
/// lives in globals. Output is a `Write` and input a `Read` so tests
/// can capture one and feed the other.
pub struct Runtime<W: Write = io::Stdout> {
    program: Program,
    values: Vec<Val>,
    stack: Stack<Val>,
    frames: Stack<Frame>,
    globals: HashMap<Rc<str>, Val>,
    pc: Address,
    input: Box<dyn Read>,
    out: W,
}

#[derive(Debug)]
struct Frame {
    locals: HashMap<Rc<str>, Val>,
    return_addr: Address,
}

impl Runtime<io::Stdout> {
    pub fn new(program: Program) -> Runtime<io::Stdout> {
        Runtime::with_output(program, io::stdout())
    }
}

impl<W: Write> Runtime<W> {
    pub fn with_output(program: Program, out: W) -> Runtime<W> {
        Runtime::with_io(program, io::stdin(), out)
    }

    pub fn with_io(program: Program, input: impl Read + 'static, out: W) -> Runtime<W> {
        let values = program.constants.iter().map(Val::from).collect();
        Runtime {
            program,
            values,
            stack: Stack::new("OPERAND STACK OVERFLOW"),
            frames: Stack::new("CALL STACK OVERFLOW"),
            globals: HashMap::new(),
            pc: 0,
            input: Box::new(input),
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until HALT, the end of the instructions, or an error. Errors
    /// are tagged with the address of the faulting instruction.
    pub fn execute(&mut self) -> Result<()> {
        loop {
            let op = match self.program.instructions.get(self.pc) {
                Some(op) => op.clone(),
                None => return Ok(()),
            };
            let addr = self.pc;
            self.pc += 1;
            match self.step(op) {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(e) => return Err(e.in_address(addr)),
            }
        }
    }

    fn step(&mut self, op: Opcode) -> Result<bool> {
        use Opcode::*;
        match op {
            LoadConst(idx) => {
                let val = self.value(idx)?;
                self.stack.push(val)?;
            }
            LoadTrue => self.stack.push(Val::Boolean(true))?,
            LoadFalse => self.stack.push(Val::Boolean(false))?,
            LoadVar(idx) => {
                let name = self.name(idx)?;
                let frame = self.frames.last();
                let val = match frame.and_then(|f| f.locals.get(name.as_ref())) {
                    Some(val) => val.clone(),
                    None => match self.globals.get(name.as_ref()) {
                        Some(val) => val.clone(),
                        None => return Err(error!(UndefinedVariable)),
                    },
                };
                self.stack.push(val)?;
            }
            StoreVar(idx, _) => {
                let name = self.name(idx)?;
                let val = self.stack.pop()?;
                // Stores resolve like loads: frame local first, then an
                // existing global; only an unknown name creates a
                // binding in the innermost scope.
                match self.frames.last_mut() {
                    Some(frame) => {
                        if frame.locals.contains_key(name.as_ref())
                            || !self.globals.contains_key(name.as_ref())
                        {
                            frame.locals.insert(name, val);
                        } else {
                            self.globals.insert(name, val);
                        }
                    }
                    None => {
                        self.globals.insert(name, val);
                    }
                }
            }
            Dup => {
                let val = match self.stack.last() {
                    Some(val) => val.clone(),
                    None => return Err(error!(StackUnderflow)),
                };
                self.stack.push(val)?;
            }
            Drop => {
                self.stack.pop()?;
            }
            Swap => {
                let (one, two) = self.stack.pop_2()?;
                self.stack.push(two)?;
                self.stack.push(one)?;
            }
            Over => {
                let (one, two) = self.stack.pop_2()?;
                let copy = one.clone();
                self.stack.push(one)?;
                self.stack.push(two)?;
                self.stack.push(copy)?;
            }
            Rot => {
                let mut vals = self.stack.pop_n(3)?;
                let bottom = vals.remove(0);
                for val in vals {
                    self.stack.push(val)?;
                }
                self.stack.push(bottom)?;
            }
            Add => self.binary(Operation::sum)?,
            Sub => self.binary(Operation::subtract)?,
            Mul => self.binary(Operation::multiply)?,
            Div => self.binary(Operation::divide)?,
            Eq => self.binary(Operation::equal)?,
            Ne => self.binary(Operation::not_equal)?,
            Lt => self.binary(Operation::less)?,
            Le => self.binary(Operation::less_equal)?,
            Gt => self.binary(Operation::greater)?,
            Ge => self.binary(Operation::greater_equal)?,
            And => self.binary(Operation::and)?,
            Or => self.binary(Operation::or)?,
            Not => {
                let val = self.stack.pop()?;
                self.stack.push(Operation::not(val)?)?;
            }
            Jump(addr) => self.pc = addr,
            JumpIfFalse(addr) => {
                if !self.pop_boolean()? {
                    self.pc = addr;
                }
            }
            Call(idx) => {
                let name = self.name(idx)?;
                let entry = match self.program.functions.get(name.as_ref()) {
                    Some(entry) => entry.clone(),
                    None => return Err(error!(UndefinedFunction)),
                };
                let args = self.stack.pop_n(entry.param_count)?;
                let mut locals = HashMap::new();
                for (i, arg) in args.into_iter().enumerate() {
                    locals.insert(Rc::from(format!("#p{}", i)), arg);
                }
                self.frames.push(Frame {
                    locals,
                    return_addr: self.pc,
                })?;
                self.pc = entry.entry;
            }
            Return => {
                let frame = self
                    .frames
                    .pop()
                    .map_err(|_| error!(InternalError; "RETURN WITHOUT CALL"))?;
                self.pc = frame.return_addr;
            }
            Print => {
                let val = self.stack.pop()?;
                writeln!(self.out, "{}", val).map_err(|_| error!(IoError; "WRITE FAILED"))?;
            }
            ArrayNew => {
                let len = self.pop_integer()?;
                if len < 0 {
                    return Err(error!(TypeMismatch; "NEGATIVE ARRAY LENGTH"));
                }
                let array = vec![Val::Integer(0); len as usize];
                self.stack.push(Val::Array(Rc::new(RefCell::new(array))))?;
            }
            ArrayLoad => {
                let idx = self.pop_integer()?;
                let array = self.pop_array()?;
                let array = array.borrow();
                if idx < 0 || idx as usize >= array.len() {
                    return Err(error!(ArrayIndexOutOfBounds));
                }
                self.stack.push(array[idx as usize].clone())?;
            }
            ArrayStore => {
                let idx = self.pop_integer()?;
                let val = self.stack.pop()?;
                let array = self.peek_array()?;
                let mut array = array.borrow_mut();
                if idx < 0 || idx as usize >= array.len() {
                    return Err(error!(ArrayIndexOutOfBounds));
                }
                array[idx as usize] = val;
            }
            ArrayLen => {
                let array = self.pop_array()?;
                let len = array.borrow().len();
                self.stack.push(Val::Integer(len as i64))?;
            }
            DictNew => {
                self.stack
                    .push(Val::Dict(Rc::new(RefCell::new(HashMap::new()))))?;
            }
            DictLoad => {
                let key = self.pop_string()?;
                let dict = self.pop_dict()?;
                let val = match dict.borrow().get(key.as_ref()) {
                    Some(val) => val.clone(),
                    None => return Err(error!(DictKeyNotFound)),
                };
                self.stack.push(val)?;
            }
            DictStore => {
                let val = self.stack.pop()?;
                let key = self.pop_string()?;
                let dict = self.peek_dict()?;
                dict.borrow_mut().insert(key.to_string(), val);
            }
            DictHas => {
                let key = self.pop_string()?;
                let dict = self.pop_dict()?;
                let has = dict.borrow().contains_key(key.as_ref());
                self.stack.push(Val::Boolean(has))?;
            }
            DictLen => {
                let dict = self.pop_dict()?;
                let len = dict.borrow().len();
                self.stack.push(Val::Integer(len as i64))?;
            }
            StrConcat => {
                let rhs = self.pop_string()?;
                let lhs = self.pop_string()?;
                self.stack
                    .push(Val::String(format!("{}{}", lhs, rhs).into()))?;
            }
            StrLen => {
                let s = self.pop_string()?;
                self.stack.push(Val::Integer(s.chars().count() as i64))?;
            }
            StrSubstr => {
                let len = self.pop_integer()?.max(0) as usize;
                let start = self.pop_integer()?.max(0) as usize;
                let s = self.pop_string()?;
                let sub: String = s.chars().skip(start).take(len).collect();
                self.stack.push(Val::String(sub.into()))?;
            }
            StrIndexOf => {
                let needle = self.pop_string()?;
                let hay = self.pop_string()?;
                let index = match hay.find(needle.as_ref()) {
                    Some(byte) => hay[..byte].chars().count() as i64,
                    None => -1,
                };
                self.stack.push(Val::Integer(index))?;
            }
            ReadFile => {
                let path = self.pop_string()?;
                let text = std::fs::read_to_string(path.as_ref())
                    .map_err(|_| error!(IoError; "CANNOT READ FILE"))?;
                self.stack.push(Val::String(text.into()))?;
            }
            ReadStdin => {
                let mut text = String::new();
                self.input
                    .read_to_string(&mut text)
                    .map_err(|_| error!(IoError; "CANNOT READ STDIN"))?;
                self.stack.push(Val::String(text.into()))?;
            }
            Halt => return Ok(false),
        }
        Ok(true)
    }

    fn binary(&mut self, op: fn(Val, Val) -> Result<Val>) -> Result<()> {
        let (lhs, rhs) = self.stack.pop_2()?;
        self.stack.push(op(lhs, rhs)?)
    }

    fn value(&self, idx: usize) -> Result<Val> {
        match self.values.get(idx) {
            Some(val) => Ok(val.clone()),
            None => Err(error!(InternalError; "BAD CONSTANT INDEX")),
        }
    }

    fn name(&self, idx: usize) -> Result<Rc<str>> {
        match self.values.get(idx) {
            Some(Val::String(s)) => Ok(s.clone()),
            _ => Err(error!(InternalError; "EXPECTED NAME CONSTANT")),
        }
    }

    fn pop_integer(&mut self) -> Result<i64> {
        match self.stack.pop()? {
            Val::Integer(n) => Ok(n),
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn pop_boolean(&mut self) -> Result<bool> {
        match self.stack.pop()? {
            Val::Boolean(b) => Ok(b),
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn pop_string(&mut self) -> Result<Rc<str>> {
        match self.stack.pop()? {
            Val::String(s) => Ok(s),
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn pop_array(&mut self) -> Result<Rc<RefCell<Vec<Val>>>> {
        match self.stack.pop()? {
            Val::Array(a) => Ok(a),
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn pop_dict(&mut self) -> Result<Rc<RefCell<HashMap<String, Val>>>> {
        match self.stack.pop()? {
            Val::Dict(d) => Ok(d),
            _ => Err(error!(TypeMismatch)),
        }
    }

    // Stores leave the collection on the stack so stores chain.
    fn peek_array(&mut self) -> Result<Rc<RefCell<Vec<Val>>>> {
        match self.stack.last() {
            Some(Val::Array(a)) => Ok(a.clone()),
            Some(_) => Err(error!(TypeMismatch)),
            None => Err(error!(StackUnderflow)),
        }
    }

    fn peek_dict(&mut self) -> Result<Rc<RefCell<HashMap<String, Val>>>> {
        match self.stack.last() {
            Some(Val::Dict(d)) => Ok(d.clone()),
            Some(_) => Err(error!(TypeMismatch)),
            None => Err(error!(StackUnderflow)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;
    use crate::mach::compile;

    fn run(source: &str) -> Result<String> {
        let program = compile(source)?;
        let mut runtime = Runtime::with_output(program, Vec::new());
        runtime.execute()?;
        Ok(String::from_utf8(runtime.into_output()).unwrap())
    }

    #[test]
    fn test_stack_words() {
        assert_eq!(run("1 2 swap print print").unwrap(), "1\n2\n");
        assert_eq!(run("1 2 over print print print").unwrap(), "1\n2\n1\n");
        assert_eq!(run("1 2 3 rot print print print").unwrap(), "1\n3\n2\n");
    }

    #[test]
    fn test_error_carries_address() {
        let program = compile("1 drop drop").unwrap();
        let mut runtime = Runtime::with_output(program, Vec::new());
        let error = runtime.execute().unwrap_err();
        assert!(error == ErrorCode::StackUnderflow);
        assert_eq!(error.to_string(), "STACK UNDERFLOW AT PC 2");
    }

    #[test]
    fn test_undefined_variable_at_run_time() {
        let error = run(": show 0 param x print ; show let x 5 ;").unwrap_err();
        assert!(error == ErrorCode::UndefinedVariable);
    }

    #[test]
    fn test_execution_stops_at_halt() {
        assert_eq!(run("1 print").unwrap(), "1\n");
    }
}
