use super::{Address, Opcode, Symbol};
use crate::error;
use crate::lang::{Error, Position};
use std::collections::{BTreeMap, HashMap};

type Result<T> = std::result::Result<T, Error>;

/// ## Instruction buffer with forward-reference fix-up
///
/// Jumps are emitted with a placeholder operand against a symbol; once
/// every symbol has an address, `link` patches the placeholders and
/// relocates local targets by the buffer's base address in the final
/// program.
#[derive(Debug, Default)]
pub struct Link {
    current_symbol: Symbol,
    ops: Vec<Opcode>,
    symbols: BTreeMap<Symbol, Address>,
    unlinked: HashMap<Address, (Position, Symbol)>,
}

impl Link {
    pub fn new() -> Link {
        Link::default()
    }

    pub fn len(&self) -> Address {
        self.ops.len()
    }

    pub fn push(&mut self, op: Opcode) {
        self.ops.push(op);
    }

    pub fn next_symbol(&mut self) -> Symbol {
        self.current_symbol -= 1;
        self.current_symbol
    }

    /// Bind a symbol to the current end of the buffer.
    pub fn push_symbol(&mut self, sym: Symbol) {
        self.symbols.insert(sym, self.ops.len());
    }

    pub fn push_jump(&mut self, pos: Position, sym: Symbol) {
        self.unlinked.insert(self.ops.len(), (pos, sym));
        self.ops.push(Opcode::Jump(0));
    }

    pub fn push_jump_if_false(&mut self, pos: Position, sym: Symbol) {
        self.unlinked.insert(self.ops.len(), (pos, sym));
        self.ops.push(Opcode::JumpIfFalse(0));
    }

    /// Resolve every placeholder to `base` plus the symbol's local
    /// address and return the finished instructions.
    pub fn link(mut self, base: Address) -> Result<Vec<Opcode>> {
        for (op_addr, (pos, symbol)) in std::mem::take(&mut self.unlinked) {
            let dest = match self.symbols.get(&symbol) {
                Some(dest) => base + dest,
                None => return Err(error!(InternalError, pos; "LINK FAILURE")),
            };
            match self.ops.get_mut(op_addr) {
                Some(op @ Opcode::Jump(_)) => *op = Opcode::Jump(dest),
                Some(op @ Opcode::JumpIfFalse(_)) => *op = Opcode::JumpIfFalse(dest),
                _ => return Err(error!(InternalError, pos; "LINK FAILURE")),
            }
        }
        Ok(self.ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_patch_with_relocation() {
        let mut link = Link::new();
        let end = link.next_symbol();
        link.push(Opcode::LoadTrue);
        link.push_jump_if_false((1, 1), end);
        link.push(Opcode::LoadConst(0));
        link.push_jump((1, 1), end);
        link.push_symbol(end);
        link.push(Opcode::Halt);
        let ops = link.link(10).unwrap();
        assert_eq!(ops[1], Opcode::JumpIfFalse(14));
        assert_eq!(ops[3], Opcode::Jump(14));
    }

    #[test]
    fn test_unbound_symbol_is_link_failure() {
        let mut link = Link::new();
        let sym = link.next_symbol();
        link.push_jump((1, 1), sym);
        assert!(link.link(0).is_err());
    }
}
