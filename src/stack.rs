use crate::error::Chip8Error;
use crate::memory::{MemoryMap, STACK_ADDR, STACK_END};

/// number of return addresses the reserved region holds
pub const STACK_CAPACITY: usize = ((STACK_END - STACK_ADDR) / 2) as usize;

/// where the stack pointer sits when nothing has been pushed
const STACK_TOP: u16 = STACK_END - 2;

/// Return addresses live in RAM, in the reserved region just below the
/// program. The stack pointer addresses the next free slot and moves down by 2
/// on every push. Only the pointer is kept here; the words themselves are in
/// whatever `MemoryMap` is handed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallStack {
    sp: u16,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack { sp: STACK_TOP }
    }

    pub fn depth(&self) -> usize {
        ((STACK_TOP - self.sp) / 2) as usize
    }

    /// store `ret` (high byte first) at the stack pointer, then move it down.
    /// `pc` is only used for reporting.
    pub fn push(&mut self, mem: &mut impl MemoryMap, ret: u16, pc: u16) -> Result<(), Chip8Error> {
        if self.sp < STACK_ADDR {
            return Err(Chip8Error::StackOverflow { pc });
        }
        mem.set_word(self.sp, ret)?;
        self.sp -= 2;
        Ok(())
    }

    /// move the stack pointer back up and read the word it now points at
    pub fn pop(&mut self, mem: &impl MemoryMap, pc: u16) -> Result<u16, Chip8Error> {
        if self.sp >= STACK_TOP {
            return Err(Chip8Error::StackUnderflow { pc });
        }
        let ret = mem.get_word(self.sp + 2)?;
        self.sp += 2;
        Ok(ret)
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
