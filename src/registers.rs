use crate::memory::PROGRAM_ADDR;

pub const REG_COUNT: usize = 16;
/// VF doubles as carry / borrow / shifted-out bit / collision flag
pub const FLAG: usize = 0xf;

/// The programmer-visible registers. The stack pointer lives with the call
/// stack, the timers with the timer subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    pub v: [u8; REG_COUNT],
    i: u16,
    pub pc: u16,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; REG_COUNT],
            i: 0,
            pc: PROGRAM_ADDR,
        }
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    /// I is 16 bits wide; anything larger is truncated
    pub fn set_i(&mut self, val: u32) {
        self.i = (val & 0xffff) as u16;
    }

    pub fn set_flag(&mut self, on: bool) {
        self.v[FLAG] = on as u8;
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let r = Registers::new();
        assert_eq!(r.pc, 0x200);
        assert_eq!(r.i(), 0);
        assert_eq!(r.v, [0; 16]);
    }

    #[test]
    fn test_i_masked_to_16_bits() {
        let mut r = Registers::new();
        r.set_i(0xffff + 0x10);
        assert_eq!(r.i(), 0x000f);
    }

    #[test]
    fn test_flag() {
        let mut r = Registers::new();
        r.set_flag(true);
        assert_eq!(r.v[0xf], 1);
        r.set_flag(false);
        assert_eq!(r.v[FLAG], 0);
    }
}
