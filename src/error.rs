use std::io;
use thiserror::Error;

/// Everything that can stop the interpreter, either while loading a program
/// or while executing one. None of these are retried; the driver decides what
/// to tell the user.
#[derive(Error, Debug)]
pub enum Chip8Error {
    /// an access of `len` bytes starting at `addr` runs past the end of RAM
    #[error("address out of range: {len} byte(s) at 0x{addr:04x}")]
    AddressOutOfRange { addr: u16, len: usize },

    #[error("call stack overflow at pc 0x{pc:04x}")]
    StackOverflow { pc: u16 },

    #[error("return with empty call stack at pc 0x{pc:04x}")]
    StackUnderflow { pc: u16 },

    /// only raised under `OpcodePolicy::Strict`
    #[error("unknown opcode 0x{opcode:04x} at 0x{addr:04x}")]
    UnknownOpcode { opcode: u16, addr: u16 },

    #[error("program is {len} bytes, but only {max} fit in the program area")]
    ProgramTooLarge { len: usize, max: usize },

    #[error("program image is empty")]
    EmptyProgram,

    #[error("key code 0x{0:02x} is not on the keypad")]
    InvalidKey(u8),

    /// a previous fault stopped the machine; it has to be rebuilt
    #[error("interpreter halted after an earlier fault")]
    Halted,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Chip8Error {
    /// true for faults that leave the machine unusable
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Chip8Error::AddressOutOfRange { .. }
                | Chip8Error::StackOverflow { .. }
                | Chip8Error::StackUnderflow { .. }
                | Chip8Error::UnknownOpcode { .. }
                | Chip8Error::Halted
        )
    }
}
