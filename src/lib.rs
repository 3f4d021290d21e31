//! A CHIP-8 virtual machine.
//!
//! ## Design
//!
//! * the interpreter is one owned value; `step()` runs one instruction and
//!   `tick()` runs the 60Hz timers. Neither knows about wall-clock time
//! * the host decides how many steps make a frame, and calls `tick()` once per
//!   frame
//! * FX0A is the only place the machine blocks: it parks in
//!   `RunState::WaitingForKey` and `step()` does nothing until the host calls
//!   `resolve_key_wait`
//! * decode is a pure function from opcode to `Instruction`; execute matches on
//!   it exhaustively
//! * faults (running off the end of RAM, stack over/underflow, unknown
//!   opcodes in strict mode) halt the machine and come back as `Chip8Error`
//! * display, input and sound sit behind traits, so the terminal front end can
//!   be swapped or replaced with dummies in tests
//!
//! Model
//!
//! Environment
//!  |-- display, input, sound
//!  |-- interpreter(config)
//!  |    |-- memory: font, program, stack, display
//!  |    |-- registers, call stack, timers, keypad
//!  |    `-- instruction decode
//!  `-- main loop, 60 times a second
//!       |-- feed key events (a key-down also resolves a pending FX0A)
//!       |-- interpreter.step() x speed
//!       |-- interpreter.tick()
//!       `-- redraw if needed, update the buzzer
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod keypad;
pub mod memory;
pub mod registers;
pub mod sound;
pub mod stack;
pub mod timers;

pub use config::Config;
pub use error::Chip8Error;
pub use interpreter::{Chip8Interpreter, RunState};
