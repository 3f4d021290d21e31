//! # interpreter
//!
//! The fetch/decode/execute loop and everything it owns. Nothing here keeps
//! time: the driver calls `step()` as often as it likes and `tick()` at
//! 60Hz, from the same thread or behind one lock.
//!
//! Machine state on construction:
//!  * font at 0x000, program at 0x200, everything else zeroed
//!  * PC at 0x200, I and V0-VF zero
//!  * stack pointer at the top slot of the reserved stack region
//!  * timers stopped, no keys held, running
use crate::config::{Config, OpcodePolicy, ShiftMode};
use crate::error::Chip8Error;
use crate::framebuffer::{Framebuffer, Snapshot};
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::memory::{self, Chip8Memory, MemoryMap, DISPLAY_ADDR};
use crate::registers::Registers;
use crate::stack::CallStack;
use crate::timers::Timers;
use log::{error, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

/// longest sprite DXYN can draw
const MAX_SPRITE_ROWS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// FX0A is waiting for `resolve_key_wait`; the value is X
    WaitingForKey(u8),
    /// a fatal fault stopped the machine
    Halted,
}

pub struct Chip8Interpreter {
    memory: Chip8Memory,
    regs: Registers,
    stack: CallStack,
    timers: Timers,
    keypad: Keypad,
    state: RunState,
    config: Config,
    rng: StdRng,
    redraw: bool,
    unknown_opcodes: u64,
}

impl Chip8Interpreter {
    /// build a machine with `program` loaded at 0x200
    pub fn new(program: &[u8], config: Config) -> Result<Self, Chip8Error> {
        let mut memory = Chip8Memory::new();
        memory.load_program(program)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!("loaded {} byte program", program.len());
        Ok(Chip8Interpreter {
            memory,
            regs: Registers::new(),
            stack: CallStack::new(),
            timers: Timers::new(),
            keypad: Keypad::new(),
            state: RunState::Running,
            config,
            rng,
            redraw: true,
            unknown_opcodes: 0,
        })
    }

    /// load a chip8 program from a file or whatever
    pub fn from_reader(reader: &mut impl io::Read, config: Config) -> Result<Self, Chip8Error> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        Self::new(&program, config)
    }

    /// Execute one instruction. Does nothing while waiting for a key. A fatal
    /// fault halts the machine and is returned; later calls return `Halted`.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        match self.state {
            RunState::Halted => return Err(Chip8Error::Halted),
            RunState::WaitingForKey(_) => return Ok(()),
            RunState::Running => {}
        }
        let result = match self.memory.get_word(self.regs.pc) {
            Ok(opcode) => self.execute(opcode),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            if e.is_fatal() {
                error!("halting at pc 0x{:04x}: {}", self.regs.pc, e);
                self.state = RunState::Halted;
            }
        }
        result
    }

    /// 60Hz timer clock
    pub fn tick(&mut self) {
        self.timers.tick();
    }

    fn execute(&mut self, opcode: u16) -> Result<(), Chip8Error> {
        use Instruction::*;

        let pc = self.regs.pc;
        let instruction = Instruction::decode(opcode);
        trace!("0x{:04x}: {:04x} {:?}", pc, opcode, instruction);

        // every arm checks before it writes, so an Err leaves state untouched
        let mut next = pc.wrapping_add(2);
        let v = &mut self.regs.v;
        match instruction {
            ClearScreen => {
                self.framebuffer_mut().clear();
                self.redraw = true;
            }
            Return => next = self.stack.pop(&self.memory, pc)?,
            Jump { nnn } => next = nnn,
            Call { nnn } => {
                self.stack.push(&mut self.memory, next, pc)?;
                next = nnn;
            }
            SkipEqImm { x, nn } => {
                if v[x as usize] == nn {
                    next += 2;
                }
            }
            SkipNeImm { x, nn } => {
                if v[x as usize] != nn {
                    next += 2;
                }
            }
            SkipEqReg { x, y } => {
                if v[x as usize] == v[y as usize] {
                    next += 2;
                }
            }
            SkipNeReg { x, y } => {
                if v[x as usize] != v[y as usize] {
                    next += 2;
                }
            }
            LoadImm { x, nn } => v[x as usize] = nn,
            AddImm { x, nn } => v[x as usize] = v[x as usize].wrapping_add(nn),
            Move { x, y } => v[x as usize] = v[y as usize],
            Or { x, y } => v[x as usize] |= v[y as usize],
            And { x, y } => v[x as usize] &= v[y as usize],
            Xor { x, y } => v[x as usize] ^= v[y as usize],
            Add { x, y } => {
                let (sum, carry) = v[x as usize].overflowing_add(v[y as usize]);
                v[x as usize] = sum;
                self.regs.set_flag(carry);
            }
            Sub { x, y } => {
                let (vx, vy) = (v[x as usize], v[y as usize]);
                v[x as usize] = vx.wrapping_sub(vy);
                self.regs.set_flag(vx >= vy);
            }
            SubReversed { x, y } => {
                let (vx, vy) = (v[x as usize], v[y as usize]);
                v[x as usize] = vy.wrapping_sub(vx);
                self.regs.set_flag(vy >= vx);
            }
            ShiftRight { x, y } => {
                let src = self.shift_source(x, y);
                self.regs.v[x as usize] = src >> 1;
                self.regs.set_flag(src & 0x01 != 0);
            }
            ShiftLeft { x, y } => {
                let src = self.shift_source(x, y);
                self.regs.v[x as usize] = src << 1;
                self.regs.set_flag(src & 0x80 != 0);
            }
            LoadIndex { nnn } => self.regs.set_i(nnn as u32),
            JumpOffset { nnn } => next = nnn + v[0] as u16,
            Random { x, nn } => v[x as usize] = self.rng.gen::<u8>() & nn,
            Draw { x, y, n } => {
                let (vx, vy) = (v[x as usize], v[y as usize]);
                let n = n as usize;
                let mut sprite = [0u8; MAX_SPRITE_ROWS];
                sprite[..n].copy_from_slice(self.memory.get_ro_slice(self.regs.i(), n)?);
                let collided = self.framebuffer_mut().draw_sprite(vx, vy, &sprite[..n]);
                self.regs.set_flag(collided);
                self.redraw = true;
            }
            SkipKeyDown { x } => {
                if self.keypad.is_key_down(v[x as usize]) {
                    next += 2;
                }
            }
            SkipKeyUp { x } => {
                if !self.keypad.is_key_down(v[x as usize]) {
                    next += 2;
                }
            }
            LoadDelay { x } => v[x as usize] = self.timers.delay,
            WaitKey { x } => {
                info!("waiting for a key into V{:X}", x);
                self.state = RunState::WaitingForKey(x);
            }
            SetDelay { x } => self.timers.delay = v[x as usize],
            SetSound { x } => self.timers.sound = v[x as usize],
            AddIndex { x } => {
                let vx = v[x as usize] as u32;
                self.regs.set_i(self.regs.i() as u32 + vx);
            }
            LoadGlyph { x } => {
                let addr = memory::glyph_addr(v[x as usize]);
                self.regs.set_i(addr as u32);
            }
            StoreBcd { x } => {
                let val = v[x as usize];
                let i = self.regs.i();
                self.memory.write(&[val / 100, val / 10 % 10, val % 10], i)?;
                self.note_store(i, 3);
            }
            StoreRegs { x } => {
                let i = self.regs.i();
                let len = x as usize + 1;
                self.memory.write(&self.regs.v[..len], i)?;
                self.note_store(i, len);
                self.regs.set_i(i as u32 + len as u32);
            }
            LoadRegs { x } => {
                let i = self.regs.i();
                let len = x as usize + 1;
                let src = self.memory.get_ro_slice(i, len)?;
                self.regs.v[..len].copy_from_slice(src);
                self.regs.set_i(i as u32 + len as u32);
            }
            Unknown(opcode) => match self.config.unknown_opcodes {
                OpcodePolicy::Ignore => {
                    self.unknown_opcodes += 1;
                    warn!("skipping unknown opcode 0x{:04x} at 0x{:04x}", opcode, pc);
                }
                OpcodePolicy::Strict => {
                    return Err(Chip8Error::UnknownOpcode { opcode, addr: pc });
                }
            },
        }
        self.regs.pc = next;
        Ok(())
    }

    fn shift_source(&self, x: u8, y: u8) -> u8 {
        match self.config.shift {
            ShiftMode::InPlace => self.regs.v[x as usize],
            ShiftMode::CopyVy => self.regs.v[y as usize],
        }
    }

    /// stores that land in display memory change the picture too
    fn note_store(&mut self, addr: u16, len: usize) {
        if addr as usize + len > DISPLAY_ADDR as usize {
            self.redraw = true;
        }
    }

    fn framebuffer_mut(&mut self) -> Framebuffer<&mut [u8]> {
        Framebuffer::new(self.memory.display_mut())
    }

    pub fn framebuffer(&self) -> Framebuffer<&[u8]> {
        Framebuffer::new(self.memory.display())
    }

    /// the screen as a grid, for whoever renders it
    pub fn snapshot(&self) -> Snapshot {
        self.framebuffer().snapshot()
    }

    /// Checks and clears the redraw flag
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn key_down(&mut self, key: u8) -> Result<(), Chip8Error> {
        self.keypad.key_down(key)
    }

    pub fn key_up(&mut self, key: u8) -> Result<(), Chip8Error> {
        self.keypad.key_up(key)
    }

    pub fn is_key_down(&self, key: u8) -> bool {
        self.keypad.is_key_down(key)
    }

    /// Finish a pending FX0A with `key`. Returns false if nothing was waiting.
    pub fn resolve_key_wait(&mut self, key: u8) -> Result<bool, Chip8Error> {
        if key >= crate::keypad::KEY_COUNT {
            return Err(Chip8Error::InvalidKey(key));
        }
        match self.state {
            RunState::WaitingForKey(x) => {
                info!("key 0x{:x} resumes into V{:X}", key, x);
                self.regs.v[x as usize] = key;
                self.state = RunState::Running;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_waiting_for_key(&self) -> bool {
        matches!(self.state, RunState::WaitingForKey(_))
    }

    /// should the buzzer be on
    pub fn tone_on(&self) -> bool {
        self.timers.tone_on()
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn memory(&self) -> &Chip8Memory {
        &self.memory
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// how many unknown opcodes have been skipped
    pub fn unknown_opcode_count(&self) -> u64 {
        self.unknown_opcodes
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
