use crate::display::Display;
use crate::input::{Input, KeyEvent};
use crate::interpreter::Chip8Interpreter;
use crate::sound::Sound;
use crate::timers::TIMER_HZ;
use log::info;
use std::error::Error;
use std::time::{Duration, Instant};

/// instructions per 60Hz frame unless told otherwise
pub const DEFAULT_SPEED: u32 = 10;

const FRAME: Duration = Duration::from_nanos(1_000_000_000 / TIMER_HZ as u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Continue,
    Quit,
}

/// Wires the interpreter to its collaborators and owns the clocks: `speed`
/// steps and one timer tick per frame, 60 frames a second. Everything runs on
/// the caller's thread, so key updates land between steps, never during one.
pub struct Environment<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    speed: u32,
}

impl<'a> Environment<'a> {
    pub fn new(
        interpreter: Chip8Interpreter,
        display: &'a mut impl Display,
        input: &'a mut impl Input,
        sound: &'a mut impl Sound,
        speed: u32,
    ) -> Self {
        Environment {
            interpreter,
            display,
            input,
            sound,
            speed,
        }
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    /// one 60th of a second of emulation
    pub fn frame(&mut self) -> Result<Frame, Box<dyn Error>> {
        for event in self.input.read_events()? {
            match event {
                KeyEvent::Down(key) => {
                    self.interpreter.key_down(key)?;
                    self.interpreter.resolve_key_wait(key)?;
                }
                KeyEvent::Up(key) => self.interpreter.key_up(key)?,
                KeyEvent::Quit => return Ok(Frame::Quit),
            }
        }
        for _ in 0..self.speed {
            self.interpreter.step()?;
            if self.interpreter.is_waiting_for_key() {
                break;
            }
        }
        self.interpreter.tick();
        if self.interpreter.take_redraw() {
            self.display.draw(&self.interpreter.snapshot())?;
        }
        self.sound.set_tone(self.interpreter.tone_on())?;
        Ok(Frame::Continue)
    }

    /// run until asked to quit, a fault, or `max_frames`; returns frames run
    pub fn main_loop(&mut self, max_frames: Option<u64>) -> Result<u64, Box<dyn Error>> {
        let mut frames = 0;
        let result = loop {
            let start = Instant::now();
            match self.frame() {
                Ok(Frame::Continue) => frames += 1,
                Ok(Frame::Quit) => break Ok(frames),
                Err(e) => break Err(e),
            }
            if max_frames.map_or(false, |max| frames >= max) {
                break Ok(frames);
            }
            spin_sleep::sleep(FRAME.saturating_sub(start.elapsed()));
        };
        self.sound.set_tone(false)?;
        info!("stopped after {} frames", frames);
        result
    }
}
