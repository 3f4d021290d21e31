/// how often the driver should call `tick`
pub const TIMER_HZ: u32 = 60;

/// Delay and sound timers. They count down on their own 60Hz clock, which the
/// driver owns; the interpreter only ever sets and reads them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// count both timers down by one, stopping at zero
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// the buzzer sounds for as long as the sound timer is running
    pub fn tone_on(&self) -> bool {
        self.sound > 0
    }
}
