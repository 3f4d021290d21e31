use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::warn;
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

/// map of characters read from the keyboard to what the chip8 might expect,
/// using the left-hand side of a qwerty keyboard:
///   1 2 3 4      1 2 3 C
///   q w e r  =>  4 5 6 D
///   a s d f      7 8 9 E
///   z x c v      A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// terminals only report presses (and auto-repeats), so a key counts as held
/// until it has been quiet this long
pub const DEFAULT_HOLD: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(u8),
    Up(u8),
    Quit,
}

/// reads keypresses
pub trait Input {
    /// everything that happened since the last call, oldest first
    fn read_events(&mut self) -> Result<Vec<KeyEvent>, io::Error>;
}

/// Turns a stream of presses into down/up pairs by timing out keys that
/// haven't been seen recently.
#[derive(Debug)]
struct KeyHold {
    hold: Duration,
    last_seen: HashMap<u8, Instant>,
}

impl KeyHold {
    fn new(hold: Duration) -> Self {
        KeyHold {
            hold,
            last_seen: HashMap::new(),
        }
    }

    /// returns true if this starts a new hold
    fn press(&mut self, key: u8, now: Instant) -> bool {
        self.last_seen.insert(key, now).is_none()
    }

    /// keys whose hold has run out, lowest first
    fn expire(&mut self, now: Instant) -> Vec<u8> {
        let hold = self.hold;
        let mut released: Vec<u8> = self
            .last_seen
            .iter()
            .filter(|&(_, &seen)| now.duration_since(seen) >= hold)
            .map(|(&key, _)| key)
            .collect();
        released.sort_unstable();
        for key in &released {
            self.last_seen.remove(key);
        }
        released
    }
}

/// Input from the terminal, read without blocking through crossterm. Esc or
/// ctrl-c ask to quit.
pub struct TermInput {
    keymap: HashMap<char, u8>,
    held: KeyHold,
}

impl TermInput {
    pub fn new(hold: Duration) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held: KeyHold::new(hold),
        })
    }

    fn map_key(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<KeyEvent> {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(KeyEvent::Quit),
            KeyCode::Esc => Some(KeyEvent::Quit),
            KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                Some(&mapped_key) => Some(KeyEvent::Down(mapped_key)),
                None => {
                    warn!("can't map {:?} to a COSMAC key", key);
                    None
                }
            },
            _ => None,
        }
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn read_events(&mut self) -> Result<Vec<KeyEvent>, io::Error> {
        let mut events = Vec::new();
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                match self.map_key(evt.code, evt.modifiers) {
                    Some(KeyEvent::Down(key)) => {
                        if self.held.press(key, Instant::now()) {
                            events.push(KeyEvent::Down(key));
                        }
                    }
                    Some(other) => events.push(other),
                    None => {}
                }
            }
        }
        events.extend(self.held.expire(Instant::now()).into_iter().map(KeyEvent::Up));
        Ok(events)
    }
}

/// dummy Input implementation for testing; hands out one batch per call
pub struct DummyInput {
    batches: Vec<Vec<KeyEvent>>,
}

impl DummyInput {
    pub fn new(batches: &[&[KeyEvent]]) -> Self {
        DummyInput {
            batches: batches.iter().rev().map(|b| b.to_vec()).collect(),
        }
    }
}

impl Input for DummyInput {
    fn read_events(&mut self) -> Result<Vec<KeyEvent>, io::Error> {
        Ok(self.batches.pop().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_complete() {
        let map = HashMap::from(CHIP8_CONVENTIONAL_KEYMAP);
        let mut codes: Vec<u8> = map.values().copied().collect();
        codes.sort_unstable();
        assert_eq!(codes, (0..16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_hold_repeats_are_one_press() {
        let t0 = Instant::now();
        let mut h = KeyHold::new(Duration::from_millis(100));
        assert!(h.press(0x5, t0));
        assert!(!h.press(0x5, t0 + Duration::from_millis(50)));
        assert!(h.expire(t0 + Duration::from_millis(120)).is_empty());
        assert_eq!(h.expire(t0 + Duration::from_millis(150)), vec![0x5]);
        assert!(h.press(0x5, t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_hold_expires_in_key_order() {
        let t0 = Instant::now();
        let mut h = KeyHold::new(Duration::from_millis(10));
        h.press(0xc, t0);
        h.press(0x1, t0);
        assert_eq!(h.expire(t0 + Duration::from_millis(10)), vec![0x1, 0xc]);
    }

    #[test]
    fn test_dummy_input_batches() -> Result<(), io::Error> {
        let mut i = DummyInput::new(&[&[KeyEvent::Down(1)], &[KeyEvent::Up(1), KeyEvent::Quit]]);
        assert_eq!(i.read_events()?, vec![KeyEvent::Down(1)]);
        assert_eq!(i.read_events()?, vec![KeyEvent::Up(1), KeyEvent::Quit]);
        assert!(i.read_events()?.is_empty());
        Ok(())
    }
}
