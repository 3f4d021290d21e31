use crate::error::Chip8Error;

pub const KEY_COUNT: u8 = 16;

/// The 16-key hex keypad, as a set of keys currently held down. Updates come
/// from the driver between steps and replace a single word, so an instruction
/// never sees half of one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keypad {
    held: u16,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: u8) -> Result<(), Chip8Error> {
        self.held |= bit(key)?;
        Ok(())
    }

    pub fn key_up(&mut self, key: u8) -> Result<(), Chip8Error> {
        self.held &= !bit(key)?;
        Ok(())
    }

    /// keys outside 0..=f are never held
    pub fn is_key_down(&self, key: u8) -> bool {
        bit(key).map_or(false, |b| self.held & b != 0)
    }
}

fn bit(key: u8) -> Result<u16, Chip8Error> {
    if key >= KEY_COUNT {
        return Err(Chip8Error::InvalidKey(key));
    }
    Ok(1 << key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down_up() -> Result<(), Chip8Error> {
        let mut k = Keypad::new();
        k.key_down(0xa)?;
        k.key_down(0x3)?;
        assert!(k.is_key_down(0xa));
        assert!(k.is_key_down(0x3));
        assert!(!k.is_key_down(0x4));
        k.key_up(0x3)?;
        assert!(!k.is_key_down(0x3));
        assert!(k.is_key_down(0xa));
        // releasing twice is harmless
        k.key_up(0x3)?;
        assert_eq!(k.held, 1 << 0xa);
        Ok(())
    }

    #[test]
    fn test_out_of_range_key() {
        let mut k = Keypad::new();
        assert!(matches!(k.key_down(0x10), Err(Chip8Error::InvalidKey(0x10))));
        assert!(k.key_up(0xff).is_err());
        assert!(!k.is_key_down(0x10));
    }
}
