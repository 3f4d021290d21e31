use crate::error::Chip8Error;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents memory map, ROM, RAM etc. Every access is bounds checked; running
/// off the end of RAM is an error, never a wrap.
pub trait MemoryMap {
    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), Chip8Error> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// get a big-endian two-byte word (opcodes, stack)
    fn get_word(&self, addr: u16) -> Result<u16, Chip8Error> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    fn set_word(&mut self, addr: u16, val: u16) -> Result<(), Chip8Error> {
        self.write(&val.to_be_bytes(), addr)
    }

    /// get a r/w slice of the underlying memory (heap)
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error>;

    /// get a r/o slice of the underlying memory (heap)
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error>;
}

/// how much RAM we have
pub const RAM_SIZE_BYTES: usize = 4096;

/// 4K memory map used here:
///   0x0000-0x004f  font
///   0x0050-0x01cf  unused (interpreter on the real thing)
///   0x01d0-0x01ff  stack, growing down towards the font
///   0x0200-0x0eff  program
///   0x0f00-0x0fff  display
pub const FONT_ADDR: u16 = 0x0000;
pub const STACK_ADDR: u16 = 0x01d0;
pub const STACK_END: u16 = 0x0200;
pub const PROGRAM_ADDR: u16 = 0x0200;
pub const DISPLAY_ADDR: u16 = 0x0f00;
pub const DISPLAY_SIZE_BYTES: usize = RAM_SIZE_BYTES - DISPLAY_ADDR as usize;

/// the biggest image that fits before the display
pub const MAX_PROGRAM_BYTES: usize = (DISPLAY_ADDR - PROGRAM_ADDR) as usize;

/// bytes per glyph in the built-in font
pub const FONT_GLYPH_BYTES: u16 = 5;

pub struct Chip8Memory {
    bytes: Box<[u8; RAM_SIZE_BYTES]>,
}

impl MemoryMap for Chip8Memory {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error> {
        let a = check_range(addr, len)?;
        Ok(&mut self.bytes[a..a + len])
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error> {
        let a = check_range(addr, len)?;
        Ok(&self.bytes[a..a + len])
    }
}

fn check_range(addr: u16, len: usize) -> Result<usize, Chip8Error> {
    let a = addr as usize;
    if a + len > RAM_SIZE_BYTES {
        return Err(Chip8Error::AddressOutOfRange { addr, len });
    }
    Ok(a)
}

impl Chip8Memory {
    /// zeroed RAM with the font baked in at 0x000
    pub fn new() -> Self {
        let mut bytes = Box::new([0u8; RAM_SIZE_BYTES]);
        let font = FONT_ADDR as usize;
        bytes[font..font + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
        Chip8Memory { bytes }
    }

    /// load a CHIP-8 program at 0x200, rejecting anything that would spill into
    /// display memory
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        if program.is_empty() {
            return Err(Chip8Error::EmptyProgram);
        }
        if program.len() > MAX_PROGRAM_BYTES {
            return Err(Chip8Error::ProgramTooLarge {
                len: program.len(),
                max: MAX_PROGRAM_BYTES,
            });
        }
        self.write(program, PROGRAM_ADDR)
    }

    /// the packed display bytes
    pub fn display(&self) -> &[u8] {
        &self.bytes[DISPLAY_ADDR as usize..]
    }

    pub fn display_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[DISPLAY_ADDR as usize..]
    }
}

impl Default for Chip8Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// address of the glyph for `digit`; values above 0xf point past the font and
/// are not corrected
pub fn glyph_addr(digit: u8) -> u16 {
    FONT_ADDR + digit as u16 * FONT_GLYPH_BYTES
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed_after_font() {
        let m = Chip8Memory::new();
        assert_eq!(m.bytes[..80], CHIP8_FONT);
        assert!(m.bytes[80..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_slice_ok() -> Result<(), Chip8Error> {
        let mut dst = Chip8Memory::new();
        dst.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x300)?;
        assert_eq!(dst.get_ro_slice(0x2fe, 10)?, &[0, 0, 0, 1, 2, 3, 4, 5, 6, 7]);
        Ok(())
    }

    #[test]
    fn test_read_word() -> Result<(), Chip8Error> {
        let mut m = Chip8Memory::new();
        m.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x400)?;
        assert_eq!(m.get_word(0x404)?, 0x0405);
        m.set_word(0x400, 0xbeef)?;
        assert_eq!(m.get_ro_slice(0x400, 2)?, &[0xbe, 0xef]);
        Ok(())
    }

    #[test]
    fn test_access_past_end_fails() {
        let mut m = Chip8Memory::new();
        assert!(matches!(
            m.get_word(0x0fff),
            Err(Chip8Error::AddressOutOfRange { addr: 0x0fff, len: 2 })
        ));
        assert!(m.get_ro_slice(0x1000, 1).is_err());
        assert!(m.write(&[0; 8], 4089).is_err());
        assert!(m.write(&[1], 0x0fff).is_ok());
    }

    #[test]
    fn test_program_load_ok() -> Result<(), Chip8Error> {
        let mut dst = Chip8Memory::new();
        dst.load_program(&[0x00, 0xe0])?; // clear screen
        assert_eq!(dst.get_ro_slice(0x200, 2)?, &[0x00, 0xe0]);
        Ok(())
    }

    #[test]
    fn test_program_load_limits() -> Result<(), Chip8Error> {
        let mut dst = Chip8Memory::new();
        assert!(matches!(dst.load_program(&[]), Err(Chip8Error::EmptyProgram)));
        assert!(dst.load_program(&[0xaa; 3328]).is_ok());
        assert_eq!(dst.get_ro_slice(0x0eff, 1)?, &[0xaa]);
        assert!(dst.display().iter().all(|&b| b == 0));
        assert!(matches!(
            dst.load_program(&[0xaa; 3329]),
            Err(Chip8Error::ProgramTooLarge { len: 3329, max: 3328 })
        ));
        Ok(())
    }

    #[test]
    fn test_mem_layout() {
        // the stack sits between the font and the program
        assert!(STACK_ADDR >= FONT_ADDR + 16 * FONT_GLYPH_BYTES);
        assert_eq!(STACK_END, PROGRAM_ADDR);
        assert_eq!(MAX_PROGRAM_BYTES, 3328);
        assert_eq!(DISPLAY_ADDR, 0x0f00);
        assert_eq!(DISPLAY_SIZE_BYTES, 0x100);
        assert_eq!(Chip8Memory::new().display().len(), 0x100);
    }

    #[test]
    fn test_glyph_addr() {
        assert_eq!(glyph_addr(0x0), 0);
        assert_eq!(glyph_addr(0xa), 50);
        assert_eq!(glyph_addr(0xf), 75);
        assert_eq!(glyph_addr(0xff), 1275);
    }
}
