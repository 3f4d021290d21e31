pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
pub const SCREEN_BUFFER_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT / 8;

/// one bool per pixel, row major
pub type Snapshot = [[bool; SCREEN_WIDTH]; SCREEN_HEIGHT];

/// Packed 1bpp view over the display bytes: bit 7 of byte 0 is the top-left
/// pixel, each row is 8 bytes. Works over a borrowed slice of RAM or any owned
/// buffer.
pub struct Framebuffer<B> {
    bytes: B,
}

impl<B: AsRef<[u8]>> Framebuffer<B> {
    pub fn new(bytes: B) -> Self {
        Framebuffer { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        let n = x + y * SCREEN_WIDTH;
        self.as_bytes()
            .get(n / 8)
            .map_or(false, |b| (b >> (7 - n % 8)) & 1 == 1)
    }

    /// unpack into a bool grid for whoever draws the screen
    pub fn snapshot(&self) -> Snapshot {
        let mut grid = [[false; SCREEN_WIDTH]; SCREEN_HEIGHT];
        for (y, row) in grid.iter_mut().enumerate() {
            for (x, px) in row.iter_mut().enumerate() {
                *px = self.pixel(x, y);
            }
        }
        grid
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Framebuffer<B> {
    pub fn clear(&mut self) {
        self.bytes.as_mut().fill(0);
    }

    /// XOR `rows` onto the screen with the top-left corner at (`x`, `y`).
    /// Returns true if any lit pixel was switched off.
    ///
    /// Positions are a linear bit offset `x + 64 * y` with no wraparound, so a
    /// sprite hanging off the right edge spills into the start of the next
    /// row. Bytes past the end of the buffer are dropped.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let start = x as usize + SCREEN_WIDTH * y as usize;
        let byte = start / 8;
        let bit = (start % 8) as u32;
        let mut collided = false;
        for (row, &data) in rows.iter().enumerate() {
            let idx = byte + row * SCREEN_WIDTH / 8;
            collided |= self.xor_byte(idx, data >> bit);
            if bit != 0 {
                collided |= self.xor_byte(idx + 1, data << (8 - bit));
            }
        }
        collided
    }

    fn xor_byte(&mut self, idx: usize, bits: u8) -> bool {
        match self.bytes.as_mut().get_mut(idx) {
            Some(b) => {
                let collided = *b & bits != 0;
                *b ^= bits;
                collided
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> Framebuffer<[u8; SCREEN_BUFFER_SIZE]> {
        Framebuffer::new([0; SCREEN_BUFFER_SIZE])
    }

    #[test]
    fn test_draw_aligned() {
        let mut fb = blank();
        let flag = fb.draw_sprite(8, 0, &[0b10101011]);
        assert!(!flag);
        assert_eq!(fb.as_bytes()[0], 0x0);
        assert_eq!(fb.as_bytes()[1], 0b10101011);
        assert_eq!(fb.as_bytes()[2], 0x0);
    }

    #[test]
    fn test_draw_with_y() {
        let mut fb = blank();
        fb.draw_sprite(8, 2, &[0b10101011]);
        let target = (8 + 2 * 64) / 8;
        assert_eq!(fb.as_bytes()[target - 1], 0x0);
        assert_eq!(fb.as_bytes()[target], 0b10101011);
        assert_eq!(fb.as_bytes()[target + 1], 0x0);
    }

    #[test]
    fn test_draw_unaligned() {
        let mut fb = blank();
        let flag = fb.draw_sprite(2, 0, &[0b10101011]);
        assert!(!flag);
        assert_eq!(fb.as_bytes()[0], 0b00101010);
        assert_eq!(fb.as_bytes()[1], 0b11000000);
        assert_eq!(fb.as_bytes()[2], 0x0);
    }

    #[test]
    fn test_draw_collision() {
        let mut fb = blank();
        fb.bytes[1] = 0b11011111;
        let flag = fb.draw_sprite(8, 0, &[0b10111111]);
        assert!(flag);
        assert_eq!(fb.as_bytes()[1], 0b01100000);
    }

    #[test]
    fn test_draw_unaligned_collision_in_second_byte() {
        let mut fb = blank();
        fb.bytes[1] = 0b01000000;
        let flag = fb.draw_sprite(2, 0, &[0b10101011]);
        assert!(flag);
        assert_eq!(fb.as_bytes()[0], 0b00101010);
        assert_eq!(fb.as_bytes()[1], 0b10000000);
    }

    #[test]
    fn test_draw_right_edge_spills_into_next_row() {
        let mut fb = blank();
        fb.draw_sprite(60, 0, &[0xff]);
        assert_eq!(fb.as_bytes()[7], 0x0f);
        // first byte of row 1
        assert_eq!(fb.as_bytes()[8], 0xf0);
    }

    #[test]
    fn test_draw_past_end_is_dropped() {
        let mut fb = blank();
        let flag = fb.draw_sprite(63, 31, &[0xff, 0xff]);
        assert!(!flag);
        assert_eq!(fb.as_bytes()[SCREEN_BUFFER_SIZE - 1], 0b00000001);
    }

    #[test]
    fn test_draw_multi_line() {
        let mut fb = blank();
        let sprite = [0b10101011, 0b11101011, 0b10111011];
        fb.draw_sprite(8, 2, &sprite);
        let target = (8 + 2 * SCREEN_WIDTH) / 8;
        let row = SCREEN_WIDTH / 8;
        assert_eq!(fb.as_bytes()[target - row], 0x0);
        assert_eq!(fb.as_bytes()[target], 0b10101011);
        assert_eq!(fb.as_bytes()[target + row], 0b11101011);
        assert_eq!(fb.as_bytes()[target + 2 * row], 0b10111011);
        assert_eq!(fb.as_bytes()[target + 3 * row], 0x0);
    }

    #[test]
    fn test_draw_twice_restores() {
        let mut fb = blank();
        fb.bytes[20] = 0x5a;
        let before = fb.bytes;
        let sprite = [0xf0, 0x90, 0xf0];
        assert!(!fb.draw_sprite(13, 1, &sprite));
        assert!(fb.draw_sprite(13, 1, &sprite));
        assert_eq!(fb.bytes, before);
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new([0xff; SCREEN_BUFFER_SIZE]);
        fb.clear();
        assert_eq!(fb.as_bytes(), &[0; SCREEN_BUFFER_SIZE][..]);
    }

    #[test]
    fn test_snapshot() {
        let mut fb = blank();
        fb.draw_sprite(3, 5, &[0b10000001]);
        let grid = fb.snapshot();
        assert!(grid[5][3]);
        assert!(grid[5][10]);
        assert!(!grid[5][4]);
        assert_eq!(grid.iter().flatten().filter(|&&p| p).count(), 2);
    }

    #[test]
    fn test_view_over_slice() {
        let mut ram = [0u8; 300];
        Framebuffer::new(&mut ram[44..]).draw_sprite(0, 0, &[0x80]);
        assert_eq!(ram[44], 0x80);
        assert!(Framebuffer::new(&ram[44..]).pixel(0, 0));
    }
}
