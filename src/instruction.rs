/// One decoded CHIP-8 instruction. `x` / `y` are register numbers, `nnn` an
/// address, `nn` a byte and `n` a nibble, as in the usual opcode notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump { nnn: u16 },
    /// 2NNN
    Call { nnn: u16 },
    /// 3XNN
    SkipEqImm { x: u8, nn: u8 },
    /// 4XNN
    SkipNeImm { x: u8, nn: u8 },
    /// 5XY0
    SkipEqReg { x: u8, y: u8 },
    /// 6XNN
    LoadImm { x: u8, nn: u8 },
    /// 7XNN
    AddImm { x: u8, nn: u8 },
    /// 8XY0
    Move { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    Add { x: u8, y: u8 },
    /// 8XY5
    Sub { x: u8, y: u8 },
    /// 8XY6
    ShiftRight { x: u8, y: u8 },
    /// 8XY7
    SubReversed { x: u8, y: u8 },
    /// 8XYE
    ShiftLeft { x: u8, y: u8 },
    /// 9XY0
    SkipNeReg { x: u8, y: u8 },
    /// ANNN
    LoadIndex { nnn: u16 },
    /// BNNN
    JumpOffset { nnn: u16 },
    /// CXNN
    Random { x: u8, nn: u8 },
    /// DXYN
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E
    SkipKeyDown { x: u8 },
    /// EXA1
    SkipKeyUp { x: u8 },
    /// FX07
    LoadDelay { x: u8 },
    /// FX0A
    WaitKey { x: u8 },
    /// FX15
    SetDelay { x: u8 },
    /// FX18
    SetSound { x: u8 },
    /// FX1E
    AddIndex { x: u8 },
    /// FX29
    LoadGlyph { x: u8 },
    /// FX33
    StoreBcd { x: u8 },
    /// FX55
    StoreRegs { x: u8 },
    /// FX65
    LoadRegs { x: u8 },
    /// anything else, including 0NNN machine routines
    Unknown(u16),
}

impl Instruction {
    /// Decode a big-endian opcode. Families 0, 8, E and F share a high nibble
    /// between several instructions and are split on the low byte or nibble;
    /// every other family is a single instruction.
    pub fn decode(opcode: u16) -> Instruction {
        use Instruction::*;

        let x = ((opcode >> 8) & 0xf) as u8;
        let y = ((opcode >> 4) & 0xf) as u8;
        let nnn = opcode & 0x0fff;
        let nn = (opcode & 0xff) as u8;
        let n = (opcode & 0xf) as u8;

        match opcode >> 12 {
            0x0 => match opcode {
                0x00e0 => ClearScreen,
                0x00ee => Return,
                _ => Unknown(opcode),
            },
            0x1 => Jump { nnn },
            0x2 => Call { nnn },
            0x3 => SkipEqImm { x, nn },
            0x4 => SkipNeImm { x, nn },
            0x5 => SkipEqReg { x, y },
            0x6 => LoadImm { x, nn },
            0x7 => AddImm { x, nn },
            0x8 => match n {
                0x0 => Move { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => Add { x, y },
                0x5 => Sub { x, y },
                0x6 => ShiftRight { x, y },
                0x7 => SubReversed { x, y },
                0xe => ShiftLeft { x, y },
                _ => Unknown(opcode),
            },
            0x9 => SkipNeReg { x, y },
            0xa => LoadIndex { nnn },
            0xb => JumpOffset { nnn },
            0xc => Random { x, nn },
            0xd => Draw { x, y, n },
            0xe => match nn {
                0x9e => SkipKeyDown { x },
                0xa1 => SkipKeyUp { x },
                _ => Unknown(opcode),
            },
            0xf => match nn {
                0x07 => LoadDelay { x },
                0x0a => WaitKey { x },
                0x15 => SetDelay { x },
                0x18 => SetSound { x },
                0x1e => AddIndex { x },
                0x29 => LoadGlyph { x },
                0x33 => StoreBcd { x },
                0x55 => StoreRegs { x },
                0x65 => LoadRegs { x },
                _ => Unknown(opcode),
            },
            _ => unreachable!("a u16 has only 16 high nibbles"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn test_decode_single_families() {
        assert_eq!(Instruction::decode(0x1a5f), Jump { nnn: 0xa5f });
        assert_eq!(Instruction::decode(0x2300), Call { nnn: 0x300 });
        assert_eq!(Instruction::decode(0x3c42), SkipEqImm { x: 0xc, nn: 0x42 });
        assert_eq!(Instruction::decode(0x4c42), SkipNeImm { x: 0xc, nn: 0x42 });
        assert_eq!(Instruction::decode(0x62c5), LoadImm { x: 2, nn: 0xc5 });
        assert_eq!(Instruction::decode(0x7411), AddImm { x: 4, nn: 0x11 });
        assert_eq!(Instruction::decode(0xa2c5), LoadIndex { nnn: 0x2c5 });
        assert_eq!(Instruction::decode(0xb123), JumpOffset { nnn: 0x123 });
        assert_eq!(Instruction::decode(0xc70f), Random { x: 7, nn: 0x0f });
        assert_eq!(Instruction::decode(0xd01f), Draw { x: 0, y: 1, n: 0xf });
    }

    // 5XY? and 9XY? match whatever the low nibble is
    #[test]
    fn test_decode_reg_compare_ignores_low_nibble() {
        assert_eq!(Instruction::decode(0x5120), SkipEqReg { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x5121), SkipEqReg { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x9ab0), SkipNeReg { x: 0xa, y: 0xb });
    }

    #[test]
    fn test_decode_family_0() {
        assert_eq!(Instruction::decode(0x00e0), ClearScreen);
        assert_eq!(Instruction::decode(0x00ee), Return);
        assert_eq!(Instruction::decode(0x0123), Unknown(0x0123));
        assert_eq!(Instruction::decode(0x0000), Unknown(0x0000));
    }

    #[test]
    fn test_decode_family_8() {
        assert_eq!(Instruction::decode(0x8120), Move { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8121), Or { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8122), And { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8123), Xor { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8124), Add { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8125), Sub { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8126), ShiftRight { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8127), SubReversed { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x812e), ShiftLeft { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8128), Unknown(0x8128));
    }

    #[test]
    fn test_decode_family_e_and_f() {
        assert_eq!(Instruction::decode(0xe39e), SkipKeyDown { x: 3 });
        assert_eq!(Instruction::decode(0xe3a1), SkipKeyUp { x: 3 });
        assert_eq!(Instruction::decode(0xe30e), Unknown(0xe30e));
        assert_eq!(Instruction::decode(0xf507), LoadDelay { x: 5 });
        assert_eq!(Instruction::decode(0xf50a), WaitKey { x: 5 });
        assert_eq!(Instruction::decode(0xf515), SetDelay { x: 5 });
        assert_eq!(Instruction::decode(0xf518), SetSound { x: 5 });
        assert_eq!(Instruction::decode(0xf51e), AddIndex { x: 5 });
        assert_eq!(Instruction::decode(0xf529), LoadGlyph { x: 5 });
        assert_eq!(Instruction::decode(0xf533), StoreBcd { x: 5 });
        assert_eq!(Instruction::decode(0xf555), StoreRegs { x: 5 });
        assert_eq!(Instruction::decode(0xf565), LoadRegs { x: 5 });
        assert_eq!(Instruction::decode(0xf5ff), Unknown(0xf5ff));
    }
}
