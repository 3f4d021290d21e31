/// Interpreter behaviour that differs between historical CHIP-8 machines, plus
/// how strict to be about opcodes we don't recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub shift: ShiftMode,
    pub unknown_opcodes: OpcodePolicy,
    /// fixed seed for `CXNN`; `None` seeds from the OS
    pub seed: Option<u64>,
}

/// which register `8XY6` / `8XYE` shift. Either way VF is written after the
/// result, so with X = F the shifted-out bit is what VF ends up holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftMode {
    /// `VX := VX >> 1` (and `<< 1`); what most modern programs expect
    #[default]
    InPlace,
    /// COSMAC VIP: `VX := VY >> 1` (and `<< 1`)
    CopyVy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpcodePolicy {
    /// treat as a no-op; counted and logged
    #[default]
    Ignore,
    /// fail the step with `Chip8Error::UnknownOpcode`
    Strict,
}

impl Config {
    pub fn with_shift(mut self, shift: ShiftMode) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_unknown_opcodes(mut self, policy: OpcodePolicy) -> Self {
        self.unknown_opcodes = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// shorthand used by tests and validation runs
    pub fn strict() -> Self {
        Config::default().with_unknown_opcodes(OpcodePolicy::Strict)
    }
}
