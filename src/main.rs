use clap::Parser;
use log::{error, LevelFilter};
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use chip8_vm::config::{Config, OpcodePolicy, ShiftMode};
use chip8_vm::display::MonoTermDisplay;
use chip8_vm::environment::{Environment, DEFAULT_SPEED};
use chip8_vm::input::{TermInput, DEFAULT_HOLD};
use chip8_vm::interpreter::Chip8Interpreter;
use chip8_vm::sound::{Mute, SimpleBeep, Sound};

mod logger;

#[derive(Parser, Debug)]
#[command(name = "chip8-vm", about = "Run a CHIP-8 program in the terminal.")]
struct Args {
    /// program image, loaded verbatim at 0x200
    rom: PathBuf,

    /// instructions per 60Hz frame
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    speed: u32,

    /// 8XY6/8XYE shift VY into VX, as on the COSMAC VIP
    #[arg(long)]
    legacy_shift: bool,

    /// stop on unknown opcodes instead of skipping them
    #[arg(long)]
    strict: bool,

    /// seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// no beeps
    #[arg(long)]
    mute: bool,

    /// write log records here; nothing is logged without it
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    /// stop after this many frames
    #[arg(long)]
    frames: Option<u64>,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::default();
        if self.legacy_shift {
            config = config.with_shift(ShiftMode::CopyVy);
        }
        if self.strict {
            config = config.with_unknown_opcodes(OpcodePolicy::Strict);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        logger::init(path, args.log_level)?;
    }

    // load the program before touching the terminal, so a bad image is
    // reported normally
    let mut f = File::open(&args.rom)?;
    let interpreter = Chip8Interpreter::from_reader(&mut f, args.config())?;

    let result = if args.mute {
        run(interpreter, &mut Mute::new(), &args)
    } else {
        run(interpreter, &mut SimpleBeep::new(), &args)
    };

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..4 {
        println!();
    }
    if let Err(e) = &result {
        error!("{}", e);
    }
    result
}

fn run(interpreter: Chip8Interpreter, sound: &mut impl Sound, args: &Args) -> Result<(), Box<dyn Error>> {
    let mut display = MonoTermDisplay::new()?;
    let mut input = TermInput::new(DEFAULT_HOLD)?;
    let mut env = Environment::new(interpreter, &mut display, &mut input, sound, args.speed);
    env.main_loop(args.frames)?;
    Ok(())
}
