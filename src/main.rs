extern crate getopts;
extern crate nes_rs;

use getopts::Options;
use nes_rs::io::errors::*;
use nes_rs::nes::nes::{RuntimeOptions, NES};
use nes_rs::nes::rom::Rom;
use std::env;

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options] ROM", program);
    print!("{}", opts.usage(&brief));
}

/// Initializes the emulator, loads the rom and decodes it. Returns an exit
/// code after which the program unwinds and stops executing.
fn init() -> i32 {
    let args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| String::from("nes-rs"));

    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optflag("v", "verbose", "display timestamped log messages");
    opts.optflag("d", "disassemble", "print the decoded PRG instruction stream");

    let matches = match opts.parse(args.iter().skip(1)) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("nes-rs: {}", e);
            return EXIT_INVALID_ARGUMENTS;
        },
    };

    if matches.opt_present("h") {
        print_usage(&program, &opts);
        return EXIT_SUCCESS;
    }

    let rom_path = match matches.free.first() {
        Some(path) => path.clone(),
        None => {
            print_usage(&program, &opts);
            return EXIT_INVALID_ARGUMENTS;
        },
    };

    let runtime_options = RuntimeOptions {
        verbose: matches.opt_present("v"),
    };

    let rom = match Rom::load(&rom_path) {
        Ok(rom) => rom,
        Err(e) => {
            eprintln!("nes-rs: {}: {}", rom_path, e);
            return match e {
                LoadError::Io(_) => EXIT_FAILURE,
                _ => EXIT_INVALID_ROM,
            };
        },
    };

    let mut nes = NES::new(runtime_options);
    if let Err(e) = nes.load(rom) {
        eprintln!("nes-rs: {}: {}", rom_path, e);
        return EXIT_DECODE_FAILURE;
    }

    if let Some(rom) = nes.rom() {
        println!("PRG: {} bytes, CHR: {} bytes, {} instructions",
                 rom.prg_len(), rom.chr_len(), rom.instructions().len());

        if matches.opt_present("d") {
            for instr in rom.instructions() {
                println!("{:04X}  {}  {}", instr.offset, instr.hex_bytes(), instr.disassemble());
            }
        }
    }

    EXIT_SUCCESS
}

/// Entry point of the program and wrapper of init. Takes the exit code returned
/// from init and exits with it.
fn main() {
    let exit_code = init();
    std::process::exit(exit_code); // Unwinding done, safe to exit.
}
