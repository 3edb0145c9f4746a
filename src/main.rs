//! asmconv renders assembler operand listings and names register ids.

extern crate ansi_term;
extern crate asmconvlib;
extern crate getopts;
extern crate itertools;

use ansi_term::Colour::Red;
use asmconvlib::backend::{self, Backend};
use asmconvlib::bio::BioWriter;
use asmconvlib::env::{self, TargetConfig};
use asmconvlib::registry::{self, RegSpace};
use getopts::{Matches, Options};
use itertools::Itertools;
use std::io::{self, Write};
use std::sync::Arc;

fn print_usage(bin_name: &str, opts: Options) {
    let brief = format!("Usage: {} [options] LISTING...", bin_name);
    print!("{}", opts.usage(&brief));
}

fn report(message: &str) {
    eprintln!("{} {}", Red.bold().paint("error:"), message);
}

fn render_listings<W: Write>(
    files: &[String],
    regs: &RegSpace,
    do_verbose: bool,
    out: &mut BioWriter<W>,
) -> Result<(), String> {
    for path in files {
        let count = asmconvlib::render_file(path, regs, do_verbose, out)?;
        if do_verbose {
            eprintln!("Rendered {} operands from {} in {:.3}s", count, path, env::cputime());
        }
    }
    Ok(())
}

fn list_registers(backends: &[Arc<dyn Backend>], regs: &RegSpace) {
    for backend in backends {
        let (lo, hi) = backend.register_range();
        for reg in lo..hi {
            let name = regs.resolve_name(reg);
            if !name.starts_with("Rgok") {
                println!("{}\t{}\t{}", reg, backend.arch(), name);
            }
        }
    }
}

fn run(matches: &Matches, config: &TargetConfig, backends: &[Arc<dyn Backend>]) -> Result<(), String> {
    let do_verbose = matches.opt_present("verbose");

    let regs = backend::register_backends(backends).map_err(|e| e.to_string())?;
    if do_verbose {
        eprintln!("Target {}/{} (arm v{})", config.os, config.arch, config.arm_version());
        for (backend, (lo, hi)) in backends.iter().zip(regs.ranges()) {
            eprintln!("Registered {} registers [{}, {})", backend.arch(), lo, hi);
        }
    }
    if registry::install(regs).is_err() {
        return Err("register registry already installed".to_string());
    }
    let regs = registry::global().ok_or_else(|| "register registry missing".to_string())?;

    if matches.opt_present("list-registers") {
        list_registers(backends, regs);
    }

    for id in matches.opt_strs("reg") {
        let reg = id.trim().parse::<i32>().map_err(|_| format!("invalid register id: {}", id))?;
        println!("{}", registry::rconv(reg));
    }

    if matches.free.is_empty() {
        return Ok(());
    }
    match matches.opt_str("output") {
        Some(path) => {
            let mut out = BioWriter::create(&path).map_err(|e| format!("{}: {}", path, e))?;
            render_listings(&matches.free, regs, do_verbose, &mut out)?;
            out.term().map(|_| ()).map_err(|e| format!("{}: {}", path, e))
        }
        None => {
            let stdout = io::stdout();
            let mut out = BioWriter::new(stdout.lock());
            render_listings(&matches.free, regs, do_verbose, &mut out)?;
            out.term().map(|_| ()).map_err(|e| format!("{}", e))
        }
    }
}

fn main() {
    env::start_clock();
    let args: Vec<_> = std::env::args().collect();

    let mut opts = Options::new();

    opts.optflag("h", "help", "print usage");
    opts.optflag("v", "version", "print asmconv version");
    opts.optflag("", "verbose", "report progress on stderr");
    opts.optflag("", "list-registers", "print every named register id");
    opts.optflag("", "env", "print the toolchain environment");
    opts.optopt("o", "output", "write rendered operands to FILE (default: stdout)", "FILE");
    opts.optmulti("", "reg", "print the name of register ID", "ID");

    backend::register_cli_options(&mut opts);

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            report(&e.to_string());
            print_usage(&args[0], opts);
            std::process::exit(1);
        }
    };

    if matches.opt_present("h") {
        print_usage(&args[0], opts);
        return;
    }

    if matches.opt_present("v") {
        println!("asmconv {}", env::version());
        return;
    }

    let config = TargetConfig::from_env();

    if matches.opt_present("env") {
        println!("{}", config.describe().iter().join("\n"));
        return;
    }

    let has_work = !matches.free.is_empty()
        || matches.opt_present("list-registers")
        || matches.opt_present("reg");
    if !has_work {
        print_usage(&args[0], opts);
        std::process::exit(1);
    }

    let backends = match backend::init_from_cli_options(&matches, &config) {
        Ok(backends) => backends,
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&matches, &config, &backends) {
        report(&e);
        std::process::exit(2);
    }
}
