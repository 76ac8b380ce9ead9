//! adgr — dependency tracking and OmniBOR identity for build inputs.
//!
//! Stands in for the assembler front-end: the inputs named on the command
//! line are registered as dependencies of the target, then the requested
//! outputs (a make rule, OmniBOR documents) are produced exactly as they
//! would be at assembler finalization.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use adg_deps::{DependencyTracker, HashAlgorithm};

#[derive(Parser)]
#[command(name = "adgr", about = "Track build inputs and compute OmniBOR artifact ids", version)]
struct Cli {
    /// Write a make dependency rule to this file
    #[arg(long = "dep-file", value_name = "PATH")]
    dep_file: Option<PathBuf>,

    /// Rule target / output object name
    #[arg(long, default_value = "a.out", value_name = "NAME")]
    target: String,

    /// Store OmniBOR documents under this directory
    #[arg(long = "omnibor-dir", value_name = "DIR")]
    omnibor_dir: Option<PathBuf>,

    /// Which document flavours to write
    #[arg(long, value_enum, default_value = "both")]
    hash: HashChoice,

    /// Pre-existing OmniBOR id for an input: FILE=SHA1HEX[,SHA256HEX]
    #[arg(long = "note", value_name = "SPEC")]
    notes: Vec<String>,

    /// Input files, registered in order
    #[arg(required = true, value_name = "FILE")]
    inputs: Vec<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HashChoice {
    Sha1,
    Sha256,
    Both,
}

impl HashChoice {
    fn algorithms(self) -> &'static [HashAlgorithm] {
        match self {
            Self::Sha1 => &[HashAlgorithm::Sha1],
            Self::Sha256 => &[HashAlgorithm::Sha256],
            Self::Both => &[HashAlgorithm::Sha1, HashAlgorithm::Sha256],
        }
    }
}

/// Split a `--note` argument into its file and hex parts.
fn parse_note(spec: &str) -> Result<(&str, Option<&str>, Option<&str>)> {
    let (file, ids) = spec
        .split_once('=')
        .with_context(|| format!("--note '{spec}': expected FILE=SHA1HEX[,SHA256HEX]"))?;
    let (sha1, sha256) = match ids.split_once(',') {
        Some((sha1, sha256)) => (sha1, Some(sha256)),
        None => (ids, None),
    };
    let sha1 = (!sha1.is_empty()).then_some(sha1);
    for (hex, len) in [(sha1, 40), (sha256, 64)] {
        if let Some(hex) = hex {
            if hex.len() != len || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                bail!("--note '{spec}': '{hex}' is not a {len}-character hex id");
            }
        }
    }
    Ok((file, sha1, sha256))
}

fn path_bytes(path: &std::path::Path) -> Vec<u8> {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        path.as_os_str().as_bytes().to_vec()
    }
    #[cfg(not(unix))]
    {
        path.to_string_lossy().into_owned().into_bytes()
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let mut tracker = DependencyTracker::new();
    if let Some(dep_file) = &cli.dep_file {
        tracker.start_dependencies(dep_file);
    }
    if cli.omnibor_dir.is_some() {
        tracker.enable_omnibor();
    }

    for input in &cli.inputs {
        tracker.register_dependency(path_bytes(input));
    }
    for spec in &cli.notes {
        let (file, sha1, sha256) = parse_note(spec)?;
        tracker.add_note_section(
            file.as_bytes(),
            sha1.map(str::as_bytes),
            sha256.map(str::as_bytes),
        );
    }

    let mut failed = false;

    if let Err(e) = tracker.print_dependencies(cli.target.as_bytes()) {
        eprintln!("warning: {e}");
        failed = true;
    }

    if let Some(dir) = &cli.omnibor_dir {
        let root = path_bytes(dir);
        for &algo in cli.hash.algorithms() {
            match tracker.write_omnibor(algo, &root) {
                Ok(oid) => println!("{algo} {oid}"),
                Err(e) => {
                    eprintln!("warning: cannot write {algo} OmniBOR document: {e}");
                    println!("{algo} ");
                    failed = true;
                }
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}
