use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use regvm_decompiler::config::ConfigFile;
use regvm_decompiler::{decompile, recover_secret, DecompilerConfig, DecompilerConfigBuilder, Error};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "regvm-decompile", version, about)]
struct Args {
    /// Bytecode file to decompile
    bytecode: PathBuf,

    /// Length of the buffer read by `read_str`
    #[arg(long)]
    input_length: Option<usize>,

    /// Name of the input buffer in the pseudocode
    #[arg(long)]
    input_name: Option<String>,

    /// TOML config file; command-line flags take precedence over it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving disassembly.txt and pseudocode.c
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    /// Stop exploring after this many instruction steps
    #[arg(long)]
    step_budget: Option<usize>,

    /// Write a JSON exploration report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the secret spelled out by the `+ <code>` literals
    #[arg(long)]
    recover_secret: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn build_config(args: &Args) -> Result<DecompilerConfig, Error> {
    let from_file = match &args.config {
        Some(path) => ConfigFile::load(path)?.into_builder(),
        None => DecompilerConfigBuilder::default(),
    };

    let mut from_cli = DecompilerConfig::builder();
    if let Some(length) = args.input_length {
        from_cli = from_cli.input_length(length);
    }
    if let Some(name) = &args.input_name {
        from_cli = from_cli.input_name(name.clone());
    }
    if let Some(budget) = args.step_budget {
        from_cli = from_cli.step_budget(budget);
    }

    Ok(from_file.merge(from_cli).build()?)
}

fn run(args: &Args) -> Result<(), Error> {
    let config = build_config(args)?;
    let bytes = std::fs::read(&args.bytecode).map_err(|source| Error::Io {
        action: "read",
        path: args.bytecode.clone(),
        source,
    })?;

    let output = decompile(&bytes, &config)?;

    std::fs::create_dir_all(&args.out_dir).map_err(|source| Error::Io {
        action: "create",
        path: args.out_dir.clone(),
        source,
    })?;
    if let Some(disassembly) = &output.disassembly {
        write(&args.out_dir.join("disassembly.txt"), disassembly)?;
    }
    write(&args.out_dir.join("pseudocode.c"), &output.pseudocode)?;
    info!(out_dir = %args.out_dir.display(), "wrote artifacts");

    if let Some(path) = &args.report {
        write(path, &output.report.to_json()?)?;
    }

    if args.recover_secret {
        println!("{}", recover_secret(&output.pseudocode));
    }

    Ok(())
}

fn write(path: &Path, contents: &str) -> Result<(), Error> {
    std::fs::write(path, contents).map_err(|source| Error::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })
}
