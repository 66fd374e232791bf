use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use warp_core::{AlgoTag, AutoMode, ChkKind, DecodeOptions, EncodeOptions};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Raise default log verbosity to `info` (RUST_LOG still takes priority)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file into a .warp container
    Compress {
        input: PathBuf,

        /// Output path (defaults to the input path with `.warp` appended)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, default_value_t = 1)]
        threads: usize,

        /// Zstd compression level; ignored by lz4 and snappy
        #[arg(short, long, default_value_t = 1)]
        level: i32,

        /// Pin a single codec instead of auto-selecting: zstd, lz4, or snappy
        #[arg(long)]
        algo: Option<String>,

        /// Override the chunk-size policy (bytes); 0 consults the policy table
        #[arg(long, default_value_t = 0)]
        chunk_bytes: u32,

        /// Warm-up scoring rule: throughput, balanced, or ratio
        #[arg(long, default_value = "balanced")]
        auto_mode: String,

        /// Number of chunks sampled during warm-up before locking an algorithm
        #[arg(long, default_value_t = 4)]
        auto_lock: usize,

        /// Skip writing the redundant trailing index block
        #[arg(long)]
        no_index: bool,

        /// Append an xxh64 checksum block covering the original input
        #[arg(long)]
        checksum: bool,
    },

    /// Decompress a .warp container back to its original bytes
    Decompress {
        input: PathBuf,

        /// Output path (defaults to the input path with `.warp` stripped)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, default_value_t = 1)]
        threads: usize,

        /// Fail if a stored checksum does not match the decoded output
        #[arg(long)]
        verify: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .init();

    match args.command {
        Command::Compress {
            input,
            output,
            threads,
            level,
            algo,
            chunk_bytes,
            auto_mode,
            auto_lock,
            no_index,
            checksum,
        } => {
            let output = output.unwrap_or_else(|| {
                let mut p = input.clone().into_os_string();
                p.push(".warp");
                PathBuf::from(p)
            });

            let opts = EncodeOptions {
                threads,
                level,
                algo: algo.as_deref().map(parse_algo).transpose()?,
                chunk_bytes,
                auto_mode: parse_auto_mode(&auto_mode)?,
                auto_lock,
                do_index: !no_index,
                chk_kind: if checksum { ChkKind::Xxh64 } else { ChkKind::None },
                verbose: args.verbose,
            };

            let pb = spinner(&format!("compressing {}", input.display()));
            let report = warp_core::compress(&input, &output, &opts)
                .with_context(|| format!("failed to compress {}", input.display()))?;
            pb.finish_and_clear();

            let ratio = if report.orig_size > 0 {
                report.comp_size as f64 / report.orig_size as f64
            } else {
                0.0
            };
            println!(
                "{} -> {} ({} chunks, base algo {}, {:.1}% of original{}{})",
                input.display(),
                output.display(),
                report.chunk_count,
                report.base_algo.name(),
                ratio * 100.0,
                if report.wrote_index { ", index" } else { "" },
                if report.wrote_checksum { ", checksum" } else { "" },
            );
        }

        Command::Decompress {
            input,
            output,
            threads,
            verify,
        } => {
            let output = output.unwrap_or_else(|| {
                let s = input.to_string_lossy();
                match s.strip_suffix(".warp") {
                    Some(stripped) => PathBuf::from(stripped),
                    None => PathBuf::from(format!("{s}.out")),
                }
            });

            let opts = DecodeOptions {
                threads,
                verify,
                verbose: args.verbose,
            };

            let pb = spinner(&format!("decompressing {}", input.display()));
            let report = warp_core::decompress(&input, &output, &opts)
                .with_context(|| format!("failed to decompress {}", input.display()))?;
            pb.finish_and_clear();

            println!(
                "{} -> {} ({} chunks, {} bytes{})",
                input.display(),
                output.display(),
                report.chunk_count,
                report.orig_size,
                match report.checksum_verified {
                    Some(true) => ", checksum OK",
                    Some(false) => ", checksum MISMATCH",
                    None => "",
                },
            );
        }
    }

    Ok(())
}

fn parse_algo(s: &str) -> Result<AlgoTag> {
    match s.to_ascii_lowercase().as_str() {
        "zstd" => Ok(AlgoTag::Zstd),
        "lz4" => Ok(AlgoTag::Lz4),
        "snappy" => Ok(AlgoTag::Snappy),
        other => bail!("unknown --algo '{other}', expected zstd, lz4, or snappy"),
    }
}

fn parse_auto_mode(s: &str) -> Result<AutoMode> {
    match s.to_ascii_lowercase().as_str() {
        "throughput" => Ok(AutoMode::Throughput),
        "balanced" => Ok(AutoMode::Balanced),
        "ratio" => Ok(AutoMode::Ratio),
        other => bail!("unknown --auto-mode '{other}', expected throughput, balanced, or ratio"),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb
}
