//! fmove - Command-line interface for the file transfer engine.
//!
//! Moves or copies a single file with progress reporting on stderr.
//! Ctrl-C requests cancellation through the progress observer; the engine
//! then reports the transfer as not completed instead of failing.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use clap::Parser;
use engine::{
    copy_file, files_match, move_file, ChecksumAlgorithm, ProgressNotification, ProgressObserver,
    TransferKind,
};
use tracing_subscriber::EnvFilter;

/// fmove - Move or copy a single file with progress tracking
#[derive(Parser, Debug)]
#[command(name = "fmove")]
#[command(version = "0.1.0")]
#[command(about = "Move or copy a single file with progress and cancellation")]
struct Args {
    /// Source file
    #[arg(long, value_name = "PATH")]
    src: PathBuf,

    /// Destination file
    #[arg(long, value_name = "PATH")]
    dst: PathBuf,

    /// Operation mode: copy or move
    #[arg(long, value_name = "MODE", default_value = "copy")]
    mode: String,

    /// Fail if the destination file already exists
    #[arg(long)]
    no_overwrite: bool,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,

    /// Verify source and destination contents after the transfer
    #[arg(long)]
    verify: bool,

    /// Checksum algorithm for verification: sha256 or blake3
    #[arg(long, value_name = "ALGORITHM", default_value = "sha256", requires = "verify")]
    hash: String,
}

/// stderr implementation of ProgressObserver with a throttled progress bar.
///
/// Cancellation flows in from the Ctrl-C handler via a shared flag; the
/// observer sets `cancelled` on the next notification it receives.
struct CliProgress {
    verbose: bool,
    cancel_requested: Arc<AtomicBool>,
    last_update: Mutex<Instant>,
}

impl CliProgress {
    fn new(verbose: bool, cancel_requested: Arc<AtomicBool>) -> Self {
        CliProgress {
            verbose,
            cancel_requested,
            last_update: Mutex::new(Instant::now()),
        }
    }

    fn format_bytes(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_idx = 0;

        while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
            size /= 1024.0;
            unit_idx += 1;
        }

        format!("{:.2} {}", size, UNITS[unit_idx])
    }

    fn print_progress_bar(percent: u32) -> String {
        let filled = (percent / 5) as usize;
        let empty = 20 - filled;
        format!("[{}{}] {}%", "=".repeat(filled), " ".repeat(empty), percent)
    }
}

impl ProgressObserver for CliProgress {
    fn on_progress(&self, update: &mut ProgressNotification) {
        if self.cancel_requested.load(Ordering::SeqCst) {
            update.cancelled = true;
        }

        // Throttle progress updates to avoid spam (max once per 200ms),
        // but always render the terminal notification
        if !update.is_complete() {
            let mut last = self.last_update.lock().unwrap();
            if last.elapsed().as_millis() < 200 {
                return;
            }
            *last = Instant::now();
        }

        let total_bytes = if update.total_bytes == 0 {
            1
        } else {
            update.total_bytes
        };
        let percent = (update.transferred_bytes as f64 / total_bytes as f64 * 100.0) as u32;

        eprint!(
            "\rProgress: {} | {}/{}",
            Self::print_progress_bar(percent),
            Self::format_bytes(update.transferred_bytes),
            Self::format_bytes(update.total_bytes)
        );
        let _ = std::io::Write::flush(&mut std::io::stderr());

        if self.verbose && update.is_complete() {
            eprintln!();
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "parsed arguments");

    let cancel_requested = Arc::new(AtomicBool::new(false));
    {
        let cancel_requested = Arc::clone(&cancel_requested);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nCancellation requested...");
                cancel_requested.store(true, Ordering::SeqCst);
            }
        });
    }

    let exit_code = match run_cli(&args, cancel_requested).await {
        Ok(true) => 0,
        Ok(false) => {
            eprintln!("\nTransfer did not complete (cancelled)");
            1
        }
        Err(msg) => {
            eprintln!("Error: {}", msg);
            2
        }
    };

    std::process::exit(exit_code);
}

/// Main CLI logic - separated for testability.
///
/// Returns Ok(true) on a completed transfer, Ok(false) when cancelled.
async fn run_cli(args: &Args, cancel_requested: Arc<AtomicBool>) -> Result<bool, String> {
    let kind = match args.mode.to_lowercase().as_str() {
        "copy" => TransferKind::Copy,
        "move" => TransferKind::Move,
        _ => {
            return Err(format!(
                "Invalid mode '{}'. Must be 'copy' or 'move'",
                args.mode
            ))
        }
    };

    let algorithm = if args.verify {
        match ChecksumAlgorithm::from_str(&args.hash) {
            Some(algo) => Some(algo),
            None => {
                return Err(format!(
                    "Invalid hash algorithm '{}'. Must be 'sha256' or 'blake3'",
                    args.hash
                ))
            }
        }
    } else {
        None
    };

    // For a verified move the source is gone afterwards, so capture its
    // checksum up front
    let source_checksum = match (algorithm, kind) {
        (Some(algo), TransferKind::Move) => Some(
            engine::compute_file_checksum(&args.src, algo)
                .map_err(|e| format!("Verification failed: {}", e))?,
        ),
        _ => None,
    };

    if args.verbose {
        eprintln!("Source: {}", args.src.display());
        eprintln!("Destination: {}", args.dst.display());
        eprintln!("Mode: {}", kind);
    }

    let observer: Arc<dyn ProgressObserver> =
        Arc::new(CliProgress::new(args.verbose, cancel_requested));
    let overwrite_existing = !args.no_overwrite;

    let started = Instant::now();
    let completed = match kind {
        TransferKind::Copy => copy_file(&args.src, &args.dst, Some(observer), overwrite_existing)
            .await
            .map_err(|e| e.to_string())?,
        TransferKind::Move => move_file(&args.src, &args.dst, Some(observer), overwrite_existing)
            .await
            .map_err(|e| e.to_string())?,
    };

    if !completed {
        return Ok(false);
    }

    eprintln!();
    eprintln!("Transfer complete in {:.2}s", started.elapsed().as_secs_f64());

    if let Some(algo) = algorithm {
        let matches = match (kind, &source_checksum) {
            (TransferKind::Move, Some(expected)) => {
                let actual = engine::compute_file_checksum(&args.dst, algo)
                    .map_err(|e| format!("Verification failed: {}", e))?;
                actual.hex() == expected.hex()
            }
            _ => files_match(&args.src, &args.dst, algo)
                .map_err(|e| format!("Verification failed: {}", e))?,
        };

        if matches {
            eprintln!("Verification ({}): OK", algo);
        } else {
            return Err(format!(
                "Verification ({}): source and destination checksums differ",
                algo
            ));
        }
    }

    Ok(true)
}
