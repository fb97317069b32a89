mod collector;
mod pipeline;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use h2push_manifest::Config;
use log::debug;
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "h2push")]
#[command(about = "Tools for HTTP/2 server push", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a push manifest for a web application
    Manifest(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Manifest(cfg) => {
            let num_threads = rayon::current_num_threads();

            let run = match pipeline::generate(&cfg) {
                Ok(run) => run,
                Err(e) => {
                    writeln!(stdout, "{} {:#}", "✗".red().bold(), e)?;
                    stdout.flush()?;

                    // Non-zero exit to fail CI
                    std::process::exit(1);
                }
            };

            let written_to = pipeline::emit(&run, cfg.dry_run, &mut stdout)?;
            if run.manifest.resource_count() == 0 {
                h2push_manifest::print_empty_manifest_message(&mut stdout, written_to)?;
            } else {
                h2push_manifest::print_manifest_tree(&mut stdout, &run.manifest, written_to)?;
            }

            let elapsed_ms = start.elapsed().as_millis();
            writeln!(
                stdout,
                "\n{} Finished in {}ms on {} files (using {} threads).",
                "●".bright_blue(),
                elapsed_ms.to_string().cyan(),
                run.files_read.to_string().cyan(),
                num_threads.to_string().cyan()
            )?;
            stdout.flush()?;

            Ok(())
        }
    }
}
