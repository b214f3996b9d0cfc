//! CLI tool for partstream operations.

mod commands;
mod exit_codes;
mod output;
mod progress;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// Read split files as one seekable stream
#[derive(Parser)]
#[command(name = "partstream")]
#[command(author, version, about = "Read split files as one seekable stream", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the parts of a split set (alias: i)
    #[command(alias = "i")]
    Info {
        /// First part (e.g. backup.tar.001)
        first: PathBuf,
    },

    /// Copy the joined stream, or a slice of it (alias: c)
    #[command(alias = "c")]
    Cat {
        /// First part (e.g. backup.tar.001)
        first: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Logical offset to start from
        #[arg(long, default_value = "0")]
        offset: u64,

        /// Maximum number of bytes to copy
        #[arg(short = 'n', long)]
        length: Option<u64>,
    },

    /// Compute the CRC-32 of the joined stream
    Checksum {
        /// First part (e.g. backup.tar.001)
        first: PathBuf,
    },

    /// Copy a single part in volume mode (alias: v)
    #[command(alias = "v")]
    Volume {
        /// First part (e.g. backup.tar.001)
        first: PathBuf,

        /// 0-based index of the part to copy
        #[arg(short = 'p', long)]
        part: usize,

        /// Output file (stdout if omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Info { first } => commands::info(&first, cli.format),

        Commands::Cat {
            first,
            output,
            offset,
            length,
        } => commands::cat(&commands::CatConfig {
            first: &first,
            output: output.as_deref(),
            offset,
            length,
            format: cli.format,
            quiet: cli.quiet,
        }),

        Commands::Checksum { first } => commands::checksum(&first, cli.format, cli.quiet),

        Commands::Volume {
            first,
            part,
            output,
        } => commands::volume(&first, part, output.as_deref(), cli.format, cli.quiet),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
