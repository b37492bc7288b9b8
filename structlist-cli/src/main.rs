use anyhow::Result;
use clap::{Parser, Subcommand};
use structlist_cli::{commands, ElementKind, FieldSpec};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "structlist")]
#[command(about = "Structlist - Replay list operations against typed list fields", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script, printing both views after each step
    Replay {
        /// Input JSON script ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Declared element type of the field
        #[arg(short = 't', long = "type", value_enum, default_value = "int")]
        kind: ElementKind,

        /// Variant names for --type enum
        #[arg(long, value_delimiter = ',')]
        enum_variants: Vec<String>,

        /// Output JSON file for the replay report
        #[arg(short, long)]
        output: Option<String>,

        /// Continue past failing steps
        #[arg(long)]
        keep_going: bool,
    },

    /// Replay a script and check the views stay synchronized
    Verify {
        /// Input JSON script ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Declared element type of the field
        #[arg(short = 't', long = "type", value_enum, default_value = "int")]
        kind: ElementKind,

        /// Variant names for --type enum
        #[arg(long, value_delimiter = ',')]
        enum_variants: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Replay {
            input,
            kind,
            enum_variants,
            output,
            keep_going,
        } => {
            let spec = FieldSpec {
                kind,
                enum_variants,
            };
            commands::replay::execute(&input, &spec, output.as_deref(), keep_going)
        }

        Commands::Verify {
            input,
            kind,
            enum_variants,
        } => {
            let spec = FieldSpec {
                kind,
                enum_variants,
            };
            commands::verify::execute(&input, &spec)
        }
    }
}
