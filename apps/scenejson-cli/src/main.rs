use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use scenejson_codec::{
    Decoded, FloatMode, ReaderOptions, WorldReader, WorldWriter, WriterOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scenejson", about = "Inspect, validate and convert scene documents")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ReadArgs {
    /// Scene document to read
    input: PathBuf,
    /// Fail on the first inconsistency instead of skipping it
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct WriteArgs {
    /// Write floats as decimals instead of hex bit patterns
    #[arg(long)]
    human_readable: bool,
    /// Write the document on a single line
    #[arg(long)]
    compact_text: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a summary of a scene document
    Info {
        #[command(flatten)]
        read: ReadArgs,
    },
    /// Report every inconsistency in a scene document
    Validate {
        #[command(flatten)]
        read: ReadArgs,
    },
    /// Re-encode a scene document
    Convert {
        #[command(flatten)]
        read: ReadArgs,
        /// Destination file
        output: PathBuf,
        #[command(flatten)]
        write: WriteArgs,
    },
    /// Check that a document survives write and read unchanged
    Roundtrip {
        #[command(flatten)]
        read: ReadArgs,
        #[command(flatten)]
        write: WriteArgs,
    },
}

impl ReadArgs {
    fn load(&self) -> anyhow::Result<Decoded> {
        let reader = WorldReader::new(ReaderOptions {
            strict: self.strict,
        });
        reader
            .read_file(&self.input)
            .with_context(|| format!("reading {}", self.input.display()))
    }
}

impl WriteArgs {
    fn writer(&self) -> WorldWriter {
        WorldWriter::new(WriterOptions {
            float_mode: if self.human_readable {
                FloatMode::HumanReadable
            } else {
                FloatMode::Compact
            },
            pretty: !self.compact_text,
        })
    }
}

fn print_diagnostics(decoded: &Decoded) {
    for diagnostic in &decoded.diagnostics {
        println!("  warning: {diagnostic}");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info { read } => {
            let decoded = read.load()?;
            let scene = &decoded.scene;
            println!("{}", read.input.display());
            println!("{}", scene.summary());
            println!(
                "gravity=({}, {}) named={} with-properties={}",
                scene.world.gravity.x,
                scene.world.gravity.y,
                scene.names.len(),
                scene.properties.entity_count()
            );
            if !decoded.is_clean() {
                println!("{} warnings:", decoded.diagnostics.len());
                print_diagnostics(&decoded);
            }
        }
        Commands::Validate { read } => {
            let decoded = read.load()?;
            if decoded.is_clean() {
                println!("{}: OK", read.input.display());
            } else {
                println!("{}:", read.input.display());
                print_diagnostics(&decoded);
                bail!("{} inconsistencies found", decoded.diagnostics.len());
            }
        }
        Commands::Convert {
            read,
            output,
            write,
        } => {
            let decoded = read.load()?;
            write
                .writer()
                .write_file(&decoded.scene, &output)
                .with_context(|| format!("writing {}", output.display()))?;
            let summary = decoded.scene.summary();
            println!(
                "{} -> {}: bodies={} joints={} images={}",
                read.input.display(),
                output.display(),
                summary.bodies(),
                summary.joints(),
                summary.images
            );
        }
        Commands::Roundtrip { read, write } => {
            let first = read.load()?;
            let text = write.writer().write_string(&first.scene)?;
            let second = WorldReader::strict()
                .read_str(&text)
                .context("re-reading the written document")?;
            let before = first.scene.world.fingerprint();
            let after = second.scene.world.fingerprint();
            println!("before: {before:#018x}");
            println!("after:  {after:#018x}");
            if before != after {
                bail!("round trip changed the scene");
            }
            println!("Match: OK ({} bytes)", text.len());
        }
    }

    Ok(())
}
