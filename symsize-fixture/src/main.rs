//! symsize-fixture - 合成ELFフィクスチャを書き出す

use anyhow::Result;
use clap::Parser;
use symsize_fixture::generated_classes;

/// Write a synthetic AOT-style ELF object for exercising symsize
#[derive(Parser)]
#[command(name = "symsize-fixture")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output path, e.g. libaot-GeneratedClasses.dll.so
    output: String,

    /// Number of generated classes
    #[arg(short, long, default_value_t = 100)]
    classes: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let builder = generated_classes(cli.classes);
    builder.write_to(&cli.output)?;
    println!(
        "Wrote {} symbols ({} bytes of code and data) to {}",
        builder.symbol_count(),
        builder.total_size(),
        cli.output
    );
    Ok(())
}
