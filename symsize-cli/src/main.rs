//! symsize CLI - コマンドラインインターフェース
//!
//! AOTコンパイルされたネイティブバイナリのサイズを名前空間・型に帰属させて表示する

mod report;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use report::RenderOptions;
use std::path::PathBuf;
use std::time::Duration;
use symsize_core::discover::DEFAULT_PATTERN;
use symsize_core::{
    discover_inputs, AnalysisError, Analyzer, AnalyzerConfig, BackendConfig, BackendKind, DemangleRules,
    DemanglerKind, DiscoveryOptions,
};
use tracing_subscriber::EnvFilter;

/// symsize - Native binary size attribution
#[derive(Parser)]
#[command(name = "symsize")]
#[command(version = "0.1.0")]
#[command(about = "Attribute the symbol sizes of AOT-compiled binaries to namespaces and types", long_about = None)]
struct Cli {
    /// Binary files, or directories to search for matching files
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Identifier splitting heuristic: roots (right-to-left split for known root names) or casing
    #[arg(long, default_value_t = DemanglerKind::KnownRoots)]
    demangler: DemanglerKind,

    /// Additional top-level root name for the roots heuristic (repeatable)
    #[arg(long = "root")]
    roots: Vec<String>,

    /// Do not use the built-in root names (System, Microsoft, ...)
    #[arg(long)]
    no_default_roots: bool,

    /// File name pattern (regex) used when searching directories
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Only search the top level of directories
    #[arg(long)]
    no_recursive: bool,

    /// Symbol backends to try, in order (repeatable; default: structured, readelf, nm)
    #[arg(long = "backend", value_enum)]
    backends: Vec<BackendArg>,

    /// Timeout in seconds for external tools
    #[arg(long, default_value_t = 30)]
    tool_timeout: u64,

    /// Number of namespaces to show
    #[arg(long, default_value_t = 20)]
    top_namespaces: usize,

    /// Number of types to show
    #[arg(long, default_value_t = 30)]
    top_types: usize,

    /// Show the largest sections of each file
    #[arg(long)]
    sections: bool,

    /// Analyze files in parallel
    #[arg(long)]
    parallel: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    /// Read the symbol table directly
    Structured,
    /// Parse `readelf -s -W`
    Readelf,
    /// Parse `nm --print-size`
    Nm,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Structured => BackendKind::Structured,
            BackendArg::Readelf => BackendKind::Readelf,
            BackendArg::Nm => BackendKind::Nm,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = DiscoveryOptions::new(&cli.pattern, !cli.no_recursive)?;
    let files = discover_inputs(&cli.paths, &options);
    if !files.is_empty() {
        println!("Found {} file(s) to analyze", files.len());
    }

    let analyzer = Analyzer::new(analyzer_config(&cli));
    let corpus = match analyzer.analyze(&files) {
        Ok(corpus) => corpus,
        Err(AnalysisError::NoInputFiles) => {
            eprintln!("No files matching '{}' found!", cli.pattern);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let render_options = RenderOptions {
        top_namespaces: cli.top_namespaces,
        top_types: cli.top_types,
        show_sections: cli.sections,
    };
    print!("{}", report::render(&corpus, &render_options));

    if corpus.per_file_reports.is_empty() {
        std::process::exit(2);
    }
    Ok(())
}

/// ログを初期化する（RUST_LOGが優先、なければ -v の回数で決める）
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// コマンドライン引数から解析設定を組み立てる
fn analyzer_config(cli: &Cli) -> AnalyzerConfig {
    let mut rules = DemangleRules::new();
    if cli.no_default_roots {
        rules = rules.without_roots();
    }
    for root in &cli.roots {
        rules = rules.with_root(root.clone());
    }

    let mut backends = BackendConfig {
        tool_timeout: Duration::from_secs(cli.tool_timeout),
        ..BackendConfig::default()
    };
    if !cli.backends.is_empty() {
        backends.order = cli.backends.iter().map(|b| BackendKind::from(*b)).collect();
    }

    AnalyzerConfig {
        backends,
        demangler: cli.demangler,
        rules,
        parallel: cli.parallel,
    }
}
