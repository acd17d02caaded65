//! symsize のコア機能
//!
//! このクレートは、シンボルサイズをソース上の論理単位（名前空間・型）に帰属させる
//! エンジンの中核を提供します。シンボル抽出、デマングル、ファイル単位の集計、
//! 複数ファイルの合算とランキングを統合します。

pub mod aggregate;
pub mod analyzer;
pub mod discover;
pub mod errors;
pub mod reduce;
pub mod report;

pub use aggregate::aggregate;
pub use analyzer::{Analyzer, AnalyzerConfig};
pub use discover::{assembly_name, discover_inputs, DiscoveryOptions};
pub use errors::AnalysisError;
pub use reduce::reduce;
pub use report::{rank, CorpusReport, FileReport, SkippedFile};

// 他のクレートから使用するために再エクスポート
pub use symsize_demangle::{Attribution, DemangleRules, DemanglerKind, NO_NAMESPACE};
pub use symsize_elf::{BackendConfig, BackendKind, SymbolKind, SymbolRecord};

/// コアの結果型
pub type Result<T> = anyhow::Result<T>;
