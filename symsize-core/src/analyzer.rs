//! 解析のメインロジック

use crate::{aggregate, reduce, AnalysisError, CorpusReport, FileReport, SkippedFile};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use symsize_demangle::{build_demangler, Demangle, DemangleRules, DemanglerKind};
use symsize_elf::{BackendConfig, BackendSelector, BinaryImage, Extraction};
use tracing::{info, warn};

/// 解析の設定
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub backends: BackendConfig,
    pub demangler: DemanglerKind,
    pub rules: DemangleRules,
    /// ファイルを並列に解析するかどうか
    pub parallel: bool,
}

/// アナライザ
///
/// ファイルごとに抽出、デマングル、集計を完結させ、最後に合算します。
/// ファイル間で共有する可変状態はありません。
pub struct Analyzer {
    /// バックエンドセレクタ
    selector: BackendSelector,
    /// デマングラ
    demangler: Box<dyn Demangle>,
    parallel: bool,
}

impl Analyzer {
    /// 設定からアナライザを作成する
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            selector: BackendSelector::from_config(&config.backends),
            demangler: build_demangler(config.demangler, config.rules),
            parallel: config.parallel,
        }
    }

    /// 1ファイルを解析する
    ///
    /// 開けないファイル、および既知の形式でなくどのバックエンドも
    /// シンボルを出せなかったファイルは `UnreadableFile` になります。
    /// バイナリとして読めてシンボルが取れないだけなら、シンボル0件のレポートを返します。
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<FileReport, AnalysisError> {
        let path = path.as_ref();
        let image = BinaryImage::load(path).map_err(|e| AnalysisError::unreadable(path, e.to_string()))?;

        let extraction = self.selector.select(&image);
        if let Extraction::Unavailable { failures } = &extraction {
            if !image.is_recognized() {
                let reasons: Vec<String> = failures.iter().map(|f| f.to_string()).collect();
                return Err(AnalysisError::unreadable(
                    path,
                    format!("not a recognized binary ({})", reasons.join("; ")),
                ));
            }
        }

        let report = aggregate(&image, extraction, self.demangler.as_ref());
        info!(
            "{}: {} bytes, {} symbols ({} bytes) via {}",
            path.display(),
            report.file_size_bytes,
            report.symbol_count,
            report.total_symbol_bytes(),
            report.backend.unwrap_or("no backend")
        );
        Ok(report)
    }

    /// 複数ファイルを解析してコーパスレポートを作る
    ///
    /// 入力が空なら `NoInputFiles`。個々のファイルの失敗はスキップとして
    /// レポートに記録し、実行は続けます。ファイル別レポートは入力順です。
    pub fn analyze(&self, paths: &[PathBuf]) -> Result<CorpusReport, AnalysisError> {
        if paths.is_empty() {
            return Err(AnalysisError::NoInputFiles);
        }
        info!(
            "Analyzing {} file(s) with the {} demangler, backends: {}",
            paths.len(),
            self.demangler.kind(),
            self.selector.backend_names().join(", ")
        );

        let outcomes: Vec<Result<FileReport, AnalysisError>> = if self.parallel {
            paths.par_iter().map(|path| self.analyze_file(path)).collect()
        } else {
            paths.iter().map(|path| self.analyze_file(path)).collect()
        };

        let mut reports = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(report) => reports.push(report),
                Err(e) => {
                    warn!("Skipping file: {}", e);
                    skipped.push(SkippedFile::from(e));
                }
            }
        }

        let mut corpus = reduce(&reports);
        corpus.skipped = skipped;
        Ok(corpus)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
