//! ファイル単位・コーパス全体のレポート

use crate::AnalysisError;
use std::collections::HashMap;
use std::path::PathBuf;

/// 1ファイル分の解析結果
///
/// `namespace_sizes` と `type_sizes` は同じシンボル群を独立に集計した2つの見方で、
/// 互いに足し合わせるものではありません。`section_sizes` も同様に独立です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub source_path: PathBuf,
    /// `libaot-<Assembly>.dll.so` から取り出したアセンブリ名
    pub assembly: String,
    pub file_size_bytes: u64,
    pub section_sizes: HashMap<String, u64>,
    /// 集計に含めたシンボル数
    pub symbol_count: usize,
    pub namespace_sizes: HashMap<String, u64>,
    /// キーは常に `namespace.type`
    pub type_sizes: HashMap<String, u64>,
    /// シンボルを出したバックエンド（どれも使えなければ `None`）
    pub backend: Option<&'static str>,
}

impl FileReport {
    /// 集計したシンボルサイズの合計
    pub fn total_symbol_bytes(&self) -> u64 {
        self.type_sizes.values().fold(0u64, |acc, size| acc.saturating_add(*size))
    }

    /// サイズの大きい順のセクション一覧
    pub fn ranked_sections(&self) -> Vec<(String, u64)> {
        rank(&self.section_sizes)
    }
}

/// 解析できずにスキップしたファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

impl From<AnalysisError> for SkippedFile {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::UnreadableFile { path, reason } => SkippedFile { path, reason },
            other => SkippedFile {
                path: PathBuf::new(),
                reason: other.to_string(),
            },
        }
    }
}

/// コーパス全体の合算結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusReport {
    pub total_namespace_sizes: HashMap<String, u64>,
    pub total_type_sizes: HashMap<String, u64>,
    /// 入力順のファイル別レポート
    pub per_file_reports: Vec<FileReport>,
    /// スキップしたファイル（シンボル0件のファイルとは区別される）
    pub skipped: Vec<SkippedFile>,
}

impl CorpusReport {
    /// 名前空間のランキング上位 `n` 件
    pub fn top_namespaces(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked = rank(&self.total_namespace_sizes);
        ranked.truncate(n);
        ranked
    }

    /// 型のランキング上位 `n` 件
    pub fn top_types(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked = rank(&self.total_type_sizes);
        ranked.truncate(n);
        ranked
    }

    /// ファイルサイズの大きい順（同サイズはパス順）
    pub fn files_by_size(&self) -> Vec<&FileReport> {
        let mut files: Vec<&FileReport> = self.per_file_reports.iter().collect();
        files.sort_by(|left, right| {
            right
                .file_size_bytes
                .cmp(&left.file_size_bytes)
                .then_with(|| left.source_path.cmp(&right.source_path))
        });
        files
    }

    /// アセンブリ名ごとのファイルサイズ合計（ランキング順）
    pub fn assembly_sizes(&self) -> Vec<(String, u64)> {
        let mut sizes: HashMap<String, u64> = HashMap::new();
        for report in &self.per_file_reports {
            let entry = sizes.entry(report.assembly.clone()).or_insert(0);
            *entry = entry.saturating_add(report.file_size_bytes);
        }
        rank(&sizes)
    }

    /// 全ファイルのシンボルサイズ合計
    pub fn total_symbol_bytes(&self) -> u64 {
        self.total_type_sizes
            .values()
            .fold(0u64, |acc, size| acc.saturating_add(*size))
    }

    pub fn total_file_bytes(&self) -> u64 {
        self.per_file_reports
            .iter()
            .fold(0u64, |acc, report| acc.saturating_add(report.file_size_bytes))
    }
}

/// サイズの降順に並べる。同サイズはキーの昇順（辞書順）
///
/// レポートの再現性とテストのために、順序は常に決定的です。
pub fn rank(sizes: &HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = sizes
        .iter()
        .map(|(key, size)| (key.clone(), *size))
        .collect();
    ranked.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
    ranked
}
