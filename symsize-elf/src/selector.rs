//! バックエンドセレクタ
//!
//! 優先順位付きのバックエンドリストを先頭から順に試し、最初に成功した結果を返します。
//! すべて失敗しても致命的エラーにはせず、[`Extraction::Unavailable`] として返すので、
//! 呼び出し側はファイルサイズとセクションサイズだけのレポートを作れます。

use crate::{BackendUnavailable, BinaryImage, NmReader, ReadelfReader, StructuredReader, SymbolBackend, SymbolRecord};
use std::time::Duration;
use tracing::{debug, warn};

/// 組み込みバックエンドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Structured,
    Readelf,
    Nm,
}

impl BackendKind {
    /// 既定の優先順位（構造化リーダー、readelf、nm）
    pub const DEFAULT_ORDER: [BackendKind; 3] = [BackendKind::Structured, BackendKind::Readelf, BackendKind::Nm];
}

/// バックエンドの設定
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// 外部ツール1回あたりの実行時間上限
    pub tool_timeout: Duration,
    pub readelf_program: String,
    pub nm_program: String,
    /// 試す順番
    pub order: Vec<BackendKind>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            tool_timeout: Duration::from_secs(30),
            readelf_program: "readelf".to_string(),
            nm_program: "nm".to_string(),
            order: BackendKind::DEFAULT_ORDER.to_vec(),
        }
    }
}

/// 抽出結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// いずれかのバックエンドが成功した
    Symbols {
        backend: &'static str,
        records: Vec<SymbolRecord>,
    },
    /// すべてのバックエンドが失敗した（試行順の失敗理由）
    Unavailable { failures: Vec<BackendUnavailable> },
}

impl Extraction {
    pub fn backend(&self) -> Option<&'static str> {
        match self {
            Extraction::Symbols { backend, .. } => Some(*backend),
            Extraction::Unavailable { .. } => None,
        }
    }

    /// シンボルを取り出す（利用不可なら空）
    pub fn into_records(self) -> Vec<SymbolRecord> {
        match self {
            Extraction::Symbols { records, .. } => records,
            Extraction::Unavailable { .. } => Vec::new(),
        }
    }
}

/// 順序付きフォールバックによるバックエンド選択
pub struct BackendSelector {
    backends: Vec<Box<dyn SymbolBackend>>,
}

impl BackendSelector {
    /// 任意のバックエンド列からセレクタを作る
    pub fn new(backends: Vec<Box<dyn SymbolBackend>>) -> Self {
        Self { backends }
    }

    /// 設定に従って組み込みバックエンドを並べる
    pub fn from_config(config: &BackendConfig) -> Self {
        let backends = config
            .order
            .iter()
            .map(|kind| -> Box<dyn SymbolBackend> {
                match kind {
                    BackendKind::Structured => Box::new(StructuredReader::new()),
                    BackendKind::Readelf => {
                        Box::new(ReadelfReader::new(config.readelf_program.clone(), config.tool_timeout))
                    }
                    BackendKind::Nm => Box::new(NmReader::new(config.nm_program.clone(), config.tool_timeout)),
                }
            })
            .collect();
        Self::new(backends)
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// 先頭から順に試し、最初に成功した結果を返す
    pub fn select(&self, image: &BinaryImage) -> Extraction {
        let mut failures = Vec::new();

        for backend in &self.backends {
            match backend.extract(image) {
                Ok(records) => {
                    debug!(
                        "{}: {} symbols via {}",
                        image.path().display(),
                        records.len(),
                        backend.name()
                    );
                    return Extraction::Symbols {
                        backend: backend.name(),
                        records,
                    };
                }
                Err(e) => {
                    debug!("{}: {}", image.path().display(), e);
                    failures.push(e);
                }
            }
        }

        warn!(
            "{}: no symbol backend available ({} tried)",
            image.path().display(),
            failures.len()
        );
        Extraction::Unavailable { failures }
    }
}

impl Default for BackendSelector {
    fn default() -> Self {
        Self::from_config(&BackendConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SymbolKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Failing(&'static str, Arc<AtomicUsize>);

    impl SymbolBackend for Failing {
        fn name(&self) -> &'static str {
            self.0
        }

        fn extract(&self, _image: &BinaryImage) -> Result<Vec<SymbolRecord>, BackendUnavailable> {
            self.1.fetch_add(1, Ordering::SeqCst);
            Err(BackendUnavailable::new(self.0, "not installed"))
        }
    }

    struct Fixed(&'static str, Arc<AtomicUsize>);

    impl SymbolBackend for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn extract(&self, _image: &BinaryImage) -> Result<Vec<SymbolRecord>, BackendUnavailable> {
            self.1.fetch_add(1, Ordering::SeqCst);
            Ok(vec![SymbolRecord::new("System_Object_ToString", 8, SymbolKind::Function)])
        }
    }

    fn image() -> BinaryImage {
        BinaryImage::from_bytes("libaot-test.dll.so", Vec::new())
    }

    #[test]
    fn test_first_success_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let selector = BackendSelector::new(vec![
            Box::new(Failing("first", calls.clone())),
            Box::new(Fixed("second", calls.clone())),
            Box::new(Fixed("third", calls.clone())),
        ]);

        let extraction = selector.select(&image());
        assert_eq!(extraction.backend(), Some("second"));
        assert_eq!(extraction.into_records().len(), 1);
        // 3番目は呼ばれない
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_all_fail_is_not_fatal() {
        let calls = Arc::new(AtomicUsize::new(0));
        let selector = BackendSelector::new(vec![
            Box::new(Failing("a", calls.clone())),
            Box::new(Failing("b", calls.clone())),
        ]);

        match selector.select(&image()) {
            Extraction::Unavailable { failures } => {
                let names: Vec<_> = failures.iter().map(|f| f.backend).collect();
                assert_eq!(names, vec!["a", "b"]);
            }
            other => panic!("Expected Unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_selector() {
        let selector = BackendSelector::new(Vec::new());
        assert_eq!(
            selector.select(&image()),
            Extraction::Unavailable { failures: Vec::new() }
        );
    }

    #[test]
    fn test_from_config_order() {
        let config = BackendConfig {
            order: vec![BackendKind::Nm, BackendKind::Structured],
            ..BackendConfig::default()
        };
        assert_eq!(BackendSelector::from_config(&config).backend_names(), vec!["nm", "structured"]);
        assert_eq!(
            BackendSelector::default().backend_names(),
            vec!["structured", "readelf", "nm"]
        );
    }
}
