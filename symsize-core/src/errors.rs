//! 解析エラー

use std::path::PathBuf;
use thiserror::Error;

/// ファイル単位・実行単位の致命的エラー
///
/// バックエンド単位の失敗（`BackendUnavailable`）とレコード単位の失敗
/// （`MalformedRecord`）は `symsize-elf` 側で回復されるため、ここには現れません。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// ファイルを開けない、または既知のバイナリ形式ではない（そのファイルだけスキップ）
    #[error("cannot analyze {}: {reason}", .path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    /// 入力ファイルが1つもない（実行全体を終了）
    #[error("no input files found")]
    NoInputFiles,
}

impl AnalysisError {
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AnalysisError::UnreadableFile {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
