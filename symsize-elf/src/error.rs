//! バックエンドのエラー型

use thiserror::Error;

/// 特定のバックエンドが実行できなかった
///
/// ツールが見つからない、プロセスが異常終了した、タイムアウトした、
/// 入力が解析できない、などの場合に返されます。
/// セレクタが次のバックエンドへフォールバックすることで回復します。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend '{backend}' unavailable: {reason}")]
pub struct BackendUnavailable {
    pub backend: &'static str,
    pub reason: String,
}

impl BackendUnavailable {
    pub fn new(backend: &'static str, reason: impl Into<String>) -> Self {
        Self {
            backend,
            reason: reason.into(),
        }
    }
}

/// シンボルテーブルの1行（1エントリ）が解析できなかった
///
/// レコード単位でスキップされ、ファイル全体の集計を中断することはありません。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed symbol record '{line}': {reason}")]
pub struct MalformedRecord {
    pub line: String,
    pub reason: &'static str,
}

impl MalformedRecord {
    pub fn new(line: &str, reason: &'static str) -> Self {
        Self {
            line: line.to_string(),
            reason,
        }
    }
}
