//! 入力ファイルの探索

use crate::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 既定のファイル名パターン（Mono AOTの出力）
pub const DEFAULT_PATTERN: &str = r"^libaot-.*\.so$";

/// 探索オプション
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// ディレクトリ内で対象とするファイル名のパターン
    pub pattern: Regex,
    /// サブディレクトリも探すかどうか
    pub recursive: bool,
}

impl DiscoveryOptions {
    pub fn new(pattern: &str, recursive: bool) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| anyhow::anyhow!("Invalid file name pattern '{}': {}", pattern, e))?;
        Ok(Self { pattern, recursive })
    }

    /// 既定のパターン（[`DEFAULT_PATTERN`]）で再帰的に探す
    pub fn standard() -> Result<Self> {
        Self::new(DEFAULT_PATTERN, true)
    }

    fn matches_name(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.pattern.is_match(name))
    }
}

/// 引数のパスを解析対象のファイル一覧に解決する
///
/// ファイルはパターンに一致するか拡張子が `.so` なら採用します。
/// ディレクトリはパターンに一致するファイルを探します。
/// 結果はソート済みで重複を含みません。
pub fn discover_inputs<P: AsRef<Path>>(paths: &[P], options: &DiscoveryOptions) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_file() {
            let is_shared_object = path.extension().is_some_and(|ext| ext == "so");
            if is_shared_object || options.matches_name(path) {
                files.push(path.to_path_buf());
            } else {
                debug!("Ignoring {}: name does not match", path.display());
            }
        } else if path.is_dir() {
            let max_depth = if options.recursive { usize::MAX } else { 1 };
            for entry in WalkDir::new(path).max_depth(max_depth) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Failed to read directory entry under {}: {}", path.display(), e);
                        continue;
                    }
                };
                if entry.file_type().is_file() && options.matches_name(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            warn!("Input path does not exist: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    files
}

/// ファイル名からアセンブリ名を取り出す
///
/// `libaot-Foo.Bar.dll.so` -> `Foo.Bar`、`libaot-Foo.so` -> `Foo`。
/// それ以外はファイル名をそのまま返します。
pub fn assembly_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(name) = file_name.strip_prefix("libaot-") {
        return name
            .strip_suffix(".dll.so")
            .or_else(|| name.strip_suffix(".so"))
            .unwrap_or(name)
            .to_string();
    }
    file_name
}
