//! デマングル規則（静的な設定データ）
//!
//! 既知のルート名と予約プレフィックスはモジュールレベルの可変状態ではなく、
//! この構造体としてデマングラに明示的に渡します。

use crate::Attribution;
use std::collections::BTreeSet;

/// ランタイム自身が生成したシンボルのバケット
pub const RUNTIME_BUCKET: &str = "[Runtime]";
/// サンク・一時スタブのバケット
pub const THUNKS_BUCKET: &str = "[Thunks]";
/// 区切りを含まない識別子のバケット
pub const GLOBAL_BUCKET: &str = "[Global]";
/// どの構造規則にも合わなかった識別子のバケット
pub const UNKNOWN_BUCKET: &str = "[Unknown]";

/// デマングル規則
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemangleRules {
    /// (プレフィックス, バケット名)。先に登録したものが優先
    reserved_prefixes: Vec<(String, String)>,
    /// 右から左の分割を適用するトップレベルのルート名
    known_roots: BTreeSet<String>,
    /// セグメントの区切り文字
    delimiter: char,
}

impl DemangleRules {
    /// 既定の規則を作成する
    pub fn new() -> Self {
        let mut rules = Self::empty();
        rules.reserved_prefixes = vec![
            // ランタイム内部
            ("mono_".to_string(), RUNTIME_BUCKET.to_string()),
            // PLTスタブ
            ("plt_".to_string(), RUNTIME_BUCKET.to_string()),
            // 生成されたサンク
            ("temp_".to_string(), THUNKS_BUCKET.to_string()),
        ];
        rules.known_roots = ["System", "Microsoft", "Xamarin", "Android", "Java", "MauiAotHang"]
            .iter()
            .map(|root| root.to_string())
            .collect();
        rules
    }

    /// プレフィックスもルートも持たない規則を作成する
    pub fn empty() -> Self {
        Self {
            reserved_prefixes: Vec::new(),
            known_roots: BTreeSet::new(),
            delimiter: '_',
        }
    }

    /// 既知のルート名を追加する
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.known_roots.insert(root.into());
        self
    }

    /// 既知のルート名をすべて取り除く
    pub fn without_roots(mut self) -> Self {
        self.known_roots.clear();
        self
    }

    /// 予約プレフィックスを追加する
    pub fn with_reserved_prefix(mut self, prefix: impl Into<String>, bucket: impl Into<String>) -> Self {
        self.reserved_prefixes.push((prefix.into(), bucket.into()));
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn known_roots(&self) -> impl Iterator<Item = &str> {
        self.known_roots.iter().map(String::as_str)
    }

    pub fn is_known_root(&self, segment: &str) -> bool {
        self.known_roots.contains(segment)
    }

    /// 識別子をセグメントに分割する
    pub fn split<'a>(&self, identifier: &'a str) -> Vec<&'a str> {
        identifier.split(self.delimiter).collect()
    }

    /// 規則1: 予約プレフィックスで始まる識別子を固定バケットに分類する
    pub fn classify_reserved(&self, identifier: &str) -> Option<Attribution> {
        self.reserved_prefixes
            .iter()
            .find(|(prefix, _)| identifier.starts_with(prefix.as_str()))
            .map(|(_, bucket)| Attribution::bucket(bucket, identifier))
    }

    /// 規則2: セグメントが2つ未満なら `[Global]`
    pub fn classify_too_short(&self, identifier: &str, segments: &[&str]) -> Option<Attribution> {
        (segments.len() < 2).then(|| Attribution::bucket(GLOBAL_BUCKET, identifier))
    }

    /// 規則5: どれにも当てはまらなければ `[Unknown]`（識別子はメンバとして保持）
    pub fn unmatched(&self, identifier: &str) -> Attribution {
        Attribution::bucket(UNKNOWN_BUCKET, identifier)
    }
}

impl Default for DemangleRules {
    fn default() -> Self {
        Self::new()
    }
}
