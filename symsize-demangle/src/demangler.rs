//! デマングラの2つの変種
//!
//! どちらの変種も次の順序で規則を適用し、最初に当てはまったものを採用します。
//!
//! 1. 予約プレフィックス（`mono_`, `plt_`, `temp_` など）→ 固定バケット
//! 2. セグメントが2つ未満 → `[Global]`
//! 3. 変種ごとの構造分割（既知ルート / 大文字小文字）
//! 4. どれにも当てはまらない → `[Unknown]`
//!
//! 1, 2, 4 は [`DemangleRules`] が共有するので、2つの変種は端の挙動で食い違いません。

use crate::{Attribution, DemangleRules};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 平坦化された識別子を (名前空間, 型, メンバ) に分解する機能
///
/// 入出力を持たない純粋関数であり、同じ識別子からは常に同じ結果が得られます。
pub trait Demangle: Send + Sync {
    fn kind(&self) -> DemanglerKind;

    fn rules(&self) -> &DemangleRules;

    /// 変種固有の構造分割。当てはまらなければ `None`
    fn split_structured(&self, identifier: &str, segments: &[&str]) -> Option<Attribution>;

    fn demangle(&self, identifier: &str) -> Attribution {
        let rules = self.rules();
        if let Some(attribution) = rules.classify_reserved(identifier) {
            return attribution;
        }

        let segments = rules.split(identifier);
        if let Some(attribution) = rules.classify_too_short(identifier, &segments) {
            return attribution;
        }

        self.split_structured(identifier, &segments)
            .unwrap_or_else(|| rules.unmatched(identifier))
    }
}

/// デマングラの変種
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DemanglerKind {
    /// 既知ルートに一致したときだけ右から左に分割する
    #[default]
    KnownRoots,
    /// 先頭文字の大文字小文字で左から右に分割する
    Casing,
}

impl fmt::Display for DemanglerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemanglerKind::KnownRoots => write!(f, "roots"),
            DemanglerKind::Casing => write!(f, "casing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown demangler '{0}' (expected 'roots' or 'casing')")]
pub struct UnknownDemanglerKind(String);

impl FromStr for DemanglerKind {
    type Err = UnknownDemanglerKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roots" | "known-roots" => Ok(DemanglerKind::KnownRoots),
            "casing" => Ok(DemanglerKind::Casing),
            other => Err(UnknownDemanglerKind(other.to_string())),
        }
    }
}

/// 設定に応じたデマングラを作る
pub fn build_demangler(kind: DemanglerKind, rules: DemangleRules) -> Box<dyn Demangle> {
    match kind {
        DemanglerKind::KnownRoots => Box::new(RootSplitDemangler::new(rules)),
        DemanglerKind::Casing => Box::new(CasingDemangler::new(rules)),
    }
}

fn is_arity_suffix(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn starts_with(segment: &str, predicate: fn(&char) -> bool) -> bool {
    segment.chars().next().as_ref().is_some_and(predicate)
}

/// 既知ルートによる右から左の分割
///
/// 先頭セグメントが既知ルートで、セグメントが3つ以上あるときに適用します。
/// 最後のセグメントがメンバ、その直前が型、それより前が名前空間です。
/// 最後のセグメントが数字（ジェネリックのアリティ）でセグメントが4つ以上あれば、
/// 直前のセグメントと合わせてメンバとし、型の境界を1つ左へずらします。
#[derive(Debug, Clone)]
pub struct RootSplitDemangler {
    rules: DemangleRules,
}

impl RootSplitDemangler {
    pub fn new(rules: DemangleRules) -> Self {
        Self { rules }
    }
}

impl Demangle for RootSplitDemangler {
    fn kind(&self) -> DemanglerKind {
        DemanglerKind::KnownRoots
    }

    fn rules(&self) -> &DemangleRules {
        &self.rules
    }

    fn split_structured(&self, _identifier: &str, segments: &[&str]) -> Option<Attribution> {
        let len = segments.len();
        if len < 3 || !self.rules.is_known_root(segments[0]) {
            return None;
        }

        let last = segments[len - 1];
        let (member, type_index) = if is_arity_suffix(last) && len >= 4 {
            let member = format!("{}{}{}", segments[len - 2], self.rules.delimiter(), last);
            (member, len - 3)
        } else {
            (last.to_string(), len - 2)
        };

        Some(Attribution::new(
            segments[..type_index].join("."),
            segments[type_index],
            member,
        ))
    }
}

/// 大文字小文字による左から右の分割
///
/// 小文字で始まるセグメントの先頭からの連続を名前空間、続く大文字で始まる
/// セグメントの連続を型、残りをメンバとします。大文字の連続が末尾まで続き
/// 2セグメント以上あるときは、最後のセグメントをメンバとして残します。
/// 大文字の連続がなければ識別子全体を型名とし、名前空間とメンバは空になります。
#[derive(Debug, Clone)]
pub struct CasingDemangler {
    rules: DemangleRules,
}

impl CasingDemangler {
    pub fn new(rules: DemangleRules) -> Self {
        Self { rules }
    }
}

impl Demangle for CasingDemangler {
    fn kind(&self) -> DemanglerKind {
        DemanglerKind::Casing
    }

    fn rules(&self) -> &DemangleRules {
        &self.rules
    }

    fn split_structured(&self, identifier: &str, segments: &[&str]) -> Option<Attribution> {
        let namespace_end = segments
            .iter()
            .take_while(|s| starts_with(s, char::is_ascii_lowercase))
            .count();
        let type_run = segments[namespace_end..]
            .iter()
            .take_while(|s| starts_with(s, char::is_ascii_uppercase))
            .count();

        if type_run == 0 {
            return Some(Attribution::new("", identifier, ""));
        }

        let mut type_end = namespace_end + type_run;
        if type_end == segments.len() && type_run >= 2 {
            type_end -= 1;
        }

        let delimiter = self.rules.delimiter().to_string();
        Some(Attribution::new(
            segments[..namespace_end].join("."),
            segments[namespace_end..type_end].join(&delimiter),
            segments[type_end..].join(&delimiter),
        ))
    }
}
