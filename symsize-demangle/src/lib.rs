//! symsize 識別子デマングラ
//!
//! AOTコンパイルで平坦化された識別子（例: `System_Collections_Generic_List_1_Add`）を
//! (名前空間, 型, メンバ) の3つ組に分解するヒューリスティックを提供します。
//! 2つの変種（既知ルートによる右から左の分割、大文字小文字による左から右の分割）を
//! 同じトレイトの背後に置き、予約プレフィックスとフォールバックの規則を共有します。

pub mod attribution;
pub mod demangler;
pub mod rules;

pub use attribution::{Attribution, NO_NAMESPACE};
pub use demangler::{build_demangler, CasingDemangler, Demangle, DemanglerKind, RootSplitDemangler, UnknownDemanglerKind};
pub use rules::{DemangleRules, GLOBAL_BUCKET, RUNTIME_BUCKET, THUNKS_BUCKET, UNKNOWN_BUCKET};

/// デマングラの結果型
pub type Result<T> = anyhow::Result<T>;
