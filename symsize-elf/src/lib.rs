//! symsize シンボル抽出
//!
//! このクレートは、ELFバイナリからシンボルテーブルとセクションサイズを読み出す機能を提供します。
//! objectクレートによる構造化リーダーを第一候補とし、readelf/nmなどの外部ツールをフォールバックとして使います。

pub mod backend;
pub mod error;
pub mod external;
pub mod loader;
pub mod parse;
pub mod selector;
pub mod symbols;

pub use backend::{StructuredReader, SymbolBackend};
pub use error::{BackendUnavailable, MalformedRecord};
pub use external::{NmReader, ReadelfReader};
pub use loader::BinaryImage;
pub use selector::{BackendConfig, BackendKind, BackendSelector, Extraction};
pub use symbols::{SymbolKind, SymbolRecord};

/// シンボル抽出の結果型
pub type Result<T> = anyhow::Result<T>;
