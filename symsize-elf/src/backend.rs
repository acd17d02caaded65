//! シンボル抽出バックエンド

use crate::{BackendUnavailable, BinaryImage, SymbolKind, SymbolRecord};
use object::{Object, ObjectSymbol, SymbolFlags};
use tracing::debug;

/// シンボル抽出の仕組み1つ分を包むアダプタ
///
/// どのバックエンドも同じ形のシンボルリストを返します。
/// 実行できない場合は [`BackendUnavailable`] を返し、セレクタが次の候補を試します。
pub trait SymbolBackend: Send + Sync {
    /// ログや報告に使うバックエンド名
    fn name(&self) -> &'static str;

    /// イメージからシンボルを抽出する
    fn extract(&self, image: &BinaryImage) -> Result<Vec<SymbolRecord>, BackendUnavailable>;
}

/// objectクレートでシンボルテーブルを直接読む構造化リーダー
///
/// 外部ツールに依存しないため最も信頼できます。
/// 失敗するのは入力が壊れている・読めない場合だけです。
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredReader;

impl StructuredReader {
    pub const NAME: &'static str = "structured";

    pub fn new() -> Self {
        Self
    }

    fn record_from_symbol<'data, S>(symbol: &S) -> Option<SymbolRecord>
    where
        S: ObjectSymbol<'data>,
    {
        if symbol.is_undefined() {
            return None;
        }
        let name = symbol.name().ok()?;
        if name.is_empty() {
            return None;
        }

        let kind = match symbol.flags() {
            SymbolFlags::Elf { st_info, .. } => SymbolKind::from_elf_type(st_info & 0xf),
            _ => match symbol.kind() {
                object::SymbolKind::Text => SymbolKind::Function,
                object::SymbolKind::Data => SymbolKind::Object,
                _ => SymbolKind::Other,
            },
        };

        Some(SymbolRecord::new(name, symbol.size(), kind))
    }
}

impl SymbolBackend for StructuredReader {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(&self, image: &BinaryImage) -> Result<Vec<SymbolRecord>, BackendUnavailable> {
        let file = image
            .parse()
            .map_err(|e| BackendUnavailable::new(Self::NAME, format!("unrecognized binary: {}", e)))?;

        // .symtab を優先し、stripされていれば .dynsym を読む（両方は読まない）
        let mut records: Vec<SymbolRecord> = file
            .symbols()
            .filter_map(|symbol| Self::record_from_symbol(&symbol))
            .collect();

        if records.is_empty() {
            records = file
                .dynamic_symbols()
                .filter_map(|symbol| Self::record_from_symbol(&symbol))
                .collect();
            debug!(
                "{}: no .symtab entries, read {} dynamic symbols",
                image.path().display(),
                records.len()
            );
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_reader_rejects_garbage() {
        let image = BinaryImage::from_bytes("garbage.so", vec![0u8; 64]);
        let err = StructuredReader::new().extract(&image).unwrap_err();
        assert_eq!(err.backend, "structured");
    }
}
