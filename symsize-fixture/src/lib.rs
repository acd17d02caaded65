//! テスト用の合成ELFオブジェクト生成
//!
//! AOTコンパイルされたアセンブリに似たシンボル名を持つ再配置可能ELFを作ります。
//! 事前にビルドしたバイナリに頼らずに、シンボル抽出と集計をテストするためのものです。

use object::write::{Object, StandardSection, Symbol, SymbolSection};
use object::{Architecture, BinaryFormat, Endianness, SymbolFlags, SymbolKind, SymbolScope};
use std::path::Path;

/// フィクスチャ生成の結果型
pub type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FixtureKind {
    Function,
    Object,
}

#[derive(Debug, Clone)]
struct FixtureSymbol {
    name: String,
    size: usize,
    kind: FixtureKind,
}

/// 合成ELFのビルダー
#[derive(Debug, Clone, Default)]
pub struct FixtureBuilder {
    symbols: Vec<FixtureSymbol>,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `.text` に指定サイズの関数シンボルを追加する
    pub fn function(mut self, name: impl Into<String>, size: usize) -> Self {
        self.symbols.push(FixtureSymbol {
            name: name.into(),
            size,
            kind: FixtureKind::Function,
        });
        self
    }

    /// `.data` に指定サイズのデータシンボルを追加する
    pub fn object(mut self, name: impl Into<String>, size: usize) -> Self {
        self.symbols.push(FixtureSymbol {
            name: name.into(),
            size,
            kind: FixtureKind::Object,
        });
        self
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// 追加したシンボルのサイズ合計
    pub fn total_size(&self) -> u64 {
        self.symbols.iter().map(|s| s.size as u64).sum()
    }

    /// ELFのバイト列を生成する
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut obj = Object::new(BinaryFormat::Elf, Architecture::X86_64, Endianness::Little);
        let text = obj.section_id(StandardSection::Text);
        let data = obj.section_id(StandardSection::Data);

        for fixture in &self.symbols {
            let (kind, section, body) = match fixture.kind {
                // 中身はretで埋める
                FixtureKind::Function => (SymbolKind::Text, text, vec![0xc3u8; fixture.size]),
                FixtureKind::Object => (SymbolKind::Data, data, vec![0u8; fixture.size]),
            };
            let symbol = obj.add_symbol(Symbol {
                name: fixture.name.as_bytes().to_vec(),
                value: 0,
                size: 0,
                kind,
                scope: SymbolScope::Linkage,
                weak: false,
                section: SymbolSection::Undefined,
                flags: SymbolFlags::None,
            });
            obj.add_symbol_data(symbol, section, &body, 1);
        }

        obj.write()
            .map_err(|e| anyhow::anyhow!("Failed to write fixture object: {}", e))
    }

    /// ELFをファイルに書き出す
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.build()?;
        std::fs::write(path, bytes)
            .map_err(|e| anyhow::anyhow!("Failed to write fixture {:?}: {}", path, e))
    }
}

/// 生成クラス群を模したフィクスチャ
///
/// `GeneratedClasses_SomeClass{i}_Calculate` のようなユーザーコード、
/// ジェネリックコレクション、ランタイム内部シンボルとサンクを含みます。
pub fn generated_classes(classes: usize) -> FixtureBuilder {
    let mut builder = FixtureBuilder::new()
        .function("mono_aot_GeneratedClasses_init", 32)
        .object("mono_aot_file_info", 64)
        .function("plt_System_Object__ctor", 16)
        .function("temp_thunk_0", 8)
        .function("System_Collections_Generic_List_1_Add", 120)
        .function("System_Collections_Generic_List_1", 40)
        .function("System_Threading_Tasks_Task_Delay", 96);

    for i in 1..=classes {
        builder = builder
            .function(format!("GeneratedClasses_SomeClass{}_Calculate", i), 200 + i)
            .function(format!("GeneratedClasses_SomeClass{}_Dispose", i), 24)
            .object(format!("GeneratedClasses_DummyStruct{}_Value", i), 4);
    }

    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_produces_elf() {
        let bytes = FixtureBuilder::new()
            .function("System_Object_ToString", 10)
            .build()
            .unwrap();
        assert_eq!(&bytes[..4], b"\x7fELF");
    }

    #[test]
    fn test_generated_classes_counts() {
        let builder = generated_classes(3);
        assert_eq!(builder.symbol_count(), 7 + 3 * 3);
        assert_eq!(builder.total_size(), 376 + (201 + 202 + 203) + 3 * 24 + 3 * 4);
    }
}
