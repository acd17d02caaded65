//! シンボルレコード

/// シンボルの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// 関数（STT_FUNC）
    Function,
    /// データオブジェクト（STT_OBJECT）
    Object,
    /// セクション、ファイル、TLSなどその他
    Other,
}

impl SymbolKind {
    /// ELFのst_info下位4ビット（シンボルタイプ）から種類を決める
    pub fn from_elf_type(st_type: u8) -> Self {
        match st_type {
            object::elf::STT_FUNC | object::elf::STT_GNU_IFUNC => SymbolKind::Function,
            object::elf::STT_OBJECT => SymbolKind::Object,
            _ => SymbolKind::Other,
        }
    }

    /// readelfのType列（FUNC, OBJECTなど）から種類を決める
    pub fn from_readelf_type(column: &str) -> Self {
        match column {
            "FUNC" | "IFUNC" => SymbolKind::Function,
            "OBJECT" => SymbolKind::Object,
            _ => SymbolKind::Other,
        }
    }

    /// nmのシンボルタイプ文字から種類を決める
    pub fn from_nm_code(code: &str) -> Self {
        match code {
            "T" | "t" | "W" | "w" | "i" => SymbolKind::Function,
            "D" | "d" | "B" | "b" | "R" | "r" | "V" | "v" | "G" | "g" | "S" | "s" => {
                SymbolKind::Object
            }
            _ => SymbolKind::Other,
        }
    }
}

/// バックエンドが出力するシンボル1件分の情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    /// シンボルテーブル上の名前（平坦化された識別子）
    pub identifier: String,
    /// バイト単位のサイズ
    pub size: u64,
    pub kind: SymbolKind,
}

impl SymbolRecord {
    pub fn new(identifier: impl Into<String>, size: u64, kind: SymbolKind) -> Self {
        Self {
            identifier: identifier.into(),
            size,
            kind,
        }
    }

    /// サイズ集計の対象になるかどうか
    ///
    /// サイズ0のシンボルと、関数でもデータでもないシンボルは計測可能な
    /// フットプリントを持たないため除外します。
    pub fn is_attributable(&self) -> bool {
        self.size > 0 && self.kind != SymbolKind::Other && !self.identifier.is_empty()
    }
}
