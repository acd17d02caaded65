//! ファイル単位のサイズ集計

use crate::{assembly_name, FileReport};
use symsize_demangle::Demangle;
use symsize_elf::{BinaryImage, Extraction};
use std::collections::HashMap;
use tracing::trace;

/// 1ファイル分のシンボルを名前空間別・型別に集計する
///
/// サイズ0や関数・データ以外のシンボルは除外します。名前空間が空のシンボルは
/// 名前空間別には数えず、型別には `(no namespace).Type` として数えます。
/// セクションサイズはシンボルとは独立にセクションヘッダから求めます。
///
/// 途中で失敗することはなく、シンボルが0件でも常にレポートを返します。
pub fn aggregate(image: &BinaryImage, extraction: Extraction, demangler: &dyn Demangle) -> FileReport {
    let backend = extraction.backend();
    let records = extraction.into_records();

    let mut namespace_sizes: HashMap<String, u64> = HashMap::new();
    let mut type_sizes: HashMap<String, u64> = HashMap::new();
    let mut symbol_count = 0;

    for record in &records {
        if !record.is_attributable() {
            continue;
        }

        let attribution = demangler.demangle(&record.identifier);
        trace!("{} -> {:?}", record.identifier, attribution);

        if !attribution.namespace.is_empty() {
            let total = namespace_sizes.entry(attribution.namespace.clone()).or_insert(0);
            *total = total.saturating_add(record.size);
        }
        let total = type_sizes.entry(attribution.type_key()).or_insert(0);
        *total = total.saturating_add(record.size);

        symbol_count += 1;
    }

    FileReport {
        source_path: image.path().to_path_buf(),
        assembly: assembly_name(image.path()),
        file_size_bytes: image.file_size(),
        section_sizes: image.section_sizes(),
        symbol_count,
        namespace_sizes,
        type_sizes,
        backend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symsize_demangle::{CasingDemangler, DemangleRules, RootSplitDemangler};
    use symsize_elf::{SymbolKind, SymbolRecord};

    fn image() -> BinaryImage {
        BinaryImage::from_bytes("out/libaot-Demo.dll.so", vec![0u8; 10])
    }

    fn symbols(records: Vec<SymbolRecord>) -> Extraction {
        Extraction::Symbols {
            backend: "test",
            records,
        }
    }

    #[test]
    fn test_aggregate_root_split() {
        let demangler = RootSplitDemangler::new(DemangleRules::new());
        let extraction = symbols(vec![
            SymbolRecord::new("System_Collections_Generic_List_1", 40, SymbolKind::Function),
            SymbolRecord::new("System_Collections_Generic_Dictionary_2", 60, SymbolKind::Function),
            SymbolRecord::new("mono_aot_module_init", 8, SymbolKind::Function),
            SymbolRecord::new("System_String_Empty", 0, SymbolKind::Object),
            SymbolRecord::new("System_Text_Section", 99, SymbolKind::Other),
        ]);

        let report = aggregate(&image(), extraction, &demangler);

        assert_eq!(report.symbol_count, 3);
        assert_eq!(report.backend, Some("test"));
        assert_eq!(report.assembly, "Demo");
        assert_eq!(report.file_size_bytes, 10);
        assert_eq!(report.namespace_sizes.get("System.Collections"), Some(&100));
        assert_eq!(report.namespace_sizes.get("[Runtime]"), Some(&8));
        assert_eq!(report.type_sizes.get("System.Collections.Generic"), Some(&100));
        assert_eq!(report.type_sizes.get("[Runtime].[Runtime]"), Some(&8));
        assert_eq!(report.total_symbol_bytes(), 108);
    }

    #[test]
    fn test_empty_namespace_excluded_from_namespace_view() {
        let demangler = CasingDemangler::new(DemangleRules::new());
        let extraction = symbols(vec![
            SymbolRecord::new("system_collections_List_Add", 30, SymbolKind::Function),
            SymbolRecord::new("Foo_Bar", 12, SymbolKind::Function),
        ]);

        let report = aggregate(&image(), extraction, &demangler);

        assert_eq!(report.namespace_sizes.len(), 1);
        assert_eq!(report.namespace_sizes.get("system.collections"), Some(&30));
        assert_eq!(report.type_sizes.get("system.collections.List"), Some(&30));
        assert_eq!(report.type_sizes.get("(no namespace).Foo"), Some(&12));

        // 型別は名前空間なしのシンボルも含むので、名前空間別の合計より大きい
        let namespace_total: u64 = report.namespace_sizes.values().sum();
        let type_total: u64 = report.type_sizes.values().sum();
        assert_eq!(namespace_total, 30);
        assert_eq!(type_total, 42);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let demangler = RootSplitDemangler::new(DemangleRules::new());
        let mut records = vec![
            SymbolRecord::new("System_Object_ToString", 5, SymbolKind::Function),
            SymbolRecord::new("Xamarin_Forms_View_Layout", 7, SymbolKind::Function),
            SymbolRecord::new("System_Object_Equals", 11, SymbolKind::Function),
            SymbolRecord::new("orphan", 13, SymbolKind::Object),
        ];
        let forward = aggregate(&image(), symbols(records.clone()), &demangler);
        records.reverse();
        let backward = aggregate(&image(), symbols(records), &demangler);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_unavailable_extraction_yields_empty_report() {
        let demangler = RootSplitDemangler::new(DemangleRules::new());
        let report = aggregate(&image(), Extraction::Unavailable { failures: Vec::new() }, &demangler);

        assert_eq!(report.symbol_count, 0);
        assert!(report.namespace_sizes.is_empty());
        assert!(report.type_sizes.is_empty());
        assert_eq!(report.backend, None);
    }
}
