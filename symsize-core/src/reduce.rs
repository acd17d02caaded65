//! 複数ファイルの合算

use crate::{CorpusReport, FileReport};
use std::collections::HashMap;

fn merge_into(totals: &mut HashMap<String, u64>, sizes: &HashMap<String, u64>) {
    for (key, size) in sizes {
        let total = totals.entry(key.clone()).or_insert(0);
        *total = total.saturating_add(*size);
    }
}

/// ファイル別レポートをキーごとの単純な加算でコーパス全体に合算する
///
/// 入力のレポートは変更しません。どの順序で渡しても合計は同じになり、
/// ランキング（[`crate::rank`]）も同じ順序になります。
pub fn reduce(file_reports: &[FileReport]) -> CorpusReport {
    let mut total_namespace_sizes = HashMap::new();
    let mut total_type_sizes = HashMap::new();

    for report in file_reports {
        merge_into(&mut total_namespace_sizes, &report.namespace_sizes);
        merge_into(&mut total_type_sizes, &report.type_sizes);
    }

    CorpusReport {
        total_namespace_sizes,
        total_type_sizes,
        per_file_reports: file_reports.to_vec(),
        skipped: Vec::new(),
    }
}
