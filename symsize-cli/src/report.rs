//! レポート表示

use std::fmt::Write;
use symsize_core::{CorpusReport, FileReport, NO_NAMESPACE};

const RULE_WIDTH: usize = 80;
const SECTIONS_PER_FILE: usize = 10;

/// 表示オプション
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub top_namespaces: usize,
    pub top_types: usize,
    pub show_sections: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            top_namespaces: 20,
            top_types: 30,
            show_sections: false,
        }
    }
}

/// 3桁区切りのバイト数
pub fn format_bytes(bytes: u64) -> String {
    let digits = bytes.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(ch);
    }
    formatted
}

/// KB表記（1024で割って小数2桁）
pub fn format_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
}

fn size_row(out: &mut String, label: &str, width: usize, size: u64, total: u64) {
    let _ = writeln!(
        out,
        "  {:width$} {:>14} bytes ({:>12}) {:>5.1}%",
        label,
        format_bytes(size),
        format_kb(size),
        percentage(size, total),
        width = width
    );
}

fn file_name(report: &FileReport) -> String {
    report
        .source_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.source_path.display().to_string())
}

/// コーパスレポート全体を文字列にする
pub fn render(corpus: &CorpusReport, options: &RenderOptions) -> String {
    let mut out = String::new();
    let total_symbols = corpus.total_symbol_bytes();

    let _ = writeln!(
        out,
        "\nTotal code size (symbols): {} bytes ({})",
        format_bytes(total_symbols),
        format_kb(total_symbols)
    );

    let namespaces = corpus.top_namespaces(options.top_namespaces);
    if !namespaces.is_empty() {
        heading(&mut out, "TOP NAMESPACES BY SIZE (across all files):");
        for (namespace, size) in &namespaces {
            let label = if namespace.is_empty() { NO_NAMESPACE } else { namespace.as_str() };
            size_row(&mut out, label, 50, *size, total_symbols);
        }
    }

    let types = corpus.top_types(options.top_types);
    if !types.is_empty() {
        heading(&mut out, "TOP TYPES BY SIZE (across all files):");
        for (type_key, size) in &types {
            size_row(&mut out, type_key, 60, *size, total_symbols);
        }
    }

    render_file_summary(&mut out, corpus, options);
    render_assemblies(&mut out, corpus);
    render_skipped(&mut out, corpus);

    out
}

fn render_file_summary(out: &mut String, corpus: &CorpusReport, options: &RenderOptions) {
    heading(out, "FILE SIZE SUMMARY:");
    for report in corpus.files_by_size() {
        let source = match report.backend {
            Some(backend) => format!("{} symbols via {}", report.symbol_count, backend),
            None => "no symbols".to_string(),
        };
        let _ = writeln!(
            out,
            "  {:60} {:>14} bytes ({:>12})  [{}]",
            file_name(report),
            format_bytes(report.file_size_bytes),
            format_kb(report.file_size_bytes),
            source
        );

        if options.show_sections {
            for (section, size) in report.ranked_sections().into_iter().take(SECTIONS_PER_FILE) {
                let _ = writeln!(out, "      {:30} {:>14} bytes ({:>12})", section, format_bytes(size), format_kb(size));
            }
        }
    }

    let without_symbols = corpus
        .per_file_reports
        .iter()
        .filter(|report| report.backend.is_none())
        .count();
    if without_symbols > 0 {
        let _ = writeln!(
            out,
            "\n  Could not extract symbols from {} file(s). Install binutils (readelf/nm) for a detailed analysis.",
            without_symbols
        );
    }
}

fn render_assemblies(out: &mut String, corpus: &CorpusReport) {
    let assemblies = corpus.assembly_sizes();
    if assemblies.is_empty() {
        return;
    }
    let total = corpus.total_file_bytes();

    heading(out, "ASSEMBLY SIZES (sorted by size):");
    for (assembly, size) in &assemblies {
        size_row(out, assembly, 50, *size, total);
    }
    let _ = writeln!(out, "\n  {:50} {:>14} bytes ({:>12})", "TOTAL", format_bytes(total), format_kb(total));
}

fn render_skipped(out: &mut String, corpus: &CorpusReport) {
    if corpus.skipped.is_empty() {
        return;
    }
    heading(out, "SKIPPED FILES:");
    for skipped in &corpus.skipped {
        let _ = writeln!(out, "  {}: {}", skipped.path.display(), skipped.reason);
    }
}
