//! アナライザのエンドツーエンドテスト（合成ELFを使用）

use std::path::PathBuf;
use symsize_core::{discover_inputs, Analyzer, AnalyzerConfig, DemanglerKind, DiscoveryOptions};
use symsize_core::{BackendConfig, BackendKind};
use symsize_fixture::{generated_classes, FixtureBuilder};

/// 外部ツールに依存しないよう構造化リーダーだけを使う
fn structured_only() -> Analyzer {
    Analyzer::new(AnalyzerConfig {
        backends: BackendConfig {
            order: vec![BackendKind::Structured],
            ..BackendConfig::default()
        },
        ..AnalyzerConfig::default()
    })
}

fn write(dir: &tempfile::TempDir, name: &str, builder: &FixtureBuilder) -> PathBuf {
    let path = dir.path().join(name);
    builder.write_to(&path).expect("Failed to write fixture");
    path
}

#[test]
fn test_disjoint_namespaces_reduce_without_cross_contamination() {
    let dir = tempfile::tempdir().unwrap();
    let system = write(
        &dir,
        "libaot-System.dll.so",
        &FixtureBuilder::new()
            .function("System_Collections_Generic_List_1_Add", 100)
            .function("System_Object_ToString", 20),
    );
    let android = write(
        &dir,
        "libaot-Mono.Android.dll.so",
        &FixtureBuilder::new()
            .function("Android_App_Activity_OnCreate", 300)
            .object("Android_Runtime_JNIEnv_handle", 8),
    );

    let analyzer = structured_only();
    let system_report = analyzer.analyze_file(&system).unwrap();
    let android_report = analyzer.analyze_file(&android).unwrap();
    let corpus = analyzer.analyze(&[system.clone(), android.clone()]).unwrap();

    assert!(corpus.skipped.is_empty());
    assert_eq!(corpus.per_file_reports.len(), 2);

    let mut expected = system_report.namespace_sizes.clone();
    expected.extend(android_report.namespace_sizes.clone());
    assert_eq!(corpus.total_namespace_sizes, expected);

    assert_eq!(corpus.total_namespace_sizes.get("System.Collections.Generic.List"), Some(&100));
    assert_eq!(corpus.total_namespace_sizes.get("System"), Some(&20));
    assert_eq!(corpus.total_namespace_sizes.get("Android.App"), Some(&300));
    assert_eq!(corpus.total_namespace_sizes.get("Android.Runtime"), Some(&8));
    assert_eq!(corpus.per_file_reports[1].assembly, "Mono.Android");
}

#[test]
fn test_generated_classes_ranking() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "libaot-GeneratedClasses.dll.so", &generated_classes(5));

    let analyzer = Analyzer::new(AnalyzerConfig {
        backends: BackendConfig {
            order: vec![BackendKind::Structured],
            ..BackendConfig::default()
        },
        rules: symsize_core::DemangleRules::new().with_root("GeneratedClasses"),
        ..AnalyzerConfig::default()
    });
    let corpus = analyzer.analyze(&[path]).unwrap();
    let report = &corpus.per_file_reports[0];

    assert_eq!(report.backend, Some("structured"));
    assert_eq!(report.symbol_count, 7 + 5 * 3);
    assert_eq!(corpus.total_symbol_bytes(), generated_classes(5).total_size());

    let top = corpus.top_namespaces(1);
    assert_eq!(top[0].0, "GeneratedClasses");
    assert_eq!(corpus.total_namespace_sizes.get("[Runtime]"), Some(&(32 + 64 + 16)));
    assert_eq!(corpus.total_namespace_sizes.get("[Thunks]"), Some(&8));
    assert_eq!(corpus.total_type_sizes.get("GeneratedClasses.SomeClass5"), Some(&(205 + 24)));
}

#[test]
fn test_empty_binary_yields_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "libaot-Empty.dll.so", &FixtureBuilder::new());

    let report = structured_only().analyze_file(&path).unwrap();
    assert_eq!(report.symbol_count, 0);
    assert!(report.namespace_sizes.is_empty());
    assert!(report.type_sizes.is_empty());
    assert!(report.file_size_bytes > 0);
}

#[test]
fn test_unreadable_file_is_reported_as_skip() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(
        &dir,
        "libaot-Good.dll.so",
        &FixtureBuilder::new().function("System_Object_ToString", 10),
    );
    let broken = dir.path().join("libaot-Broken.dll.so");
    std::fs::write(&broken, b"this is not a binary").unwrap();

    let corpus = structured_only().analyze(&[good, broken.clone()]).unwrap();

    assert_eq!(corpus.per_file_reports.len(), 1);
    assert_eq!(corpus.skipped.len(), 1);
    assert_eq!(corpus.skipped[0].path, broken);
    assert!(corpus.skipped[0].reason.contains("not a recognized binary"));
}

#[test]
fn test_casing_variant_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "libaot-Casing.dll.so",
        &FixtureBuilder::new()
            .function("system_collections_List_Add", 50)
            .function("Foo_Bar", 5),
    );

    let analyzer = Analyzer::new(AnalyzerConfig {
        backends: BackendConfig {
            order: vec![BackendKind::Structured],
            ..BackendConfig::default()
        },
        demangler: DemanglerKind::Casing,
        ..AnalyzerConfig::default()
    });
    let report = analyzer.analyze_file(&path).unwrap();

    assert_eq!(report.namespace_sizes.get("system.collections"), Some(&50));
    assert_eq!(report.namespace_sizes.len(), 1);
    assert_eq!(report.type_sizes.get("system.collections.List"), Some(&50));
    assert_eq!(report.type_sizes.get("(no namespace).Foo"), Some(&5));
    assert_eq!(report.type_sizes.len(), 2);
}

#[test]
fn test_parallel_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<PathBuf> = (1..=4)
        .map(|i| {
            write(
                &dir,
                &format!("libaot-Part{}.dll.so", i),
                &FixtureBuilder::new()
                    .function(format!("System_Part{}_Type_Run", i), 10 * i)
                    .function("System_Shared_Type_Run", i),
            )
        })
        .collect();

    let sequential = structured_only().analyze(&paths).unwrap();
    let parallel = Analyzer::new(AnalyzerConfig {
        backends: BackendConfig {
            order: vec![BackendKind::Structured],
            ..BackendConfig::default()
        },
        parallel: true,
        ..AnalyzerConfig::default()
    })
    .analyze(&paths)
    .unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(sequential.total_namespace_sizes.get("System.Shared"), Some(&10));
}

#[test]
fn test_discover_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("lib").join("arm64-v8a");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(nested.join("libaot-System.dll.so"), b"x").unwrap();
    std::fs::write(dir.path().join("libaot-Mono.Android.dll.so"), b"x").unwrap();
    std::fs::write(dir.path().join("libmonosgen-2.0.so"), b"x").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

    let recursive = discover_inputs(&[dir.path()], &DiscoveryOptions::standard().unwrap());
    assert_eq!(
        recursive,
        vec![
            dir.path().join("lib").join("arm64-v8a").join("libaot-System.dll.so"),
            dir.path().join("libaot-Mono.Android.dll.so"),
        ]
    );

    let shallow = discover_inputs(&[dir.path()], &DiscoveryOptions::new(r"^libaot-.*\.so$", false).unwrap());
    assert_eq!(shallow, vec![dir.path().join("libaot-Mono.Android.dll.so")]);

    // 明示したファイルは拡張子 .so でも採用し、重複は除く
    let explicit = discover_inputs(
        &[dir.path().join("libmonosgen-2.0.so"), dir.path().join("libmonosgen-2.0.so")],
        &DiscoveryOptions::standard().unwrap(),
    );
    assert_eq!(explicit, vec![dir.path().join("libmonosgen-2.0.so")]);

    assert!(discover_inputs(&[dir.path().join("missing")], &DiscoveryOptions::standard().unwrap()).is_empty());
}
