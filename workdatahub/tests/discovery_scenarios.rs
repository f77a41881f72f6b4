//! Discovery end to end: template resolution, version-folder selection, and
//! include/exclude matching wired together through `DiscoveryService`,
//! against real temp-directory trees instead of unit-level fixtures.

use workdatahub::discovery::DiscoveryService;
use workdatahub_domain::entities::{DomainConfig, SheetSelector, VersionFallback, VersionStrategy};
use workdatahub_domain::value_objects::Period;

fn domain_config(base_path_template: &str) -> DomainConfig {
    DomainConfig {
        domain_name: "annuity_performance".into(),
        base_path_template: base_path_template.into(),
        include_patterns: vec!["*.csv".into()],
        exclude_patterns: vec!["*~*".into()],
        sheet_selector: SheetSelector::Index(0),
        version_strategy: VersionStrategy::HighestNumber,
        version_fallback: VersionFallback::Error,
        table_name: "annuity_performance".into(),
        schema_name: "public".into(),
        primary_key_columns: vec!["id".into()],
        composite_delete_key_columns: vec!["id".into()],
        requires_backfill: false,
        supports_enrichment: false,
    }
}

#[test]
fn highest_version_folder_wins_and_its_lone_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("202501");
    std::fs::create_dir_all(base.join("V2")).unwrap();
    std::fs::create_dir_all(base.join("V10")).unwrap();
    std::fs::write(base.join("V2").join("old.csv"), "a,b\n1,2\n").unwrap();
    std::fs::write(base.join("V10").join("new.csv"), "a,b\n3,4\n").unwrap();

    let template = format!("{}/{{YYYYMM}}", dir.path().display());
    let config = domain_config(&template);
    let service = DiscoveryService::new();
    let result = service.discover(&config, Period::new(2025, 1).unwrap()).unwrap();

    assert_eq!(result.row_count, 1);
    assert!(result.file_path.ends_with("V10/new.csv"));
    assert_eq!(result.version_tag.as_deref(), Some("V10"));
}

#[test]
fn ambiguous_include_match_is_a_discovery_error_not_a_silent_pick() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("202501");
    std::fs::create_dir_all(&base).unwrap();
    std::fs::write(base.join("one.csv"), "a,b\n1,2\n").unwrap();
    std::fs::write(base.join("two.csv"), "a,b\n3,4\n").unwrap();

    let template = format!("{}/{{YYYYMM}}", dir.path().display());
    let config = domain_config(&template);
    let service = DiscoveryService::new();
    let err = service.discover(&config, Period::new(2025, 1).unwrap()).unwrap_err();

    assert_eq!(err.category(), "discovery");
}

#[test]
fn no_version_folder_reads_directly_from_the_base_directory() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("202501");
    std::fs::create_dir_all(&base).unwrap();
    std::fs::write(base.join("flat.csv"), "a,b\n1,2\n3,4\n").unwrap();

    let template = format!("{}/{{YYYYMM}}", dir.path().display());
    let config = domain_config(&template);
    let service = DiscoveryService::new();
    let result = service.discover(&config, Period::new(2025, 1).unwrap()).unwrap();

    assert_eq!(result.row_count, 2);
    assert!(result.version_tag.is_none());
}

#[test]
fn operator_supplied_override_skips_version_selection_and_matching() {
    let dir = tempfile::tempdir().unwrap();
    let explicit = dir.path().join("anywhere.csv");
    std::fs::write(&explicit, "a,b\n1,2\n").unwrap();

    let config = domain_config("unused/{YYYYMM}");
    let service = DiscoveryService::new();
    let result = service.discover_with_override(&config, &explicit).unwrap();

    assert_eq!(result.row_count, 1);
    assert_eq!(result.file_path, explicit);
}
