//! End-to-end conformance runs over descriptor fixtures on disk.

use std::path::PathBuf;

use causeway_conformance::{build, load_domain, run_all, DomainPaths, Severity};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn paths(domain: &str, config: Option<&str>) -> DomainPaths {
    DomainPaths {
        domain: fixture(domain),
        config: config.map(fixture),
    }
}

#[test]
fn toml_and_json_descriptors_are_both_loaded() {
    let registry = load_domain(&fixture("clean")).unwrap_or_default();
    assert_eq!(registry.len(), 2);
    assert!(registry.get("demo.dom.Order").is_some());
}

#[test]
fn clean_domain_passes_every_validator() {
    let Ok(report) = run_all(&paths("clean", None)) else {
        unreachable!("clean fixtures load");
    };
    let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
    assert!(failures.is_empty(), "unexpected failures: {failures:#?}");
    assert_eq!(
        report.result("metamodel/build").map(|r| r.message.as_str()),
        Some("2 types, 5 members (v1)")
    );
}

#[test]
fn broken_domain_fails_in_production() {
    let Ok(report) = run_all(&paths("broken", None)) else {
        unreachable!("broken fixtures still load");
    };
    assert_eq!(report.failure_count(), 4);
    for validator in [
        "title/strategy-conflict",
        "logical-type/unique",
        "members/orphaned-supporting-method",
        "members/optional-primitive",
    ] {
        assert!(
            report.result(validator).is_some_and(|r| r.is_failure()),
            "{validator} should fail"
        );
    }
    assert_eq!(
        report
            .result("members/optional-primitive")
            .map(|r| r.details.clone()),
        Some(vec![
            "demo.Customer#age: demo.Customer#age is primitive and cannot be optional".to_owned()
        ])
    );
}

#[test]
fn prototyping_downgrades_failures_to_warnings() {
    let Ok(report) = run_all(&paths("broken", Some("prototyping.toml"))) else {
        unreachable!("broken fixtures still load");
    };
    assert!(report.all_passed());
    assert_eq!(report.count(Severity::Warning), 4);
    assert!(report.result("action/semantics-required").is_some());
}

#[test]
fn validation_failures_stay_on_the_metamodel() {
    let Ok(metamodel) = build(&paths("broken", None)) else {
        unreachable!("broken fixtures still load");
    };
    let failures = metamodel.validation_failures();
    assert_eq!(failures.len(), 4);
    assert_eq!(failures.by_validator("logical-type/unique").count(), 1);
}

#[test]
fn missing_domain_is_an_error() {
    assert!(run_all(&paths("does-not-exist", None)).is_err());
}
