//! Tests for core error types

use blueprint::core::DiagramError;
use std::io;
use std::path::PathBuf;

#[test]
fn test_unresolved_reference() {
    let error = DiagramError::unresolved("Data Flow", "X");
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Reference error"));
    assert!(error_msg.contains("'Data Flow'"));
    assert!(error_msg.contains("'X' is not declared"));
    assert!(error.is_construction_error());
    assert!(!error.is_missing_dependency());
}

#[test]
fn test_ambiguous_reference() {
    let error = DiagramError::AmbiguousReference {
        diagram: "Architecture".to_string(),
        name: "Cache Updater".to_string(),
        count: 2,
    };
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("'Cache Updater' matches 2 declared nodes"));
    assert!(error.is_construction_error());
}

#[test]
fn test_scope_error() {
    let error = DiagramError::unbalanced_scope("Architecture", "no cluster is open");
    assert_eq!(
        error.to_string(),
        "Scope error in 'Architecture': no cluster is open"
    );
    assert!(error.is_construction_error());
}

#[test]
fn test_empty_cluster() {
    let error = DiagramError::EmptyCluster {
        diagram: "Architecture".to_string(),
        cluster: "Monitoring".to_string(),
    };
    assert!(error.to_string().contains("'Monitoring', which contains no nodes"));
}

#[test]
fn test_lint_error_joins_issues() {
    let error = DiagramError::Lint {
        diagram: "Broken".to_string(),
        issues: vec!["first".to_string(), "second".to_string()],
    };
    assert!(error.to_string().ends_with("first; second"));
}

#[test]
fn test_missing_renderer() {
    let error = DiagramError::MissingRenderer {
        program: PathBuf::from("/usr/bin/dot"),
        source: io::Error::new(io::ErrorKind::NotFound, "No such file"),
    };
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("'/usr/bin/dot' is not available"));
    assert!(error_msg.contains("No such file"));
    assert!(error.is_missing_dependency());
    assert!(!error.is_construction_error());
}

#[test]
fn test_render_failed_trims_stderr() {
    let error = DiagramError::render_failed("Architecture", "1", "  syntax error in line 3\n");
    assert_eq!(
        error.to_string(),
        "Render error for 'Architecture': exit status 1: syntax error in line 3"
    );
    assert!(!error.is_missing_dependency());
}

#[test]
fn test_io_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only file system");
    let error: DiagramError = io_err.into();
    assert!(error.to_string().contains("IO error"));
    assert!(error.to_string().contains("read-only file system"));
    // a permission problem on the output is not a missing engine
    assert!(!error.is_missing_dependency());
}

#[test]
fn test_duplicate_title_names_the_title() {
    let error = DiagramError::DuplicateTitle {
        title: "Data Flow - Location Update".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Title 'Data Flow - Location Update' is used by more than one diagram"
    );
    assert!(error.is_construction_error());
}

#[test]
fn test_error_debug() {
    let error = DiagramError::DuplicateOutput {
        stem: "architecture".to_string(),
    };
    let debug_str = format!("{:?}", error);
    assert!(debug_str.contains("DuplicateOutput"));
}

#[test]
fn test_missing_renderer_exposes_source() {
    use std::error::Error;

    let error = DiagramError::MissingRenderer {
        program: PathBuf::from("dot"),
        source: io::Error::new(io::ErrorKind::NotFound, "not found"),
    };
    assert!(error.source().is_some());
}
