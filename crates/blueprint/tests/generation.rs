//! Generation runs against real files and a stand-in layout engine

use blueprint::{Driver, DriverConfig, GraphvizRenderer, OutputFormat, Renderer, RunOutcome};
use std::fs;
use tempfile::tempdir;

const STEMS: [&str; 5] = [
    "architecture",
    "multi_region",
    "data_flow",
    "consistency_workflow",
    "component_interaction",
];

#[test]
fn test_dot_run_writes_every_diagram() {
    let dir = tempdir().unwrap();
    let driver = DriverConfig::new(dir.path())
        .format(OutputFormat::Dot)
        .into_driver();

    let mut console = Vec::new();
    let outcome = driver.run(&mut console).unwrap();
    let RunOutcome::Completed(paths) = outcome else {
        panic!("expected a completed run");
    };

    let expected: Vec<_> = STEMS
        .iter()
        .map(|s| dir.path().join(format!("{s}.dot")))
        .collect();
    assert_eq!(paths, expected);
    for path in &paths {
        let source = fs::read_to_string(path).unwrap();
        assert!(source.starts_with("digraph"));
        assert!(source.trim_end().ends_with('}'));
    }

    let console = String::from_utf8(console).unwrap();
    assert!(console.starts_with("Generating diagrams...\nThis may take a minute...\n"));
    assert!(console.trim_end().ends_with("You can now use these in your documentation!"));
}

#[test]
fn test_rerun_overwrites_previous_output() {
    let dir = tempdir().unwrap();
    let stale = dir.path().join("architecture.dot");
    fs::write(&stale, "stale").unwrap();

    let driver = DriverConfig::new(dir.path())
        .format(OutputFormat::Dot)
        .into_driver();
    assert!(driver.run(&mut Vec::new()).unwrap().is_completed());
    assert_ne!(fs::read_to_string(&stale).unwrap(), "stale");
}

#[test]
fn test_unwritable_output_dir_is_not_a_missing_dependency() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does").join("not").join("exist");
    let driver = DriverConfig::new(&missing)
        .format(OutputFormat::Dot)
        .into_driver();

    let mut console = Vec::new();
    let err = driver.run(&mut console).unwrap_err();
    assert!(!err.is_missing_dependency());
    let console = String::from_utf8(console).unwrap();
    assert!(console.contains("❌ Error generating diagrams"));
    assert!(!console.contains("Please install Graphviz"));
}

#[cfg(unix)]
mod with_stand_in_engine {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Shell script that copies stdin to the `-o` argument
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    const COPY_TO_OUTPUT: &str = r#"out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; shift; fi
  shift
done
cat > "$out"
"#;

    #[test]
    fn test_engine_receives_dot_on_stdin() {
        let bin = tempdir().unwrap();
        let out = tempdir().unwrap();
        let engine = write_script(bin.path(), "fake-dot", COPY_TO_OUTPUT);

        let renderer = GraphvizRenderer::with_format(OutputFormat::Svg).program(&engine);
        let driver = Driver::new(Box::new(renderer), out.path());
        let outcome = driver.run(&mut Vec::new()).unwrap();
        assert!(outcome.is_completed());

        for stem in STEMS {
            let written = fs::read_to_string(out.path().join(format!("{stem}.svg"))).unwrap();
            assert_eq!(written, blueprint::dot_for(stem).unwrap().unwrap());
        }
    }

    #[test]
    fn test_engine_failure_is_propagated() {
        let bin = tempdir().unwrap();
        let out = tempdir().unwrap();
        let engine = write_script(
            bin.path(),
            "broken-dot",
            "cat > /dev/null\necho 'Error: syntax error' >&2\nexit 3\n",
        );

        let renderer = GraphvizRenderer::with_format(OutputFormat::Png).program(&engine);
        assert_eq!(renderer.format(), OutputFormat::Png);
        let driver = Driver::new(Box::new(renderer), out.path());

        let mut console = Vec::new();
        let err = driver.run(&mut console).unwrap_err();
        assert!(!err.is_missing_dependency());
        assert!(err.to_string().contains("exit status 3"));
        assert!(err.to_string().contains("syntax error"));
    }
}
