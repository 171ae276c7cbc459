//! Command-line interface for the blueprint utility
//!
//! Generates the documentation diagrams, lists them, or checks them without
//! rendering.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

use blueprint::catalog::{self, CatalogEntry};
use blueprint::core::logging::init_logging;
use blueprint::{
    check_unique_outputs, lint, DriverConfig, GraphvizRenderer, OutputFormat, RunOutcome,
};

/// Blueprint - Generate architecture diagrams for the documentation
#[derive(Parser)]
#[command(name = "blueprint")]
#[command(about = "Generate the architecture documentation diagrams through Graphviz")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    /// What to do; generates every diagram when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// When to use colors in output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render every diagram into the output directory
    Generate {
        /// Directory the files are written into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output file format
        #[arg(short, long, value_enum, default_value_t = FormatChoice::Png)]
        format: FormatChoice,

        /// Graphviz `dot` executable to use
        #[arg(long, value_name = "PATH")]
        dot: Option<PathBuf>,
    },

    /// Show the diagrams in generation order
    List {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Declare and check every diagram without rendering
    Check {
        /// Graphviz `dot` executable to probe
        #[arg(long, value_name = "PATH")]
        dot: Option<PathBuf>,
    },
}

/// Supported output formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum FormatChoice {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
    /// DOT source, no Graphviz needed
    Dot,
}

impl From<FormatChoice> for OutputFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Png => OutputFormat::Png,
            FormatChoice::Jpg => OutputFormat::Jpg,
            FormatChoice::Svg => OutputFormat::Svg,
            FormatChoice::Pdf => OutputFormat::Pdf,
            FormatChoice::Dot => OutputFormat::Dot,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if stdout is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// One row of `blueprint list`
#[derive(Debug, Serialize)]
pub struct DiagramSummary {
    pub title: String,
    pub stem: String,
    pub description: &'static str,
    pub direction: String,
    pub nodes: usize,
    pub clusters: usize,
    pub edges: usize,
}

#[derive(Debug, Serialize)]
struct DiagramListing {
    diagrams: Vec<DiagramSummary>,
    total: usize,
}

/// Main CLI application
pub struct BlueprintApp {
    entries: Vec<CatalogEntry>,
}

impl BlueprintApp {
    /// Application over the full diagram catalog
    pub fn new() -> Self {
        Self::with_entries(catalog::entries())
    }

    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        if let Err(e) = init_logging(
            cli.log_level.map(|l| l.as_str()),
            cli.log_format.map(|f| f.as_str()),
        ) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        let color = should_colorize(cli.color);
        let stdout = io::stdout();
        let mut out = stdout.lock();

        match cli.command {
            None => {
                self.generate_command(PathBuf::from("."), FormatChoice::Png, None, color, &mut out)
            }
            Some(Commands::Generate {
                output_dir,
                format,
                dot,
            }) => self.generate_command(output_dir, format, dot, color, &mut out),
            Some(Commands::List { json }) => self.list_command(json, &mut out),
            Some(Commands::Check { dot }) => self.check_command(dot, &mut out),
        }
    }

    /// Handle the generate command
    ///
    /// A missing Graphviz installation is reported and treated as a clean
    /// exit; every other failure is returned.
    pub fn generate_command(
        &self,
        output_dir: PathBuf,
        format: FormatChoice,
        dot: Option<PathBuf>,
        color: bool,
        out: &mut dyn Write,
    ) -> Result<()> {
        fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory '{}'", output_dir.display())
        })?;

        let mut config = DriverConfig::new(output_dir).format(format.into()).color(color);
        if let Some(program) = dot {
            config = config.program(program);
        }
        debug!(?config, "Starting generation run");

        match config.into_driver_for(self.entries.clone()).run(out)? {
            RunOutcome::Completed(paths) => {
                debug!(count = paths.len(), "Generation run complete");
                Ok(())
            }
            RunOutcome::MissingDependency(e) => {
                warn!(error = %e, "Exiting without rendering");
                Ok(())
            }
        }
    }

    /// Declare every diagram and summarise it
    pub fn summaries(&self) -> Result<Vec<DiagramSummary>> {
        self.entries
            .iter()
            .map(|entry| -> Result<DiagramSummary> {
                let diagram = entry.build()?;
                Ok(DiagramSummary {
                    title: diagram.title().to_string(),
                    stem: diagram.stem().to_string(),
                    description: entry.description,
                    direction: diagram.direction().to_string(),
                    nodes: diagram.node_count(),
                    clusters: diagram.cluster_count(),
                    edges: diagram.edge_count(),
                })
            })
            .collect()
    }

    /// Handle the list command
    pub fn list_command(&self, json: bool, out: &mut dyn Write) -> Result<()> {
        let diagrams = self.summaries()?;

        if json {
            let listing = DiagramListing {
                total: diagrams.len(),
                diagrams,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
        } else {
            writeln!(out, "Diagrams (in generation order):")?;
            let width = diagrams.iter().map(|d| d.stem.len()).max().unwrap_or(0);
            for (i, d) in diagrams.iter().enumerate() {
                writeln!(
                    out,
                    "  {}. {:<width$}  {} ({} nodes, {} clusters, {} edges)",
                    i + 1,
                    d.stem,
                    d.title,
                    d.nodes,
                    d.clusters,
                    d.edges,
                    width = width
                )?;
            }
            writeln!(out)?;
            writeln!(out, "Total: {} diagrams", diagrams.len())?;
        }

        Ok(())
    }

    /// Handle the check command
    ///
    /// Structural errors fail the command. Warnings and a missing Graphviz
    /// installation are only reported.
    pub fn check_command(&self, dot: Option<PathBuf>, out: &mut dyn Write) -> Result<()> {
        let headers: Vec<_> = self.entries.iter().map(CatalogEntry::header).collect();
        let stems: Vec<String> = headers.iter().map(|h| h.stem()).collect();
        check_unique_outputs(
            headers
                .iter()
                .map(|h| h.title())
                .zip(stems.iter().map(String::as_str)),
        )?;

        let mut failed = 0;
        for entry in &self.entries {
            let diagram = match entry.build() {
                Ok(diagram) => diagram,
                Err(e) => {
                    writeln!(out, "✗ {}: {}", entry.description, e)?;
                    failed += 1;
                    continue;
                }
            };

            let issues = lint(&diagram);
            let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
            if errors.is_empty() {
                writeln!(out, "✓ Valid diagram: {}", diagram.title())?;
            } else {
                writeln!(out, "✗ Invalid diagram: {}", diagram.title())?;
                failed += 1;
            }
            for issue in &issues {
                let kind = if issue.is_error() { "error" } else { "warning" };
                writeln!(out, "    {}: {}", kind, issue)?;
            }
        }

        let mut renderer = GraphvizRenderer::new();
        if let Some(program) = dot {
            renderer = renderer.program(program);
        }
        match renderer.probe() {
            Ok(version) => writeln!(out, "Layout engine: {}", version)?,
            Err(e) => writeln!(out, "Layout engine: unavailable ({})", e)?,
        }

        if failed > 0 {
            return Err(anyhow!("{} diagram(s) failed structural checks", failed));
        }
        Ok(())
    }
}

impl Default for BlueprintApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Determine if the progress banners should be colored
fn should_colorize(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            if std::env::var("NO_COLOR").is_ok() {
                return false;
            }
            crossterm::tty::IsTty::is_tty(&io::stdout())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint::{DiagramBuilder, DiagramError, EdgeSpec, NodeKind};
    use tempfile::tempdir;

    fn run_capture<F>(f: F) -> (Result<()>, String)
    where
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        let mut buffer = Vec::new();
        let result = f(&mut buffer);
        (result, String::from_utf8(buffer).unwrap())
    }

    #[test]
    fn test_cli_parsing_no_command() {
        let cli = Cli::try_parse_from(["blueprint"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.log_level.is_none());
        assert_eq!(cli.color, ColorChoice::Auto);
    }

    #[test]
    fn test_cli_parsing_generate_command() {
        let args = [
            "blueprint",
            "generate",
            "--output-dir",
            "docs/img",
            "--format",
            "svg",
            "--dot",
            "/opt/graphviz/bin/dot",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Some(Commands::Generate {
                output_dir,
                format,
                dot,
            }) => {
                assert_eq!(output_dir, PathBuf::from("docs/img"));
                assert_eq!(format, FormatChoice::Svg);
                assert_eq!(dot, Some(PathBuf::from("/opt/graphviz/bin/dot")));
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parsing_generate_defaults() {
        let cli = Cli::try_parse_from(["blueprint", "generate"]).unwrap();
        match cli.command {
            Some(Commands::Generate {
                output_dir,
                format,
                dot,
            }) => {
                assert_eq!(output_dir, PathBuf::from("."));
                assert_eq!(format, FormatChoice::Png);
                assert!(dot.is_none());
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parsing_global_flags_after_subcommand() {
        let args = [
            "blueprint",
            "list",
            "--json",
            "--log-level",
            "debug",
            "--color",
            "never",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.color, ColorChoice::Never);
        assert!(matches!(cli.command, Some(Commands::List { json: true })));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["blueprint", "generate", "--format", "bmp"]).is_err());
    }

    #[test]
    fn test_format_choice_conversion() {
        assert_eq!(OutputFormat::from(FormatChoice::Jpg), OutputFormat::Jpg);
        assert_eq!(OutputFormat::from(FormatChoice::Dot), OutputFormat::Dot);
    }

    #[test]
    fn test_explicit_color_choices() {
        assert!(should_colorize(ColorChoice::Always));
        assert!(!should_colorize(ColorChoice::Never));
    }

    #[test]
    fn test_generate_dot_into_new_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("docs").join("img");
        let app = BlueprintApp::new();

        let (result, console) = run_capture(|out| {
            app.generate_command(target.clone(), FormatChoice::Dot, None, false, out)
        });
        result.unwrap();
        assert!(target.join("architecture.dot").exists());
        assert!(target.join("component_interaction.dot").exists());
        assert!(console.contains("All diagrams generated successfully"));
    }

    #[test]
    fn test_generate_without_graphviz_exits_cleanly() {
        let dir = tempdir().unwrap();
        let app = BlueprintApp::new();

        let (result, console) = run_capture(|out| {
            app.generate_command(
                dir.path().to_path_buf(),
                FormatChoice::Png,
                Some(PathBuf::from("/nonexistent/blueprint-dot")),
                false,
                out,
            )
        });
        assert!(result.is_ok());
        assert!(console.contains("Please install Graphviz"));
        assert!(!dir.path().join("architecture.png").exists());
    }

    fn broken_builder() -> DiagramBuilder {
        DiagramBuilder::new("Broken").filename("broken")
    }

    fn broken_declare(b: &mut DiagramBuilder) -> Result<(), DiagramError> {
        b.node(NodeKind::Compute, "A");
        b.connect_labels("A", "X", EdgeSpec::default())
    }

    #[test]
    fn test_generate_construction_error_fails() {
        let dir = tempdir().unwrap();
        let app = BlueprintApp::with_entries(vec![CatalogEntry::new(
            "broken",
            broken_builder,
            broken_declare,
        )]);

        let (result, console) = run_capture(|out| {
            app.generate_command(dir.path().to_path_buf(), FormatChoice::Dot, None, false, out)
        });
        let err = result.unwrap_err();
        assert!(err.to_string().contains("'X' is not declared"));
        assert!(console.contains("Error generating diagrams"));
    }

    #[test]
    fn test_list_human_readable() {
        let app = BlueprintApp::new();
        let (result, console) = run_capture(|out| app.list_command(false, out));
        result.unwrap();
        assert!(console.contains("1. architecture"));
        assert!(console.contains("Multi-Region Deployment"));
        assert!(console.contains("Total: 5 diagrams"));
    }

    #[test]
    fn test_list_json_format() {
        let app = BlueprintApp::new();
        let (result, console) = run_capture(|out| app.list_command(true, out));
        result.unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&console).unwrap();
        assert_eq!(parsed["total"], 5);
        assert_eq!(parsed["diagrams"][0]["stem"], "architecture");
        assert_eq!(parsed["diagrams"][1]["direction"], "LR");
        assert_eq!(parsed["diagrams"][3]["stem"], "consistency_workflow");
    }

    #[test]
    fn test_check_passes_for_catalog() {
        let app = BlueprintApp::new();
        let (result, console) = run_capture(|out| {
            app.check_command(Some(PathBuf::from("/nonexistent/blueprint-dot")), out)
        });
        result.unwrap();
        assert_eq!(console.matches("✓ Valid diagram").count(), 5);
        assert!(console.contains("Layout engine: unavailable"));
    }

    #[test]
    fn test_check_reports_broken_diagram() {
        let mut entries = catalog::entries();
        entries.push(CatalogEntry::new("broken", broken_builder, broken_declare));
        let app = BlueprintApp::with_entries(entries);

        let (result, console) = run_capture(|out| {
            app.check_command(Some(PathBuf::from("/nonexistent/blueprint-dot")), out)
        });
        assert!(result.unwrap_err().to_string().contains("1 diagram(s)"));
        assert!(console.contains("✗ broken:"));
        assert_eq!(console.matches("✓ Valid diagram").count(), 5);
    }
}
