use crate::config::ProjectConfig;
use crate::io::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "smellcorr")]
#[command(about = "Correlate design smells with security vulnerabilities", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the study over one or more projects
    Analyze {
        /// Study configuration file
        #[arg(short, long, env = "SMELLCORR_CONFIG")]
        config: Option<PathBuf>,

        /// Project as NAME=DESIGN_SMELLS,SCAN_RESULTS,SCANNED_FILES (repeatable)
        #[arg(short, long = "project", value_parser = parse_project)]
        projects: Vec<ProjectConfig>,

        /// Field delimiter of the input tables
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Scan-table column holding the vulnerability class
        #[arg(long)]
        vulnerability_column: Option<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory receiving the SVG charts
        #[arg(long)]
        charts: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        plain: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Convert a semgrep JSON report into results and scanned-files tables
    Extract {
        /// semgrep JSON report
        input: PathBuf,

        /// Directory for the tables (defaults to the report's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Field delimiter of the written tables
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a study.toml template in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Commands::Analyze { verbosity, .. } | Commands::Extract { verbosity, .. } => *verbosity,
            Commands::Init { .. } => 0,
        }
    }
}

/// Parse `NAME=DESIGN_SMELLS,SCAN_RESULTS,SCANNED_FILES`.
pub fn parse_project(raw: &str) -> Result<ProjectConfig, String> {
    let (name, paths) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=SMELLS,RESULTS,SCANNED, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("project name must not be empty".to_string());
    }

    let paths: Vec<&str> = paths.split(',').map(str::trim).collect();
    match paths.as_slice() {
        [smells, results, scanned] if !smells.is_empty() && !results.is_empty() && !scanned.is_empty() => {
            Ok(ProjectConfig {
                name: name.to_string(),
                design_smells: PathBuf::from(smells),
                scan_results: PathBuf::from(results),
                scanned_files: PathBuf::from(scanned),
            })
        }
        _ => Err(format!(
            "project '{}' needs exactly three table paths separated by ','",
            name
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_project() {
        let project = parse_project("tomcat=a.csv, b.csv ,c.csv").unwrap();
        assert_eq!(project.name, "tomcat");
        assert_eq!(project.scan_results, PathBuf::from("b.csv"));
    }

    #[test]
    fn test_parse_project_rejects_malformed() {
        assert!(parse_project("tomcat").is_err());
        assert!(parse_project("=a,b,c").is_err());
        assert!(parse_project("tomcat=a,b").is_err());
        assert!(parse_project("tomcat=a,,c").is_err());
    }

    #[test]
    fn test_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "smellcorr",
            "analyze",
            "-p",
            "a=s.csv,r.csv,f.csv",
            "-p",
            "b=s.csv,r.csv,f.csv",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                ref projects,
                format,
                verbosity,
                ..
            } => {
                assert_eq!(projects.len(), 2);
                assert_eq!(format, Some(OutputFormat::Json));
                assert_eq!(verbosity, 2);
            }
            _ => panic!("expected analyze"),
        }
    }
}
