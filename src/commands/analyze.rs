//! The `analyze` command: load every project, run the per-project
//! statistics, aggregate the survivors and write the report.

use crate::analysis::{analyze_project, join_tables, AggregateReport, ProjectAnalysis};
use crate::config::{self, InputConfig, ProjectConfig, StudyConfig};
use crate::errors::{BatchResults, ProjectFailure, ProjectStage, StudyError};
use crate::io::{self, OutputFormat, StudyReport};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, info_span, warn};

pub struct AnalyzeConfig {
    /// Study file; projects given on the command line are appended to it
    pub config: Option<PathBuf>,
    pub projects: Vec<ProjectConfig>,
    pub delimiter: Option<char>,
    pub vulnerability_column: Option<String>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub charts: Option<PathBuf>,
    pub plain: bool,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let study = resolve_study(&config)?;
    let format = config
        .format
        .or(study.output.format)
        .unwrap_or_default();
    configure_output(&config, format);

    let batch = run_study(&study);
    info!(
        "Analyzed {} of {} project(s)",
        batch.success_count(),
        batch.total_count()
    );
    for failure in &batch.failures {
        warn!(
            project = %failure.project,
            stage = failure.stage.as_str(),
            "Project dropped: {}",
            failure.error
        );
    }

    let report = build_report(batch)?;

    let mut writer = io::create_writer(format, config.output.as_deref())?;
    writer.write_report(&report)?;

    if let Some(dir) = config.charts.as_ref().or(study.output.charts_dir.as_ref()) {
        io::write_charts(&report.summary, dir)
            .with_context(|| format!("Failed to write charts to {}", dir.display()))?;
    }

    Ok(())
}

fn configure_output(config: &AnalyzeConfig, format: OutputFormat) {
    if config.plain || config.output.is_some() || format != OutputFormat::Terminal {
        colored::control::set_override(false);
    }
}

/// Merge the study file with command-line projects and overrides.
pub fn resolve_study(config: &AnalyzeConfig) -> Result<StudyConfig> {
    let mut study = match &config.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("Failed to load study config {}", path.display()))?,
        None => StudyConfig::default(),
    };

    study.projects.extend(config.projects.iter().cloned());
    if let Some(delimiter) = config.delimiter {
        study.input.delimiter = delimiter;
    }
    if let Some(column) = &config.vulnerability_column {
        study.input.vulnerability_column = column.clone();
    }

    config::validate_config(&study).map_err(StudyError::Config)?;
    if study.projects.is_empty() {
        return Err(StudyError::config(
            "no projects to analyze; pass --config or --project",
        )
        .into());
    }
    Ok(study)
}

/// Analyze every project of `study`, isolating failures per project.
pub fn run_study(study: &StudyConfig) -> BatchResults<ProjectAnalysis> {
    let mut batch = BatchResults::default();

    for project in &study.projects {
        let span = info_span!("project", name = %project.name);
        let _guard = span.enter();

        match process_project(project, &study.input) {
            Ok(analysis) => {
                info!(
                    classes = analysis.class_count,
                    findings = analysis.vulnerability_count,
                    "Project analyzed"
                );
                batch.successes.push(analysis);
            }
            Err((stage, error)) => {
                batch
                    .failures
                    .push(ProjectFailure::new(project.name.as_str(), stage, &error));
            }
        }
    }

    batch
}

/// Load, join and analyze one project.
pub fn process_project(
    project: &ProjectConfig,
    input: &InputConfig,
) -> std::result::Result<ProjectAnalysis, (ProjectStage, anyhow::Error)> {
    let tables = io::load_project_tables(project, input)
        .map_err(|e| (ProjectStage::Load, anyhow::Error::from(e)))?;

    let dataset = join_tables(&project.name, &tables);
    if dataset.classes.is_empty() {
        return Err((
            ProjectStage::Join,
            StudyError::JoinMismatch {
                project: project.name.clone(),
            }
            .into(),
        ));
    }

    // Only the percentage denominators can reject a joined dataset.
    analyze_project(&dataset).map_err(|e| (ProjectStage::Percentages, anyhow::Error::from(e)))
}

/// Fold successful projects into the cross-project summary.
///
/// Fails only when no project survived.
pub fn build_report(batch: BatchResults<ProjectAnalysis>) -> Result<StudyReport> {
    if batch.successes.is_empty() {
        let details: Vec<String> = batch
            .failures
            .iter()
            .map(|f| format!("{} ({}): {}", f.project, f.stage.as_str(), f.error))
            .collect();
        anyhow::bail!(
            "No project could be analyzed ({} failed):\n  {}",
            batch.failure_count(),
            details.join("\n  ")
        );
    }

    let mut aggregate = AggregateReport::new();
    for analysis in &batch.successes {
        aggregate.add_project(analysis);
    }
    let summary = aggregate.finalize()?;

    Ok(StudyReport {
        projects: batch.successes,
        failures: batch.failures,
        summary,
    })
}
