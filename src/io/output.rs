use super::writers::{JsonWriter, MarkdownWriter, TerminalWriter};
use crate::analysis::{ProjectAnalysis, StudySummary};
use crate::errors::ProjectFailure;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
}

/// Everything a study run produced, in project order.
#[derive(Debug, Clone, Serialize)]
pub struct StudyReport {
    pub projects: Vec<ProjectAnalysis>,
    pub failures: Vec<ProjectFailure>,
    pub summary: StudySummary,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &StudyReport) -> anyhow::Result<()>;
}

/// Writer for `format`, targeting `output` or stdout.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout()),
    };

    Ok(match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink)),
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(sink)),
    })
}
