use super::{combined_cells, describe_outcome, format_p_value, format_percentage};
use crate::analysis::{ProjectAnalysis, StudySummary};
use crate::core::{DesignSmell, VULNERABILITY_CATEGORIES};
use crate::errors::ProjectFailure;
use crate::io::output::{OutputWriter, StudyReport};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use std::io::Write;

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &StudyReport) -> anyhow::Result<()> {
        for project in &report.projects {
            self.write_project(project)?;
        }
        self.write_failures(&report.failures)?;
        self.write_summary(&report.summary)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn smell_header(first: &str) -> Vec<String> {
    std::iter::once(first.to_string())
        .chain(DesignSmell::ALL.iter().map(|smell| smell.to_string()))
        .collect()
}

impl<W: Write> TerminalWriter<W> {
    fn heading(&mut self, title: &str) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "═══════════════════════════════════════════".cyan())?;
        writeln!(self.writer, "  {}", title.bold().cyan())?;
        writeln!(self.writer, "{}", "═══════════════════════════════════════════".cyan())?;
        Ok(())
    }

    fn write_project(&mut self, project: &ProjectAnalysis) -> anyhow::Result<()> {
        self.heading(&format!("PROJECT {}", project.project))?;

        let percentages = &project.percentages;
        writeln!(self.writer, "Classes analyzed: {}", project.class_count)?;
        writeln!(
            self.writer,
            "Scan findings: {} ({} distinct classes)",
            project.vulnerability_count, project.unique_vulnerability_count
        )?;
        writeln!(
            self.writer,
            "Vulnerable classes: {}",
            format_percentage(percentages.code_smell_percentage)
        )?;
        writeln!(
            self.writer,
            "Classes with design smells: {} ({} classes)",
            format_percentage(percentages.flawed_percentage),
            percentages.flawed_count
        )?;
        writeln!(
            self.writer,
            "Findings in classes with design smells: {}",
            format_percentage(percentages.vulnerable_flawed_percentage)
        )?;

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "Design smell counts".bold())?;
        let mut counts = new_table(vec!["Design Smell".into(), "Occurrences".into()]);
        for (smell, count) in project.occurrences.smell_counts.iter() {
            counts.add_row(vec![smell.to_string(), count.to_string()]);
        }
        writeln!(self.writer, "{counts}")?;

        for smell in DesignSmell::ALL {
            let results: Vec<_> = project.independence.results_for(smell).collect();
            writeln!(self.writer)?;
            writeln!(self.writer, "{} {}", "Chi-squared results for".bold(), smell)?;
            if results.is_empty() {
                writeln!(self.writer, "  {}", "no testable category".dimmed())?;
                continue;
            }
            let mut table = new_table(vec![
                "Category".into(),
                "Chi2".into(),
                "p-value".into(),
                "Significant".into(),
            ]);
            for (category, result) in results {
                table.add_row(vec![
                    category.to_string(),
                    format!("{:.4}", result.statistic),
                    format_p_value(result.p_value),
                    result.significance_label().to_string(),
                ]);
            }
            writeln!(self.writer, "{table}")?;
        }

        let skipped = project.independence.skipped().count();
        if skipped > 0 {
            writeln!(
                self.writer,
                "{}",
                format!("{} pair(s) skipped", skipped).yellow()
            )?;
        }

        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{} {}",
            "Any design smell x any vulnerability:".bold(),
            describe_outcome(&project.any_smell)
        )?;
        Ok(())
    }

    fn write_failures(&mut self, failures: &[ProjectFailure]) -> anyhow::Result<()> {
        if failures.is_empty() {
            return Ok(());
        }
        self.heading("FAILED PROJECTS")?;
        for failure in failures {
            writeln!(
                self.writer,
                "  {} [{}] {}",
                failure.project.red(),
                failure.stage.as_str(),
                failure.error
            )?;
        }
        Ok(())
    }

    fn write_summary(&mut self, summary: &StudySummary) -> anyhow::Result<()> {
        self.heading(&format!("STUDY SUMMARY ({} projects)", summary.project_count))?;

        let averages = &summary.averages;
        writeln!(
            self.writer,
            "Mean vulnerable classes: {}",
            format_percentage(averages.code_smell_percentage)
        )?;
        writeln!(
            self.writer,
            "Mean classes with design smells: {}",
            format_percentage(averages.flawed_percentage)
        )?;
        writeln!(
            self.writer,
            "Mean findings in classes with design smells: {}",
            format_percentage(averages.vulnerable_flawed_percentage)
        )?;
        writeln!(self.writer, "Classes analyzed: {}", summary.class_total)?;
        writeln!(self.writer, "Scan findings: {}", summary.vulnerability_total)?;

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "Design smell occurrences".bold())?;
        let mut totals = new_table(vec!["Design Smell".into(), "Occurrences".into()]);
        for (smell, count) in summary.smell_totals.iter() {
            totals.add_row(vec![smell.to_string(), count.to_string()]);
        }
        writeln!(self.writer, "{totals}")?;

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "Vulnerability categories by design smell".bold())?;
        let mut matrix = new_table(smell_header("Category"));
        for (category, row) in summary.occurrence_totals.rows() {
            matrix.add_row(
                std::iter::once(category.to_string())
                    .chain(row.iter().map(|count| count.to_string()))
                    .collect::<Vec<_>>(),
            );
        }
        matrix.add_row(
            std::iter::once(format!("Mean of {}", VULNERABILITY_CATEGORIES.len()))
                .chain(summary.mean_occurrences.iter().map(|(_, mean)| format!("{:.2}", mean)))
                .collect::<Vec<_>>(),
        );
        writeln!(self.writer, "{matrix}")?;

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "Combined p-values (Fisher)".bold())?;
        if summary.combined_p_values.is_empty() {
            writeln!(self.writer, "  {}", "no pair was tested in any project".dimmed())?;
            return Ok(());
        }
        let mut combined = new_table(vec![
            "Design Smell".into(),
            "Category".into(),
            "Projects".into(),
            "Statistic".into(),
            "p-value".into(),
            "Significant".into(),
        ]);
        for pair in &summary.combined_p_values {
            let [statistic, p_value, significant] = combined_cells(pair);
            combined.add_row(vec![
                pair.series.smell.to_string(),
                pair.series.category.clone(),
                pair.series.p_values.len().to_string(),
                statistic,
                p_value,
                significant,
            ]);
        }
        writeln!(self.writer, "{combined}")?;
        Ok(())
    }
}
