use super::{combined_cells, describe_outcome, format_p_value, format_percentage};
use crate::analysis::{ProjectAnalysis, StudySummary};
use crate::core::DesignSmell;
use crate::errors::ProjectFailure;
use crate::io::output::{OutputWriter, StudyReport};
use std::io::Write;

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &StudyReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Design Smell and Vulnerability Study")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{} project(s) analyzed, {} failed.",
            report.projects.len(),
            report.failures.len()
        )?;
        writeln!(self.writer)?;

        for project in &report.projects {
            self.write_project(project)?;
        }
        self.write_failures(&report.failures)?;
        self.write_summary(&report.summary)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn table_header(&mut self, columns: &[&str]) -> anyhow::Result<()> {
        writeln!(self.writer, "| {} |", columns.join(" | "))?;
        let separators: Vec<&str> = columns.iter().map(|_| "---").collect();
        writeln!(self.writer, "|{}|", separators.join("|"))?;
        Ok(())
    }

    fn table_row(&mut self, cells: &[String]) -> anyhow::Result<()> {
        writeln!(self.writer, "| {} |", cells.join(" | "))?;
        Ok(())
    }

    fn write_project(&mut self, project: &ProjectAnalysis) -> anyhow::Result<()> {
        writeln!(self.writer, "## Project `{}`", project.project)?;
        writeln!(self.writer)?;

        let percentages = &project.percentages;
        self.table_header(&["Metric", "Value"])?;
        self.table_row(&["Classes analyzed".into(), project.class_count.to_string()])?;
        self.table_row(&[
            "Scan findings".into(),
            project.vulnerability_count.to_string(),
        ])?;
        self.table_row(&[
            "Vulnerable classes".into(),
            format_percentage(percentages.code_smell_percentage),
        ])?;
        self.table_row(&[
            "Classes with design smells".into(),
            format!(
                "{} ({})",
                format_percentage(percentages.flawed_percentage),
                percentages.flawed_count
            ),
        ])?;
        self.table_row(&[
            "Findings in classes with design smells".into(),
            format_percentage(percentages.vulnerable_flawed_percentage),
        ])?;
        writeln!(self.writer)?;

        writeln!(self.writer, "### Design smell counts")?;
        writeln!(self.writer)?;
        self.table_header(&["Design Smell", "Occurrences"])?;
        for (smell, count) in project.occurrences.smell_counts.iter() {
            self.table_row(&[smell.to_string(), count.to_string()])?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "### Chi-squared tests")?;
        writeln!(self.writer)?;
        self.table_header(&["Design Smell", "Category", "Chi2", "p-value", "Significant"])?;
        for smell in DesignSmell::ALL {
            for (category, result) in project.independence.results_for(smell) {
                self.table_row(&[
                    smell.to_string(),
                    category.to_string(),
                    format!("{:.4}", result.statistic),
                    format_p_value(result.p_value),
                    result.significance_label().to_string(),
                ])?;
            }
        }
        writeln!(self.writer)?;

        let skipped: Vec<String> = project
            .independence
            .skipped()
            .map(|(test, reason)| format!("- {} x {}: {}", test.smell, test.category, reason.describe()))
            .collect();
        if !skipped.is_empty() {
            writeln!(self.writer, "Skipped pairs:")?;
            writeln!(self.writer)?;
            for line in skipped {
                writeln!(self.writer, "{line}")?;
            }
            writeln!(self.writer)?;
        }

        if !project.vulnerable_classes.is_empty() {
            writeln!(self.writer, "### Vulnerable classes")?;
            writeln!(self.writer)?;
            self.table_header(&["Class", "Design Smells", "Categories", "CWE"])?;
            for class in &project.vulnerable_classes {
                let smells: Vec<String> = class.flags.present().map(|s| s.to_string()).collect();
                self.table_row(&[
                    format!("`{}`", class.name),
                    smells.join(", "),
                    class.vulnerability_classes.join(", "),
                    class.cwes.join(", ").replace('|', "\\|"),
                ])?;
            }
            writeln!(self.writer)?;
        }

        writeln!(
            self.writer,
            "Any design smell x any vulnerability: {}",
            describe_outcome(&project.any_smell)
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_failures(&mut self, failures: &[ProjectFailure]) -> anyhow::Result<()> {
        if failures.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Failed projects")?;
        writeln!(self.writer)?;
        self.table_header(&["Project", "Stage", "Error"])?;
        for failure in failures {
            self.table_row(&[
                failure.project.clone(),
                failure.stage.as_str().to_string(),
                failure.error.replace('|', "\\|"),
            ])?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, summary: &StudySummary) -> anyhow::Result<()> {
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;

        let averages = &summary.averages;
        self.table_header(&["Metric", "Value"])?;
        self.table_row(&["Projects".into(), summary.project_count.to_string()])?;
        self.table_row(&["Classes analyzed".into(), summary.class_total.to_string()])?;
        self.table_row(&[
            "Scan findings".into(),
            summary.vulnerability_total.to_string(),
        ])?;
        self.table_row(&[
            "Mean vulnerable classes".into(),
            format_percentage(averages.code_smell_percentage),
        ])?;
        self.table_row(&[
            "Mean classes with design smells".into(),
            format_percentage(averages.flawed_percentage),
        ])?;
        self.table_row(&[
            "Mean findings in classes with design smells".into(),
            format_percentage(averages.vulnerable_flawed_percentage),
        ])?;
        writeln!(self.writer)?;

        writeln!(self.writer, "### Vulnerability categories by design smell")?;
        writeln!(self.writer)?;
        let mut columns = vec!["Category".to_string()];
        columns.extend(DesignSmell::ALL.iter().map(|smell| smell.to_string()));
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
        self.table_header(&columns)?;
        for (category, row) in summary.occurrence_totals.rows() {
            let mut cells = vec![category.to_string()];
            cells.extend(row.iter().map(|count| count.to_string()));
            self.table_row(&cells)?;
        }
        let mut means = vec!["**Mean**".to_string()];
        means.extend(
            summary
                .mean_occurrences
                .iter()
                .map(|(_, mean)| format!("{:.2}", mean)),
        );
        self.table_row(&means)?;
        writeln!(self.writer)?;

        writeln!(self.writer, "### Combined p-values (Fisher)")?;
        writeln!(self.writer)?;
        if summary.combined_p_values.is_empty() {
            writeln!(self.writer, "No pair was tested in any project.")?;
            return Ok(());
        }
        self.table_header(&[
            "Design Smell",
            "Category",
            "Projects",
            "Statistic",
            "p-value",
            "Significant",
        ])?;
        for pair in &summary.combined_p_values {
            let [statistic, p_value, significant] = combined_cells(pair);
            self.table_row(&[
                pair.series.smell.to_string(),
                pair.series.category.clone(),
                pair.series.p_values.len().to_string(),
                statistic,
                p_value,
                significant,
            ])?;
        }
        Ok(())
    }
}
