use std::collections::HashSet;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::{ProjectConfig, StudyConfig};
use crate::errors::StudyError;

/// Read the raw contents of a configuration file
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate a study configuration from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<StudyConfig, String> {
    let config = toml::from_str::<StudyConfig>(contents)
        .map_err(|e| format!("Failed to parse study config: {}", e))?;
    validate_config(&config)?;
    Ok(config)
}

/// Check invariants serde cannot express
pub fn validate_config(config: &StudyConfig) -> Result<(), String> {
    if !config.input.delimiter.is_ascii() {
        return Err(format!(
            "delimiter '{}' must be a single ASCII character",
            config.input.delimiter
        ));
    }

    if config.input.vulnerability_column.trim().is_empty() {
        return Err("vulnerability_column must not be empty".to_string());
    }

    validate_projects(&config.projects)
}

pub fn validate_projects(projects: &[ProjectConfig]) -> Result<(), String> {
    let mut names = HashSet::new();
    for project in projects {
        if project.name.trim().is_empty() {
            return Err("project names must not be empty".to_string());
        }
        if !names.insert(project.name.as_str()) {
            return Err(format!("duplicate project name '{}'", project.name));
        }
    }
    Ok(())
}

/// Resolve relative table paths against `base`
pub fn resolve_paths(mut config: StudyConfig, base: &Path) -> StudyConfig {
    let resolve = |path: &PathBuf| -> PathBuf {
        if path.is_relative() {
            base.join(path)
        } else {
            path.clone()
        }
    };

    for project in &mut config.projects {
        project.design_smells = resolve(&project.design_smells);
        project.scan_results = resolve(&project.scan_results);
        project.scanned_files = resolve(&project.scanned_files);
    }
    if let Some(dir) = config.output.charts_dir.as_ref() {
        config.output.charts_dir = Some(resolve(dir));
    }
    config
}

/// Load a study configuration from `path`.
///
/// Relative paths inside the file are resolved against its directory.
pub fn load_config(path: &Path) -> Result<StudyConfig, StudyError> {
    let contents = read_config_file(path).map_err(|e| {
        StudyError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    let config = parse_and_validate_config(&contents).map_err(StudyError::Config)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    log::debug!(
        "Loaded study config from {} ({} project(s))",
        path.display(),
        config.projects.len()
    );
    Ok(resolve_paths(config, base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::output::OutputFormat;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    const STUDY: &str = indoc! {r#"
        [input]
        delimiter = ","

        [output]
        format = "json"
        charts_dir = "charts"

        [[projects]]
        name = "Tomcat"
        design_smells = "tomcat/tomcat9.csv"
        scan_results = "tomcat/tomcat_results_9.csv"
        scanned_files = "/data/tomcat/tomcat_scanned.csv"
    "#};

    #[test]
    fn test_parse_study_config() {
        let config = parse_and_validate_config(STUDY).unwrap();
        assert_eq!(config.input.delimiter, ',');
        assert_eq!(
            config.input.vulnerability_column,
            "extra.metadata.vulnerability_class.0"
        );
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert_eq!(config.projects.len(), 1);
        assert_eq!(config.projects[0].name, "Tomcat");
    }

    #[test]
    fn test_defaults_for_empty_config() {
        let config = parse_and_validate_config("").unwrap();
        assert_eq!(config.input.delimiter, ';');
        assert!(config.projects.is_empty());
        assert_eq!(config.output.charts_dir, None);
    }

    #[test]
    fn test_duplicate_project_names_rejected() {
        let contents = format!(
            "{}\n{}",
            STUDY,
            indoc! {r#"
                [[projects]]
                name = "Tomcat"
                design_smells = "a.csv"
                scan_results = "b.csv"
                scanned_files = "c.csv"
            "#}
        );
        let err = parse_and_validate_config(&contents).unwrap_err();
        assert!(err.contains("duplicate project name 'Tomcat'"));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let err = parse_and_validate_config("[input]\ndelimiter = \"§\"\n").unwrap_err();
        assert!(err.contains("ASCII"));
    }

    #[test]
    fn test_relative_paths_resolved_against_base() {
        let config = parse_and_validate_config(STUDY).unwrap();
        let resolved = resolve_paths(config, Path::new("/studies"));
        let project = &resolved.projects[0];
        assert_eq!(project.design_smells, PathBuf::from("/studies/tomcat/tomcat9.csv"));
        assert_eq!(
            project.scanned_files,
            PathBuf::from("/data/tomcat/tomcat_scanned.csv")
        );
        assert_eq!(resolved.output.charts_dir, Some(PathBuf::from("/studies/charts")));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = load_config(Path::new("/nonexistent/study.toml")).unwrap_err();
        assert!(matches!(err, StudyError::Config(_)));
    }
}
