use crate::io;
use anyhow::Result;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "study.toml";

pub const DEFAULT_CONFIG: &str = r#"# Design smell / vulnerability study

[input]
# Field delimiter of every input table
delimiter = ";"
# Scan-table column holding the first vulnerability class
vulnerability_column = "extra.metadata.vulnerability_class.0"

[output]
# terminal, json or markdown
format = "terminal"
# Uncomment to write SVG charts
# charts_dir = "charts"

# One block per project; relative paths are resolved against this file.
[[projects]]
name = "example"
design_smells = "data/example/design_smells.csv"
scan_results = "data/example/example_results.csv"
scanned_files = "data/example/example_scanned.csv"
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_at(Path::new(CONFIG_FILE_NAME), force)
}

pub fn init_config_at(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(config_path, DEFAULT_CONFIG)?;
    println!("Created {} configuration file", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_and_validate_config;
    use tempfile::TempDir;

    #[test]
    fn test_template_is_a_valid_config() {
        let config = parse_and_validate_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.projects.len(), 1);
        assert_eq!(config.input.delimiter, ';');
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        init_config_at(&path, false).unwrap();
        assert!(init_config_at(&path, false).is_err());
        init_config_at(&path, true).unwrap();
    }
}
