use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::CleanError;

/// One date string to clean, with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DateInput {
    pub text: String,
    pub country_code: String,
    pub source: PathBuf,
    pub line: usize,
}

fn is_input_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("txt") | Some("tsv")
    )
}

/// Discover input files under `root`. A file given directly is used as is;
/// a directory is walked for `.txt` and `.tsv` files in name order.
pub fn scan_inputs(root: &Path) -> Result<Vec<PathBuf>, CleanError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && is_input_file(path) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// `date[\tcountry]`. Blank lines and `#` comments yield nothing.
pub fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return None;
    }
    let (text, country) = line.split_once('\t').unwrap_or((line, ""));
    Some((text.trim().to_string(), country.trim().to_string()))
}

/// Every date line of one file.
pub fn read_inputs(path: &Path) -> Result<Vec<DateInput>, CleanError> {
    let content = std::fs::read_to_string(path).map_err(|e| CleanError::io(path, e))?;
    Ok(content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            parse_line(line).map(|(text, country_code)| DateInput {
                text,
                country_code,
                source: path.to_path_buf(),
                line: idx + 1,
            })
        })
        .collect())
}

/// All distinct (date, country) pairs under `root`, first occurrence kept.
pub fn collect_inputs(root: &Path) -> Result<Vec<DateInput>, CleanError> {
    let mut seen = HashSet::new();
    let mut inputs = Vec::new();
    for path in scan_inputs(root)? {
        let found = read_inputs(&path)?;
        tracing::debug!(path = %path.display(), lines = found.len(), "input file read");
        for input in found {
            if seen.insert((input.text.clone(), input.country_code.clone())) {
                inputs.push(input);
            }
        }
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("16th century\tGR"),
            Some(("16th century".to_string(), "GR".to_string()))
        );
        assert_eq!(parse_line("1850\r"), Some(("1850".to_string(), String::new())));
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("# header"), None);
    }

    #[test]
    fn test_collect_inputs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "1850\n16th century\tGR\n\n1850\n").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/b.tsv"), "16th century\tTR\n16th century\tGR\n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "1900\n").unwrap();

        let inputs = collect_inputs(dir.path()).unwrap();
        let pairs: Vec<(&str, &str)> = inputs
            .iter()
            .map(|i| (i.text.as_str(), i.country_code.as_str()))
            .collect();
        assert_eq!(pairs, vec![("1850", ""), ("16th century", "GR"), ("16th century", "TR")]);
        assert_eq!(inputs[1].line, 2);
    }

    #[test]
    fn test_single_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("dates.txt");
        std::fs::write(&file, "1995-98\n").unwrap();
        assert_eq!(scan_inputs(&file).unwrap(), vec![file.clone()]);
        assert_eq!(collect_inputs(&file).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            scan_inputs(&dir.path().join("none")),
            Err(CleanError::Walk(_))
        ));
    }
}
