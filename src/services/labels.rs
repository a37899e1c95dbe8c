//! Label vocabulary
//!
//! Reads an optional `labels.yml` from the data directory; falls back to a
//! built-in vocabulary when the file is absent or unreadable. The file is a
//! plain YAML list of strings.

use std::path::Path;

/// Vocabulary offered when no labels.yml exists.
pub fn default_vocabulary() -> Vec<String> {
    ["person", "car", "bicycle", "dog", "cat", "traffic light", "sign"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Load the vocabulary for a data directory.
pub fn load_vocabulary(data_dir: &Path) -> Vec<String> {
    parse_labels_file(&data_dir.join("labels.yml")).unwrap_or_else(default_vocabulary)
}

fn parse_labels_file(path: &Path) -> Option<Vec<String>> {
    let content = std::fs::read_to_string(path).ok()?;
    let labels: Vec<String> = serde_yaml::from_str(&content).ok()?;
    let labels: Vec<String> = labels
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    if labels.is_empty() {
        None
    } else {
        Some(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("anno-labels-test-{}-{tag}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = temp_dir("missing");
        assert_eq!(load_vocabulary(&dir), default_vocabulary());
    }

    #[test]
    fn test_yaml_list_is_loaded_in_order() {
        let dir = temp_dir("list");
        fs::write(dir.join("labels.yml"), "- pothole\n- crack\n- patch\n").unwrap();
        assert_eq!(load_vocabulary(&dir), vec!["pothole", "crack", "patch"]);
    }

    #[test]
    fn test_blank_entries_are_dropped_and_empty_file_falls_back() {
        let dir = temp_dir("blank");
        fs::write(dir.join("labels.yml"), "- pothole\n- '  '\n").unwrap();
        assert_eq!(load_vocabulary(&dir), vec!["pothole"]);

        fs::write(dir.join("labels.yml"), "[]\n").unwrap();
        assert_eq!(load_vocabulary(&dir), default_vocabulary());
    }

    #[test]
    fn test_malformed_yaml_falls_back() {
        let dir = temp_dir("bad");
        fs::write(dir.join("labels.yml"), "{ not: [a, list").unwrap();
        assert_eq!(load_vocabulary(&dir), default_vocabulary());
    }
}
