pub mod check;
pub mod normalize;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read the request payload from a file, or from stdin when the path is absent or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request from {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read request from stdin")?;
            Ok(buffer)
        }
    }
}

pub fn describe_source(path: Option<&PathBuf>) -> String {
    match path {
        Some(path) if path.as_path() != Path::new("-") => path.display().to_string(),
        _ => "stdin".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("request.json");
        std::fs::write(&path, r#"{"page": 1}"#).expect("write request");
        assert_eq!(read_input(Some(&path)).expect("readable"), r#"{"page": 1}"#);
    }

    #[test]
    fn test_describe_source() {
        assert_eq!(describe_source(None), "stdin");
        assert_eq!(describe_source(Some(&PathBuf::from("-"))), "stdin");
        assert_eq!(describe_source(Some(&PathBuf::from("req.json"))), "req.json");
    }
}
