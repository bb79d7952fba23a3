use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::json;
use super::raw::RawTable;

/// Get the default table file path (~/.config/athletics-points/table.json)
pub fn default_table_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("table.json"))
}

/// Load a raw table from a JSON file
pub fn load_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        anyhow::bail!(
            "Points table not found at {}. Run `athletics-points import <document>` first",
            path.display()
        );
    }

    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read points table at {}", path.display()))?;

    json::deserialize(&bytes).with_context(|| format!("Invalid points table in {}", path.display()))
}

/// Save a raw table to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist. The file is never
/// left half-written.
pub fn save_table(path: &Path, table: &RawTable) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let bytes = json::serialize(table)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(&bytes)
        .with_context(|| format!("Failed to write points table to {}", path.display()))?;
    file.commit().context("Failed to save points table")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawCell;
    use std::env;

    #[test]
    fn test_load_missing_file_errors() {
        let temp_path = env::temp_dir().join("athletics_points_test_missing.json");
        let _ = fs::remove_file(&temp_path);

        let err = load_table(&temp_path).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = env::temp_dir().join("athletics_points_test_store");
        let temp_path = dir.join("table.json");
        let _ = fs::remove_dir_all(&dir);

        let mut table = RawTable::with_points([2, 1]);
        table.insert("M-100m", vec![Some(RawCell::Number(9.9)), None]);

        save_table(&temp_path, &table).unwrap();
        let loaded = load_table(&temp_path).unwrap();
        assert_eq!(loaded, table);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let temp_path = env::temp_dir().join("athletics_points_test_garbage.json");
        fs::write(&temp_path, "not json").unwrap();

        let err = load_table(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Invalid points table"));

        let _ = fs::remove_file(&temp_path);
    }
}
