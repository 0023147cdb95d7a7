// Project root discovery

use std::path::{Path, PathBuf};

/// Marker file identifying the project root
pub const CONFIG_FILE_NAME: &str = "crm-housekeeper.toml";

/// Nearest ancestor of `start` (inclusive) holding the marker file
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_marker_in_ancestor() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(CONFIG_FILE_NAME), "").unwrap();
        let nested = root.path().join("crm/cron_jobs");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), Some(root.path().to_path_buf()));
    }

    #[test]
    fn test_no_marker() {
        let dir = tempfile::tempdir().unwrap();
        // tempdir lives under the system temp dir, which has no marker
        assert_eq!(find_project_root(dir.path()), None);
    }
}
