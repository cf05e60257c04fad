use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes `bytes` to a sibling temp file and renames it over `dst`.
///
/// Readers see either the old file or the new one. On failure the temp file
/// is removed and `dst` is left untouched.
pub fn write_atomic(dst: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory: {}", parent.display()))?;
    }

    let tmp = temp_path(dst);
    fs::write(&tmp, bytes).with_context(|| format!("write temp: {}", tmp.display()))?;

    fs::rename(&tmp, dst).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        anyhow::Error::new(e).context(format!("replace {}", dst.display()))
    })
}

/// `session.json` -> `session.json.tmp`, so stores sharing a stem never collide.
fn temp_path(dst: &Path) -> PathBuf {
    let mut name = dst.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    dst.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"two");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn failed_replace_cleans_temp_and_keeps_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        // A non-empty directory cannot be replaced by a file.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        assert!(write_atomic(&path, b"data").is_err());
        assert!(!temp_path(&path).exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn temp_path_keeps_full_file_name() {
        assert_eq!(
            temp_path(Path::new("/tmp/config.json")),
            PathBuf::from("/tmp/config.json.tmp")
        );
    }
}
