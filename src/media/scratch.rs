use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Owns a transient file path and removes whatever is there when dropped,
/// covering both success and failure paths. Removal is best-effort: a file
/// that was never written (or already gone) is not an error.
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Claims `file_name` inside `dir` (creating the directory if needed)
    /// without writing anything yet. Acquire the guard before producing the
    /// file so a partial write is still cleaned up.
    pub fn claim(dir: &Path, file_name: &str) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(file_name),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let scratch = ScratchFile::claim(dir.path(), "spool.bin").unwrap();
            fs::write(scratch.path(), b"data").unwrap();
            assert!(scratch.path().exists());
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn drop_tolerates_a_file_that_was_never_written() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchFile::claim(dir.path(), "never.bin").unwrap();
        drop(scratch);
    }
}
