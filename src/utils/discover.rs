//! Recursive PDF discovery.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find every `*.pdf` regular file under `directory`, at any depth.
///
/// A symlink counts when it points at a regular file. Symlinked directories
/// are not descended into.
///
/// Results are sorted by full path so repeated runs over the same tree
/// process files in the same order. An empty result is not an error.
pub fn find_all_pdfs(directory: &Path) -> Vec<PathBuf> {
    let mut pdf_files: Vec<PathBuf> = WalkDir::new(directory)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.path().is_file())
        .filter(|entry| is_pdf(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    pdf_files.sort();
    pdf_files
}

fn is_pdf(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sorted_across_depths() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("x/y")).unwrap();
        fs::write(root.join("x/y/c.pdf"), b"").unwrap();
        fs::write(root.join("b.pdf"), b"").unwrap();
        fs::write(root.join("a.pdf"), b"").unwrap();

        let found = find_all_pdfs(root);
        assert_eq!(
            found,
            vec![root.join("a.pdf"), root.join("b.pdf"), root.join("x/y/c.pdf")]
        );
    }

    #[test]
    fn test_directories_and_other_files_excluded() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("folder.pdf")).unwrap();
        fs::write(root.join("notes.txt"), b"").unwrap();
        fs::write(root.join("paper.pdf.bak"), b"").unwrap();
        fs::write(root.join("paper.pdf"), b"").unwrap();

        assert_eq!(find_all_pdfs(root), vec![root.join("paper.pdf")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_pdf_is_found() {
        let dir = tempdir().unwrap();
        let target = tempdir().unwrap();
        let real = target.path().join("real.pdf");
        fs::write(&real, b"").unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("linked.pdf")).unwrap();
        std::os::unix::fs::symlink(target.path(), dir.path().join("linked_dir")).unwrap();

        assert_eq!(find_all_pdfs(dir.path()), vec![dir.path().join("linked.pdf")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_skipped() {
        let dir = tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.pdf"), dir.path().join("broken.pdf"))
            .unwrap();

        assert!(find_all_pdfs(dir.path()).is_empty());
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(find_all_pdfs(dir.path()).is_empty());
    }

    #[test]
    fn test_missing_directory_yields_nothing() {
        assert!(find_all_pdfs(Path::new("/nonexistent/refmaker-dir")).is_empty());
    }
}
