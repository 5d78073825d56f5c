use log::warn;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Retry cap for filename collision avoidance. Hitting it means the
/// destination holds that many identically-named outputs already.
const MAX_COLLISION_SUFFIX: u32 = 10_000;

/// Longest compact page list embedded in a split filename before it is
/// abbreviated to `{first}-{last}`.
const MAX_PAGE_LIST_LEN: usize = 30;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no free filename for {base:?} in {dir} after {MAX_COLLISION_SUFFIX} attempts")]
    TooManyCollisions { base: String, dir: PathBuf },
}

/// True for paths with a `.pdf` extension, case-insensitive.
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Keep only `.pdf` paths, logging anything else. Dropped inputs are not an
/// error; they mirror a file-drop handler ignoring unsupported files.
pub fn filter_pdf_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|path| {
            let ok = is_pdf_path(path);
            if !ok {
                warn!("skipping non-PDF input: {}", path.display());
            }
            ok
        })
        .cloned()
        .collect()
}

/// Resolve the directory a generated file should land in.
///
/// Priority: an explicit override, then the parent directory of the first
/// input that exists and is writable, then the platform Downloads directory.
pub fn resolve_export_dir(override_dir: Option<&Path>, inputs: &[PathBuf]) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }

    for input in inputs {
        if let Some(parent) = input.parent() {
            if dir_is_writable(parent) {
                return parent.to_path_buf();
            }
        }
    }

    downloads_dir()
}

fn dir_is_writable(dir: &Path) -> bool {
    // An empty parent means the input was a bare filename; that resolves to
    // the current directory, which is not what the user asked for.
    if dir.as_os_str().is_empty() || !dir.is_dir() {
        return false;
    }
    tempfile::tempfile_in(dir).is_ok()
}

fn downloads_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Base name for a split output: `{stem}_pages_{compact-page-list}`.
pub fn split_base_name(input: &Path, pages: &[u32]) -> String {
    let stem = file_stem(input);
    let list = pages
        .iter()
        .map(|page| page.to_string())
        .collect::<Vec<_>>()
        .join("_");

    if list.len() > MAX_PAGE_LIST_LEN {
        let first = pages.first().copied().unwrap_or(0);
        let last = pages.last().copied().unwrap_or(first);
        format!("{}_pages_{}-{}", stem, first, last)
    } else {
        format!("{}_pages_{}", stem, list)
    }
}

/// Base name for a merge output: joined input stems, or plain "merged" once
/// that would get unwieldy.
pub fn merge_base_name(inputs: &[PathBuf]) -> String {
    if inputs.is_empty() || inputs.len() > 3 {
        return "merged".to_string();
    }
    inputs
        .iter()
        .map(|path| file_stem(path))
        .collect::<Vec<_>>()
        .join("_")
}

/// Base name for a rotate output: `{stem}_rotated`.
pub fn rotate_base_name(input: &Path) -> String {
    format!("{}_rotated", file_stem(input))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("output")
        .to_string()
}

/// First non-existing `{base}.pdf`, `{base}_1.pdf`, `{base}_2.pdf`, … in `dir`.
pub fn unique_output_path(dir: &Path, base: &str) -> Result<PathBuf, ExportError> {
    let candidate = dir.join(format!("{}.pdf", base));
    if !candidate.exists() {
        return Ok(candidate);
    }

    for counter in 1..=MAX_COLLISION_SUFFIX {
        let candidate = dir.join(format!("{}_{}.pdf", base, counter));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(ExportError::TooManyCollisions {
        base: base.to_string(),
        dir: dir.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_pdf_extension_filter() {
        assert!(is_pdf_path(Path::new("/tmp/a.pdf")));
        assert!(is_pdf_path(Path::new("/tmp/a.PDF")));
        assert!(is_pdf_path(Path::new("report.Pdf")));
        assert!(!is_pdf_path(Path::new("/tmp/a.txt")));
        assert!(!is_pdf_path(Path::new("/tmp/pdf")));
        assert!(!is_pdf_path(Path::new("/tmp/a.pdf.bak")));
    }

    #[test]
    fn test_filter_drops_non_pdfs_silently() {
        let inputs = vec![
            PathBuf::from("a.pdf"),
            PathBuf::from("notes.txt"),
            PathBuf::from("b.PDF"),
        ];
        let kept = filter_pdf_paths(&inputs);
        assert_eq!(kept, vec![PathBuf::from("a.pdf"), PathBuf::from("b.PDF")]);
    }

    #[test]
    fn test_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let chosen = resolve_export_dir(
            Some(Path::new("/explicit/choice")),
            &[dir.path().join("in.pdf")],
        );
        assert_eq!(chosen, PathBuf::from("/explicit/choice"));
    }

    #[test]
    fn test_writable_parent_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let chosen = resolve_export_dir(None, &[dir.path().join("in.pdf")]);
        assert_eq!(chosen, dir.path());
    }

    #[test]
    fn test_missing_parent_falls_through_to_downloads() {
        let input = PathBuf::from("/definitely/not/a/real/dir/in.pdf");
        let chosen = resolve_export_dir(None, &[input]);
        assert_eq!(chosen, downloads_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_parent_falls_through() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();
        if dir_is_writable(&locked) {
            // Running as root; permission bits don't apply.
            return;
        }

        let chosen = resolve_export_dir(None, &[locked.join("in.pdf")]);
        // Restore so the tempdir can be cleaned up.
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(chosen, downloads_dir());
    }

    #[test]
    fn test_later_input_parent_can_win() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            PathBuf::from("/definitely/not/a/real/dir/a.pdf"),
            dir.path().join("b.pdf"),
        ];
        assert_eq!(resolve_export_dir(None, &inputs), dir.path());
    }

    #[test]
    fn test_split_base_name_short_list() {
        let name = split_base_name(Path::new("/docs/report.pdf"), &[1, 3, 4, 5]);
        assert_eq!(name, "report_pages_1_3_4_5");
    }

    #[test]
    fn test_split_base_name_abbreviates_long_list() {
        let pages: Vec<u32> = (1..=20).collect();
        let name = split_base_name(Path::new("report.pdf"), &pages);
        assert_eq!(name, "report_pages_1-20");
    }

    #[test]
    fn test_merge_base_name_joins_up_to_three_stems() {
        let inputs = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
        assert_eq!(merge_base_name(&inputs), "a_b");

        let many: Vec<PathBuf> = (1..=4).map(|i| PathBuf::from(format!("f{}.pdf", i))).collect();
        assert_eq!(merge_base_name(&many), "merged");
    }

    #[test]
    fn test_rotate_base_name() {
        assert_eq!(rotate_base_name(Path::new("/x/scan.pdf")), "scan_rotated");
    }

    #[test]
    fn test_collision_counter() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a.pdf")).unwrap();
        File::create(dir.path().join("a_1.pdf")).unwrap();

        let path = unique_output_path(dir.path(), "a").unwrap();
        assert_eq!(path, dir.path().join("a_2.pdf"));
    }

    #[test]
    fn test_no_collision_uses_plain_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = unique_output_path(dir.path(), "fresh").unwrap();
        assert_eq!(path, dir.path().join("fresh.pdf"));
    }
}
