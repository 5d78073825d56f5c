use anyhow::{Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::path::PathBuf;

/// Concatenate the documents at `inputs` into one, preserving input order.
///
/// The first document is the base. Each later document is renumbered past the
/// base's `max_id`, its objects are moved across, and its pages are appended
/// to the base page tree.
pub fn merge_documents(inputs: &[PathBuf]) -> Result<Document> {
    let mut inputs = inputs.iter();
    let first = inputs
        .next()
        .context("No input files to merge")?;
    let mut merged = Document::load(first)
        .with_context(|| format!("Failed to open PDF: {}", first.display()))?;

    for input in inputs {
        let doc = Document::load(input)
            .with_context(|| format!("Failed to open PDF: {}", input.display()))?;
        append_document(&mut merged, doc)
            .with_context(|| format!("Failed to merge {}", input.display()))?;
    }

    Ok(merged)
}

fn append_document(base: &mut Document, mut other: Document) -> Result<()> {
    other.renumber_objects_with(base.max_id + 1);

    let other_page_ids: Vec<ObjectId> = other.page_iter().collect();

    for (id, object) in std::mem::take(&mut other.objects) {
        base.objects.insert(id, object);
    }
    if other.max_id > base.max_id {
        base.max_id = other.max_id;
    }

    let pages_root_id = base
        .catalog()
        .context("Base document has no catalog")?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .context("Base document has no page tree root")?;

    {
        let pages_dict = base
            .get_object_mut(pages_root_id)
            .and_then(Object::as_dict_mut)
            .context("Page tree root is not a dictionary")?;
        let count = pages_dict
            .get(b"Count")
            .and_then(Object::as_i64)
            .unwrap_or(0);
        pages_dict.set("Count", count + other_page_ids.len() as i64);

        let kids = pages_dict
            .get_mut(b"Kids")
            .and_then(Object::as_array_mut)
            .context("Page tree root has no Kids array")?;
        for page_id in &other_page_ids {
            kids.push(Object::Reference(*page_id));
        }
    }

    // Reparent the adopted pages onto the base tree root.
    for page_id in other_page_ids {
        if let Ok(dict) = base.get_object_mut(page_id).and_then(Object::as_dict_mut) {
            dict.set("Parent", pages_root_id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::{build_test_pdf, write_test_pdf};

    fn write_pdfs(page_counts: &[u32]) -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = page_counts
            .iter()
            .enumerate()
            .map(|(i, &pages)| {
                let path = dir.path().join(format!("in{}.pdf", i));
                write_test_pdf(&mut build_test_pdf(pages), &path);
                path
            })
            .collect();
        (dir, paths)
    }

    #[test]
    fn test_merge_page_counts_add_up() {
        let (_dir, paths) = write_pdfs(&[2, 3, 1]);
        let merged = merge_documents(&paths).unwrap();
        assert_eq!(merged.get_pages().len(), 6);
    }

    #[test]
    fn test_merge_preserves_input_order() {
        let (_dir, paths) = write_pdfs(&[1, 2]);
        let merged = merge_documents(&paths).unwrap();

        // Page numbering must run contiguously across both inputs.
        let pages = merged.get_pages();
        let numbers: Vec<u32> = pages.keys().copied().collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_merge_single_input_is_a_copy() {
        let (_dir, paths) = write_pdfs(&[4]);
        let merged = merge_documents(&paths).unwrap();
        assert_eq!(merged.get_pages().len(), 4);
    }

    #[test]
    fn test_merge_result_survives_save_reload() {
        let (dir, paths) = write_pdfs(&[2, 2]);
        let mut merged = merge_documents(&paths).unwrap();

        let out = dir.path().join("merged.pdf");
        crate::pdf::PdfDocument::save(&mut merged, &out).unwrap();

        let reloaded = Document::load(&out).unwrap();
        assert_eq!(reloaded.get_pages().len(), 4);
    }

    #[test]
    fn test_merge_no_inputs_fails() {
        assert!(merge_documents(&[]).is_err());
    }

    #[test]
    fn test_merge_missing_input_fails() {
        let (_dir, mut paths) = write_pdfs(&[1]);
        paths.push(PathBuf::from("/no/such/file.pdf"));
        assert!(merge_documents(&paths).is_err());
    }
}
