use anyhow::{Context, Result};
use lopdf::{Document, Object, ObjectId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub struct PdfDocument {
    pub doc: Document,
    path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let doc = Document::load(&path)
            .with_context(|| format!("Failed to open PDF: {}", path.display()))?;
        Ok(PdfDocument { doc, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// 1-indexed page numbers with their object IDs, ascending.
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Document-information dictionary fields plus the page count.
    pub fn info(&self) -> PdfInfo {
        let mut info = PdfInfo {
            page_count: self.page_count(),
            ..PdfInfo::default()
        };

        if let Ok(Object::Reference(info_ref)) = self.doc.trailer.get(b"Info") {
            if let Ok(Object::Dictionary(dict)) = self.doc.get_object(*info_ref) {
                info.title = info_string(dict, b"Title");
                info.author = info_string(dict, b"Author");
                info.subject = info_string(dict, b"Subject");
                info.creator = info_string(dict, b"Creator");
                info.producer = info_string(dict, b"Producer");
            }
        }

        info
    }

    /// New document containing only the given 1-indexed pages, in document
    /// order. Built by deleting the complement and pruning what that orphans.
    pub fn extract_pages(&self, pages: &[u32]) -> Result<Document> {
        let total = self.page_count();
        for &page in pages {
            if page == 0 || page > total {
                anyhow::bail!("Page {} is out of range (1-{})", page, total);
            }
        }

        let mut new_doc = self.doc.clone();
        let to_delete: Vec<u32> = (1..=total).filter(|num| !pages.contains(num)).collect();
        if !to_delete.is_empty() {
            new_doc.delete_pages(&to_delete);
        }

        new_doc.prune_objects();
        new_doc.compress();

        Ok(new_doc)
    }

    /// Add `degrees` (a multiple of 90, may be negative) to `/Rotate` on each
    /// of the given pages. Rotation state lives in the page dictionary, so
    /// saving the document afterwards persists it.
    pub fn rotate_pages(&mut self, pages: &[u32], degrees: i32) -> Result<()> {
        if degrees % 90 != 0 {
            anyhow::bail!("Rotation must be a multiple of 90, got {}", degrees);
        }

        let page_map = self.doc.get_pages();
        let total = page_map.len() as u32;

        let mut targets = Vec::with_capacity(pages.len());
        for &page in pages {
            let id = page_map
                .get(&page)
                .copied()
                .with_context(|| format!("Page {} is out of range (1-{})", page, total))?;
            targets.push(id);
        }

        for id in targets {
            let dict = self
                .doc
                .get_object_mut(id)
                .and_then(Object::as_dict_mut)
                .context("Page object is not a dictionary")?;
            let current = dict.get(b"Rotate").and_then(Object::as_i64).unwrap_or(0);
            let rotated = (current + degrees as i64).rem_euclid(360);
            dict.set("Rotate", rotated);
        }

        Ok(())
    }

    /// Save via a temp file in the destination directory so a failure mid-write
    /// never leaves a truncated output at the final path.
    pub fn save(doc: &mut Document, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        doc.save_to(&mut tmp)
            .with_context(|| format!("Failed to save PDF: {}", path.display()))?;
        tmp.persist(path)
            .map_err(|err| err.error)
            .with_context(|| format!("Failed to save PDF: {}", path.display()))?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PdfInfo {
    pub page_count: u32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

fn info_string(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key) {
        Ok(Object::String(bytes, _)) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Info strings are UTF-16BE when they carry a BOM, else PDFDocEncoding,
/// which Latin-1 approximates well enough for display.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}
