use crate::export;
use crate::pdf::{self, PdfDocument};
use crate::settings::SettingsStore;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn run(inputs: &[PathBuf], output_dir: Option<&Path>, store: &mut SettingsStore) -> Result<()> {
    let pdfs = export::filter_pdf_paths(inputs);
    if pdfs.len() < 2 {
        anyhow::bail!(
            "Need at least 2 PDF files to merge, got {} after filtering",
            pdfs.len()
        );
    }

    let mut merged = pdf::merge::merge_documents(&pdfs)?;
    let total_pages = merged.get_pages().len();

    let dir = export::resolve_export_dir(super::override_dir(output_dir, store.settings()), &pdfs);
    let output = export::unique_output_path(&dir, &export::merge_base_name(&pdfs))?;

    PdfDocument::save(&mut merged, &output)?;
    store.remember_input_dir(&pdfs[0]);

    println!(
        "Merged {} files ({} pages) into {}",
        pdfs.len(),
        total_pages,
        output.display()
    );

    Ok(())
}
