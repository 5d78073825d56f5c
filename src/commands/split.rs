use crate::export;
use crate::page_range::PageSelection;
use crate::pdf::PdfDocument;
use crate::settings::SettingsStore;
use anyhow::Result;
use std::path::Path;

pub fn run(
    input: &Path,
    pages: &str,
    output_dir: Option<&Path>,
    store: &mut SettingsStore,
) -> Result<()> {
    if !export::is_pdf_path(input) {
        anyhow::bail!("Not a PDF file: {}", input.display());
    }

    let doc = PdfDocument::open(input)?;
    let selection = PageSelection::parse(pages, doc.page_count())?;
    if selection.is_empty() {
        anyhow::bail!("No pages selected");
    }

    let page_list = selection.pages();
    let mut new_doc = doc.extract_pages(&page_list)?;

    let dir = export::resolve_export_dir(
        super::override_dir(output_dir, store.settings()),
        &[input.to_path_buf()],
    );
    let output = export::unique_output_path(&dir, &export::split_base_name(input, &page_list))?;

    PdfDocument::save(&mut new_doc, &output)?;
    store.remember_input_dir(input);

    println!(
        "Extracted {} page(s) to {}",
        page_list.len(),
        output.display()
    );

    Ok(())
}
