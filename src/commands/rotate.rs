use crate::export;
use crate::page_range::PageSelection;
use crate::pdf::PdfDocument;
use crate::settings::SettingsStore;
use anyhow::Result;
use std::path::Path;

pub fn run(
    input: &Path,
    degrees: i32,
    pages: Option<&str>,
    output_dir: Option<&Path>,
    store: &mut SettingsStore,
) -> Result<()> {
    if !export::is_pdf_path(input) {
        anyhow::bail!("Not a PDF file: {}", input.display());
    }

    let mut doc = PdfDocument::open(input)?;
    let total = doc.page_count();

    let page_list = match pages {
        Some(expr) => {
            let selection = PageSelection::parse(expr, total)?;
            if selection.is_empty() {
                anyhow::bail!("No pages selected");
            }
            selection.pages()
        }
        None => (1..=total).collect(),
    };

    doc.rotate_pages(&page_list, degrees)?;

    let dir = export::resolve_export_dir(
        super::override_dir(output_dir, store.settings()),
        &[input.to_path_buf()],
    );
    let output = export::unique_output_path(&dir, &export::rotate_base_name(input))?;

    PdfDocument::save(&mut doc.doc, &output)?;
    store.remember_input_dir(input);

    println!(
        "Rotated {} page(s) by {}° into {}",
        page_list.len(),
        degrees,
        output.display()
    );

    Ok(())
}
