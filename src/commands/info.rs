use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run(path: &Path) -> Result<()> {
    let doc = PdfDocument::open(path)?;
    let info = doc.info();

    println!("File: {}", path.display());
    println!("Pages: {}", info.page_count);

    if let Some(title) = &info.title {
        println!("Title: {}", title);
    }
    if let Some(author) = &info.author {
        println!("Author: {}", author);
    }
    if let Some(subject) = &info.subject {
        println!("Subject: {}", subject);
    }
    if let Some(creator) = &info.creator {
        println!("Creator: {}", creator);
    }
    if let Some(producer) = &info.producer {
        println!("Producer: {}", producer);
    }

    Ok(())
}
