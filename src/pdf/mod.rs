pub mod document;
pub mod merge;

pub use document::PdfDocument;
