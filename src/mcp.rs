use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export;
use crate::page_range::PageSelection;
use crate::pdf::{self, PdfDocument};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page range expression (e.g., '1,3-5')")]
    pub pages: String,
    #[schemars(description = "Directory to export to (default: next to the input)")]
    #[serde(default)]
    pub output_dir: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfMergeRequest {
    #[schemars(description = "Paths of the PDF files to merge, in order")]
    pub inputs: Vec<String>,
    #[schemars(description = "Directory to export to (default: next to the first input)")]
    #[serde(default)]
    pub output_dir: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfRotateRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Rotation in degrees, a multiple of 90 (e.g., 90, -90, 180)")]
    pub degrees: i32,
    #[schemars(description = "Pages to rotate (e.g., '1,3-5'; default: all pages)")]
    #[serde(default)]
    pub pages: Option<String>,
    #[schemars(description = "Directory to export to (default: next to the input)")]
    #[serde(default)]
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get PDF metadata including title, author, and page count")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match PdfDocument::open(&path) {
            Ok(doc) => {
                let info = doc.info();
                let result = PdfInfoResult {
                    path,
                    page_count: info.page_count,
                    title: info.title,
                    author: info.author,
                    subject: info.subject,
                    creator: info.creator,
                    producer: info.producer,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Create a new PDF containing only the selected pages of a source PDF. \
                          Use a page range expression like '1,3-5'.")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        match split_to_file(&req) {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Merge two or more PDF files into a single new PDF, preserving order. \
                          Non-PDF paths are skipped.")]
    fn pdf_merge(&self, Parameters(req): Parameters<PdfMergeRequest>) -> String {
        match merge_to_file(&req) {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Rotate pages of a PDF by a multiple of 90 degrees and save the result \
                          to a new PDF.")]
    fn pdf_rotate(&self, Parameters(req): Parameters<PdfRotateRequest>) -> String {
        match rotate_to_file(&req) {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }
}

fn split_to_file(req: &PdfSplitRequest) -> Result<SplitResult> {
    let input = Path::new(&req.path);
    if !export::is_pdf_path(input) {
        anyhow::bail!("Not a PDF file: {}", input.display());
    }

    let doc = PdfDocument::open(input)?;
    let selection = PageSelection::parse(&req.pages, doc.page_count())?;
    if selection.is_empty() {
        anyhow::bail!("No pages selected");
    }

    let page_list = selection.pages();
    let mut new_doc = doc.extract_pages(&page_list)?;

    let override_dir = req.output_dir.as_deref().map(Path::new);
    let dir = export::resolve_export_dir(override_dir, &[input.to_path_buf()]);
    let output = export::unique_output_path(&dir, &export::split_base_name(input, &page_list))?;
    PdfDocument::save(&mut new_doc, &output)?;

    Ok(SplitResult {
        output_path: output.display().to_string(),
        page_count: page_list.len() as u32,
    })
}

fn merge_to_file(req: &PdfMergeRequest) -> Result<MergeResult> {
    let inputs: Vec<PathBuf> = req.inputs.iter().map(PathBuf::from).collect();
    let pdfs = export::filter_pdf_paths(&inputs);
    if pdfs.len() < 2 {
        anyhow::bail!(
            "Need at least 2 PDF files to merge, got {} after filtering",
            pdfs.len()
        );
    }

    let mut merged = pdf::merge::merge_documents(&pdfs)?;
    let page_count = merged.get_pages().len() as u32;

    let override_dir = req.output_dir.as_deref().map(Path::new);
    let dir = export::resolve_export_dir(override_dir, &pdfs);
    let output = export::unique_output_path(&dir, &export::merge_base_name(&pdfs))?;
    PdfDocument::save(&mut merged, &output)?;

    Ok(MergeResult {
        output_path: output.display().to_string(),
        input_count: pdfs.len() as u32,
        page_count,
    })
}

fn rotate_to_file(req: &PdfRotateRequest) -> Result<RotateResult> {
    let input = Path::new(&req.path);
    if !export::is_pdf_path(input) {
        anyhow::bail!("Not a PDF file: {}", input.display());
    }

    let mut doc = PdfDocument::open(input)?;
    let total = doc.page_count();

    let page_list = match req.pages.as_deref() {
        Some(expr) => {
            let selection = PageSelection::parse(expr, total)?;
            if selection.is_empty() {
                anyhow::bail!("No pages selected");
            }
            selection.pages()
        }
        None => (1..=total).collect(),
    };

    doc.rotate_pages(&page_list, req.degrees)?;

    let override_dir = req.output_dir.as_deref().map(Path::new);
    let dir = export::resolve_export_dir(override_dir, &[input.to_path_buf()]);
    let output = export::unique_output_path(&dir, &export::rotate_base_name(input))?;
    PdfDocument::save(&mut doc.doc, &output)?;

    Ok(RotateResult {
        output_path: output.display().to_string(),
        page_count: page_list.len() as u32,
        degrees: req.degrees,
    })
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub page_count: u32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitResult {
    pub output_path: String,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MergeResult {
    pub output_path: String,
    pub input_count: u32,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RotateResult {
    pub output_path: String,
    pub page_count: u32,
    pub degrees: i32,
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF manipulation tools. Use pdf_info to get document metadata, pdf_split to \
                 extract a page selection into a new file, pdf_merge to combine files, and \
                 pdf_rotate to rotate pages."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
