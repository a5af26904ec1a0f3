//! Informe generation - one PDF income statement per beneficiary.
//!
//! - `table` computes the monthly rows and totals
//! - `generator` turns a beneficiary into Typst source
//! - `engine` compiles the source with the Typst CLI
//! - `package` bundles a run into a zip archive

pub mod common;
pub mod engine;
pub mod generator;
pub mod logo;
pub mod package;
pub mod table;
pub mod traits;

pub use engine::TypstRenderEngine;
pub use generator::{InformeGenerator, InformeRequest};
pub use logo::{load_logo, Logo};
pub use table::{StatementRow, StatementTable};
pub use traits::Generator;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::declaration;

pub const DEFAULT_SIGNATURE_DATE: &str = "28/01/2026";
pub const DEFAULT_FOOTER: &str = "Aprovado pela IN/SRF nº 119/2000";
pub const DEFAULT_LOGO_WIDTH: f64 = 160.0;

/// Errors that can occur during informe generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to build Typst source: {0}")]
    Source(#[from] std::fmt::Error),
    #[error("failed to load Typst template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("failed to write template asset: {0}")]
    WriteAsset(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
    #[error("failed to generate {file}: {source}")]
    Document {
        file: String,
        #[source]
        source: Box<GeneratorError>,
    },
    #[error("failed to write {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build zip archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Fixed content and tooling used for every informe.
#[derive(Debug, Clone, PartialEq)]
pub struct InformeConfig {
    pub typst_bin: PathBuf,
    /// Date printed in the responsible party block.
    pub signature_date: String,
    /// Regulatory line printed at the bottom.
    pub footer: String,
    /// Logo width in points.
    pub logo_width: f64,
}

impl Default for InformeConfig {
    fn default() -> Self {
        Self {
            typst_bin: PathBuf::from("typst"),
            signature_date: DEFAULT_SIGNATURE_DATE.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
            logo_width: DEFAULT_LOGO_WIDTH,
        }
    }
}

/// Result of a successful document generation.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub filename: String,
    pub document: String,
    pub withholding_code: String,
    pub pdf: Vec<u8>,
}

/// Everything produced by one run over a declaration.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub count: usize,
    pub fiscal_year: String,
    pub documents: Vec<GeneratedDocument>,
}

impl GenerationReport {
    /// Write every document into `dir`, returning the written paths.
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, GeneratorError> {
        fs::create_dir_all(dir).map_err(|source| GeneratorError::WriteOutput {
            path: dir.to_path_buf(),
            source,
        })?;

        self.documents
            .iter()
            .map(|doc| {
                let path = dir.join(&doc.filename);
                fs::write(&path, &doc.pdf).map_err(|source| GeneratorError::WriteOutput {
                    path: path.clone(),
                    source,
                })?;
                Ok(path)
            })
            .collect()
    }

    pub fn archive_name(&self) -> String {
        package::archive_name(&self.fiscal_year)
    }

    /// Bundle all documents into an in-memory zip archive.
    pub fn to_zip(&self) -> Result<Vec<u8>, GeneratorError> {
        package::zip_documents(&self.documents)
    }
}

/// Parse `text` and render one informe per beneficiary.
///
/// The first failing document aborts the run, so `count` always matches the
/// documents actually produced.
pub fn generate_all(
    text: &str,
    logo: Option<&[u8]>,
    config: &InformeConfig,
) -> Result<GenerationReport, GeneratorError> {
    let generator = InformeGenerator::new(config.clone())?;
    let logo = load_logo(logo, config.logo_width);
    generate_with(&generator, text, logo.as_ref())
}

/// Same as [`generate_all`] with an existing generator and decoded logo.
pub fn generate_with<G>(
    generator: &G,
    text: &str,
    logo: Option<&Logo>,
) -> Result<GenerationReport, GeneratorError>
where
    G: for<'a> Generator<InformeRequest<'a>>,
{
    let declaration = declaration::parse(text);

    let mut documents = Vec::with_capacity(declaration.beneficiaries.len());
    for beneficiary in &declaration.beneficiaries {
        let request = InformeRequest {
            beneficiary,
            header: &declaration.header,
            logo,
        };
        let document = generator.generate(request).map_err(|e| {
            let file = common::informe_filename(&beneficiary.document, &beneficiary.withholding_code);
            log::error!("Aborting run, {} failed: {}", file, e);
            GeneratorError::Document {
                file,
                source: Box::new(e),
            }
        })?;
        documents.push(document);
    }

    log::info!(
        "Generated {} informes for ano-calendário {}",
        documents.len(),
        declaration.header.fiscal_year
    );

    Ok(GenerationReport {
        count: documents.len(),
        fiscal_year: declaration.header.fiscal_year,
        documents,
    })
}
