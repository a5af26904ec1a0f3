//! Typst rendering engine.
//!
//! Writes the Typst source and its assets to a temporary directory, invokes
//! the compiler, and reads back the PDF.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

use super::GeneratorError;

const SOURCE_FILE: &str = "informe.typ";
const OUTPUT_FILE: &str = "informe.pdf";

/// Renders Typst sources to PDF with the `typst` CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    binary: PathBuf,
}

impl TypstRenderEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Compile `typst_source` to a PDF.
    ///
    /// `assets` are written beside the source so the template can reference
    /// them by file name.
    pub fn render(
        &self,
        typst_source: &str,
        assets: &[(&str, &[u8])],
    ) -> Result<Vec<u8>, GeneratorError> {
        let temp_dir = tempdir().map_err(GeneratorError::TempDir)?;

        fs::write(temp_dir.path().join(SOURCE_FILE), typst_source)
            .map_err(GeneratorError::WriteTypst)?;

        for (name, bytes) in assets {
            fs::write(temp_dir.path().join(name), bytes).map_err(GeneratorError::WriteAsset)?;
        }

        self.compile_typst_to_pdf(temp_dir.path())
    }

    fn compile_typst_to_pdf(&self, dir: &Path) -> Result<Vec<u8>, GeneratorError> {
        let output_path = dir.join(OUTPUT_FILE);

        let status = Command::new(&self.binary)
            .arg("compile")
            .arg(dir.join(SOURCE_FILE))
            .arg(&output_path)
            .current_dir(dir)
            .status()
            .map_err(GeneratorError::TypstIo)?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            return Err(GeneratorError::TypstExit(code));
        }

        fs::read(&output_path).map_err(GeneratorError::ReadPdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_io_error() {
        let engine = TypstRenderEngine::new("/nonexistent/typst-binary");
        let result = engine.render("= hello", &[]);
        assert!(matches!(result, Err(GeneratorError::TypstIo(_))));
    }
}
