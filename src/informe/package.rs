//! Zip packaging for a run's documents.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{GeneratedDocument, GeneratorError};

const ARCHIVE_PREFIX: &str = "Informes";

/// Archive name for a run, e.g. `Informes_2024.zip`.
pub fn archive_name(fiscal_year: &str) -> String {
    let year = fiscal_year.trim();
    if year.is_empty() {
        format!("{}.zip", ARCHIVE_PREFIX)
    } else {
        sanitize_filename::sanitize(format!("{}_{}.zip", ARCHIVE_PREFIX, year))
    }
}

pub fn zip_documents(documents: &[GeneratedDocument]) -> Result<Vec<u8>, GeneratorError> {
    let mut buf = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for doc in documents {
            zip.start_file(doc.filename.as_str(), options)?;
            zip.write_all(&doc.pdf).map_err(zip::result::ZipError::Io)?;
        }
        zip.finish()?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_archive_name() {
        assert_eq!(archive_name("2024"), "Informes_2024.zip");
        assert_eq!(archive_name(""), "Informes.zip");
    }

    #[test]
    fn test_zip_documents_roundtrip_names() {
        let docs = vec![
            GeneratedDocument {
                filename: "Informe_1_0561.pdf".to_string(),
                document: "1".to_string(),
                withholding_code: "0561".to_string(),
                pdf: b"%PDF-1.7 a".to_vec(),
            },
            GeneratedDocument {
                filename: "Informe_2_0561.pdf".to_string(),
                document: "2".to_string(),
                withholding_code: "0561".to_string(),
                pdf: b"%PDF-1.7 b".to_vec(),
            },
        ];

        let bytes = zip_documents(&docs).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        archive
            .by_name("Informe_2_0561.pdf")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "%PDF-1.7 b");
    }
}
