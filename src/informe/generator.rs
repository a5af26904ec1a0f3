//! Generator for the annual income statement of one beneficiary.

use std::fmt::{self, Write as _};
use std::fs;

use super::common::{escape_typst_string, format_document, get_static_dir, informe_filename};
use super::engine::TypstRenderEngine;
use super::logo::{load_logo, Logo, LOGO_FILE};
use super::table::StatementTable;
use super::traits::Generator;
use super::{GeneratedDocument, GeneratorError, InformeConfig};
use crate::declaration::{Beneficiary, BeneficiaryKind, GlobalHeader};

const TEMPLATE_FILE: &str = "informe_rendimentos.typ";
const TEMPLATE_ENTRY: &str = "informe";

/// Everything needed to render one informe.
#[derive(Debug, Clone, Copy)]
pub struct InformeRequest<'a> {
    pub beneficiary: &'a Beneficiary,
    pub header: &'a GlobalHeader,
    pub logo: Option<&'a Logo>,
}

/// Generator for the "Comprovante Anual de Rendimentos".
pub struct InformeGenerator {
    template: String,
    engine: TypstRenderEngine,
    config: InformeConfig,
}

impl InformeGenerator {
    /// Create a generator, loading the Typst template from the static directory.
    pub fn new(config: InformeConfig) -> Result<Self, GeneratorError> {
        let template_path = get_static_dir().join(TEMPLATE_FILE);
        let template = fs::read_to_string(&template_path).map_err(GeneratorError::TemplateIo)?;
        Ok(Self::with_template(template, config))
    }

    pub fn with_template(template: String, config: InformeConfig) -> Self {
        Self {
            template,
            engine: TypstRenderEngine::new(config.typst_bin.clone()),
            config,
        }
    }

    /// Render one beneficiary from raw logo bytes; a broken logo falls back
    /// to the text title.
    pub fn render(
        &self,
        beneficiary: &Beneficiary,
        header: &GlobalHeader,
        logo: Option<&[u8]>,
    ) -> Result<GeneratedDocument, GeneratorError> {
        let logo = load_logo(logo, self.config.logo_width);
        self.generate(InformeRequest {
            beneficiary,
            header,
            logo: logo.as_ref(),
        })
    }

    /// Full Typst source for a request: the template followed by the call.
    pub fn render_source(&self, request: &InformeRequest<'_>) -> Result<String, GeneratorError> {
        let mut source = String::with_capacity(self.template.len() + 2048);
        source.push_str(&self.template);
        source.push_str("\n#");
        source.push_str(TEMPLATE_ENTRY);
        source.push_str("((\n");
        self.write_data(&mut source, request)?;
        source.push_str("))\n");
        Ok(source)
    }

    fn write_data(&self, out: &mut String, request: &InformeRequest<'_>) -> fmt::Result {
        let beneficiary = request.beneficiary;
        let header = request.header;
        let table = StatementTable::build(beneficiary);

        let (kind_title, name_label) = match beneficiary.kind {
            BeneficiaryKind::Individual => ("PESSOA FÍSICA", "Nome Completo"),
            BeneficiaryKind::LegalEntity => ("PESSOA JURÍDICA", "Nome Empresarial"),
        };

        match request.logo {
            Some(logo) => {
                writeln!(
                    out,
                    "  logo: (path: {}, width: {}pt, height: {}pt),",
                    quoted(LOGO_FILE),
                    logo.width,
                    logo.height
                )?;
            }
            None => out.push_str("  logo: none,\n"),
        }

        let fields = [
            ("source_name", header.source_entity_name.clone()),
            ("source_document", format_document(&header.source_entity_document)),
            ("kind_title", kind_title.to_string()),
            ("fiscal_year", header.fiscal_year.clone()),
            (
                "beneficiary_title",
                format!("2. {} BENEFICIÁRIA DOS RENDIMENTOS", kind_title),
            ),
            ("document_label", beneficiary.kind.document_label().to_string()),
            ("name_label", name_label.to_string()),
            ("beneficiary_document", format_document(&beneficiary.document)),
            ("beneficiary_name", beneficiary.name.clone()),
            ("responsible", header.responsible_party_name.clone()),
            ("signature_date", self.config.signature_date.clone()),
            ("footer", self.config.footer.clone()),
        ];
        for (key, value) in fields {
            writeln!(out, "  {}: {},", key, quoted(&value))?;
        }

        let columns: Vec<String> = table
            .column_widths
            .iter()
            .map(|w| format!("{}pt", w))
            .collect();
        writeln!(out, "  columns: {},", typst_array(&columns))?;

        writeln!(
            out,
            "  header: {},",
            string_array(table.header.iter().copied())
        )?;

        out.push_str("  rows: (\n");
        for row in &table.rows {
            let cells = [row.month.as_str(), row.withholding_code.as_str()]
                .into_iter()
                .chain(row.amounts.iter().map(String::as_str));
            writeln!(out, "    {},", string_array(cells))?;
        }
        out.push_str("  ),\n");

        let totals = [table.totals.month.as_str(), table.totals.withholding_code.as_str()]
            .into_iter()
            .chain(table.totals.amounts.iter().map(String::as_str));
        writeln!(out, "  totals: {},", string_array(totals))
    }
}

impl Generator<InformeRequest<'_>> for InformeGenerator {
    fn generate(&self, request: InformeRequest<'_>) -> Result<GeneratedDocument, GeneratorError> {
        let beneficiary = request.beneficiary;
        let filename = informe_filename(&beneficiary.document, &beneficiary.withholding_code);
        let source = self.render_source(&request)?;

        let assets: Vec<(&str, &[u8])> = request
            .logo
            .map(|logo| vec![(LOGO_FILE, logo.png.as_slice())])
            .unwrap_or_default();

        let pdf = self.engine.render(&source, &assets)?;
        log::info!("Generated {} ({} bytes)", filename, pdf.len());

        Ok(GeneratedDocument {
            filename,
            document: beneficiary.document.clone(),
            withholding_code: beneficiary.withholding_code.clone(),
            pdf,
        })
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", escape_typst_string(value))
}

fn string_array<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = values.into_iter().map(quoted).collect();
    typst_array(&quoted)
}

/// Typst array literal; the trailing comma keeps one-element arrays arrays.
fn typst_array(items: &[String]) -> String {
    let mut out = String::from("(");
    for item in items {
        out.push_str(item);
        out.push_str(", ");
    }
    out.push(')');
    out
}
