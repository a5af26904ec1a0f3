use std::cell::RefCell;

use informe_rendimentos::declaration::{parse, GlobalHeader};
use informe_rendimentos::informe::{
    generate_with, GeneratedDocument, Generator, GeneratorError, InformeConfig, InformeGenerator,
    InformeRequest, Logo, StatementTable,
};

const SAMPLE: &str = "DIRF||2024\n\
RESPO||Jane Doe\n\
DECPJ|12345678000199|ACME SA\n\
IDREC|9601\n\
BPFDEC|52998224725|John Smith\n\
RTRT|100000|0|0|0|0|0|0|0|0|0|0|0\n\
RTIRF|15000|0|0|0|0|0|0|0|0|0|0|0\n";

/// Records what it was asked to render instead of calling Typst.
#[derive(Default)]
struct RecordingGenerator {
    seen: RefCell<Vec<String>>,
    fail_on: Option<String>,
}

impl<'a> Generator<InformeRequest<'a>> for RecordingGenerator {
    fn generate(&self, request: InformeRequest<'a>) -> Result<GeneratedDocument, GeneratorError> {
        let b = request.beneficiary;
        if self.fail_on.as_deref() == Some(b.document.as_str()) {
            return Err(GeneratorError::TypstExit(1));
        }
        self.seen
            .borrow_mut()
            .push(format!("{}:{}", b.name, request.logo.is_some()));
        Ok(GeneratedDocument {
            filename: format!("Informe_{}_{}.pdf", b.document, b.withholding_code),
            document: b.document.clone(),
            withholding_code: b.withholding_code.clone(),
            pdf: format!("%PDF {}", b.name).into_bytes(),
        })
    }
}

#[test]
fn test_end_to_end_statement_rows() {
    let declaration = parse(SAMPLE);
    let john = &declaration.beneficiaries[0];
    let table = StatementTable::build(john);

    assert_eq!(table.header.len(), 6);
    assert_eq!(table.rows.len(), 1);
    let january = &table.rows[0];
    assert_eq!(january.month, "Jan");
    assert_eq!(january.withholding_code, "9601");
    assert_eq!(january.amounts, vec!["1.000,00", "0,00", "0,00", "150,00"]);

    assert_eq!(table.totals.month, "Totais");
    assert_eq!(table.totals.amounts, vec!["1.000,00", "0,00", "0,00", "150,00"]);
}

#[test]
fn test_end_to_end_typst_source() {
    let declaration = parse(SAMPLE);
    let generator = InformeGenerator::new(InformeConfig::default()).unwrap();

    let source = generator.render_source(&InformeRequest {
        beneficiary: &declaration.beneficiaries[0],
        header: &declaration.header,
        logo: None,
    })
    .unwrap();

    assert!(source.contains("#let informe(data)"));
    assert!(source.contains(r#"beneficiary_document: "529.982.247-25","#));
    assert!(source.contains(r#"beneficiary_name: "John Smith","#));
    assert!(source.contains(r#"source_document: "12.345.678/0001-99","#));
    assert!(source.contains(r#"fiscal_year: "2024","#));
    assert!(source.contains(r#"responsible: "Jane Doe","#));
    assert!(source.contains(r#"signature_date: "28/01/2026","#));
    assert!(source.contains(r#"footer: "Aprovado pela IN/SRF nº 119/2000","#));
    assert!(source.contains(r#"("Jan", "9601", "1.000,00", "0,00", "0,00", "150,00", ),"#));
    assert!(!source.contains(r#""Fev""#));
}

#[test]
fn test_repeated_block_sums_months() {
    let text = "IDREC|1708\n\
                BPJDEC|11222333000181|Beta\n\
                RTRT|100000|0|0|0|0|0|0|0|0|0|0|250000\n\
                RTIRF|1500|0|0|0|0|0|0|0|0|0|0|3750\n\
                BPJDEC|11222333000181|Beta\n\
                RTRT|50000|0|0|0|0|0|0|0|0|0|0|0\n\
                RTIRF|750|0|0|0|0|0|0|0|0|0|0|0\n";
    let declaration = parse(text);
    let table = StatementTable::build(&declaration.beneficiaries[0]);

    assert_eq!(table.header.len(), 4);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].month, "Jan");
    assert_eq!(table.rows[0].amounts, vec!["1.500,00", "22,50"]);
    assert_eq!(table.rows[1].month, "Dez");
    assert_eq!(table.rows[1].amounts, vec!["2.500,00", "37,50"]);
    assert_eq!(table.totals.amounts, vec!["4.000,00", "60,00"]);
}

#[test]
fn test_all_zero_months_render_placeholder_and_totals() {
    let text = "IDREC|0561\n\
                BPFDEC|52998224725|John Smith\n\
                RTRT|0|0|0|0|0|0|0|0|0|0|0|0\n";
    let declaration = parse(text);
    let table = StatementTable::build(&declaration.beneficiaries[0]);

    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].month, "-");
    assert_eq!(table.rows[0].withholding_code, "-");
    assert_eq!(table.rows[0].amounts, vec!["0,00"; 4]);
    assert_eq!(table.totals.amounts, vec!["0,00"; 4]);
}

#[test]
fn test_generate_with_keeps_order_and_counts() {
    let text = "DIRF||2024\n\
                IDREC|0561\n\
                BPFDEC|11111111111|Ana\n\
                BPFDEC|22222222222|Bruno\n\
                IDREC|1708\n\
                BPJDEC|11222333000181|Beta\n";
    let generator = RecordingGenerator::default();
    let logo = Logo {
        png: vec![0x89, 0x50, 0x4E, 0x47],
        width: 160.0,
        height: 40.0,
    };

    let report = generate_with(&generator, text, Some(&logo)).unwrap();

    assert_eq!(report.count, 3);
    assert_eq!(report.fiscal_year, "2024");
    assert_eq!(
        *generator.seen.borrow(),
        vec!["Ana:true", "Bruno:true", "Beta:true"]
    );
    assert_eq!(report.documents[2].filename, "Informe_11222333000181_1708.pdf");
}

#[test]
fn test_failing_document_aborts_run() {
    let text = "IDREC|0561\n\
                BPFDEC|11111111111|Ana\n\
                BPFDEC|22222222222|Bruno\n\
                BPFDEC|33333333333|Carla\n";
    let generator = RecordingGenerator {
        fail_on: Some("22222222222".to_string()),
        ..Default::default()
    };

    let err = generate_with(&generator, text, None).unwrap_err();

    match err {
        GeneratorError::Document { file, .. } => {
            assert_eq!(file, "Informe_22222222222_0561.pdf");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(*generator.seen.borrow(), vec!["Ana:false"]);
}

#[test]
fn test_report_writes_documents_to_dir() {
    let generator = RecordingGenerator::default();
    let report = generate_with(&generator, SAMPLE, None).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let paths = report.write_to_dir(dir.path()).unwrap();

    assert_eq!(paths.len(), 1);
    assert!(paths[0].ends_with("Informe_52998224725_9601.pdf"));
    assert_eq!(std::fs::read(&paths[0]).unwrap(), b"%PDF John Smith");
    assert_eq!(report.archive_name(), "Informes_2024.zip");
}

#[test]
fn test_empty_declaration_produces_empty_report() {
    let generator = RecordingGenerator::default();
    let report = generate_with(&generator, "", None).unwrap();

    assert_eq!(report.count, 0);
    assert!(report.documents.is_empty());
    assert_eq!(report.fiscal_year, "");
    assert_eq!(GlobalHeader::default().fiscal_year, report.fiscal_year);
}
