//! Data model reconstructed from a DIRF declaration.

use serde::Serialize;

/// Number of monthly positions in every value row (January..December).
pub const MONTHS: usize = 12;

/// Raw value used for months the declaration does not fill.
pub const ZERO_CENTS: &str = "000";

/// Declaration-wide data taken from the `DIRF`, `RESPO` and `DECPJ` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlobalHeader {
    pub fiscal_year: String,
    pub responsible_party_name: String,
    pub source_entity_document: String,
    pub source_entity_name: String,
}

/// Which beneficiary tag introduced the payee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BeneficiaryKind {
    /// Introduced by `BPFDEC` (CPF).
    Individual,
    /// Introduced by `BPJDEC` (CNPJ).
    LegalEntity,
}

impl BeneficiaryKind {
    /// Label of the document column for this kind of payee.
    pub fn document_label(&self) -> &'static str {
        match self {
            Self::Individual => "CPF",
            Self::LegalEntity => "CNPJ",
        }
    }
}

/// One block of twelve-month value rows attached to a beneficiary.
///
/// Values are kept exactly as they appear in the file, in integer cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRecordGroup {
    pub income: Vec<String>,
    pub withheld_tax: Vec<String>,
    pub social_security: Vec<String>,
    pub dependents: Vec<String>,
}

impl Default for MonthlyRecordGroup {
    fn default() -> Self {
        Self {
            income: zero_row(),
            withheld_tax: zero_row(),
            social_security: zero_row(),
            dependents: zero_row(),
        }
    }
}

fn zero_row() -> Vec<String> {
    vec![ZERO_CENTS.to_string(); MONTHS]
}

/// Build a twelve-position row from the value fields of a line.
///
/// Short rows are padded with [`ZERO_CENTS`], extra fields are ignored.
pub fn monthly_row<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut row: Vec<String> = values
        .into_iter()
        .take(MONTHS)
        .map(str::to_string)
        .collect();
    row.resize(MONTHS, ZERO_CENTS.to_string());
    row
}

/// A payee, unique per `(document, withholding_code)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Beneficiary {
    pub kind: BeneficiaryKind,
    pub document: String,
    pub name: String,
    pub withholding_code: String,
    pub records: Vec<MonthlyRecordGroup>,
}

impl Beneficiary {
    pub fn new(
        kind: BeneficiaryKind,
        document: impl Into<String>,
        name: impl Into<String>,
        withholding_code: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            document: document.into(),
            name: name.into(),
            withholding_code: withholding_code.into(),
            records: Vec::new(),
        }
    }

    /// Lookup key combining document and withholding code.
    pub fn key(&self) -> String {
        beneficiary_key(&self.document, &self.withholding_code)
    }
}

pub fn beneficiary_key(document: &str, withholding_code: &str) -> String {
    format!("{}_{}", document, withholding_code)
}

/// Result of parsing a whole declaration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub header: GlobalHeader,
    /// Beneficiaries in order of first appearance.
    pub beneficiaries: Vec<Beneficiary>,
}
