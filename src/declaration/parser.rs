//! Single-pass parser for DIRF declaration lines.
//!
//! Every line is `TAG|field|field|...`. The parser keeps the current
//! withholding code and the currently open record group as explicit state,
//! so value rows (`RTRT`, `RTPO`, ...) land in the group opened by the
//! latest `BPFDEC`/`BPJDEC` line.

use std::collections::HashMap;

use log::debug;

use super::models::{
    beneficiary_key, monthly_row, Beneficiary, BeneficiaryKind, Declaration, GlobalHeader,
    MonthlyRecordGroup,
};

const FIELD_SEPARATOR: char = '|';

/// Record tags understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTag {
    /// `DIRF` - declaration header carrying the fiscal year.
    Header,
    /// `RESPO` - person responsible for the information.
    Responsible,
    /// `DECPJ` - paying legal entity.
    SourceEntity,
    /// `IDREC` - withholding code for the following blocks.
    WithholdingCode,
    /// `BPFDEC` - individual beneficiary.
    IndividualBeneficiary,
    /// `BPJDEC` - legal entity beneficiary.
    LegalEntityBeneficiary,
    /// `RTRT` - taxable income.
    Income,
    /// `RTPO` - official social security contribution.
    SocialSecurity,
    /// `RTDP` - dependent deductions.
    Dependents,
    /// `RTIRF` - income tax withheld.
    WithheldTax,
}

impl RecordTag {
    /// Resolve a raw tag field, ignoring surrounding whitespace and case.
    pub fn from_field(field: &str) -> Option<Self> {
        match field.trim().to_uppercase().as_str() {
            "DIRF" => Some(Self::Header),
            "RESPO" => Some(Self::Responsible),
            "DECPJ" => Some(Self::SourceEntity),
            "IDREC" => Some(Self::WithholdingCode),
            "BPFDEC" => Some(Self::IndividualBeneficiary),
            "BPJDEC" => Some(Self::LegalEntityBeneficiary),
            "RTRT" => Some(Self::Income),
            "RTPO" => Some(Self::SocialSecurity),
            "RTDP" => Some(Self::Dependents),
            "RTIRF" => Some(Self::WithheldTax),
            _ => None,
        }
    }
}

/// Counters collected while parsing, logged once at the end.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub skipped: usize,
    pub ignored_tags: usize,
    pub orphan_rows: usize,
}

/// Mutable context threaded through the line loop.
#[derive(Debug, Default)]
pub struct ParserState {
    header: GlobalHeader,
    beneficiaries: Vec<Beneficiary>,
    index: HashMap<String, usize>,
    /// (beneficiary index, record group index) of the open group.
    open_group: Option<(usize, usize)>,
    withholding_code: String,
    stats: ParseStats,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one raw line.
    pub fn feed_line(&mut self, line: &str) {
        self.stats.lines += 1;

        let fields: Vec<&str> = line.trim().split(FIELD_SEPARATOR).collect();
        if fields.len() < 2 {
            self.stats.skipped += 1;
            return;
        }

        let Some(tag) = RecordTag::from_field(fields[0]) else {
            self.stats.ignored_tags += 1;
            return;
        };

        let field = |i: usize| fields.get(i).copied().unwrap_or_default();

        match tag {
            RecordTag::Header => self.header.fiscal_year = field(2).to_string(),
            RecordTag::Responsible => self.header.responsible_party_name = field(2).to_string(),
            RecordTag::SourceEntity => {
                self.header.source_entity_document = field(1).to_string();
                self.header.source_entity_name = field(2).to_string();
            }
            RecordTag::WithholdingCode => self.withholding_code = field(1).to_string(),
            RecordTag::IndividualBeneficiary | RecordTag::LegalEntityBeneficiary
                if field(1).trim().is_empty() =>
            {
                // Rows after a beneficiary without document are orphans.
                self.stats.skipped += 1;
                self.open_group = None;
            }
            RecordTag::IndividualBeneficiary => {
                self.open_beneficiary(BeneficiaryKind::Individual, field(1), field(2))
            }
            RecordTag::LegalEntityBeneficiary => {
                self.open_beneficiary(BeneficiaryKind::LegalEntity, field(1), field(2))
            }
            RecordTag::Income
            | RecordTag::SocialSecurity
            | RecordTag::Dependents
            | RecordTag::WithheldTax => self.set_row(tag, &fields[1..]),
        }
    }

    fn open_beneficiary(&mut self, kind: BeneficiaryKind, document: &str, name: &str) {
        let key = beneficiary_key(document, &self.withholding_code);

        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                let position = self.beneficiaries.len();
                self.beneficiaries.push(Beneficiary::new(
                    kind,
                    document,
                    name,
                    self.withholding_code.as_str(),
                ));
                self.index.insert(key, position);
                position
            }
        };

        let records = &mut self.beneficiaries[position].records;
        records.push(MonthlyRecordGroup::default());
        self.open_group = Some((position, records.len() - 1));
    }

    fn set_row(&mut self, tag: RecordTag, values: &[&str]) {
        let Some((beneficiary, group)) = self.open_group else {
            self.stats.orphan_rows += 1;
            return;
        };

        let group = &mut self.beneficiaries[beneficiary].records[group];
        let row = monthly_row(values.iter().copied());
        match tag {
            RecordTag::Income => group.income = row,
            RecordTag::SocialSecurity => group.social_security = row,
            RecordTag::Dependents => group.dependents = row,
            RecordTag::WithheldTax => group.withheld_tax = row,
            _ => {}
        }
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    pub fn finish(self) -> Declaration {
        debug!(
            "Parsed {} lines: {} beneficiaries, {} skipped, {} unknown tags, {} orphan rows",
            self.stats.lines,
            self.beneficiaries.len(),
            self.stats.skipped,
            self.stats.ignored_tags,
            self.stats.orphan_rows
        );

        Declaration {
            header: self.header,
            beneficiaries: self.beneficiaries,
        }
    }
}

/// Parse a full declaration text.
pub fn parse(text: &str) -> Declaration {
    let mut state = ParserState::new();
    for line in text.lines() {
        state.feed_line(line);
    }
    state.finish()
}
