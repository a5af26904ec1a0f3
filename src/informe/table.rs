//! Section 3 of the informe: monthly income and withheld tax.
//!
//! The rows are computed here so the Typst template only lays them out.

use serde::Serialize;

use super::common::{format_amount, parse_cents};
use crate::declaration::{Beneficiary, BeneficiaryKind, MONTHS};

pub const MONTH_NAMES: [&str; MONTHS] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

pub const TOTALS_LABEL: &str = "Totais";
const PLACEHOLDER: &str = "-";

const INDIVIDUAL_HEADER: [&str; 6] = [
    "Mês",
    "Código de\nretenção",
    "Rendimento\n(R$)",
    "Previdência\nOficial (R$)",
    "Dependentes\n(R$)",
    "Imposto retido\n(R$)",
];
const INDIVIDUAL_WIDTHS: [f64; 6] = [40.0, 55.0, 110.0, 110.0, 110.0, 110.0];

const LEGAL_ENTITY_HEADER: [&str; 4] = [
    "Mês",
    "Código de\nretenção",
    "Rendimento\n(R$)",
    "Imposto retido\n(R$)",
];
const LEGAL_ENTITY_WIDTHS: [f64; 4] = [60.0, 100.0, 187.5, 187.5];

/// Values of one month summed over every record group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthValues {
    pub income: f64,
    pub social_security: f64,
    pub dependents: f64,
    pub withheld_tax: f64,
}

impl MonthValues {
    fn add(&mut self, other: &MonthValues) {
        self.income += other.income;
        self.social_security += other.social_security;
        self.dependents += other.dependents;
        self.withheld_tax += other.withheld_tax;
    }

    /// Amounts shown for this kind of beneficiary, in column order.
    pub fn columns(&self, kind: BeneficiaryKind) -> Vec<f64> {
        match kind {
            BeneficiaryKind::Individual => vec![
                self.income,
                self.social_security,
                self.dependents,
                self.withheld_tax,
            ],
            BeneficiaryKind::LegalEntity => vec![self.income, self.withheld_tax],
        }
    }

    pub fn is_zero_for(&self, kind: BeneficiaryKind) -> bool {
        self.columns(kind).iter().all(|v| *v == 0.0)
    }
}

/// Sum every record group month by month.
pub fn monthly_sums(beneficiary: &Beneficiary) -> [MonthValues; MONTHS] {
    let mut sums = [MonthValues::default(); MONTHS];
    for group in &beneficiary.records {
        for (month, sum) in sums.iter_mut().enumerate() {
            let value = |row: &Vec<String>| row.get(month).map_or(0.0, |v| parse_cents(v));
            sum.add(&MonthValues {
                income: value(&group.income),
                social_security: value(&group.social_security),
                dependents: value(&group.dependents),
                withheld_tax: value(&group.withheld_tax),
            });
        }
    }
    sums
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementRow {
    pub month: String,
    pub withholding_code: String,
    /// Formatted amounts, one per numeric column.
    pub amounts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementTable {
    pub header: Vec<&'static str>,
    pub column_widths: Vec<f64>,
    pub rows: Vec<StatementRow>,
    pub totals: StatementRow,
}

impl StatementTable {
    pub fn build(beneficiary: &Beneficiary) -> Self {
        let kind = beneficiary.kind;
        let (header, column_widths): (Vec<&'static str>, Vec<f64>) = match kind {
            BeneficiaryKind::Individual => (INDIVIDUAL_HEADER.to_vec(), INDIVIDUAL_WIDTHS.to_vec()),
            BeneficiaryKind::LegalEntity => {
                (LEGAL_ENTITY_HEADER.to_vec(), LEGAL_ENTITY_WIDTHS.to_vec())
            }
        };

        let sums = monthly_sums(beneficiary);
        let mut totals = MonthValues::default();
        let mut rows = Vec::new();

        for (month, values) in sums.iter().enumerate() {
            totals.add(values);
            if values.is_zero_for(kind) {
                continue;
            }
            rows.push(StatementRow {
                month: MONTH_NAMES[month].to_string(),
                withholding_code: beneficiary.withholding_code.clone(),
                amounts: values.columns(kind).into_iter().map(format_amount).collect(),
            });
        }

        let numeric_columns = header.len() - 2;
        if rows.is_empty() {
            rows.push(StatementRow {
                month: PLACEHOLDER.to_string(),
                withholding_code: PLACEHOLDER.to_string(),
                amounts: vec![format_amount(0.0); numeric_columns],
            });
        }

        let totals = StatementRow {
            month: TOTALS_LABEL.to_string(),
            withholding_code: String::new(),
            amounts: totals.columns(kind).into_iter().map(format_amount).collect(),
        };

        Self {
            header,
            column_widths,
            rows,
            totals,
        }
    }
}
