use informe_rendimentos::informe::common::{
    escape_typst_string, format_amount, format_currency, format_document, informe_filename,
    parse_cents,
};

/// `\d{1,3}(\.\d{3})*,\d{2}`
fn is_brl_amount(s: &str) -> bool {
    let Some((integer, decimals)) = s.split_once(',') else {
        return false;
    };
    if decimals.len() != 2 || !decimals.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let groups: Vec<&str> = integer.split('.').collect();
    let first_ok = (1..=3).contains(&groups[0].len());
    first_ok
        && groups.iter().all(|g| g.chars().all(|c| c.is_ascii_digit()))
        && groups[1..].iter().all(|g| g.len() == 3)
}

#[test]
fn test_format_currency_matches_brl_pattern() {
    let samples = [
        "0", "000", "1", "99", "100", "12345", "100000", "1234567", "99999999", "100000000000",
        "000000123456",
    ];
    for sample in samples {
        let formatted = format_currency(sample);
        assert!(is_brl_amount(&formatted), "{} -> {}", sample, formatted);
    }
}

#[test]
fn test_format_currency_zero_and_empty() {
    assert_eq!(format_currency("000"), "0,00");
    assert_eq!(format_currency(""), "0,00");
    assert_eq!(format_currency("   "), "0,00");
}

#[test]
fn test_format_currency_keeps_leading_zero_padding_meaningless() {
    assert_eq!(format_currency("000000015000"), "150,00");
    assert_eq!(format_currency("1234567"), "12.345,67");
}

#[test]
fn test_totals_use_same_rule() {
    let total = parse_cents("100000") + parse_cents("50050");
    assert_eq!(format_amount(total), "1.500,50");
    assert_eq!(format_amount(0.1 + 0.2), "0,30");
}

#[test]
fn test_format_document_positions() {
    let cpf = format_document("52998224725");
    assert_eq!(cpf, "529.982.247-25");
    assert_eq!(&cpf[3..4], ".");
    assert_eq!(&cpf[7..8], ".");
    assert_eq!(&cpf[11..12], "-");

    let cnpj = format_document("12345678000199");
    assert_eq!(cnpj, "12.345.678/0001-99");
    assert_eq!(&cnpj[2..3], ".");
    assert_eq!(&cnpj[6..7], ".");
    assert_eq!(&cnpj[10..11], "/");
    assert_eq!(&cnpj[15..16], "-");
}

#[test]
fn test_format_document_other_lengths_unchanged() {
    for doc in ["", "123", "5299822472", "529982247251", "123456780001990"] {
        assert_eq!(format_document(doc), doc);
    }
}

#[test]
fn test_escape_typst_string() {
    assert_eq!(escape_typst_string(r#"ACME "SA""#), r#"ACME \"SA\""#);
    assert_eq!(escape_typst_string("a\\b"), r"a\\b");
    assert_eq!(escape_typst_string("Line1\nLine2"), r"Line1\nLine2");
}

#[test]
fn test_informe_filename_is_deterministic() {
    assert_eq!(
        informe_filename("12345678000199", "1708"),
        informe_filename("12345678000199", "1708")
    );
    assert_eq!(
        informe_filename("12345678000199", "1708"),
        "Informe_12345678000199_1708.pdf"
    );
}
