//! Machine-readable-zone fast path for identity documents.
//!
//! International passports carry two fixed-width 44-character lines at the
//! bottom of the data page. When recognition output contains such a pair,
//! name, document number, and birth date can be read from fixed offsets
//! instead of trusting the noisier free-text zone. Checksum digits are not
//! validated here.

const MRZ_LINE_LEN: usize = 44;

/// Identity fields recovered from a passport machine-readable zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrzIdentity {
    pub surname: String,
    pub given_names: String,
    pub document_number: String,
    /// Formatted `DD.MM.YYYY`.
    pub birth_date: String,
}

impl MrzIdentity {
    /// Render as the identity-text block used by the structured report.
    pub fn to_report_text(&self) -> String {
        format!(
            "{} {}\nНомер документа: {}\nДата народження: {}",
            self.surname, self.given_names, self.document_number, self.birth_date
        )
    }
}

/// Try to parse a passport MRZ out of recognition output.
///
/// Looks for two consecutive 44-character lines, the first starting with the
/// `P<` document-type marker. Returns `None` when the layout is absent or
/// malformed; callers fall back to the raw OCR text.
pub fn parse_mrz(text: &str) -> Option<MrzIdentity> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let (line1, line2) = lines.windows(2).find_map(|pair| {
        let (a, b) = (pair[0], pair[1]);
        if a.len() == MRZ_LINE_LEN
            && b.len() == MRZ_LINE_LEN
            && a.is_ascii()
            && b.is_ascii()
            && a.starts_with("P<")
        {
            Some((a, b))
        } else {
            None
        }
    })?;

    // Line 1, offsets 5..44: SURNAME<<GIVEN<NAMES<<<...
    let name_field = &line1[5..MRZ_LINE_LEN];
    let (surname_raw, given_raw) = name_field.split_once("<<")?;
    let surname = decode_name(surname_raw);
    let given_names = decode_name(given_raw);
    if surname.is_empty() {
        return None;
    }

    // Line 2: document number at 0..9, birth date (YYMMDD) at 13..19.
    let document_number: String = line2[0..9].chars().filter(|c| *c != '<').collect();
    if document_number.is_empty() {
        return None;
    }
    let birth_date = decode_birth_date(&line2[13..19])?;

    Some(MrzIdentity { surname, given_names, document_number, birth_date })
}

fn decode_name(field: &str) -> String {
    field
        .split('<')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_birth_date(yymmdd: &str) -> Option<String> {
    if yymmdd.len() != 6 || !yymmdd.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let yy: u32 = yymmdd[0..2].parse().ok()?;
    let mm: u32 = yymmdd[2..4].parse().ok()?;
    let dd: u32 = yymmdd[4..6].parse().ok()?;
    if !(1..=12).contains(&mm) || !(1..=31).contains(&dd) {
        return None;
    }
    // Two-digit year pivot: 00-30 → 2000s, 31-99 → 1900s.
    let year = if yy <= 30 { 2000 + yy } else { 1900 + yy };
    Some(format!("{dd:02}.{mm:02}.{year}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE1: &str = "P<UKRPETRENKO<<IVAN<MYKOLAYOVYCH<<<<<<<<<<<<";
    const LINE2: &str = "FE1234567<UKR9003122M2503145<<<<<<<<<<<<<<04";

    #[test]
    fn parses_valid_passport_mrz() {
        let text = format!("шумовий рядок\n{LINE1}\n{LINE2}\n");
        let mrz = parse_mrz(&text).expect("valid MRZ should parse");
        assert_eq!(mrz.surname, "PETRENKO");
        assert_eq!(mrz.given_names, "IVAN MYKOLAYOVYCH");
        assert_eq!(mrz.document_number, "FE1234567");
        assert_eq!(mrz.birth_date, "12.03.1990");
    }

    #[test]
    fn report_text_carries_all_fields() {
        let text = format!("{LINE1}\n{LINE2}");
        let rendered = parse_mrz(&text).unwrap().to_report_text();
        assert!(rendered.contains("PETRENKO IVAN MYKOLAYOVYCH"));
        assert!(rendered.contains("FE1234567"));
        assert!(rendered.contains("12.03.1990"));
    }

    #[test]
    fn rejects_wrong_width_lines() {
        assert!(parse_mrz("P<UKRPETRENKO<<IVAN\nFE1234567").is_none());
    }

    #[test]
    fn rejects_missing_type_marker() {
        let line1 = "X<UKRPETRENKO<<IVAN<MYKOLAYOVYCH<<<<<<<<<<<<";
        assert!(parse_mrz(&format!("{line1}\n{LINE2}")).is_none());
    }

    #[test]
    fn rejects_garbage_birth_date() {
        let line2 = "FE1234567<UKR9AB3122M2503145<<<<<<<<<<<<<<04";
        assert!(parse_mrz(&format!("{LINE1}\n{line2}")).is_none());
    }

    #[test]
    fn absent_mrz_returns_none() {
        assert!(parse_mrz("звичайний текст паспорта без зони").is_none());
    }
}
