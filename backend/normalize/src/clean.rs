//! Raw OCR output cleaning.
//!
//! Recognition output from document photos is full of stray punctuation and
//! empty lines. Cleaning keeps only characters that can legitimately appear
//! on Ukrainian identity and vehicle documents.

/// True for characters allowed to survive cleaning: Cyrillic and Latin
/// letters, digits, space, `.`, `,`, `/`, `-`.
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || ('\u{0400}'..='\u{04FF}').contains(&c)
        || matches!(c, ' ' | '.' | ',' | '/' | '-')
}

/// Clean raw recognition output: per line, drop disallowed characters, trim
/// whitespace, and skip lines left blank. Line order is preserved.
/// Idempotent — cleaning already-clean text is a no-op.
pub fn clean_text(raw: &str) -> String {
    raw.lines()
        .filter_map(|line| {
            let kept: String = line.chars().filter(|c| is_allowed(*c)).collect();
            let trimmed = kept.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_noise_characters_and_blank_lines() {
        let raw = "ПЕТРЕНКО %$#\n\n  \nVIN: WAUZZZ*8V9;KA123456\n";
        let cleaned = clean_text(raw);
        assert_eq!(cleaned, "ПЕТРЕНКО\nVIN WAUZZZ8V9KA123456");
    }

    #[test]
    fn preserves_line_order() {
        let cleaned = clean_text("перший\nдругий\nтретій");
        assert_eq!(cleaned, "перший\nдругий\nтретій");
    }

    #[test]
    fn keeps_allowed_punctuation() {
        let cleaned = clean_text("12.03.1990, АХ/1234-ВК");
        assert_eq!(cleaned, "12.03.1990, АХ/1234-ВК");
    }

    #[test]
    fn idempotent() {
        let raw = "  Toyota* Camry!!\n\n2015 рік\t\nномер: АА1234ВХ ";
        let once = clean_text(raw);
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn line_left_blank_by_filtering_is_dropped() {
        let cleaned = clean_text("abc\n***!!!\ndef");
        assert_eq!(cleaned, "abc\ndef");
    }
}
