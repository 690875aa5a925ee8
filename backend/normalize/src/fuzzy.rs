//! Fuzzy correction of vehicle-document tokens.
//!
//! OCR mangles make names and region names in predictable ways ("Toyotа",
//! "Кuівська"). Each token is scored against small canonical vocabularies
//! and replaced by the canonical entry when the similarity clears the
//! threshold. Lossy and best-effort: unmatched tokens pass through verbatim,
//! and the function never fails.

use strsim::normalized_levenshtein;
use tracing::trace;

/// Minimum similarity score for a token to be replaced by a vocabulary entry.
pub const MATCH_THRESHOLD: u32 = 80;

/// Similarity between two tokens on a 0..=100 scale, case-insensitive.
pub fn similarity_score(a: &str, b: &str) -> u32 {
    let score = normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()) * 100.0;
    score.round() as u32
}

fn best_match<'v>(token: &str, vocabulary: &[&'v str]) -> Option<(&'v str, u32)> {
    vocabulary
        .iter()
        .map(|entry| (*entry, similarity_score(token, entry)))
        .max_by_key(|(_, score)| *score)
}

/// Correct one line of vehicle-document text against the make and region
/// vocabularies. Tokenizes on whitespace; output token count always equals
/// input token count. Makes are checked first and win score ties.
pub fn normalize_vehicle_line(line: &str, makes: &[&str], regions: &[&str]) -> String {
    line.split_whitespace()
        .map(|token| {
            let make = best_match(token, makes);
            let region = best_match(token, regions);
            let replacement = match (make, region) {
                (Some((entry, m)), Some((_, r))) if m >= MATCH_THRESHOLD && m >= r => Some(entry),
                (_, Some((entry, r))) if r >= MATCH_THRESHOLD => Some(entry),
                (Some((entry, m)), None) if m >= MATCH_THRESHOLD => Some(entry),
                _ => None,
            };
            match replacement {
                Some(canonical) => {
                    trace!(token, canonical, "fuzzy-corrected vehicle token");
                    canonical.to_string()
                }
                None => token.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{KNOWN_MAKES, KNOWN_REGIONS};

    #[test]
    fn corrects_noisy_make() {
        let line = normalize_vehicle_line("Toyoto Camry 2015", KNOWN_MAKES, KNOWN_REGIONS);
        assert_eq!(line, "Toyota Camry 2015");
    }

    #[test]
    fn corrects_noisy_region() {
        let line = normalize_vehicle_line("Львiвська область", KNOWN_MAKES, KNOWN_REGIONS);
        assert!(line.starts_with("Львівська"));
    }

    #[test]
    fn unmatched_tokens_pass_through() {
        let line = normalize_vehicle_line("WAUZZZ8V9KA123456", KNOWN_MAKES, KNOWN_REGIONS);
        assert_eq!(line, "WAUZZZ8V9KA123456");
    }

    #[test]
    fn token_count_is_preserved() {
        let input = "Toyoto Camry 2015 АА1234ВХ Кuивська";
        let output = normalize_vehicle_line(input, KNOWN_MAKES, KNOWN_REGIONS);
        assert_eq!(
            input.split_whitespace().count(),
            output.split_whitespace().count()
        );
    }

    #[test]
    fn threshold_boundary_at_80() {
        // One substitution in five characters: 4/5 = exactly 80.
        assert_eq!(similarity_score("skodx", "skoda"), 80);
        let replaced = normalize_vehicle_line("skodx", &["skoda"], &[]);
        assert_eq!(replaced, "skoda");

        // Three substitutions in fourteen characters: 11/14 rounds to 79.
        assert_eq!(similarity_score("xxxdefghijklmn", "abcdefghijklmn"), 79);
        let kept = normalize_vehicle_line("xxxdefghijklmn", &["abcdefghijklmn"], &[]);
        assert_eq!(kept, "xxxdefghijklmn");
    }

    #[test]
    fn make_wins_score_tie() {
        // Same token, same score against both vocabularies.
        let line = normalize_vehicle_line("fordx", &["fordа"], &["fordб"]);
        assert_eq!(line, "fordа");
    }

    #[test]
    fn case_insensitive_match_yields_canonical_casing() {
        let line = normalize_vehicle_line("toyota", KNOWN_MAKES, KNOWN_REGIONS);
        assert_eq!(line, "Toyota");
    }
}
