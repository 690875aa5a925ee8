pub mod clean;
pub mod fuzzy;
pub mod vocab;

pub use clean::clean_text;
pub use fuzzy::{normalize_vehicle_line, similarity_score, MATCH_THRESHOLD};
pub use vocab::{KNOWN_MAKES, KNOWN_REGIONS};
