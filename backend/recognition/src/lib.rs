pub mod engine;
pub mod mrz;

pub use engine::TesseractEngine;
pub use mrz::{parse_mrz, MrzIdentity};
