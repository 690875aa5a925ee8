pub mod collaborator;
pub mod extractor;

pub use collaborator::OpenAiCollaborator;
pub use extractor::{StructuredExtractor, COLLABORATOR_APOLOGY};
