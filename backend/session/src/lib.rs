pub mod machine;
pub mod store;

pub use machine::IntakeMachine;
pub use store::{InMemorySessionStore, SessionStore};
