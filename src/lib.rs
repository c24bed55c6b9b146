pub mod config;
pub mod demo;
pub mod errors;
pub mod orchestrator;
pub mod section;
pub mod session;

pub use errors::SessionError;
pub use orchestrator::{Assistant, SectionStatus};
pub use section::{Section, Typed, TypedSection};
pub use session::{SessionRecord, SessionStore};
