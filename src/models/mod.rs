pub mod document;
pub mod protocol;
pub mod record;
pub mod utterance;

pub use document::*;
pub use protocol::*;
pub use record::*;
pub use utterance::*;
