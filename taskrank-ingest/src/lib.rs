//! taskrank-ingest: request payload validation and member store access.

pub mod members;
pub mod request;
pub mod source;

pub use members::{parse_members_export, parse_members_map};
pub use request::{PrioritizeResponse, parse_prioritize_request};
pub use source::MemberSource;
