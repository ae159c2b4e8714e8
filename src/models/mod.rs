pub mod snippet;
pub mod storage;

pub use snippet::{Snippet, SnippetId, SnippetUpdate, parse_id};
pub use storage::SnippetStore;
