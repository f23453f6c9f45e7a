//! HTTP request handlers.

pub mod health;
pub mod notes;
pub mod search;

pub use health::health_check;
pub use notes::{
    create_note, delete_note, embed_note, get_note, list_notes, summarize_note,
    summarize_note_legacy, update_note,
};
pub use search::{search_semantic, search_semantic_legacy, search_text};
