//! Shared application state handed to every handler.

use crate::services::NoteService;

#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
}

impl AppState {
    pub fn new(notes: NoteService) -> Self {
        Self { notes }
    }
}
