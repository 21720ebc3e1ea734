//! Transcript report rendering
//!
//! Turns a message history into a paginated PDF. Layout is computed first
//! as plain data, then handed to the PDF writer.

mod layout;
mod pdf;

pub use pdf::PdfRenderer;

use crate::state_machine::Message;
use thiserror::Error;

/// Renderer could not produce a document
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to build PDF: {0}")]
    Pdf(String),
}

/// Produces a downloadable document from a conversation history
pub trait ReportRenderer: Send + Sync {
    /// Render the history. Never mutates conversation state and never
    /// returns a partial document.
    fn render(&self, messages: &[Message], user_message_count: usize)
        -> Result<Vec<u8>, RenderError>;

    /// MIME type of the rendered bytes
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    /// File extension used for downloads
    fn file_extension(&self) -> &'static str {
        "pdf"
    }
}
