//! Splitting questionnaire output into one chunk per question.

use serde::{Deserialize, Serialize};

/// A span of output text and the page it starts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text, trimmed
    pub text: String,
    /// Page number (1-based) the chunk starts on
    pub start_page: u32,
}

impl Chunk {
    /// Create a chunk.
    pub fn new(text: impl Into<String>, start_page: u32) -> Self {
        Self {
            text: text.into(),
            start_page,
        }
    }
}

/// Split page texts at `marker`.
///
/// Text before the first marker of a page continues the current chunk.
/// Each marker closes the current chunk and opens a new one on its page.
/// Chunks that started on page 1 are front matter and are dropped when a
/// marker closes them; the last chunk is kept whenever it has text.
pub fn split_chunks<'a, I>(pages: I, marker: &str) -> Vec<Chunk>
where
    I: IntoIterator<Item = (u32, &'a str)>,
{
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut start_page: Option<u32> = None;

    for (number, text) in pages {
        let parts: Vec<&str> = if marker.is_empty() {
            vec![text]
        } else {
            text.split(marker).collect()
        };
        let mut parts = parts.into_iter();

        if let Some(head) = parts.next() {
            if current.is_empty() {
                start_page = Some(number);
            }
            current.push_str(head);
        }

        for part in parts {
            let closed = std::mem::take(&mut current);
            if let Some(page) = start_page.filter(|&page| page != 1) {
                push_chunk(&mut chunks, &closed, page);
            }
            current.push_str(part);
            start_page = Some(number);
        }
    }

    if let Some(page) = start_page {
        push_chunk(&mut chunks, &current, page);
    }

    log::debug!("Split output into {} chunks", chunks.len());
    chunks
}

fn push_chunk(chunks: &mut Vec<Chunk>, text: &str, start_page: u32) {
    let text = text.trim();
    if !text.is_empty() {
        chunks.push(Chunk::new(text, start_page));
    }
}
