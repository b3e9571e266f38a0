//! Domain types for citation grounding.
//!
//! This module contains the core data structures:
//! - Transcript: Messages grouped into transcripts owned by an agent run
//! - Blocks: Per-call flattened lookup of block text

pub mod blocks;
pub mod transcript;

// Re-export commonly used types
pub use blocks::{BlockIndex, IndexingScheme, UnresolvedReason};
pub use transcript::{AgentRun, Message, Role, RunFormat, Transcript, TranscriptGroup};
