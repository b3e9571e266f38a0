//! Block lookup across the transcripts of an agent run.
//!
//! A `BlockIndex` is a flattened, borrowed view of every block in a run.
//! It is built once per validation call and dropped afterwards.

use serde::{Deserialize, Serialize};

use super::transcript::AgentRun;

/// How `T<t>B<b>` addresses blocks when a run has several transcripts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexingScheme {
    /// `T` selects the transcript, `B` the block inside it
    #[default]
    PerTranscript,

    /// `B` addresses all blocks of all transcripts in order; `T` is ignored
    Continuous,
}

impl IndexingScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexingScheme::PerTranscript => "per_transcript",
            IndexingScheme::Continuous => "continuous",
        }
    }
}

impl std::fmt::Display for IndexingScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IndexingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "per_transcript" => Ok(IndexingScheme::PerTranscript),
            "continuous" => Ok(IndexingScheme::Continuous),
            other => Err(format!("Unknown indexing scheme: {}", other)),
        }
    }
}

/// Why a citation could not be resolved to a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No transcript at the cited transcript index
    TranscriptOutOfRange,
    /// The transcript (or run) has no block at the cited index
    BlockOutOfRange,
    /// An index in the token does not fit in a machine integer
    IndexOverflow,
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::TranscriptOutOfRange => write!(f, "transcript out of range"),
            UnresolvedReason::BlockOutOfRange => write!(f, "block out of range"),
            UnresolvedReason::IndexOverflow => write!(f, "index overflow"),
        }
    }
}

/// Flattened view of block text, borrowed from an `AgentRun`
#[derive(Debug, Clone)]
pub struct BlockIndex<'a> {
    scheme: IndexingScheme,
    /// Block texts per transcript, in run order
    transcripts: Vec<Vec<&'a str>>,
}

impl<'a> BlockIndex<'a> {
    /// Flatten `run` once for the duration of a call
    pub fn build(run: &'a AgentRun, scheme: IndexingScheme) -> Self {
        let transcripts = run
            .transcripts
            .iter()
            .map(|t| t.messages.iter().map(|m| m.text()).collect())
            .collect();

        Self {
            scheme,
            transcripts,
        }
    }

    pub fn scheme(&self) -> IndexingScheme {
        self.scheme
    }

    /// Total number of blocks across all transcripts
    pub fn len(&self) -> usize {
        self.transcripts.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up the text of the block a citation addresses
    pub fn resolve(
        &self,
        transcript_index: usize,
        block_index: usize,
    ) -> Result<&'a str, UnresolvedReason> {
        match self.scheme {
            IndexingScheme::PerTranscript => {
                let blocks = self
                    .transcripts
                    .get(transcript_index)
                    .ok_or(UnresolvedReason::TranscriptOutOfRange)?;
                blocks
                    .get(block_index)
                    .copied()
                    .ok_or(UnresolvedReason::BlockOutOfRange)
            }
            IndexingScheme::Continuous => self
                .transcripts
                .iter()
                .flatten()
                .nth(block_index)
                .copied()
                .ok_or(UnresolvedReason::BlockOutOfRange),
        }
    }
}
