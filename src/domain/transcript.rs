//! Transcript data model.
//!
//! An agent run owns one or more transcripts; each transcript is an ordered
//! sequence of messages ("blocks"). The citation engine only reads these
//! types, so they are plain serde structs with no interior mutability.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A single block of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Optional upstream identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Who produced the message
    pub role: Role,

    /// Text content; this is what citations quote from
    #[serde(default)]
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: None,
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Text used when anchoring citations against this block
    pub fn text(&self) -> &str {
        &self.content
    }
}

/// An ordered sequence of blocks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Transcript {
    pub fn new(id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            id: id.into(),
            name: None,
            messages,
        }
    }

    /// Number of addressable blocks
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Text of block `index`, if it exists
    pub fn block_text(&self, index: usize) -> Option<&str> {
        self.messages.get(index).map(Message::text)
    }
}

/// Grouping metadata for transcripts; carried through untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptGroup {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_transcript_group_id: Option<String>,
}

/// An agent run: the unit a citation-bearing text is validated against
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRun {
    /// Opaque identifier
    #[serde(default)]
    pub id: String,

    /// Transcripts in citation order (`T0`, `T1`, ...)
    #[serde(default)]
    pub transcripts: Vec<Transcript>,

    #[serde(default)]
    pub transcript_groups: Vec<TranscriptGroup>,
}

impl AgentRun {
    pub fn new(id: impl Into<String>, transcripts: Vec<Transcript>) -> Self {
        Self {
            id: id.into(),
            transcripts,
            transcript_groups: Vec::new(),
        }
    }

    /// Total number of blocks across all transcripts
    pub fn block_count(&self) -> usize {
        self.transcripts.iter().map(Transcript::len).sum()
    }

    /// Parse a run from JSON or YAML depending on the file extension
    pub fn from_str_with_format(content: &str, format: RunFormat) -> Result<Self> {
        match format {
            RunFormat::Json => serde_json::from_str(content).context("Failed to parse run JSON"),
            RunFormat::Yaml => serde_yaml::from_str(content).context("Failed to parse run YAML"),
        }
    }

    /// Load a run from a `.json`, `.yaml` or `.yml` file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read run file: {}", path.display()))?;

        Self::from_str_with_format(&content, RunFormat::from_path(path))
            .with_context(|| format!("Invalid run file: {}", path.display()))
    }
}

/// Serialization format of a run file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunFormat {
    Json,
    Yaml,
}

impl RunFormat {
    /// YAML for `.yaml`/`.yml`, JSON for everything else
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                RunFormat::Yaml
            }
            _ => RunFormat::Json,
        }
    }
}
