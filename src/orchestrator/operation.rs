use crate::settings::config::GenerationConfig;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Result of one generation attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
    /// Still running
    Pending,
    /// Produced a validated tile set
    Accepted,
    /// Failed; nothing was promoted
    Rejected,
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Bookkeeping record of one `generate` call
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationOperation {
    /// Identifier derived from the wall clock and a counter
    pub id: String,
    /// Configuration the attempt ran with
    pub config: GenerationConfig,
    /// Current outcome
    pub outcome: OperationOutcome,
    /// Acceptance summary or rejection reason
    pub detail: String,
}

impl GenerationOperation {
    /// Pending record for a new attempt
    pub const fn new(id: String, config: GenerationConfig) -> Self {
        Self {
            id,
            config,
            outcome: OperationOutcome::Pending,
            detail: String::new(),
        }
    }

    /// Close the record with its final outcome
    pub fn finish(&mut self, outcome: OperationOutcome, detail: impl Into<String>) {
        self.outcome = outcome;
        self.detail = detail.into();
    }
}

/// Produces `GEN_<secs>_<millis>_<counter>` identifiers
///
/// The counter disambiguates attempts started within the same millisecond.
#[derive(Debug, Default)]
pub struct OperationIdGenerator {
    counter: u32,
}

impl OperationIdGenerator {
    /// Generator starting at counter zero
    pub const fn new() -> Self {
        Self { counter: 0 }
    }

    /// Next identifier
    pub fn next_id(&mut self) -> String {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let id = format!(
            "GEN_{}_{:03}_{:04}",
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            self.counter
        );
        self.counter = (self.counter + 1) % 10_000;
        id
    }
}
