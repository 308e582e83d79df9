use crate::block::BlockKind;
use chrono::Utc;

/// Sequential ID generator for blocks created during one edit session.
///
/// Ids look like `text-1718000000000-3`: the kind prefix, the session
/// timestamp (milliseconds) and a per-generator counter. The counter alone
/// keeps ids distinct within a session; the timestamp keeps sessions apart.
#[derive(Debug, Clone)]
pub struct IDGenerator {
    seed: String,
    count: u64,
}

impl IDGenerator {
    /// Seed from the current wall-clock time
    pub fn new() -> Self {
        Self::from_seed(Utc::now().timestamp_millis().to_string())
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID for a block kind
    pub fn new_id(&mut self, kind: BlockKind) -> String {
        self.count += 1;
        format!("{}-{}-{}", kind.id_prefix(), self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of ids handed out so far
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Default for IDGenerator {
    fn default() -> Self {
        Self::new()
    }
}
