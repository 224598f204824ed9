//! Node id generation.
//!
//! Every block and element gets its id at creation time. Generators are owned
//! by whoever creates nodes (normally an edit session), so two sessions never
//! share a counter.

use uuid::Uuid;

/// Id of the leading hero anchor block.
pub const HERO_BLOCK_ID: &str = "hero";

/// Id of the trailing menu anchor block.
pub const MENU_BLOCK_ID: &str = "menu";

/// Returns true for ids that belong to the anchor slots.
pub fn is_reserved_id(id: &str) -> bool {
    id == HERO_BLOCK_ID || id == MENU_BLOCK_ID
}

/// Source of fresh node ids
pub trait IdGenerator: Send {
    /// Produce an id that this generator has never produced before
    fn next_id(&mut self) -> String;
}

/// Sequential ids of the form `{seed}-{n}`
#[derive(Debug, Clone)]
pub struct SequentialIds {
    seed: String,
    count: u64,
}

impl SequentialIds {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Resume after `count` ids have already been issued
    pub fn resume(seed: impl Into<String>, count: u64) -> Self {
        Self {
            seed: seed.into(),
            count,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn issued(&self) -> u64 {
        self.count
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}
