mod catalog;
mod engine;
mod synthesizer;
mod types;

pub use catalog::{
    ADVENTURERS_FILE, ALIASES_FILE, AdventurerEntry, EPITHETS_FILE, ReferenceCatalogs,
    STORIES_FILE,
};
pub use engine::{Engine, RESERVED_NPC_ID, Session};
pub use synthesizer::{
    BASE_EXP, BASE_LEVEL, BASE_MANA_NODES, ManualStats, SPIRAL_EXP, SPIRAL_LEVEL,
    SPIRAL_MANA_NODES, StatSource, synthesize,
};
pub use types::{Persist, UpsertOutcome, UpsertRequest};
