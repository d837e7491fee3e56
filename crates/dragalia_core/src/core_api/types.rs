use crate::document::CharacterRecord;

use super::synthesizer::ManualStats;

/// Whether a mutating operation writes the document back immediately or
/// leaves that to the surrounding batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persist {
    Now,
    Defer,
}

/// One insert-or-refresh request. `manual` is consulted only when the
/// identifier is absent from the catalogs; `story_ids` overrides the
/// catalog's story list; `acquired_at` pins the acquisition timestamp
/// (refreshes pass the existing record's one automatically).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpsertRequest {
    pub chara_id: i64,
    pub manual: ManualStats,
    pub story_ids: Option<Vec<i64>>,
    pub acquired_at: Option<i64>,
}

impl UpsertRequest {
    pub fn new(chara_id: i64) -> Self {
        Self {
            chara_id,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    pub record: CharacterRecord,
    pub newly_created: bool,
}
