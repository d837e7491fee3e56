use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// One owned character slot, field names as they appear on the wire.
///
/// Records are only ever created whole by the synthesizer or read whole from
/// the document; fields the engine does not know about ride along in `extra`
/// so an untouched record re-serializes as it was loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub chara_id: i64,
    pub rarity: i64,
    pub exp: i64,
    pub level: i64,
    pub additional_max_level: i64,
    pub hp_plus_count: i64,
    pub attack_plus_count: i64,
    pub limit_break_count: i64,
    pub is_new: i64,
    pub gettime: i64,
    pub skill_1_level: i64,
    pub skill_2_level: i64,
    pub ability_1_level: i64,
    pub ability_2_level: i64,
    pub ability_3_level: i64,
    pub burst_attack_level: i64,
    pub combo_buildup_count: i64,
    pub hp: i64,
    pub attack: i64,
    pub ex_ability_level: i64,
    pub ex_ability_2_level: i64,
    pub is_temporary: i64,
    pub is_unlock_edit_skill: i64,
    pub mana_circle_piece_id_list: Vec<i64>,
    pub list_view_flag: i64,
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

impl CharacterRecord {
    /// Node count of the mana-circle progression track. A count of 51 or
    /// more implies the mana spiral is unlocked.
    pub fn mana_circle_count(&self) -> usize {
        self.mana_circle_piece_id_list.len()
    }
}

/// Per-element account-wide stat bonus. The accumulators only ever increase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncyclopediaBonusEntry {
    pub hp: f64,
    pub attack: f64,
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

/// Narrative-unlock ledger entry; `is_read` is a 0/1 wire integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryEntry {
    pub unit_story_id: i64,
    pub is_read: i64,
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

impl StoryEntry {
    pub fn unread(unit_story_id: i64) -> Self {
        Self {
            unit_story_id,
            is_read: 0,
            extra: JsonMap::new(),
        }
    }
}
