use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Map as JsonMap;

use crate::document::CharacterRecord;

use super::catalog::AdventurerEntry;

pub const SPIRAL_LEVEL: i64 = 100;
pub const BASE_LEVEL: i64 = 80;
pub const SPIRAL_EXP: i64 = 8_866_950;
pub const BASE_EXP: i64 = 1_191_950;
pub const SPIRAL_MANA_NODES: i64 = 70;
pub const BASE_MANA_NODES: i64 = 50;

/// Caller-supplied attributes for identifiers the catalog does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualStats {
    pub has_mana_spiral: bool,
    pub shared_skill_cost: i64,
    pub max_hp: i64,
    pub max_atk: i64,
}

/// Where the synthesized attributes come from. Selected by whether the
/// identifier resolves in the catalog, so there is no hidden precedence
/// between the catalog and caller-supplied values.
#[derive(Debug, Clone, Copy)]
pub enum StatSource<'a> {
    Catalog(&'a AdventurerEntry),
    Manual(ManualStats),
}

impl StatSource<'_> {
    pub fn has_mana_spiral(&self) -> bool {
        match self {
            Self::Catalog(entry) => entry.has_mana_spiral(),
            Self::Manual(stats) => stats.has_mana_spiral,
        }
    }
}

/// Builds the canonical fully progressed record for `chara_id`. Pure: the
/// caller owns insertion, bonus accrual, and story population.
pub fn synthesize(chara_id: i64, source: StatSource<'_>, acquired_at: Option<i64>) -> CharacterRecord {
    let spiral = source.has_mana_spiral();
    let (hp, attack, shared_skill_cost) = match source {
        StatSource::Catalog(entry) => (entry.full_hp(), entry.full_atk(), entry.edit_skill_cost),
        StatSource::Manual(stats) => (stats.max_hp, stats.max_atk, stats.shared_skill_cost),
    };

    let mana_nodes = if spiral {
        SPIRAL_MANA_NODES
    } else {
        BASE_MANA_NODES
    };

    CharacterRecord {
        chara_id,
        rarity: 5,
        exp: if spiral { SPIRAL_EXP } else { BASE_EXP },
        level: if spiral { SPIRAL_LEVEL } else { BASE_LEVEL },
        additional_max_level: if spiral { 20 } else { 0 },
        hp_plus_count: 100,
        attack_plus_count: 100,
        limit_break_count: if spiral { 5 } else { 4 },
        is_new: 1,
        gettime: acquired_at.unwrap_or_else(current_unix_time),
        skill_1_level: if spiral { 4 } else { 3 },
        skill_2_level: if spiral { 3 } else { 2 },
        ability_1_level: if spiral { 3 } else { 2 },
        ability_2_level: if spiral { 3 } else { 2 },
        ability_3_level: 2,
        burst_attack_level: 2,
        combo_buildup_count: if spiral { 1 } else { 0 },
        hp,
        attack,
        ex_ability_level: 5,
        ex_ability_2_level: 5,
        is_temporary: 0,
        is_unlock_edit_skill: shared_skill_cost,
        mana_circle_piece_id_list: (1..=mana_nodes).collect(),
        list_view_flag: 1,
        extra: JsonMap::new(),
    }
}

fn current_unix_time() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
