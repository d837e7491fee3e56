use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{SaveError, SaveErrorCode};

pub const ADVENTURERS_FILE: &str = "adventurers.txt";
pub const ALIASES_FILE: &str = "adventurer_aliases.txt";
pub const EPITHETS_FILE: &str = "epithets.txt";
pub const STORIES_FILE: &str = "stories.txt";

/// Base-stat catalog entry for one adventurer, wire field names preserved.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdventurerEntry {
    #[serde(rename = "FullName")]
    pub full_name: String,
    /// Key presence (null included) marks mana-spiral eligibility.
    #[serde(
        rename = "ManaSpiralDate",
        default,
        deserialize_with = "present_even_if_null"
    )]
    pub mana_spiral_date: Option<JsonValue>,
    #[serde(rename = "EditSkillCost", default)]
    pub edit_skill_cost: i64,
    #[serde(rename = "MaxHp", default)]
    pub max_hp: i64,
    #[serde(rename = "AddMaxHp1", default)]
    pub add_max_hp1: i64,
    #[serde(rename = "PlusHp0", default)]
    pub plus_hp0: i64,
    #[serde(rename = "PlusHp1", default)]
    pub plus_hp1: i64,
    #[serde(rename = "PlusHp2", default)]
    pub plus_hp2: i64,
    #[serde(rename = "PlusHp3", default)]
    pub plus_hp3: i64,
    #[serde(rename = "PlusHp4", default)]
    pub plus_hp4: i64,
    #[serde(rename = "PlusHp5", default)]
    pub plus_hp5: i64,
    #[serde(rename = "McFullBonusHp5", default)]
    pub mc_full_bonus_hp5: i64,
    #[serde(rename = "MaxAtk", default)]
    pub max_atk: i64,
    #[serde(rename = "AddMaxAtk1", default)]
    pub add_max_atk1: i64,
    #[serde(rename = "PlusAtk0", default)]
    pub plus_atk0: i64,
    #[serde(rename = "PlusAtk1", default)]
    pub plus_atk1: i64,
    #[serde(rename = "PlusAtk2", default)]
    pub plus_atk2: i64,
    #[serde(rename = "PlusAtk3", default)]
    pub plus_atk3: i64,
    #[serde(rename = "PlusAtk4", default)]
    pub plus_atk4: i64,
    #[serde(rename = "PlusAtk5", default)]
    pub plus_atk5: i64,
    #[serde(rename = "McFullBonusAtk5", default)]
    pub mc_full_bonus_atk5: i64,
}

impl AdventurerEntry {
    pub fn has_mana_spiral(&self) -> bool {
        self.mana_spiral_date.is_some()
    }

    /// Fully progressed HP. The spiral computation starts from the raised
    /// growth base and sums one extra incremental tier.
    pub fn full_hp(&self) -> i64 {
        let shared =
            self.plus_hp0 + self.plus_hp1 + self.plus_hp2 + self.plus_hp3 + self.plus_hp4;
        if self.has_mana_spiral() {
            self.add_max_hp1 + shared + self.plus_hp5 + self.mc_full_bonus_hp5
        } else {
            self.max_hp + shared + self.mc_full_bonus_hp5
        }
    }

    pub fn full_atk(&self) -> i64 {
        let shared =
            self.plus_atk0 + self.plus_atk1 + self.plus_atk2 + self.plus_atk3 + self.plus_atk4;
        if self.has_mana_spiral() {
            self.add_max_atk1 + shared + self.plus_atk5 + self.mc_full_bonus_atk5
        } else {
            self.max_atk + shared + self.mc_full_bonus_atk5
        }
    }
}

// Maps a present `ManaSpiralDate` key to Some even when its value is null;
// the plain Option impl would fold null into None and lose the eligibility
// marker.
fn present_even_if_null<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}

// Alias and story values appear both as JSON numbers and as digit strings
// in the shipped data files.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum IdValue {
    Number(i64),
    Text(String),
}

impl IdValue {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// The four static lookup tables the engine consults. Read-only after load.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCatalogs {
    adventurers: BTreeMap<String, AdventurerEntry>,
    aliases: BTreeMap<String, i64>,
    epithets: BTreeMap<String, String>,
    stories: BTreeMap<String, Vec<i64>>,
}

impl ReferenceCatalogs {
    pub fn load_from_dir(dir: &Path) -> Result<Self, SaveError> {
        let adventurers = load_resource(&dir.join(ADVENTURERS_FILE))?;

        let raw_aliases: BTreeMap<String, IdValue> = load_resource(&dir.join(ALIASES_FILE))?;
        let mut aliases = BTreeMap::new();
        for (name, value) in &raw_aliases {
            let id = value.as_i64().ok_or_else(|| {
                SaveError::new(
                    SaveErrorCode::Resource,
                    format!("alias {name:?} does not map to an identifier"),
                )
            })?;
            aliases.insert(name.clone(), id);
        }

        let epithets = load_resource(&dir.join(EPITHETS_FILE))?;

        let raw_stories: BTreeMap<String, Vec<IdValue>> = load_resource(&dir.join(STORIES_FILE))?;
        let mut stories = BTreeMap::new();
        for (chara_id, values) in &raw_stories {
            let mut ids = Vec::with_capacity(values.len());
            for value in values {
                let id = value.as_i64().ok_or_else(|| {
                    SaveError::new(
                        SaveErrorCode::Resource,
                        format!("story list for {chara_id} holds a non-identifier entry"),
                    )
                })?;
                ids.push(id);
            }
            stories.insert(chara_id.clone(), ids);
        }

        Ok(Self {
            adventurers,
            aliases,
            epithets,
            stories,
        })
    }

    pub fn adventurer(&self, chara_id: i64) -> Option<&AdventurerEntry> {
        self.adventurers.get(&chara_id.to_string())
    }

    pub fn contains(&self, chara_id: i64) -> bool {
        self.adventurers.contains_key(&chara_id.to_string())
    }

    /// All catalog identifiers, in key order.
    pub fn adventurer_ids(&self) -> Vec<i64> {
        self.adventurers
            .keys()
            .filter_map(|key| key.parse().ok())
            .collect()
    }

    pub fn display_name(&self, chara_id: i64) -> Option<&str> {
        self.adventurer(chara_id).map(|e| e.full_name.as_str())
    }

    pub fn resolve_alias(&self, name: &str) -> Option<i64> {
        self.aliases.get(name).copied()
    }

    pub fn epithet_name(&self, epithet_id: i64) -> Option<&str> {
        self.epithets
            .get(&epithet_id.to_string())
            .map(String::as_str)
    }

    pub fn epithet_id(&self, name: &str) -> Option<i64> {
        self.epithets.get(name).and_then(|id| id.parse().ok())
    }

    pub fn story_ids(&self, chara_id: i64) -> Option<&[i64]> {
        self.stories
            .get(&chara_id.to_string())
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.adventurers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adventurers.is_empty()
    }
}

fn load_resource<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SaveError> {
    let text = fs::read_to_string(path).map_err(|e| {
        SaveError::new(
            SaveErrorCode::Resource,
            format!("failed to read {}: {e}", path.display()),
        )
    })?;
    serde_json::from_str(&text).map_err(|e| {
        SaveError::new(
            SaveErrorCode::Resource,
            format!("failed to parse {}: {e}", path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::AdventurerEntry;

    fn entry(json: &str) -> AdventurerEntry {
        serde_json::from_str(json).expect("entry should parse")
    }

    #[test]
    fn spiral_entry_sums_raised_base_and_sixth_tier() {
        let e = entry(
            r#"{
                "FullName": "Marth",
                "ManaSpiralDate": "2020-03-31T06:00:00+09:00",
                "EditSkillCost": 10,
                "MaxHp": 90, "AddMaxHp1": 100,
                "PlusHp0": 1, "PlusHp1": 2, "PlusHp2": 3, "PlusHp3": 4,
                "PlusHp4": 5, "PlusHp5": 6, "McFullBonusHp5": 9,
                "MaxAtk": 50, "AddMaxAtk1": 60,
                "PlusAtk0": 1, "PlusAtk1": 2, "PlusAtk2": 3, "PlusAtk3": 4,
                "PlusAtk4": 5, "PlusAtk5": 6, "McFullBonusAtk5": 4
            }"#,
        );
        assert!(e.has_mana_spiral());
        assert_eq!(e.full_hp(), 100 + 21 + 9);
        assert_eq!(e.full_atk(), 60 + 21 + 4);
    }

    #[test]
    fn non_spiral_entry_ignores_sixth_tier() {
        let e = entry(
            r#"{
                "FullName": "Karina",
                "EditSkillCost": 6,
                "MaxHp": 70, "AddMaxHp1": 999,
                "PlusHp0": 1, "PlusHp1": 2, "PlusHp2": 3, "PlusHp3": 4,
                "PlusHp4": 5, "PlusHp5": 99, "McFullBonusHp5": 5,
                "MaxAtk": 40, "AddMaxAtk1": 999,
                "PlusAtk0": 1, "PlusAtk1": 2, "PlusAtk2": 3, "PlusAtk3": 4,
                "PlusAtk4": 5, "PlusAtk5": 99, "McFullBonusAtk5": 5
            }"#,
        );
        assert!(!e.has_mana_spiral());
        assert_eq!(e.full_hp(), 70 + 15 + 5);
        assert_eq!(e.full_atk(), 40 + 15 + 5);
    }

    #[test]
    fn null_mana_spiral_date_still_marks_eligibility() {
        let e = entry(r#"{"FullName": "Mikoto", "ManaSpiralDate": null}"#);
        assert!(e.has_mana_spiral());
    }
}
