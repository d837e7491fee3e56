mod types;

use std::fs::File;
use std::path::Path;

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::{SaveError, SaveErrorCode, Section};

pub use types::{CharacterRecord, EncyclopediaBonusEntry, StoryEntry};

/// Number of per-element entries in each encyclopedia bonus table.
pub const ELEMENT_COUNT: usize = 5;

const PROFILE_POINTER: &str = "/data/user_data";
const CHARACTERS_POINTER: &str = "/data/chara_list";
const BONUS_TABLES_POINTER: &str = "/data/fort_bonus_list";
const CHARACTER_ALBUM_POINTER: &str = "/data/fort_bonus_list/chara_bonus_by_album";
const DRAGON_ALBUM_POINTER: &str = "/data/fort_bonus_list/dragon_bonus_by_album";
const STORY_LOG_POINTER: &str = "/data/unit_story_list";

/// The whole save document held in memory: the raw JSON root plus typed
/// views of the four sections the engine edits. Everything outside those
/// sections is carried in the root and re-emitted verbatim on persist.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveDocument {
    root: JsonValue,
    profile: JsonMap<String, JsonValue>,
    characters: Vec<CharacterRecord>,
    character_album: Vec<EncyclopediaBonusEntry>,
    dragon_album: Vec<EncyclopediaBonusEntry>,
    stories: Vec<StoryEntry>,
}

impl SaveDocument {
    pub fn load(path: &Path) -> Result<Self, SaveError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SaveError::new(
                SaveErrorCode::DocumentFormat,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, SaveError> {
        let root: JsonValue = serde_json::from_str(text).map_err(|e| {
            SaveError::new(
                SaveErrorCode::DocumentFormat,
                format!("save document is not valid JSON: {e}"),
            )
        })?;
        Self::from_root(root)
    }

    pub fn from_root(root: JsonValue) -> Result<Self, SaveError> {
        let profile = extract(&root, PROFILE_POINTER, Section::Profile)?;
        let characters = extract(&root, CHARACTERS_POINTER, Section::Characters)?;
        if root.pointer(BONUS_TABLES_POINTER).is_none() {
            return Err(SaveError::missing_section(Section::BonusTables));
        }
        let character_album = extract(&root, CHARACTER_ALBUM_POINTER, Section::BonusTables)?;
        let dragon_album = extract(&root, DRAGON_ALBUM_POINTER, Section::BonusTables)?;
        let stories = extract(&root, STORY_LOG_POINTER, Section::StoryLog)?;

        Ok(Self {
            root,
            profile,
            characters,
            character_album,
            dragon_album,
            stories,
        })
    }

    pub fn profile(&self) -> &JsonMap<String, JsonValue> {
        &self.profile
    }

    pub fn characters(&self) -> &[CharacterRecord] {
        &self.characters
    }

    pub fn character_album(&self) -> &[EncyclopediaBonusEntry] {
        &self.character_album
    }

    pub fn dragon_album(&self) -> &[EncyclopediaBonusEntry] {
        &self.dragon_album
    }

    pub fn stories(&self) -> &[StoryEntry] {
        &self.stories
    }

    pub fn character(&self, chara_id: i64) -> Option<&CharacterRecord> {
        self.characters.iter().find(|c| c.chara_id == chara_id)
    }

    pub fn set_profile_field(&mut self, name: &str, value: JsonValue) {
        self.profile.insert(name.to_string(), value);
    }

    /// Replaces the record with the same identifier, or appends. At most one
    /// record per identifier exists in the document.
    pub fn put_character(&mut self, record: CharacterRecord) {
        match self
            .characters
            .iter_mut()
            .find(|c| c.chara_id == record.chara_id)
        {
            Some(slot) => *slot = record,
            None => self.characters.push(record),
        }
    }

    /// Adds `hp`/`atk` to the character-album entry for `element_code`.
    /// Codes outside 1..=5 are a deliberate no-op; callers pass the raw
    /// identifier digit without range checking.
    pub fn accrue_character_bonus(&mut self, element_code: u8, hp: f64, atk: f64) {
        if !(1..=ELEMENT_COUNT as u8).contains(&element_code) {
            return;
        }
        let Some(entry) = self.character_album.get_mut(usize::from(element_code) - 1) else {
            return;
        };
        entry.hp += hp;
        entry.attack += atk;
    }

    /// Appends an unread entry for every id not already in the ledger.
    /// Re-invoking with the same ids appends nothing.
    pub fn add_story_unlocks(&mut self, story_ids: &[i64]) {
        for &story_id in story_ids {
            if self.stories.iter().any(|s| s.unit_story_id == story_id) {
                continue;
            }
            self.stories.push(StoryEntry::unread(story_id));
        }
    }

    /// The full document with the typed sections written back into the root.
    /// Sections are written pointer-by-pointer so sibling keys (for example
    /// other members of `fort_bonus_list`) survive untouched.
    pub fn to_root(&self) -> Result<JsonValue, SaveError> {
        let mut root = self.root.clone();
        write_back(&mut root, PROFILE_POINTER, &self.profile)?;
        write_back(&mut root, CHARACTERS_POINTER, &self.characters)?;
        write_back(&mut root, CHARACTER_ALBUM_POINTER, &self.character_album)?;
        write_back(&mut root, DRAGON_ALBUM_POINTER, &self.dragon_album)?;
        write_back(&mut root, STORY_LOG_POINTER, &self.stories)?;
        Ok(root)
    }

    /// Serializes the full in-memory document over the file at `path`.
    /// There is no atomic replace: a failure mid-write leaves the on-disk
    /// file in an unknown state while the in-memory document stays intact.
    pub fn persist(&self, path: &Path) -> Result<(), SaveError> {
        let root = self.to_root()?;
        let file = File::create(path).map_err(|e| {
            SaveError::new(
                SaveErrorCode::Persistence,
                format!("failed to open {} for writing: {e}", path.display()),
            )
        })?;
        serde_json::to_writer_pretty(file, &root).map_err(|e| {
            SaveError::new(
                SaveErrorCode::Persistence,
                format!("failed to write {}: {e}", path.display()),
            )
        })
    }
}

fn extract<T: serde::de::DeserializeOwned>(
    root: &JsonValue,
    pointer: &str,
    section: Section,
) -> Result<T, SaveError> {
    let value = root
        .pointer(pointer)
        .ok_or_else(|| SaveError::missing_section(section))?;
    serde_json::from_value(value.clone()).map_err(|e| {
        SaveError::new(
            SaveErrorCode::DocumentFormat,
            format!("section {} has unexpected shape: {e}", section.key()),
        )
    })
}

fn write_back<T: serde::Serialize>(
    root: &mut JsonValue,
    pointer: &str,
    section: &T,
) -> Result<(), SaveError> {
    let value = serde_json::to_value(section).map_err(|e| {
        SaveError::new(
            SaveErrorCode::Persistence,
            format!("failed to serialize section at {pointer}: {e}"),
        )
    })?;
    match root.pointer_mut(pointer) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(SaveError::new(
            SaveErrorCode::Persistence,
            format!("section at {pointer} vanished from document root"),
        )),
    }
}
