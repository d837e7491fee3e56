use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::document::{CharacterRecord, SaveDocument};
use crate::error::SaveError;
use crate::identifier;

use super::catalog::ReferenceCatalogs;
use super::synthesizer::{self, BASE_LEVEL, BASE_MANA_NODES, SPIRAL_LEVEL, StatSource};
use super::types::{Persist, UpsertOutcome, UpsertRequest};

/// Identifier the source game reserves for a non-player entity; bulk adds
/// must never materialize it as a roster character.
pub const RESERVED_NPC_ID: i64 = 19_900_004;

// Bonus deltas (spec'd by the game's collection milestones).
const INSERT_DELTA_SPIRAL: f64 = 0.3;
const INSERT_DELTA_BASE: f64 = 0.2;
const REFRESH_DELTA_CROSSED: f64 = 0.2;
const REFRESH_DELTA_CHANGED: f64 = 0.1;

/// Loads catalogs once and opens save documents into editing sessions.
#[derive(Debug, Clone)]
pub struct Engine {
    catalogs: ReferenceCatalogs,
}

impl Engine {
    pub fn new(catalogs: ReferenceCatalogs) -> Self {
        Self { catalogs }
    }

    pub fn load(data_dir: &Path) -> Result<Self, SaveError> {
        Ok(Self::new(ReferenceCatalogs::load_from_dir(data_dir)?))
    }

    pub fn catalogs(&self) -> &ReferenceCatalogs {
        &self.catalogs
    }

    pub fn open_path(&self, path: &Path) -> Result<Session, SaveError> {
        let document = SaveDocument::load(path)?;
        Ok(Session {
            catalogs: self.catalogs.clone(),
            document,
            path: path.to_path_buf(),
        })
    }
}

/// One loaded save document plus the catalogs needed to edit it. Mutating
/// operations rewrite the whole document to its original location before
/// returning, except inside declared batches, which persist exactly once.
#[derive(Debug, Clone)]
pub struct Session {
    catalogs: ReferenceCatalogs,
    document: SaveDocument,
    path: PathBuf,
}

impl Session {
    pub fn document(&self) -> &SaveDocument {
        &self.document
    }

    pub fn catalogs(&self) -> &ReferenceCatalogs {
        &self.catalogs
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Defensive copy of the profile field map.
    pub fn profile(&self) -> JsonMap<String, JsonValue> {
        self.document.profile().clone()
    }

    /// Defensive copy of the character list.
    pub fn characters(&self) -> Vec<CharacterRecord> {
        self.document.characters().to_vec()
    }

    pub fn set_profile_field(
        &mut self,
        name: &str,
        value: JsonValue,
    ) -> Result<(), SaveError> {
        self.document.set_profile_field(name, value);
        self.persist()
    }

    /// Inserts or refreshes one character and persists immediately.
    pub fn upsert_character(&mut self, request: UpsertRequest) -> Result<UpsertOutcome, SaveError> {
        self.upsert_inner(&request, Persist::Now)
    }

    /// Adds every catalog character absent from the document (the reserved
    /// NPC identifier excepted) and reports how many were added. Persists
    /// once at the end.
    pub fn upsert_all_missing(&mut self) -> Result<usize, SaveError> {
        let present: BTreeSet<i64> = self
            .document
            .characters()
            .iter()
            .map(|c| c.chara_id)
            .collect();

        let mut added = 0;
        for chara_id in self.catalogs.adventurer_ids() {
            if chara_id == RESERVED_NPC_ID || present.contains(&chara_id) {
                continue;
            }
            self.upsert_inner(&UpsertRequest::new(chara_id), Persist::Defer)?;
            added += 1;
        }

        self.persist()?;
        Ok(added)
    }

    /// Refreshes every roster character the catalogs know, preserving each
    /// record's acquisition time. A no-op bonus-wise for already-maxed
    /// records. Persists once at the end; returns how many were refreshed.
    pub fn refresh_all_existing(&mut self) -> Result<usize, SaveError> {
        let targets: Vec<(i64, i64)> = self
            .document
            .characters()
            .iter()
            .filter(|c| self.catalogs.contains(c.chara_id))
            .map(|c| (c.chara_id, c.gettime))
            .collect();

        for &(chara_id, gettime) in &targets {
            let mut request = UpsertRequest::new(chara_id);
            request.acquired_at = Some(gettime);
            self.upsert_inner(&request, Persist::Defer)?;
        }

        self.persist()?;
        Ok(targets.len())
    }

    /// Refreshes the current roster, then adds everything still missing.
    /// Returns the number of newly added characters.
    pub fn max_out_all(&mut self) -> Result<usize, SaveError> {
        self.refresh_all_existing()?;
        self.upsert_all_missing()
    }

    /// Writes the full in-memory document back to its original location.
    pub fn persist(&self) -> Result<(), SaveError> {
        self.document.persist(&self.path)
    }

    fn upsert_inner(
        &mut self,
        request: &UpsertRequest,
        persist: Persist,
    ) -> Result<UpsertOutcome, SaveError> {
        let chara_id = request.chara_id;
        let prior = self
            .document
            .character(chara_id)
            .map(|c| (c.level, c.mana_circle_count(), c.gettime));

        let source = match self.catalogs.adventurer(chara_id) {
            Some(entry) => StatSource::Catalog(entry),
            None => StatSource::Manual(request.manual),
        };
        let acquired_at = match prior {
            // A refresh keeps the original acquisition time.
            Some((_, _, gettime)) => Some(gettime),
            None => request.acquired_at,
        };
        let record = synthesizer::synthesize(chara_id, source, acquired_at);

        let story_ids: Vec<i64> = match &request.story_ids {
            Some(ids) => ids.clone(),
            None => self
                .catalogs
                .story_ids(chara_id)
                .map(<[i64]>::to_vec)
                .unwrap_or_default(),
        };
        self.document.add_story_unlocks(&story_ids);

        let spiral = record.level == SPIRAL_LEVEL;
        let element = identifier::element_code(chara_id);
        let newly_created = prior.is_none();

        match prior {
            None => {
                let delta = if spiral {
                    INSERT_DELTA_SPIRAL
                } else {
                    INSERT_DELTA_BASE
                };
                self.document.put_character(record.clone());
                self.document.accrue_character_bonus(element, delta, delta);
            }
            Some((prior_level, prior_nodes, _)) => {
                let level_changed = record.level != prior_level;
                let nodes_changed = record.mana_circle_count() != prior_nodes;
                self.document.put_character(record.clone());

                // Threshold checks read the pre-refresh state, not the
                // refreshed record.
                if level_changed {
                    let hp = if prior_level < BASE_LEVEL && spiral {
                        REFRESH_DELTA_CROSSED
                    } else {
                        REFRESH_DELTA_CHANGED
                    };
                    self.document.accrue_character_bonus(element, hp, 0.0);
                }
                if nodes_changed {
                    let atk = if prior_nodes < BASE_MANA_NODES as usize && spiral {
                        REFRESH_DELTA_CROSSED
                    } else {
                        REFRESH_DELTA_CHANGED
                    };
                    self.document.accrue_character_bonus(element, 0.0, atk);
                }
            }
        }

        if persist == Persist::Now {
            self.persist()?;
        }

        Ok(UpsertOutcome {
            record,
            newly_created,
        })
    }
}
