use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use dragalia_core::core_api::{Engine, ManualStats, Session, UpsertRequest};
use dragalia_core::identifier::{Element, Weapon};
use dragalia_render::{
    CharacterFilter, JsonStyle, render_characters_json, render_characters_text,
    render_profile_json, render_profile_text,
};
use serde_json::Value as JsonValue;

// Currency fields are 32-bit on the game server.
const CURRENCY_CAP: i64 = i32::MAX as i64;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVEDATA.TXT")]
    path: PathBuf,
    /// Directory holding the reference data files.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data")]
    data_dir: PathBuf,
    /// Copy the save file here before applying any edit.
    #[arg(long, value_name = "PATH")]
    backup: Option<PathBuf>,
    #[arg(long)]
    json: bool,

    #[arg(long)]
    profile: bool,
    #[arg(long)]
    characters: bool,
    /// Restrict --characters to one or more elements.
    #[arg(long, value_parser = parse_element)]
    element: Vec<Element>,
    /// Restrict --characters to one or more weapons.
    #[arg(long, value_parser = parse_weapon)]
    weapon: Vec<Weapon>,

    #[arg(long = "set-name", value_name = "NAME")]
    set_name: Option<String>,
    /// Epithet by name or numeric identifier.
    #[arg(long = "set-epithet", value_name = "NAME|ID")]
    set_epithet: Option<String>,
    #[arg(long = "set-wyrmite", value_name = "N")]
    set_wyrmite: Option<i64>,
    #[arg(long = "set-rupies", value_name = "N")]
    set_rupies: Option<i64>,
    #[arg(long = "set-mana", value_name = "N")]
    set_mana: Option<i64>,
    #[arg(long = "set-eldwater", value_name = "N")]
    set_eldwater: Option<i64>,

    /// Add or refresh one adventurer by name, alias, or identifier.
    #[arg(long, value_name = "NAME|ID")]
    add: Option<String>,
    /// Treat an adventurer unknown to the catalogs as mana-spiral capable.
    #[arg(long, requires = "add")]
    spiral: bool,
    #[arg(long = "shared-skill-cost", value_name = "N", requires = "add")]
    shared_skill_cost: Option<i64>,
    #[arg(long = "max-hp", value_name = "N", requires = "add")]
    max_hp: Option<i64>,
    #[arg(long = "max-atk", value_name = "N", requires = "add")]
    max_atk: Option<i64>,
    /// Story identifiers to unlock alongside --add.
    #[arg(
        long,
        value_name = "ID,ID,...",
        value_delimiter = ',',
        requires = "add"
    )]
    stories: Option<Vec<i64>>,

    /// Add every catalog adventurer missing from the save.
    #[arg(long = "add-missing")]
    add_missing: bool,
    /// Refresh every owned adventurer the catalogs know.
    #[arg(long = "max-existing")]
    max_existing: bool,
    /// Refresh the roster, then add everything missing.
    #[arg(long = "max-all", conflicts_with_all = ["add_missing", "max_existing"])]
    max_all: bool,
}

fn main() {
    let cli = Cli::parse();

    let has_profile_edits = cli.set_name.is_some()
        || cli.set_epithet.is_some()
        || cli.set_wyrmite.is_some()
        || cli.set_rupies.is_some()
        || cli.set_mana.is_some()
        || cli.set_eldwater.is_some();
    let has_edits = has_profile_edits
        || cli.add.is_some()
        || cli.add_missing
        || cli.max_existing
        || cli.max_all;

    if cli.backup.is_some() && !has_edits {
        eprintln!("--backup requires at least one editing flag");
        process::exit(2);
    }

    let engine = Engine::load(&cli.data_dir).unwrap_or_else(|e| {
        eprintln!("Error loading data files from {}: {e}", cli.data_dir.display());
        process::exit(1);
    });
    let mut session = engine.open_path(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error opening save file {}:", cli.path.display());
        eprintln!("  {e}");
        process::exit(1);
    });

    if has_edits {
        if let Some(backup) = &cli.backup {
            fs::copy(&cli.path, backup).unwrap_or_else(|e| {
                eprintln!("Error writing backup {}: {e}", backup.display());
                process::exit(1);
            });
        }
    }

    apply_profile_edits(&cli, &mut session);

    if let Some(target) = &cli.add {
        let chara_id = resolve_character(&cli, &session, target);
        let mut request = UpsertRequest::new(chara_id);
        request.manual = ManualStats {
            has_mana_spiral: cli.spiral,
            shared_skill_cost: cli.shared_skill_cost.unwrap_or(0),
            max_hp: cli.max_hp.unwrap_or(0),
            max_atk: cli.max_atk.unwrap_or(0),
        };
        request.story_ids = cli.stories.clone();

        let outcome = session.upsert_character(request).unwrap_or_else(|e| {
            eprintln!("Error adding adventurer: {e}");
            process::exit(1);
        });
        let verb = if outcome.newly_created {
            "Added"
        } else {
            "Refreshed"
        };
        let name = session
            .catalogs()
            .display_name(chara_id)
            .unwrap_or(target)
            .to_string();
        println!("{verb} {name} ({chara_id})");
    }

    if cli.max_all {
        let added = session.max_out_all().unwrap_or_else(|e| {
            eprintln!("Error maxing out roster: {e}");
            process::exit(1);
        });
        println!("Refreshed roster and added {added} adventurers");
    } else {
        if cli.max_existing {
            let refreshed = session.refresh_all_existing().unwrap_or_else(|e| {
                eprintln!("Error refreshing roster: {e}");
                process::exit(1);
            });
            println!("Refreshed {refreshed} adventurers");
        }
        if cli.add_missing {
            let added = session.upsert_all_missing().unwrap_or_else(|e| {
                eprintln!("Error adding missing adventurers: {e}");
                process::exit(1);
            });
            println!("Added {added} adventurers");
        }
    }

    let filter = CharacterFilter {
        elements: cli.element.clone(),
        weapons: cli.weapon.clone(),
    };
    let show_profile = cli.profile || (!cli.characters && !has_edits);
    let show_characters = cli.characters || (!cli.profile && !has_edits);

    if cli.json {
        let mut out = serde_json::Map::new();
        if show_profile {
            out.insert(
                "profile".to_string(),
                render_profile_json(&session.profile(), session.catalogs(), JsonStyle::CanonicalV1),
            );
        }
        if show_characters {
            out.insert(
                "characters".to_string(),
                render_characters_json(
                    &session.characters(),
                    session.catalogs(),
                    &filter,
                    JsonStyle::CanonicalV1,
                ),
            );
        }
        let rendered =
            serde_json::to_string_pretty(&JsonValue::Object(out)).unwrap_or_else(|e| {
                eprintln!("Error rendering JSON output: {e}");
                process::exit(1);
            });
        println!("{rendered}");
        return;
    }

    if show_profile {
        print!(
            "{}",
            render_profile_text(&session.profile(), session.catalogs())
        );
    }
    if show_characters {
        if show_profile {
            println!();
        }
        print!(
            "{}",
            render_characters_text(&session.characters(), session.catalogs(), &filter)
        );
    }
}

fn apply_profile_edits(cli: &Cli, session: &mut Session) {
    let mut edits: Vec<(&str, JsonValue)> = Vec::new();

    if let Some(name) = &cli.set_name {
        edits.push(("name", JsonValue::String(name.clone())));
    }
    if let Some(epithet) = &cli.set_epithet {
        let id = match epithet.trim().parse::<i64>() {
            Ok(id) => id,
            Err(_) => session.catalogs().epithet_id(epithet).unwrap_or_else(|| {
                eprintln!("Unknown epithet: {epithet}");
                process::exit(2);
            }),
        };
        edits.push(("emblem_id", JsonValue::from(id)));
    }
    for (field, value) in [
        ("crystal", cli.set_wyrmite),
        ("coin", cli.set_rupies),
        ("mana_point", cli.set_mana),
        ("dew_point", cli.set_eldwater),
    ] {
        if let Some(value) = value {
            edits.push((field, JsonValue::from(value.clamp(0, CURRENCY_CAP))));
        }
    }

    for (field, value) in edits {
        session.set_profile_field(field, value).unwrap_or_else(|e| {
            eprintln!("Error applying {field} edit: {e}");
            process::exit(1);
        });
    }
}

fn resolve_character(cli: &Cli, session: &Session, target: &str) -> i64 {
    if let Ok(id) = target.trim().parse::<i64>() {
        return id;
    }
    if let Some(id) = session.catalogs().resolve_alias(target) {
        return id;
    }
    eprintln!("Unknown adventurer: {target}");
    eprintln!("Pass a numeric identifier, or add an alias to {}", cli.data_dir.join("adventurer_aliases.txt").display());
    process::exit(2);
}

fn parse_element(value: &str) -> Result<Element, String> {
    Element::from_name(value).ok_or_else(|| {
        format!("invalid element '{value}', expected one of: flame, water, wind, light, shadow")
    })
}

fn parse_weapon(value: &str) -> Result<Weapon, String> {
    Weapon::from_name(value).ok_or_else(|| {
        format!(
            "invalid weapon '{value}', expected one of: sword, blade, dagger, axe, lance, bow, wand, staff, manacaster"
        )
    })
}
