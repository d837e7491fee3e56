use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Value, json};

fn temp_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "dragalia_se_{}_{}_{}",
        prefix,
        std::process::id(),
        nanos
    ))
}

fn write_catalogs(dir: &Path) {
    fs::write(
        dir.join("adventurers.txt"),
        json!({
            "10150103": {
                "FullName": "Marth",
                "ManaSpiralDate": "2020-03-31T06:00:00+09:00",
                "EditSkillCost": 10,
                "MaxHp": 90, "AddMaxHp1": 100,
                "PlusHp0": 1, "PlusHp1": 2, "PlusHp2": 3, "PlusHp3": 4,
                "PlusHp4": 5, "PlusHp5": 6, "McFullBonusHp5": 9,
                "MaxAtk": 50, "AddMaxAtk1": 60,
                "PlusAtk0": 1, "PlusAtk1": 2, "PlusAtk2": 3, "PlusAtk3": 4,
                "PlusAtk4": 5, "PlusAtk5": 6, "McFullBonusAtk5": 4
            },
            "10340203": {
                "FullName": "Karina",
                "EditSkillCost": 6,
                "MaxHp": 70,
                "PlusHp0": 1, "PlusHp1": 2, "PlusHp2": 3, "PlusHp3": 4,
                "PlusHp4": 5, "McFullBonusHp5": 5,
                "MaxAtk": 40,
                "PlusAtk0": 1, "PlusAtk1": 2, "PlusAtk2": 3, "PlusAtk3": 4,
                "PlusAtk4": 5, "McFullBonusAtk5": 5
            }
        })
        .to_string(),
    )
    .expect("failed to write adventurers fixture");
    fs::write(
        dir.join("adventurer_aliases.txt"),
        json!({"Marth": 10150103, "Karina": 10340203}).to_string(),
    )
    .expect("failed to write aliases fixture");
    fs::write(
        dir.join("epithets.txt"),
        json!({"40000001": "The Chosen One", "The Chosen One": "40000001"}).to_string(),
    )
    .expect("failed to write epithets fixture");
    fs::write(
        dir.join("stories.txt"),
        json!({"10150103": [110150101, 110150102]}).to_string(),
    )
    .expect("failed to write stories fixture");
}

fn character_json(chara_id: i64, level: i64, mana_nodes: i64) -> Value {
    json!({
        "chara_id": chara_id,
        "rarity": 4,
        "exp": 100,
        "level": level,
        "additional_max_level": 0,
        "hp_plus_count": 0,
        "attack_plus_count": 0,
        "limit_break_count": 2,
        "is_new": 0,
        "gettime": 1_600_000_000,
        "skill_1_level": 1,
        "skill_2_level": 1,
        "ability_1_level": 1,
        "ability_2_level": 1,
        "ability_3_level": 1,
        "burst_attack_level": 1,
        "combo_buildup_count": 0,
        "hp": 430,
        "attack": 260,
        "ex_ability_level": 1,
        "ex_ability_2_level": 1,
        "is_temporary": 0,
        "is_unlock_edit_skill": 0,
        "mana_circle_piece_id_list": (1..=mana_nodes).collect::<Vec<i64>>(),
        "list_view_flag": 1
    })
}

fn album() -> Value {
    json!([
        {"hp": 0.0, "attack": 0.0},
        {"hp": 0.0, "attack": 0.0},
        {"hp": 0.0, "attack": 0.0},
        {"hp": 0.0, "attack": 0.0},
        {"hp": 0.0, "attack": 0.0}
    ])
}

fn write_save(dir: &Path, characters: Vec<Value>) -> PathBuf {
    let root = json!({
        "data": {
            "user_data": {
                "name": "Euden",
                "level": 60,
                "crystal": 1200,
                "coin": 5000,
                "mana_point": 420,
                "dew_point": 77,
                "emblem_id": 40000001
            },
            "chara_list": characters,
            "fort_bonus_list": {
                "chara_bonus_by_album": album(),
                "dragon_bonus_by_album": album()
            },
            "unit_story_list": []
        }
    });
    let path = dir.join("savedata.txt");
    fs::write(&path, root.to_string()).expect("failed to write save fixture");
    path
}

fn setup(prefix: &str, characters: Vec<Value>) -> (PathBuf, PathBuf) {
    let dir = temp_test_dir(prefix);
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    write_catalogs(&dir);
    let save = write_save(&dir, characters);
    (dir, save)
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_dragalia-se"))
        .args(args)
        .output()
        .expect("failed to run dragalia-se CLI")
}

#[test]
fn cli_default_output_shows_profile_and_roster() {
    let (dir, save) = setup("default_output", vec![character_json(10_340_203, 80, 50)]);
    let data_dir = dir.to_string_lossy().to_string();
    let save = save.to_string_lossy().to_string();

    let output = run_cli(&["--data-dir", &data_dir, &save]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("::: Profile :::"));
    assert!(stdout.contains("Name:     Euden"));
    assert!(stdout.contains("Wyrmite:  1,200"));
    assert!(stdout.contains("Epithet:  The Chosen One"));
    assert!(stdout.contains("::: Adventurers (1) :::"));
    assert!(stdout.contains("Karina"));
    assert!(stdout.contains("Water Dagger 4*"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_profile_flag_omits_roster() {
    let (dir, save) = setup("profile_only", vec![character_json(10_340_203, 80, 50)]);
    let data_dir = dir.to_string_lossy().to_string();
    let save = save.to_string_lossy().to_string();

    let output = run_cli(&["--data-dir", &data_dir, "--profile", &save]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("::: Profile :::"));
    assert!(!stdout.contains("::: Adventurers"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_json_output_is_parseable_and_filtered() {
    let (dir, save) = setup(
        "json_output",
        vec![
            character_json(10_340_203, 80, 50),
            character_json(10_150_103, 100, 70),
        ],
    );
    let data_dir = dir.to_string_lossy().to_string();
    let save = save.to_string_lossy().to_string();

    let output = run_cli(&[
        "--data-dir",
        &data_dir,
        "--characters",
        "--element",
        "flame",
        "--json",
        &save,
    ]);
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert!(value.get("profile").is_none());
    let rows = value["characters"].as_array().expect("characters is a list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], json!("Marth"));
    assert_eq!(rows[0]["element"], json!("Flame"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_rejects_invalid_element_with_usage_error() {
    let (dir, save) = setup("bad_element", vec![]);
    let data_dir = dir.to_string_lossy().to_string();
    let save = save.to_string_lossy().to_string();

    let output = run_cli(&["--data-dir", &data_dir, "--element", "plasma", &save]);
    assert_eq!(output.status.code(), Some(2));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_reports_missing_save_file() {
    let (dir, _) = setup("missing_save", vec![]);
    let data_dir = dir.to_string_lossy().to_string();
    let missing = dir.join("no_such_file.txt").to_string_lossy().to_string();

    let output = run_cli(&["--data-dir", &data_dir, &missing]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error opening save file"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_reports_missing_data_dir() {
    let (dir, save) = setup("missing_data", vec![]);
    let bad_data = dir.join("nowhere").to_string_lossy().to_string();
    let save = save.to_string_lossy().to_string();

    let output = run_cli(&["--data-dir", &bad_data, &save]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error loading data files"));

    let _ = fs::remove_dir_all(&dir);
}
