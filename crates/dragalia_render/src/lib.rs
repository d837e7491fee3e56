use std::fmt::Write as _;

use dragalia_core::core_api::ReferenceCatalogs;
use dragalia_core::document::CharacterRecord;
use dragalia_core::identifier::{self, Element, Weapon};
use serde_json::{Map as JsonMap, Value as JsonValue};

const NAME_COL_WIDTH: usize = 24;
const CLASS_COL_WIDTH: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    Roster,
}

/// Roster filter. Empty lists select everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterFilter {
    pub elements: Vec<Element>,
    pub weapons: Vec<Weapon>,
}

impl CharacterFilter {
    pub fn is_unrestricted(&self) -> bool {
        self.elements.is_empty() && self.weapons.is_empty()
    }

    pub fn matches(&self, chara_id: i64) -> bool {
        let class = identifier::decode(chara_id);
        (self.elements.is_empty() || self.elements.contains(&class.element))
            && (self.weapons.is_empty() || self.weapons.contains(&class.weapon))
    }
}

/// Profile fields worth surfacing, in display order. Remaining profile
/// fields stay in the document untouched.
const PROFILE_FIELDS: [(&str, &str); 7] = [
    ("name", "Name"),
    ("viewer_id", "User ID"),
    ("level", "Level"),
    ("crystal", "Wyrmite"),
    ("coin", "Rupies"),
    ("mana_point", "Mana"),
    ("dew_point", "Eldwater"),
];

pub fn render_profile_json(
    profile: &JsonMap<String, JsonValue>,
    catalogs: &ReferenceCatalogs,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            let mut out = JsonMap::new();
            for (key, _) in PROFILE_FIELDS {
                if let Some(value) = profile.get(key) {
                    out.insert(key.to_string(), value.clone());
                }
            }
            if let Some(epithet_id) = profile.get("emblem_id").and_then(JsonValue::as_i64) {
                out.insert("emblem_id".to_string(), JsonValue::from(epithet_id));
                if let Some(name) = catalogs.epithet_name(epithet_id) {
                    out.insert("emblem".to_string(), JsonValue::String(name.to_string()));
                }
            }
            JsonValue::Object(out)
        }
    }
}

pub fn render_profile_text(
    profile: &JsonMap<String, JsonValue>,
    catalogs: &ReferenceCatalogs,
) -> String {
    let mut out = String::new();
    writeln!(&mut out, " ::: Profile :::").expect("writing to String cannot fail");
    for (key, label) in PROFILE_FIELDS {
        let value = profile.get(key).cloned().unwrap_or(JsonValue::Null);
        writeln!(&mut out, " {:<10}{}", format!("{label}:"), scalar_text(&value))
            .expect("writing to String cannot fail");
    }
    if let Some(epithet_id) = profile.get("emblem_id").and_then(JsonValue::as_i64) {
        let shown = match catalogs.epithet_name(epithet_id) {
            Some(name) => name.to_string(),
            None => epithet_id.to_string(),
        };
        writeln!(&mut out, " {:<10}{}", "Epithet:", shown)
            .expect("writing to String cannot fail");
    }
    out
}

pub fn render_characters_json(
    characters: &[CharacterRecord],
    catalogs: &ReferenceCatalogs,
    filter: &CharacterFilter,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Array(
            sorted_roster(characters, filter)
                .into_iter()
                .map(|record| character_to_json(record, catalogs))
                .collect(),
        ),
    }
}

pub fn render_characters_text(
    characters: &[CharacterRecord],
    catalogs: &ReferenceCatalogs,
    filter: &CharacterFilter,
) -> String {
    let roster = sorted_roster(characters, filter);

    let mut out = String::new();
    writeln!(&mut out, " ::: Adventurers ({}) :::", roster.len())
        .expect("writing to String cannot fail");
    if roster.is_empty() {
        writeln!(&mut out, " none").expect("writing to String cannot fail");
        return out;
    }

    for record in roster {
        let class = identifier::decode(record.chara_id);
        let name = match catalogs.display_name(record.chara_id) {
            Some(name) => name.to_string(),
            None => format!("#{}", record.chara_id),
        };
        let classification = match class.rarity {
            Some(rarity) => format!("{} {} {}*", class.element, class.weapon, rarity),
            None => "Unknown".to_string(),
        };
        writeln!(
            &mut out,
            " {:<n$}{:<c$}Lv.{:<4}HP {:<6}Str {}",
            fit_column(&name, NAME_COL_WIDTH),
            fit_column(&classification, CLASS_COL_WIDTH),
            record.level,
            format_number_with_commas(record.hp),
            format_number_with_commas(record.attack),
            n = NAME_COL_WIDTH,
            c = CLASS_COL_WIDTH
        )
        .expect("writing to String cannot fail");
    }
    out
}

fn sorted_roster<'a>(
    characters: &'a [CharacterRecord],
    filter: &CharacterFilter,
) -> Vec<&'a CharacterRecord> {
    let mut roster: Vec<&CharacterRecord> = characters
        .iter()
        .filter(|record| filter.matches(record.chara_id))
        .collect();
    roster.sort_by_key(|record| identifier::sort_key(record.chara_id));
    roster
}

fn character_to_json(record: &CharacterRecord, catalogs: &ReferenceCatalogs) -> JsonValue {
    let class = identifier::decode(record.chara_id);
    let mut m = JsonMap::new();
    m.insert("chara_id".to_string(), JsonValue::from(record.chara_id));
    if let Some(name) = catalogs.display_name(record.chara_id) {
        m.insert("name".to_string(), JsonValue::String(name.to_string()));
    }
    m.insert(
        "element".to_string(),
        JsonValue::String(class.element.as_str().to_string()),
    );
    m.insert(
        "weapon".to_string(),
        JsonValue::String(class.weapon.as_str().to_string()),
    );
    m.insert(
        "rarity".to_string(),
        match class.rarity {
            Some(rarity) => JsonValue::from(rarity),
            None => JsonValue::Null,
        },
    );
    m.insert("level".to_string(), JsonValue::from(record.level));
    m.insert(
        "mana_circle_count".to_string(),
        JsonValue::from(record.mana_circle_count()),
    );
    m.insert("hp".to_string(), JsonValue::from(record.hp));
    m.insert("attack".to_string(), JsonValue::from(record.attack));
    JsonValue::Object(m)
}

fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => {
            if let Some(n) = n.as_i64() {
                format_number_with_commas(n)
            } else {
                n.to_string()
            }
        }
        JsonValue::Null => "unknown".to_string(),
        other => other.to_string(),
    }
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn format_number_with_commas(n: i64) -> String {
    if n < 0 {
        return format!("-{}", format_number_with_commas(-n));
    }
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::format_number_with_commas;

    #[test]
    fn comma_grouping() {
        assert_eq!(format_number_with_commas(0), "0");
        assert_eq!(format_number_with_commas(999), "999");
        assert_eq!(format_number_with_commas(8_866_950), "8,866,950");
        assert_eq!(format_number_with_commas(-1_234), "-1,234");
    }
}
