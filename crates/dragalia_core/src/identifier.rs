use std::fmt;

use serde::{Deserialize, Serialize};

// Digit positions (0-indexed) in the decimal identifier.
const WEAPON_DIGIT: usize = 2;
const RARITY_DIGIT: usize = 3;
const ELEMENT_DIGIT: usize = 5;

/// Identifiers shorter than this cannot be decoded and classify as unknown.
pub const MIN_IDENTIFIER_DIGITS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    Flame,
    Water,
    Wind,
    Light,
    Shadow,
    Unknown(u8),
}

impl Element {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Flame,
            2 => Self::Water,
            3 => Self::Wind,
            4 => Self::Light,
            5 => Self::Shadow,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> u8 {
        match *self {
            Self::Flame => 1,
            Self::Water => 2,
            Self::Wind => 3,
            Self::Light => 4,
            Self::Shadow => 5,
            Self::Unknown(other) => other,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "flame" => Some(Self::Flame),
            "water" => Some(Self::Water),
            "wind" => Some(Self::Wind),
            "light" => Some(Self::Light),
            "shadow" => Some(Self::Shadow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Flame => "Flame",
            Self::Water => "Water",
            Self::Wind => "Wind",
            Self::Light => "Light",
            Self::Shadow => "Shadow",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(v) => write!(f, "Unknown ({})", v),
            _ => f.write_str(self.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weapon {
    Sword,
    Blade,
    Dagger,
    Axe,
    Lance,
    Bow,
    Wand,
    Staff,
    Manacaster,
    Unknown(u8),
}

impl Weapon {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Sword,
            2 => Self::Blade,
            3 => Self::Dagger,
            4 => Self::Axe,
            5 => Self::Lance,
            6 => Self::Bow,
            7 => Self::Wand,
            8 => Self::Staff,
            9 => Self::Manacaster,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> u8 {
        match *self {
            Self::Sword => 1,
            Self::Blade => 2,
            Self::Dagger => 3,
            Self::Axe => 4,
            Self::Lance => 5,
            Self::Bow => 6,
            Self::Wand => 7,
            Self::Staff => 8,
            Self::Manacaster => 9,
            Self::Unknown(other) => other,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sword" => Some(Self::Sword),
            "blade" => Some(Self::Blade),
            "dagger" => Some(Self::Dagger),
            "axe" => Some(Self::Axe),
            "lance" => Some(Self::Lance),
            "bow" => Some(Self::Bow),
            "wand" => Some(Self::Wand),
            "staff" => Some(Self::Staff),
            // The in-game weapon is called both, depending on era.
            "manacaster" | "gun" => Some(Self::Manacaster),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Sword => "Sword",
            Self::Blade => "Blade",
            Self::Dagger => "Dagger",
            Self::Axe => "Axe",
            Self::Lance => "Lance",
            Self::Bow => "Bow",
            Self::Wand => "Wand",
            Self::Staff => "Staff",
            Self::Manacaster => "Manacaster",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(v) => write!(f, "Unknown ({})", v),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Classification embedded in a character identifier's digit positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub element: Element,
    pub weapon: Weapon,
    /// Rarity digit, `None` when the identifier is too short to carry one.
    pub rarity: Option<u8>,
}

impl Classification {
    fn unknown() -> Self {
        Self {
            element: Element::Unknown(0),
            weapon: Weapon::Unknown(0),
            rarity: None,
        }
    }
}

/// Decodes the fixed digit positions of `chara_id`. Never fails: identifiers
/// with fewer than [`MIN_IDENTIFIER_DIGITS`] digits, and digits outside the
/// known code ranges, classify as unknown.
pub fn decode(chara_id: i64) -> Classification {
    let digits = chara_id.to_string();
    if chara_id < 0 || digits.len() < MIN_IDENTIFIER_DIGITS {
        return Classification::unknown();
    }

    let bytes = digits.as_bytes();
    Classification {
        element: Element::from_code(bytes[ELEMENT_DIGIT] - b'0'),
        weapon: Weapon::from_code(bytes[WEAPON_DIGIT] - b'0'),
        rarity: Some(bytes[RARITY_DIGIT] - b'0'),
    }
}

/// Element digit of the identifier as stored, without range checking.
/// The bonus accumulator treats out-of-range codes as a no-op.
pub fn element_code(chara_id: i64) -> u8 {
    let digits = chara_id.to_string();
    if chara_id < 0 || digits.len() < MIN_IDENTIFIER_DIGITS {
        return 0;
    }
    digits.as_bytes()[ELEMENT_DIGIT] - b'0'
}

/// Display-order key: element, rarity descending, weapon, remaining suffix.
/// Purely for grouping rosters on screen; identifiers that cannot be decoded
/// sort by their own value.
pub fn sort_key(chara_id: i64) -> i64 {
    let digits = chara_id.to_string();
    if chara_id < 0 || digits.len() < MIN_IDENTIFIER_DIGITS {
        return chara_id;
    }

    let bytes = digits.as_bytes();
    let element = bytes[ELEMENT_DIGIT] - b'0';
    let weapon = bytes[WEAPON_DIGIT] - b'0';
    // 9 - digit keeps the key a single digit while ordering rarity high-first.
    let rarity_inverted = 9 - (bytes[RARITY_DIGIT] - b'0');
    let suffix = &digits[ELEMENT_DIGIT + 1..];

    format!("{element}{rarity_inverted}{weapon}{suffix}")
        .parse()
        .unwrap_or(chara_id)
}

#[cfg(test)]
mod tests {
    use super::{Classification, Element, Weapon, decode, element_code, sort_key};

    #[test]
    fn decode_extracts_fixed_digit_positions() {
        // digits: 1 0 [1]=weapon 5=rarity 0 [3]=element 0 2
        let class = decode(10_150_302);
        assert_eq!(class.weapon, Weapon::Sword);
        assert_eq!(class.rarity, Some(5));
        assert_eq!(class.element, Element::Wind);
    }

    #[test]
    fn decode_fails_open_on_short_identifier() {
        assert_eq!(decode(12345), Classification::unknown());
        assert_eq!(element_code(12345), 0);
    }

    #[test]
    fn decode_keeps_out_of_range_codes_as_unknown() {
        // element digit 7 is outside 1..=5
        let class = decode(10_150_702);
        assert_eq!(class.element, Element::Unknown(7));
        assert_eq!(class.element.as_str(), "Unknown");
        assert_eq!(element_code(10_150_702), 7);
    }

    #[test]
    fn sort_key_groups_by_element_then_rarity_descending() {
        let flame_5star = sort_key(10_150_103);
        let flame_4star = sort_key(10_140_103);
        let water_5star = sort_key(10_150_203);

        assert!(flame_5star < flame_4star);
        assert!(flame_4star < water_5star);
    }

    #[test]
    fn sort_key_passes_short_identifiers_through() {
        assert_eq!(sort_key(42), 42);
    }
}
