use std::error::Error;
use std::fmt;

/// Required top-level sections of the save document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Profile,
    Characters,
    BonusTables,
    StoryLog,
}

impl Section {
    /// Wire key of the section inside the document's `data` object.
    pub fn key(&self) -> &'static str {
        match *self {
            Self::Profile => "user_data",
            Self::Characters => "chara_list",
            Self::BonusTables => "fort_bonus_list",
            Self::StoryLog => "unit_story_list",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveErrorCode {
    Resource,
    DocumentFormat,
    MissingSection(Section),
    Persistence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveError {
    pub code: SaveErrorCode,
    pub message: String,
}

impl SaveError {
    pub fn new(code: SaveErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn missing_section(section: Section) -> Self {
        Self::new(
            SaveErrorCode::MissingSection(section),
            format!("save document has no {} section", section.key()),
        )
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for SaveError {}
