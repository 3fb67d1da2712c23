//! Language catalogues offered by the two panels.
//!
//! The remote service only understands lowercase codes. The UI shows a
//! human label with the code in trailing parentheses, e.g. `Bulu (bum)`,
//! and either form is accepted when parsing form input.

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown language: {0}")]
pub struct UnknownLanguage(pub String);

/// Languages the text-to-speech endpoint can synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TtsLanguage {
    #[default]
    Ewondo,
    Bulu,
    Bafia,
}

impl TtsLanguage {
    pub const ALL: [TtsLanguage; 3] = [TtsLanguage::Ewondo, TtsLanguage::Bulu, TtsLanguage::Bafia];

    pub fn code(self) -> &'static str {
        match self {
            TtsLanguage::Ewondo => "ewo",
            TtsLanguage::Bulu => "bum",
            TtsLanguage::Bafia => "ksf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TtsLanguage::Ewondo => "Ewondo (ewo)",
            TtsLanguage::Bulu => "Bulu (bum)",
            TtsLanguage::Bafia => "Bafia (ksf)",
        }
    }
}

/// Target languages for speech-to-speech translation and voice cloning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetLanguage {
    #[default]
    French,
    English,
    Chinese,
    Spanish,
    Arabic,
    Hindi,
    Portuguese,
    Russian,
    Korean,
    German,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 10] = [
        TargetLanguage::French,
        TargetLanguage::English,
        TargetLanguage::Chinese,
        TargetLanguage::Spanish,
        TargetLanguage::Arabic,
        TargetLanguage::Hindi,
        TargetLanguage::Portuguese,
        TargetLanguage::Russian,
        TargetLanguage::Korean,
        TargetLanguage::German,
    ];

    pub fn code(self) -> &'static str {
        match self {
            TargetLanguage::French => "fr",
            TargetLanguage::English => "en",
            TargetLanguage::Chinese => "zh",
            TargetLanguage::Spanish => "es",
            TargetLanguage::Arabic => "ar",
            TargetLanguage::Hindi => "hi",
            TargetLanguage::Portuguese => "pt",
            TargetLanguage::Russian => "ru",
            TargetLanguage::Korean => "ko",
            TargetLanguage::German => "de",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TargetLanguage::French => "français (fr)",
            TargetLanguage::English => "anglais (en)",
            TargetLanguage::Chinese => "chinois (zh)",
            TargetLanguage::Spanish => "espagnol (es)",
            TargetLanguage::Arabic => "arabe (ar)",
            TargetLanguage::Hindi => "hindi (hi)",
            TargetLanguage::Portuguese => "portugais (pt)",
            TargetLanguage::Russian => "russe (ru)",
            TargetLanguage::Korean => "coréen (ko)",
            TargetLanguage::German => "allemand (de)",
        }
    }
}

/// Pull the code out of `Label (code)`; bare codes pass through.
fn code_of(input: &str) -> String {
    let trimmed = input.trim();
    let code = match trimmed.rsplit_once('(') {
        Some((_, tail)) => tail.trim_end_matches(')'),
        None => trimmed,
    };
    code.trim().to_ascii_lowercase()
}

impl FromStr for TtsLanguage {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = code_of(s);
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

impl FromStr for TargetLanguage {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = code_of(s);
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

impl fmt::Display for TtsLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Serialize)]
struct LanguageEntry {
    code: &'static str,
    label: &'static str,
}

impl Serialize for TtsLanguage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        LanguageEntry { code: self.code(), label: self.label() }.serialize(serializer)
    }
}

impl Serialize for TargetLanguage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        LanguageEntry { code: self.code(), label: self.label() }.serialize(serializer)
    }
}
