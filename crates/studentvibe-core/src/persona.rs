//! Persona tags and their static profiles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HumanizeError;

/// Target voice for a rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PersonaTag {
    #[serde(rename = "High School", alias = "HighSchool")]
    HighSchool,
    #[default]
    College,
    Creative,
}

impl PersonaTag {
    pub const ALL: [PersonaTag; 3] = [PersonaTag::HighSchool, PersonaTag::College, PersonaTag::Creative];

    /// Static profile for this persona
    pub fn profile(self) -> &'static PersonaProfile {
        match self {
            PersonaTag::HighSchool => &HIGH_SCHOOL,
            PersonaTag::College => &COLLEGE,
            PersonaTag::Creative => &CREATIVE,
        }
    }

    pub fn display_name(self) -> &'static str {
        self.profile().display_name
    }
}

impl fmt::Display for PersonaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PersonaTag {
    type Err = HumanizeError;

    /// Accepts the display name and the usual spellings of it:
    /// `High School`, `HighSchool`, `high-school`, `high_school`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "highschool" => Ok(PersonaTag::HighSchool),
            "college" => Ok(PersonaTag::College),
            "creative" => Ok(PersonaTag::Creative),
            _ => Err(HumanizeError::UnknownPersona(s.to_string())),
        }
    }
}

/// Immutable per-persona data: the tone overlay for the prompt and the
/// vocabulary the local rewrite engine draws from.
#[derive(Debug)]
pub struct PersonaProfile {
    pub tag: PersonaTag,
    pub display_name: &'static str,
    /// One-line tone description placed in the system instruction
    pub tone: &'static str,
    /// Persona-flavoured fillers and transitions
    pub fillers: &'static [&'static str],
    /// Extra word swaps; these win over the shared footprint table
    pub replacements: &'static [(&'static str, &'static [&'static str])],
}

static HIGH_SCHOOL: PersonaProfile = PersonaProfile {
    tag: PersonaTag::HighSchool,
    display_name: "High School",
    tone: "A bit more scattered, very casual, might use \"kinda\" or \"literally\".",
    fillers: &["kinda", "literally", "like", "honestly"],
    replacements: &[
        ("utilize", &["use"]),
        ("demonstrate", &["show"]),
        ("significant", &["huge", "big"]),
        ("numerous", &["a lot of", "tons of"]),
    ],
};

static COLLEGE: PersonaProfile = PersonaProfile {
    tag: PersonaTag::College,
    display_name: "College",
    tone: "Smarter, uses slightly better structure, but still relies on casual transitions like \"essentially\" or \"to be fair.\"",
    fillers: &["essentially", "to be fair", "basically"],
    replacements: &[
        ("utilize", &["use"]),
        ("significant", &["major", "real"]),
        ("numerous", &["a bunch of", "many"]),
    ],
};

static CREATIVE: PersonaProfile = PersonaProfile {
    tag: PersonaTag::Creative,
    display_name: "Creative",
    tone: "Highly expressive, uses phrases like \"the wild thing is\" or \"bottom line.\"",
    fillers: &["the wild thing is", "bottom line", "funny enough"],
    replacements: &[
        ("significant", &["massive", "wild"]),
        ("utilize", &["put to work", "use"]),
        ("demonstrate", &["show off", "show"]),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        for input in ["High School", "HighSchool", "high-school", "high_school", "HIGH SCHOOL"] {
            assert_eq!(input.parse::<PersonaTag>().unwrap(), PersonaTag::HighSchool, "{input}");
        }
        assert_eq!("college".parse::<PersonaTag>().unwrap(), PersonaTag::College);
        assert_eq!("Creative".parse::<PersonaTag>().unwrap(), PersonaTag::Creative);
    }

    #[test]
    fn test_unknown_persona() {
        let err = "Pirate".parse::<PersonaTag>().unwrap_err();
        assert_eq!(err.to_string(), "Persona 'Pirate' not found");
    }

    #[test]
    fn test_serde_uses_display_names() {
        assert_eq!(serde_json::to_string(&PersonaTag::HighSchool).unwrap(), "\"High School\"");
        assert_eq!(
            serde_json::from_str::<PersonaTag>("\"HighSchool\"").unwrap(),
            PersonaTag::HighSchool
        );
    }

    #[test]
    fn test_profiles_are_distinct() {
        for tag in PersonaTag::ALL {
            assert_eq!(tag.profile().tag, tag);
            assert!(!tag.profile().fillers.is_empty());
        }
        assert_ne!(PersonaTag::College.profile().tone, PersonaTag::Creative.profile().tone);
    }

    #[test]
    fn test_default_is_college() {
        assert_eq!(PersonaTag::default(), PersonaTag::College);
    }
}
