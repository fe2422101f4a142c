//! System instruction composition
//!
//! The instruction has two layers. The four rewriting principles are the
//! same for every persona; only the tone overlay on top of them changes.

use std::fmt;

use crate::persona::{PersonaProfile, PersonaTag};

/// Formal or academic terms the rewrite must not use
pub const BANNED_VOCABULARY: &[&str] = &[
    "subsequently",
    "nevertheless",
    "delve",
    "tapestry",
    "testament",
    "beacon",
    "intricate",
    "overarching",
];

/// Casual replacements offered instead
pub const CASUAL_TRANSITIONS: &[&str] = &["so basically", "even then", "plus", "explore"];

/// Conjunctions allowed at the start of a sentence
pub const SENTENCE_STARTERS: &[&str] = &["And", "But", "So", "Because"];

/// Thought-process lead-ins
pub const FILLER_LEAD_INS: &[&str] = &["the interesting thing here is...", "honestly,", "pretty much"];

/// Closing cliches the rewrite must not use
pub const BANNED_CLOSERS: &[&str] = &["In conclusion", "I hope this helps", "To summarize", "Ultimately"];

/// Complete instruction for one persona
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionSet {
    pub persona: PersonaTag,
    pub tone_overlay: &'static str,
    pub banned_vocabulary: &'static [&'static str],
    pub casual_transitions: &'static [&'static str],
    pub sentence_starters: &'static [&'static str],
    pub filler_lead_ins: &'static [&'static str],
    pub banned_closers: &'static [&'static str],
}

/// Build the instruction set for a persona. Pure; never fails.
pub fn compose(persona: PersonaTag) -> InstructionSet {
    InstructionSet {
        persona,
        tone_overlay: persona.profile().tone,
        banned_vocabulary: BANNED_VOCABULARY,
        casual_transitions: CASUAL_TRANSITIONS,
        sentence_starters: SENTENCE_STARTERS,
        filler_lead_ins: FILLER_LEAD_INS,
        banned_closers: BANNED_CLOSERS,
    }
}

impl InstructionSet {
    pub fn profile(&self) -> &'static PersonaProfile {
        self.persona.profile()
    }

    /// Render as the system instruction sent to the model
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn quoted(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("'{}'", item))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "You are the core engine of \"StudentVibe,\" an AI text humanizer.")?;
        writeln!(
            f,
            "Your goal: rewrite polished machine-generated text so it reads like it was written by a real, smart student."
        )?;
        writeln!(f)?;
        writeln!(f, "The target persona is: {}. Adjust the tone accordingly:", self.persona)?;
        writeln!(f, "- {}", self.tone_overlay)?;
        writeln!(f)?;
        writeln!(f, "Follow these 4 core principles:")?;
        writeln!(
            f,
            "1. Burstiness: vary sentence lengths. Alternate short, punchy statements with longer, more complex thoughts. Never settle into a uniform rhythm."
        )?;
        writeln!(
            f,
            "2. Vocabulary: never use high-level academic jargon ({}). Replace it with natural transitions ({}).",
            quoted(self.banned_vocabulary),
            quoted(self.casual_transitions)
        )?;
        writeln!(f, "3. Strategic imperfection:")?;
        writeln!(f, "    - Start some sentences with {}.", quoted(self.sentence_starters))?;
        writeln!(f, "    - Use occasional contractions.")?;
        writeln!(
            f,
            "    - Open some sentences with thought-process fillers ({}).",
            quoted(self.filler_lead_ins)
        )?;
        writeln!(f, "4. Formatting:")?;
        writeln!(f, "    - NEVER use phrases like {}.", quoted(self.banned_closers))?;
        writeln!(
            f,
            "    - ALWAYS preserve the Markdown formatting of the input exactly, including headers (##) and bulleted lists (-)."
        )?;
        writeln!(f)?;
        write!(
            f,
            "Keep the original meaning completely. Output ONLY the rewritten text, with no introductory notes."
        )
    }
}
