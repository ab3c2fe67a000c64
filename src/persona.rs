//! Persona profiles shaping assistant tone
//!
//! A persona bundles the system prompt seeded into every new session with the
//! greeting turn shown to the client. The set is fixed; clients select one by
//! id over the WebSocket `persona` message.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Named system-prompt profile for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// General-purpose assistant
    #[default]
    Default,
    /// Patient, encouraging explainer
    FriendlyTeacher,
    /// Precise, step-by-step troubleshooter
    TechSupport,
    /// Vivid, narrative-flavored responses
    Storyteller,
}

impl Persona {
    /// All known personas, in display order
    pub const ALL: [Self; 4] = [
        Self::Default,
        Self::FriendlyTeacher,
        Self::TechSupport,
        Self::Storyteller,
    ];

    /// Parse a persona id as sent by the client
    ///
    /// # Errors
    ///
    /// Returns [`Error::PersonaNotFound`] for an unknown id.
    pub fn parse(id: &str) -> Result<Self> {
        match id {
            "default" => Ok(Self::Default),
            "friendly_teacher" => Ok(Self::FriendlyTeacher),
            "tech_support" => Ok(Self::TechSupport),
            "storyteller" => Ok(Self::Storyteller),
            other => Err(Error::PersonaNotFound(other.to_string())),
        }
    }

    /// Stable id used on the wire
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::FriendlyTeacher => "friendly_teacher",
            Self::TechSupport => "tech_support",
            Self::Storyteller => "storyteller",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Default => "Assistant",
            Self::FriendlyTeacher => "Friendly Teacher",
            Self::TechSupport => "Tech Support",
            Self::Storyteller => "Storyteller",
        }
    }

    /// System prompt seeded as the first turn of every session
    #[must_use]
    pub const fn system_prompt(self) -> &'static str {
        match self {
            Self::Default => {
                "You are a helpful voice assistant. Keep replies concise and \
                 conversational; they will be read aloud."
            }
            Self::FriendlyTeacher => {
                "You are a friendly teacher. Explain things patiently with \
                 simple examples, and encourage follow-up questions. Keep \
                 replies short enough to be read aloud."
            }
            Self::TechSupport => {
                "You are a technical support specialist. Give precise, \
                 step-by-step guidance and confirm each step before moving \
                 on. Keep replies short enough to be read aloud."
            }
            Self::Storyteller => {
                "You are a storyteller. Answer with vivid, narrative flavor \
                 while staying accurate. Keep replies short enough to be \
                 read aloud."
            }
        }
    }

    /// Greeting turn appended right after the system prompt
    #[must_use]
    pub const fn greeting(self) -> &'static str {
        match self {
            Self::Default => "Hi! Press the microphone and ask me anything.",
            Self::FriendlyTeacher => {
                "Hello! I'm your friendly teacher today. What would you like to learn about?"
            }
            Self::TechSupport => {
                "Tech support here. Describe the problem and we'll work through it together."
            }
            Self::Storyteller => {
                "Welcome, listener! Ask me anything and I'll spin you an answer."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_persona() {
        for persona in Persona::ALL {
            assert_eq!(Persona::parse(persona.id()).unwrap(), persona);
        }
    }

    #[test]
    fn parse_rejects_unknown_id() {
        let err = Persona::parse("pirate").unwrap_err();
        assert!(matches!(err, Error::PersonaNotFound(_)));
    }

    #[test]
    fn serializes_as_snake_case_id() {
        let json = serde_json::to_string(&Persona::FriendlyTeacher).unwrap();
        assert_eq!(json, "\"friendly_teacher\"");
    }
}
