//! Caller-supplied trip metadata and conversation history

use serde::{Deserialize, Deserializer, Serialize};

/// Structured trip details from the planning form. Every field is optional;
/// blank strings deserialize as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripInfo {
    #[serde(default, alias = "destino", deserialize_with = "blank_as_none")]
    pub destination: Option<String>,
    #[serde(default, alias = "fecha", deserialize_with = "blank_as_none")]
    pub date: Option<String>,
    #[serde(default, alias = "presupuesto", deserialize_with = "blank_as_none")]
    pub budget: Option<Budget>,
    #[serde(default, alias = "preferencia", deserialize_with = "blank_as_none")]
    pub preference: Option<Preference>,
}

impl TripInfo {
    /// True when the caller filled in nothing at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.destination.is_none()
            && self.date.is_none()
            && self.budget.is_none()
            && self.preference.is_none()
    }
}

/// Spending level. Unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Budget {
    Economic,
    Medium,
    High,
    Premium,
    Other(String),
}

impl Budget {
    /// Label shown to the model
    #[must_use]
    pub fn display_label(&self) -> &str {
        match self {
            Budget::Economic => "Económico (menos de $500)",
            Budget::Medium => "Medio ($500 - $1,500)",
            Budget::High => "Alto ($1,500 - $3,000)",
            Budget::Premium => "Premium (más de $3,000)",
            Budget::Other(raw) => raw,
        }
    }
}

impl From<String> for Budget {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "economic" | "economico" | "económico" => Budget::Economic,
            "medium" | "medio" => Budget::Medium,
            "high" | "alto" => Budget::High,
            "premium" => Budget::Premium,
            _ => Budget::Other(value),
        }
    }
}

impl From<Budget> for String {
    fn from(value: Budget) -> Self {
        match value {
            Budget::Economic => "economic".to_string(),
            Budget::Medium => "medium".to_string(),
            Budget::High => "high".to_string(),
            Budget::Premium => "premium".to_string(),
            Budget::Other(raw) => raw,
        }
    }
}

/// Travel style. Unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Preference {
    Adventure,
    Relaxation,
    Culture,
    Other(String),
}

impl Preference {
    /// Label shown to the model
    #[must_use]
    pub fn display_label(&self) -> &str {
        match self {
            Preference::Adventure => "Aventura 🏔️",
            Preference::Relaxation => "Relajación 🏖️",
            Preference::Culture => "Cultura 🏛️",
            Preference::Other(raw) => raw,
        }
    }
}

impl From<String> for Preference {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "adventure" | "aventura" => Preference::Adventure,
            "relaxation" | "relajacion" | "relajación" => Preference::Relaxation,
            "culture" | "cultura" => Preference::Culture,
            _ => Preference::Other(value),
        }
    }
}

impl From<Preference> for String {
    fn from(value: Preference) -> Self {
        match value {
            Preference::Adventure => "adventure".to_string(),
            Preference::Relaxation => "relaxation".to_string(),
            Preference::Culture => "culture".to_string(),
            Preference::Other(raw) => raw,
        }
    }
}

/// One earlier question/answer exchange, oldest first in a history list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(alias = "pregunta")]
    pub question: String,
    #[serde(alias = "respuesta")]
    pub answer: String,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(T::from))
}
