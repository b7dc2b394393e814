//! Prompt assembly for the travel consultant persona
//!
//! The output is deterministic for a given input: persona and format
//! contract, trip context (with the weather block appended), conversation
//! history, then the user's question last.

use std::fmt::Write;

use crate::models::{ConversationTurn, TripInfo};

/// Section headers every answer must contain, in this order
pub const SECTIONS: [&str; 5] = [
    "ALOJAMIENTO",
    "COMIDA LOCAL",
    "LUGARES IMPERDIBLES",
    "CONSEJOS LOCALES",
    "ESTIMACIÓN DE COSTOS",
];

/// Most recent turns kept in the prompt
pub const HISTORY_WINDOW: usize = 5;

/// Characters kept from each prior answer
pub const ANSWER_PREVIEW_CHARS: usize = 200;

const TRUNCATION_MARKER: &str = "...";

const PERSONA: &str = r#"Eres Alex, el consultor personal de viajes de ViajeIA. Tu personalidad es:

🎯 IDENTIDAD:
- Te presentas siempre como "Alex, tu consultor personal de viajes"
- Eres entusiasta, amigable y apasionado por los viajes
- Usas un tono conversacional y cercano

📋 FORMATO DE RESPUESTAS - ESTRUCTURA OBLIGATORIA:
SIEMPRE debes responder con esta estructura exacta, usando estas secciones en este orden:

ALOJAMIENTO: [hoteles, hostales u otros alojamientos concretos, con bullets y emojis]
COMIDA LOCAL: [restaurantes, platos típicos y lugares para comer, con bullets y emojis]
LUGARES IMPERDIBLES: [atracciones, sitios y actividades que no se pueden perder, con bullets y emojis]
CONSEJOS LOCALES: [tips, información útil, advertencias y recomendaciones prácticas, con bullets y emojis]
ESTIMACIÓN DE COSTOS: [gastos aproximados por categoría (alojamiento, comida, transporte, actividades), con bullets y emojis]

IMPORTANTE:
- SIEMPRE incluye las 5 secciones en el orden indicado
- Usa bullets (• o -) dentro de cada sección
- INCLUYE emojis de viajes relevantes (✈️ 🏨 🗺️ 🌍 🎒 🏖️ 🏔️ 🚗 🚢 🎫 📸 💰 🍽️ 🏛️ 🌮 etc.)
- Personaliza cada sección con la información del viaje que conoces (destino, fecha, presupuesto, preferencias)
- Sé específico y útil en cada recomendación
- Si no tienes información suficiente, haz suposiciones razonables basadas en el destino

💬 ESTILO:
- Puedes empezar con un saludo entusiasta breve antes de la estructura
- Puedes terminar con una pregunta amigable después de la estructura
- Mantén un tono conversacional y cercano"#;

const WEATHER_INSTRUCTION: &str = "Incluye esta información del clima actual al inicio de tu respuesta, justo después del saludo y antes de la sección ALOJAMIENTO.";

const HISTORY_INSTRUCTION: &str = "IMPORTANTE: Si el usuario pregunta sobre 'allí', 'ese lugar', 'ese destino', o hace referencias similares, se refiere al último destino mencionado en el historial. Usa el contexto del historial para dar respuestas coherentes y continuar la conversación de manera natural.";

/// Everything the prompt is built from
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub question: &'a str,
    pub trip: &'a TripInfo,
    pub weather_report: Option<&'a str>,
    pub history: &'a [ConversationTurn],
}

/// Build the full model prompt
#[must_use]
pub fn compose(input: &PromptInput<'_>) -> String {
    let mut prompt = String::from(PERSONA);

    let mut context = trip_block(input.trip).unwrap_or_default();
    if let Some(report) = input.weather_report.filter(|r| !r.trim().is_empty()) {
        let _ = write!(context, "\n\n{report}\n\n{WEATHER_INSTRUCTION}");
    }
    prompt.push_str(&context);

    if let Some(history) = history_block(input.history) {
        prompt.push_str(&history);
    }

    let _ = write!(
        prompt,
        "\n\nResponde como Alex, SIEMPRE usando la estructura obligatoria con las 5 secciones ({}), \
         siendo entusiasta, organizado con bullets, incluyendo emojis de viajes y personalizando \
         según la información del viaje disponible. Si hay historial de conversación, úsalo para \
         dar continuidad y contexto a tu respuesta.",
        SECTIONS.join(", ")
    );

    let _ = write!(prompt, "\n\nPregunta del usuario: {}", input.question);
    prompt
}

/// Trip details, or `None` when the caller gave none
fn trip_block(trip: &TripInfo) -> Option<String> {
    if trip.is_empty() {
        return None;
    }

    let mut block = String::from("\n\n📋 INFORMACIÓN DEL VIAJE DEL USUARIO:\n");
    if let Some(destination) = &trip.destination {
        let _ = writeln!(block, "- Destino: {destination}");
    }
    if let Some(date) = &trip.date {
        let _ = writeln!(block, "- Fecha: {date}");
    }
    if let Some(budget) = &trip.budget {
        let _ = writeln!(block, "- Presupuesto: {}", budget.display_label());
    }
    if let Some(preference) = &trip.preference {
        let _ = writeln!(block, "- Preferencia: {}", preference.display_label());
    }
    block.push_str("\nUsa esta información para personalizar tus respuestas y recomendaciones.");
    Some(block)
}

/// Last few turns, or `None` without history
fn history_block(history: &[ConversationTurn]) -> Option<String> {
    if history.is_empty() {
        return None;
    }

    let recent = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
    let mut block = String::from("\n\n💬 HISTORIAL DE CONVERSACIÓN ANTERIOR:\n");
    for (index, turn) in recent.iter().enumerate() {
        let _ = write!(
            block,
            "\nConversación {}:\nUsuario: {}\nAlex: {}\n",
            index + 1,
            turn.question,
            preview(&turn.answer)
        );
    }
    let _ = write!(block, "\n{HISTORY_INSTRUCTION}");
    Some(block)
}

/// First characters of an answer, marked when cut
fn preview(answer: &str) -> String {
    let mut chars = answer.char_indices();
    match chars.nth(ANSWER_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &answer[..cut]),
        None => answer.to_string(),
    }
}
