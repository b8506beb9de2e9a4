//! Fixed prompt text: the behavioral preamble and the agent profiles.

use lexchat_types::agent::{AgentKind, AgentProfile};

/// First system entry of every prompt.
pub const PREAMBLE: &str = "Eres un asistente muy competente que razona internamente pero solo \
muestra el comentario final. Además, responde en el idioma de la pregunta o interacción.";

pub static LEGISLATION: AgentProfile = AgentProfile {
    kind: AgentKind::Legislation,
    instruction: "Eres un experto en legislación peruana. Responde con artículos de códigos y \
normas oficiales.",
    trigger: "ley|norma|artículo|código",
};

pub static CONTRACT: AgentProfile = AgentProfile {
    kind: AgentKind::Contract,
    instruction: "Eres un experto en derecho contractual en Perú. Explica conceptos y casos de \
contratos con precisión.",
    trigger: "contrato|obligación|acuerdo",
};

pub static JURISPRUDENCE: AgentProfile = AgentProfile {
    kind: AgentKind::Jurisprudence,
    instruction: "Eres un especialista en jurisprudencia peruana. Responde con fallos de la Corte \
Suprema y casos relevantes.",
    trigger: "jurisprudencia|fallo|sentencia",
};

pub static DOCTRINE: AgentProfile = AgentProfile {
    kind: AgentKind::Doctrine,
    instruction: "Eres un experto en doctrina jurídica. Explica principios legales y teorías del \
derecho con claridad.",
    trigger: "doctrina|principio|teoría",
};

/// Profiles in evaluation order. The first trigger that matches wins.
pub static PROFILES: [&AgentProfile; 4] = [&LEGISLATION, &CONTRACT, &JURISPRUDENCE, &DOCTRINE];

/// Used when no trigger matches.
pub static DEFAULT_PROFILE: &AgentProfile = &LEGISLATION;
