//! Business Model Canvas input adapter.
//!
//! The canvas arrives either as a JSON object with one field per block
//! (snake_case or camelCase names, string or array values) or as free text
//! with numbered headings. Both are normalised here into a
//! [`ParsedDocument`] so the renderer only ever sees canonical keys.

use serde_json::Value;

use crate::ir::{DocumentKind, ParsedDocument, SectionKey};
use crate::parser;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasInputError {
    #[error("bmc manquant")]
    Missing,
    #[error("bmc invalide: objet ou texte attendu, {0} reçu")]
    InvalidType(&'static str),
}

/// Accepted field names per block, preferred name first.
pub fn field_aliases(key: SectionKey) -> &'static [&'static str] {
    match key {
        SectionKey::PartenairesCles => &["partenaires_cles", "partenairesCles"],
        SectionKey::ActivitesCles => &["activites_cles", "activitesCles"],
        SectionKey::RessourcesCles => &["ressources_cles", "ressourcesCles"],
        SectionKey::PropositionValeur => &["proposition_valeur", "propositionValeur"],
        SectionKey::RelationClient => &["relation_client", "relationClient"],
        SectionKey::Canaux => &["canaux"],
        SectionKey::Segments => &["segments"],
        SectionKey::StructureCouts => &["structure_couts", "structureCouts"],
        SectionKey::SourcesRevenus => &["sources_revenus", "sourcesRevenus"],
        _ => &[],
    }
}

/// Builds a canvas document from the `bmc` request value.
pub fn canvas_from_value(value: Option<&Value>) -> Result<ParsedDocument, CanvasInputError> {
    match value {
        None | Some(Value::Null) => Err(CanvasInputError::Missing),
        Some(Value::String(text)) if text.trim().is_empty() => Err(CanvasInputError::Missing),
        Some(Value::Object(fields)) => {
            let mut doc = ParsedDocument::empty(DocumentKind::BusinessModelCanvas);
            for key in DocumentKind::BusinessModelCanvas.sections() {
                let field = field_aliases(*key)
                    .iter()
                    .find_map(|alias| fields.get(*alias).filter(|v| !v.is_null()));
                for bullet in field.map(field_bullets).unwrap_or_default() {
                    doc.push(*key, bullet);
                }
            }
            Ok(doc)
        }
        Some(Value::String(text)) => Ok(parser::parse_bmc_text(text)),
        Some(Value::Array(_)) => Err(CanvasInputError::InvalidType("tableau")),
        Some(Value::Bool(_)) => Err(CanvasInputError::InvalidType("booléen")),
        Some(Value::Number(_)) => Err(CanvasInputError::InvalidType("nombre")),
    }
}

fn field_bullets(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(item_text).collect(),
        Value::String(text) => text
            .lines()
            .map(strip_bullet_marker)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Number(_) | Value::Bool(_) => item_text(value).into_iter().collect(),
        Value::Null | Value::Object(_) => Vec::new(),
    }
}

fn item_text(item: &Value) -> Option<String> {
    match item {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn strip_bullet_marker(line: &str) -> &str {
    line.trim()
        .trim_start_matches(['-', '•', '*'])
        .trim_start()
}
