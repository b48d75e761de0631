use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::icons::IconKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Swot,
    #[serde(alias = "bmc")]
    BusinessModelCanvas,
    #[serde(alias = "matrix")]
    PriorityMatrix,
}

impl DocumentKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "swot" => Some(Self::Swot),
            "bmc" | "canvas" | "business-model-canvas" | "business_model_canvas" => {
                Some(Self::BusinessModelCanvas)
            }
            "matrix" | "eisenhower" | "priority-matrix" | "priority_matrix" => {
                Some(Self::PriorityMatrix)
            }
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Swot => "swot",
            Self::BusinessModelCanvas => "bmc",
            Self::PriorityMatrix => "matrix",
        }
    }

    /// Section keys in canonical (heading-number and render) order.
    pub fn sections(self) -> &'static [SectionKey] {
        use SectionKey::*;
        match self {
            Self::Swot => &[Forces, Faiblesses, Opportunites, Menaces],
            Self::PriorityMatrix => &[Faire, Planifier, Deleguer, Abandonner],
            Self::BusinessModelCanvas => &[
                PartenairesCles,
                ActivitesCles,
                RessourcesCles,
                PropositionValeur,
                RelationClient,
                Canaux,
                Segments,
                StructureCouts,
                SourcesRevenus,
            ],
        }
    }
}

/// Closed set of section identifiers across all document kinds. Variant
/// order is canonical order, so maps keyed by `SectionKey` iterate in
/// render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Forces,
    Faiblesses,
    Opportunites,
    Menaces,
    Faire,
    Planifier,
    Deleguer,
    Abandonner,
    PartenairesCles,
    ActivitesCles,
    RessourcesCles,
    PropositionValeur,
    RelationClient,
    Canaux,
    Segments,
    StructureCouts,
    SourcesRevenus,
}

impl SectionKey {
    pub fn kind(self) -> DocumentKind {
        use SectionKey::*;
        match self {
            Forces | Faiblesses | Opportunites | Menaces => DocumentKind::Swot,
            Faire | Planifier | Deleguer | Abandonner => DocumentKind::PriorityMatrix,
            _ => DocumentKind::BusinessModelCanvas,
        }
    }

    pub fn as_str(self) -> &'static str {
        use SectionKey::*;
        match self {
            Forces => "forces",
            Faiblesses => "faiblesses",
            Opportunites => "opportunites",
            Menaces => "menaces",
            Faire => "faire",
            Planifier => "planifier",
            Deleguer => "deleguer",
            Abandonner => "abandonner",
            PartenairesCles => "partenaires_cles",
            ActivitesCles => "activites_cles",
            RessourcesCles => "ressources_cles",
            PropositionValeur => "proposition_valeur",
            RelationClient => "relation_client",
            Canaux => "canaux",
            Segments => "segments",
            StructureCouts => "structure_couts",
            SourcesRevenus => "sources_revenus",
        }
    }

    /// 1-based heading number within the section's document kind.
    pub fn number(self) -> usize {
        let kind = self.kind();
        kind.sections()
            .iter()
            .position(|key| *key == self)
            .map(|idx| idx + 1)
            .unwrap_or(0)
    }

    pub fn title(self) -> &'static str {
        use SectionKey::*;
        match self {
            Forces => "Forces",
            Faiblesses => "Faiblesses",
            Opportunites => "Opportunités",
            Menaces => "Menaces",
            Faire => "À faire",
            Planifier => "À planifier",
            Deleguer => "À déléguer",
            Abandonner => "À abandonner",
            PartenairesCles => "Partenaires clés",
            ActivitesCles => "Activités clés",
            RessourcesCles => "Ressources clés",
            PropositionValeur => "Proposition de valeur",
            RelationClient => "Relation client",
            Canaux => "Canaux",
            Segments => "Segments de clientèle",
            StructureCouts => "Structure de coûts",
            SourcesRevenus => "Sources de revenus",
        }
    }

    pub fn icon(self) -> Option<IconKind> {
        use SectionKey::*;
        match self {
            PartenairesCles => Some(IconKind::Partners),
            ActivitesCles => Some(IconKind::Activities),
            RessourcesCles => Some(IconKind::Resources),
            PropositionValeur => Some(IconKind::Value),
            RelationClient => Some(IconKind::Relations),
            Canaux => Some(IconKind::Channels),
            Segments => Some(IconKind::Segments),
            StructureCouts => Some(IconKind::Costs),
            SourcesRevenus => Some(IconKind::Revenues),
            _ => None,
        }
    }
}

/// Section map produced by the parser or the canvas adapter. Always holds
/// every key of its kind, possibly with empty bullet lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    #[serde(skip)]
    kind: DocumentKind,
    #[serde(flatten)]
    sections: BTreeMap<SectionKey, Vec<String>>,
}

impl ParsedDocument {
    pub fn empty(kind: DocumentKind) -> Self {
        let sections = kind
            .sections()
            .iter()
            .map(|key| (*key, Vec::new()))
            .collect();
        Self { kind, sections }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn bullets(&self, key: SectionKey) -> &[String] {
        self.sections.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Appends a bullet. Keys from another document kind are ignored so the
    /// key set stays closed.
    pub fn push(&mut self, key: SectionKey, bullet: impl Into<String>) {
        if let Some(list) = self.sections.get_mut(&key) {
            list.push(bullet.into());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &[String])> {
        self.sections.iter().map(|(key, list)| (*key, list.as_slice()))
    }

    pub fn total_bullets(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_bullets() == 0
    }
}
