use crate::ir::{DocumentKind, ParsedDocument, SectionKey};
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static LEADING_NOISE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[=\s]+").unwrap());
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-•]\s*").unwrap());

const INVISIBLE_CHARS: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// Heading keywords per section. Patterns are written against the folded
/// match key (lower-case, no diacritics, single spaces).
const HEADING_RULES: &[(SectionKey, &str)] = &[
    (SectionKey::Forces, r"forces?"),
    (SectionKey::Faiblesses, r"faiblesses?"),
    (SectionKey::Opportunites, r"opportunites?"),
    (SectionKey::Menaces, r"menaces?"),
    (SectionKey::Faire, r"(?:a\s?)?faire"),
    (SectionKey::Planifier, r"(?:a\s?)?planifier"),
    (SectionKey::Deleguer, r"(?:a\s?)?deleguer"),
    (SectionKey::Abandonner, r"(?:a\s?)?abandonner"),
    (SectionKey::PartenairesCles, r"partenaires?(?:\scles?)?"),
    (SectionKey::ActivitesCles, r"activites?(?:\scles?)?"),
    (SectionKey::RessourcesCles, r"ressources?(?:\scles?)?"),
    (
        SectionKey::PropositionValeur,
        r"propositions?\s(?:de\s)?(?:la\s)?valeurs?",
    ),
    (
        SectionKey::RelationClient,
        r"relations?\s(?:avec\s)?(?:les?\s|la\s)?client(?:s|ele)?",
    ),
    (SectionKey::Canaux, r"canaux|canal"),
    (
        SectionKey::Segments,
        r"segments?(?:\s(?:de\s)?client(?:s|ele))?",
    ),
    (
        SectionKey::StructureCouts,
        r"structures?\s(?:de\s|des\s)?couts?",
    ),
    (
        SectionKey::SourcesRevenus,
        r"(?:sources?\s(?:de\s)?)?revenus?|flux\sde\srevenus?",
    ),
];

static HEADING_PATTERNS: Lazy<Vec<(SectionKey, Regex)>> = Lazy::new(|| {
    HEADING_RULES
        .iter()
        .map(|&(key, keywords)| {
            // Markdown decoration (`##`, `**`, `-`, `>`) may precede the number.
            let pattern = format!(
                r"^[#*>•\-\s]*{}\s*[.)]\s*(?:{})\b\s*[:\-]?",
                key.number(),
                keywords
            );
            (key, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Parser state threaded through the line scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    InSection(SectionKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    Heading(SectionKey),
    Bullet(&'a str),
    Other,
}

pub fn parse_swot(raw: &str) -> ParsedDocument {
    parse_document(raw, DocumentKind::Swot)
}

pub fn parse_matrix(raw: &str) -> ParsedDocument {
    parse_document(raw, DocumentKind::PriorityMatrix)
}

pub fn parse_bmc_text(raw: &str) -> ParsedDocument {
    parse_document(raw, DocumentKind::BusinessModelCanvas)
}

/// Splits loosely structured text into the fixed sections of `kind`.
///
/// Never fails: text before the first recognised heading, prose lines and
/// malformed bullets are dropped, and sections that never matched stay
/// empty.
pub fn parse_document(raw: &str, kind: DocumentKind) -> ParsedDocument {
    let normalized = normalize_input(raw);
    let (_, doc) = normalized.split('\n').fold(
        (ScanState::Idle, ParsedDocument::empty(kind)),
        |(state, mut doc), line| {
            let (next, bullet) = scan_line(state, line, kind);
            if let Some((key, text)) = bullet {
                doc.push(key, text);
            }
            (next, doc)
        },
    );
    tracing::debug!(
        kind = kind.as_str(),
        bullets = doc.total_bullets(),
        "parsed document"
    );
    doc
}

/// Advances the scan by one physical line, returning the next state and the
/// bullet the line contributes, if any.
pub fn scan_line(
    state: ScanState,
    line: &str,
    kind: DocumentKind,
) -> (ScanState, Option<(SectionKey, String)>) {
    match classify_line(line, kind) {
        LineClass::Heading(key) => (ScanState::InSection(key), None),
        LineClass::Bullet(text) => match state {
            ScanState::InSection(key) => (state, Some((key, text.to_string()))),
            ScanState::Idle => (state, None),
        },
        LineClass::Other => (state, None),
    }
}

/// Headings are tested before bullets, so a decorated heading such as
/// `- 1. Forces` still switches sections.
pub fn classify_line(line: &str, kind: DocumentKind) -> LineClass<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineClass::Other;
    }
    if let Some(key) = match_heading(trimmed, kind) {
        return LineClass::Heading(key);
    }
    match BULLET_RE.find(trimmed) {
        Some(marker) => LineClass::Bullet(&trimmed[marker.end()..]),
        None => LineClass::Other,
    }
}

pub fn match_heading(line: &str, kind: DocumentKind) -> Option<SectionKey> {
    let folded = fold_heading_key(line);
    HEADING_PATTERNS
        .iter()
        .filter(|(key, _)| key.kind() == kind)
        .find(|(_, re)| re.is_match(&folded))
        .map(|(key, _)| *key)
}

fn normalize_input(raw: &str) -> String {
    let visible: String = raw
        .chars()
        .filter(|ch| *ch != '\r' && !INVISIBLE_CHARS.contains(ch))
        .collect();
    LEADING_NOISE_RE.replace(&visible, "").into_owned()
}

fn fold_heading_key(line: &str) -> String {
    let stripped: String = line
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect::<String>()
        .to_lowercase();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWOT_SAMPLE: &str = "1. Forces\n- Bon produit\n2. Faiblesses\n- Prix élevé\n3. Opportunités\n- Nouveau marché\n4. Menaces\n- Concurrence";

    #[test]
    fn parse_canonical_swot() {
        let doc = parse_swot(SWOT_SAMPLE);
        assert_eq!(doc.bullets(SectionKey::Forces), ["Bon produit"]);
        assert_eq!(doc.bullets(SectionKey::Faiblesses), ["Prix élevé"]);
        assert_eq!(doc.bullets(SectionKey::Opportunites), ["Nouveau marché"]);
        assert_eq!(doc.bullets(SectionKey::Menaces), ["Concurrence"]);
    }

    #[test]
    fn parse_two_sections_leaves_rest_empty() {
        let doc = parse_swot("1. Forces\n- bonne équipe\n2. Faiblesses\n- budget limité");
        assert_eq!(doc.bullets(SectionKey::Forces), ["bonne équipe"]);
        assert_eq!(doc.bullets(SectionKey::Faiblesses), ["budget limité"]);
        assert!(doc.bullets(SectionKey::Opportunites).is_empty());
        assert!(doc.bullets(SectionKey::Menaces).is_empty());
    }

    #[test]
    fn bullets_keep_input_order() {
        let doc = parse_swot("1. Forces\n- a\n• b\n  - c\n-d");
        assert_eq!(doc.bullets(SectionKey::Forces), ["a", "b", "c", "d"]);
    }

    #[test]
    fn heading_matching_ignores_case_accents_and_punctuation() {
        for heading in [
            "3. OPPORTUNITÉS",
            "3. opportunites :",
            "3. Opportunités-",
            "3.Opportunité",
        ] {
            assert_eq!(
                match_heading(heading, DocumentKind::Swot),
                Some(SectionKey::Opportunites),
                "{heading}"
            );
        }
    }

    #[test]
    fn bullet_before_any_heading_is_dropped() {
        let doc = parse_swot("- objectif clair\n1. Forces\n- équipe");
        assert_eq!(doc.bullets(SectionKey::Forces), ["équipe"]);
        assert_eq!(doc.total_bullets(), 1);
    }

    #[test]
    fn prose_and_unknown_headings_do_not_change_state() {
        let doc = parse_swot(
            "Voici l'analyse :\n1. Forces\nUne phrase libre\n5. Conclusion\n- reste dans forces",
        );
        assert_eq!(doc.bullets(SectionKey::Forces), ["reste dans forces"]);
    }

    #[test]
    fn decorated_headings_are_headings() {
        let doc = parse_swot(
            "## 1. Forces\n- a\n**2. Faiblesses :**\n- b\n- 3. Opportunités\n- c",
        );
        assert_eq!(doc.bullets(SectionKey::Forces), ["a"]);
        assert_eq!(doc.bullets(SectionKey::Faiblesses), ["b"]);
        assert_eq!(doc.bullets(SectionKey::Opportunites), ["c"]);
    }

    #[test]
    fn heading_number_must_match_section() {
        assert_eq!(match_heading("2. Forces", DocumentKind::Swot), None);
        assert_eq!(match_heading("1. Forcesque", DocumentKind::Swot), None);
        assert_eq!(
            match_heading("1) Force", DocumentKind::Swot),
            Some(SectionKey::Forces)
        );
    }

    #[test]
    fn normalizes_line_endings_noise_and_invisible_chars() {
        let input = "\u{FEFF}===  \r\n1. For\u{200B}ces\r\n- un\r\n\r\n2.\u{a0}Faiblesses\r\n- deux\r\n";
        let doc = parse_swot(input);
        assert_eq!(doc.bullets(SectionKey::Forces), ["un"]);
        assert_eq!(doc.bullets(SectionKey::Faiblesses), ["deux"]);
    }

    #[test]
    fn empty_and_garbage_input_yield_all_keys() {
        for input in ["", "   ", "\n\n", "n'importe quoi", "- orphelin", "===="] {
            let doc = parse_swot(input);
            assert_eq!(doc.iter().count(), 4, "{input:?}");
            assert!(doc.is_empty(), "{input:?}");
        }
    }

    #[test]
    fn multi_line_bullet_is_not_merged() {
        let doc = parse_swot("1. Forces\n- début de phrase\n  suite sans tiret\n- second");
        assert_eq!(
            doc.bullets(SectionKey::Forces),
            ["début de phrase", "second"]
        );
    }

    #[test]
    fn parse_matrix_headings_with_and_without_accents() {
        let doc = parse_matrix(
            "1. À faire:\n- urgent\n2. A planifier -\n- plus tard\n3. Déléguer\n- à Paul\n4. à abandonner\n- rien",
        );
        assert_eq!(doc.bullets(SectionKey::Faire), ["urgent"]);
        assert_eq!(doc.bullets(SectionKey::Planifier), ["plus tard"]);
        assert_eq!(doc.bullets(SectionKey::Deleguer), ["à Paul"]);
        assert_eq!(doc.bullets(SectionKey::Abandonner), ["rien"]);
    }

    #[test]
    fn kinds_do_not_share_headings() {
        assert_eq!(
            match_heading("1. Forces", DocumentKind::PriorityMatrix),
            None
        );
        assert_eq!(match_heading("1. À faire", DocumentKind::Swot), None);
    }

    #[test]
    fn parse_bmc_text_covers_all_nine_sections() {
        let input = "1. Partenaires clés\n- fournisseurs\n2. Activités clés\n- production\n3. Ressources clés\n- brevets\n4. Proposition de valeur\n- rapidité\n5. Relation client\n- support\n6. Canaux\n- web\n7. Segments de clientèle\n- PME\n8. Structure de coûts\n- salaires\n9. Sources de revenus\n- abonnements";
        let doc = parse_bmc_text(input);
        for key in DocumentKind::BusinessModelCanvas.sections() {
            assert_eq!(doc.bullets(*key).len(), 1, "{key:?}");
        }
        assert_eq!(doc.bullets(SectionKey::SourcesRevenus), ["abonnements"]);
    }

    #[test]
    fn scan_line_is_pure_step() {
        let kind = DocumentKind::Swot;
        let (state, bullet) = scan_line(ScanState::Idle, "- perdu", kind);
        assert_eq!(state, ScanState::Idle);
        assert!(bullet.is_none());

        let (state, _) = scan_line(state, "4. Menaces", kind);
        assert_eq!(state, ScanState::InSection(SectionKey::Menaces));

        let (state, bullet) = scan_line(state, "  • inflation", kind);
        assert_eq!(state, ScanState::InSection(SectionKey::Menaces));
        assert_eq!(bullet, Some((SectionKey::Menaces, "inflation".to_string())));
    }

    #[test]
    fn classify_line_strips_marker() {
        assert_eq!(
            classify_line("   -   texte  ", DocumentKind::Swot),
            LineClass::Bullet("texte")
        );
        assert_eq!(classify_line("texte", DocumentKind::Swot), LineClass::Other);
        assert_eq!(classify_line("", DocumentKind::Swot), LineClass::Other);
    }
}
