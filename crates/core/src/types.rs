use serde::{Deserialize, Serialize};

/// A word extracted from text, with half-open character offsets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Matched text, original casing
    pub text: String,
    /// First character offset (inclusive)
    pub start: usize,
    /// Character offset one past the last letter
    pub end: usize,
    /// Zero-based line the token sits on
    pub line: usize,
    /// Heuristic syllable count, always >= 1
    pub syllables: usize,
}

impl Token {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A `[ ... ]` span in the document, `end` one past the closing bracket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BracketRegion {
    pub start: usize,
    pub end: usize,
}

impl BracketRegion {
    /// True if `[start, end)` shares at least one character with this region.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// Rhyme scheme label. Clusters are labelled in discovery order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemeId {
    A, B, C, D, E, F, G, H,
    I, J, K, L, M, N, O, P,
    Q, R, S, T, U, V, W, X,
}

/// How a scheme's words are underlined in the editor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnderlineStyle {
    Solid,
    Dotted,
    Wavy,
}

/// Display attributes for a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeStyle {
    /// CSS hex color
    pub color: &'static str,
    pub underline: UnderlineStyle,
}

const SCHEME_COLORS: [&str; 24] = [
    "#e4572e", "#29b6f6", "#ffc914", "#76b041", "#a259ff", "#ff6fb5", "#17bebb", "#f08a4b",
    "#f59e0b", "#84cc16", "#0ea5e9", "#d946ef", "#f43f5e", "#6366f1", "#10b981", "#ea580c",
    "#8b5cf6", "#06b6d4", "#ec4899", "#14b8a6", "#eab308", "#dc2626", "#2563eb", "#16a34a",
];

impl SchemeId {
    /// Full palette in assignment order.
    pub const ALL: [SchemeId; 24] = [
        SchemeId::A, SchemeId::B, SchemeId::C, SchemeId::D,
        SchemeId::E, SchemeId::F, SchemeId::G, SchemeId::H,
        SchemeId::I, SchemeId::J, SchemeId::K, SchemeId::L,
        SchemeId::M, SchemeId::N, SchemeId::O, SchemeId::P,
        SchemeId::Q, SchemeId::R, SchemeId::S, SchemeId::T,
        SchemeId::U, SchemeId::V, SchemeId::W, SchemeId::X,
    ];

    /// Size of the classic palette used by simpler front ends.
    pub const CLASSIC_LEN: usize = 8;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<SchemeId> {
        Self::ALL.get(index).copied()
    }

    /// Parse a single letter label, case-insensitive.
    pub fn from_letter(letter: char) -> Option<SchemeId> {
        let upper = letter.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return None;
        }
        Self::from_index((upper as u8 - b'A') as usize)
    }

    pub fn letter(self) -> char {
        (b'A' + self.index() as u8) as char
    }

    pub fn style(self) -> SchemeStyle {
        let underline = match self.index() / Self::CLASSIC_LEN {
            0 => UnderlineStyle::Solid,
            1 => UnderlineStyle::Dotted,
            _ => UnderlineStyle::Wavy,
        };
        SchemeStyle {
            color: SCHEME_COLORS[self.index()],
            underline,
        }
    }
}

impl std::fmt::Display for SchemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Visual emphasis of a rhyme mark.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccentTier {
    #[serde(rename = "normal")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "heavy")]
    High,
}

impl AccentTier {
    /// Tier for a rhyme score against the cluster anchor.
    pub fn from_score(score: f64) -> AccentTier {
        if score >= 4.0 {
            AccentTier::High
        } else if score >= 2.5 {
            AccentTier::Medium
        } else {
            AccentTier::Low
        }
    }

    /// Highlight opacity used by the renderer.
    pub fn opacity(self) -> f32 {
        match self {
            AccentTier::Low => 0.4,
            AccentTier::Medium => 0.7,
            AccentTier::High => 1.0,
        }
    }
}

/// A rhyme mark anchored to one word of the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub word: String,
    pub start_index: usize,
    pub end_index: usize,
    pub line_index: usize,
    pub scheme: SchemeId,
    #[serde(rename = "accentLevel")]
    pub accent_tier: AccentTier,
    /// User-placed marks survive re-clustering
    #[serde(default)]
    pub is_manual: bool,
}

impl Annotation {
    /// A manual mark over `token`.
    pub fn manual(token: &Token, scheme: SchemeId, accent_tier: AccentTier) -> Self {
        Self {
            word: token.text.clone(),
            start_index: token.start,
            end_index: token.end,
            line_index: token.line,
            scheme,
            accent_tier,
            is_manual: true,
        }
    }

    /// An engine-derived mark over `token`.
    pub fn automatic(token: &Token, scheme: SchemeId, accent_tier: AccentTier) -> Self {
        Self {
            is_manual: false,
            ..Self::manual(token, scheme, accent_tier)
        }
    }
}
