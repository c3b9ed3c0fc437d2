//! Action-type tokenizer and colorizer
//!
//! Action types are conventionally namespaced with `/`
//! (`todos/fetchTodos/pending`). [`tokenize`] splits such a string into
//! classified [`Segment`]s so the table can color each part:
//!
//! - `/` becomes a [`SegmentKind::Separator`]
//! - the thunk lifecycle suffixes `pending`, `fulfilled` and `rejected` are
//!   [`SegmentKind::Special`]
//! - everything else is [`SegmentKind::Normal`] and takes the next palette color
//!
//! Concatenating the segment texts always gives back the input.
//!
//! ```
//! use action_lens_core::inspect::segments::{tokenize, SegmentKind};
//!
//! let tokens = tokenize("todos/add/pending");
//! let segments = tokens.segments();
//! assert_eq!(segments.len(), 5);
//! assert_eq!(segments[4].kind, SegmentKind::Special);
//! assert_eq!(tokens.text(), "todos/add/pending");
//! ```

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::theme::{MUTED_SEGMENT, SEGMENT_COLORS};

/// The path delimiter inside action types
pub const SEPARATOR: &str = "/";

/// Lifecycle suffixes emitted by async thunks
pub const LIFECYCLE_SUFFIXES: [&str; 3] = ["pending", "fulfilled", "rejected"];

/// Classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Separator,
    Special,
    Normal,
}

/// One classified, colored fragment of an action type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub kind: SegmentKind,
    pub color: Color,
}

impl Segment {
    /// Display style for this segment
    pub fn style(&self) -> Style {
        let style = Style::default().fg(self.color);
        match self.kind {
            SegmentKind::Special => style.add_modifier(Modifier::ITALIC | Modifier::UNDERLINED),
            SegmentKind::Separator | SegmentKind::Normal => style,
        }
    }

    /// Span for this segment; separators get one column of padding on each side
    pub fn to_span(&self) -> Span<'static> {
        let text = match self.kind {
            SegmentKind::Separator => format!(" {} ", self.text),
            _ => self.text.clone(),
        };
        Span::styled(text, self.style())
    }
}

/// Colors used by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPalette {
    /// Cycled round-robin over normal segments
    pub normal: Vec<Color>,
    pub separator: Color,
    pub special: Color,
}

impl Default for SegmentPalette {
    fn default() -> Self {
        Self {
            normal: SEGMENT_COLORS.to_vec(),
            separator: MUTED_SEGMENT,
            special: MUTED_SEGMENT,
        }
    }
}

impl SegmentPalette {
    fn normal_color(&self, index: usize) -> Color {
        if self.normal.is_empty() {
            return Color::Reset;
        }
        self.normal[index % self.normal.len()]
    }
}

/// Output of [`tokenize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tokenized {
    /// Input without a separator, returned as-is and unstyled
    Plain(String),
    /// `2 * parts - 1` segments
    Segments(Vec<Segment>),
}

impl Tokenized {
    /// Segments, empty for [`Tokenized::Plain`]
    pub fn segments(&self) -> &[Segment] {
        match self {
            Tokenized::Plain(_) => &[],
            Tokenized::Segments(segments) => segments,
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, Tokenized::Plain(_))
    }

    /// Reassembled input text
    pub fn text(&self) -> String {
        match self {
            Tokenized::Plain(text) => text.clone(),
            Tokenized::Segments(segments) => segments.iter().map(|s| s.text.as_str()).collect(),
        }
    }

    /// Styled line for table cells and titles
    pub fn to_line(&self) -> Line<'static> {
        match self {
            Tokenized::Plain(text) => Line::raw(text.clone()),
            Tokenized::Segments(segments) => {
                Line::from(segments.iter().map(Segment::to_span).collect::<Vec<_>>())
            }
        }
    }
}

/// Tokenize an action type with the default palette
pub fn tokenize(action_type: &str) -> Tokenized {
    tokenize_with(action_type, &SegmentPalette::default())
}

/// Tokenize an action type with a custom palette
///
/// The palette index only advances on normal segments and starts at zero on
/// every call.
pub fn tokenize_with(action_type: &str, palette: &SegmentPalette) -> Tokenized {
    let parts: Vec<&str> = action_type.split(SEPARATOR).collect();
    if parts.len() == 1 {
        return Tokenized::Plain(action_type.to_string());
    }

    let mut segments = Vec::with_capacity(parts.len() * 2 - 1);
    let mut next_color = 0;
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            segments.push(Segment {
                text: SEPARATOR.to_string(),
                kind: SegmentKind::Separator,
                color: palette.separator,
            });
        }

        let segment = if LIFECYCLE_SUFFIXES.contains(&part) {
            Segment {
                text: part.to_string(),
                kind: SegmentKind::Special,
                color: palette.special,
            }
        } else {
            let color = palette.normal_color(next_color);
            next_color += 1;
            Segment {
                text: part.to_string(),
                kind: SegmentKind::Normal,
                color,
            }
        };
        segments.push(segment);
    }

    Tokenized::Segments(segments)
}
