//! Line classifier for free-form study notes.
//!
//! Every predicate is evaluated up front so each extraction strategy can test
//! only the shapes it cares about. A line may carry several shapes at once
//! (a heading can also look like a delimiter pair), with one exception:
//! explicit `Q:`/`A:` markers take precedence over the delimiter-pair shape.

use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+(?P<text>.+)$").expect("heading pattern"));

static QUESTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:question|q)\s*:\s*(?P<text>.*)$").expect("question marker pattern")
});

static ANSWER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:answer|a)\s*:\s*(?P<text>.*)$").expect("answer marker pattern")
});

// Arrows are listed first: alternation is leftmost-first, so `=>` must win
// over a bare `=`. Hyphens and en-dashes need whitespace on both sides to
// leave hyphenated words and numeric ranges alone.
static DELIMITER_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:[-*•+]\s+|\d{1,3}[.)]\s+)?",
        r"(?P<left>.{1,120}?)",
        r"(?:\s*(?:->|=>|→)\s*|\s+>\s+|\s+[-–]\s+|\s*—\s*|\s*:\s+|\s*=\s*)",
        r"(?P<right>\S.*)$",
    ))
    .expect("delimiter pair pattern")
});

// `term:definition` with no space after the colon. The left side may not hold
// a `/`, and neither side may touch the colon with a digit, so URLs, times and
// `::` paths stay prose.
static COMPACT_COLON_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*•+]\s+|\d{1,3}[.)]\s+)?(?P<left>[^:/]{0,119}[^:/\s\d]):(?P<right>[^\s:/\d].*)$")
        .expect("compact colon pattern")
});

static GLOSS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*•+]\s+|\d{1,3}[.)]\s+)?(?P<term>[^()]+?)\s*\((?P<gloss>[^()]+)\)[.,;]?$")
        .expect("gloss pattern")
});

/// Minimum gloss length (exclusive) for a parenthetical to count as a definition.
const MIN_GLOSS_CHARS: usize = 4;

/// Minimum line length (exclusive) for a `?`-terminated line to count as a question.
const MIN_INTERROGATIVE_CHARS: usize = 3;

/// One trimmed input line with every recognized shape precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    pub text: &'a str,
    /// Heading text with the leading hashes stripped.
    pub heading: Option<&'a str>,
    /// Text after a `Q:` / `Question:` marker.
    pub question: Option<&'a str>,
    /// Text after an `A:` / `Answer:` marker.
    pub answer: Option<&'a str>,
    /// Left and right side of a delimiter pair, bullet stripped.
    pub pair: Option<(&'a str, &'a str)>,
    /// Term and gloss of a `term (gloss)` line.
    pub gloss: Option<(&'a str, &'a str)>,
    pub interrogative: bool,
}

impl<'a> ClassifiedLine<'a> {
    pub fn new(line: &'a str) -> Self {
        let text = line.trim();

        let heading = HEADING
            .captures(text)
            .and_then(|c| c.name("text"))
            .map(|m| m.as_str().trim());
        let question = QUESTION_MARKER
            .captures(text)
            .and_then(|c| c.name("text"))
            .map(|m| m.as_str().trim());
        let answer = ANSWER_MARKER
            .captures(text)
            .and_then(|c| c.name("text"))
            .map(|m| m.as_str().trim());

        let pair = if question.is_some() || answer.is_some() {
            None
        } else {
            DELIMITER_PAIR
                .captures(text)
                .or_else(|| COMPACT_COLON_PAIR.captures(text))
                .and_then(|c| {
                    let left = c.name("left")?.as_str().trim();
                    let right = c.name("right")?.as_str().trim();
                    (!left.is_empty() && !right.is_empty()).then_some((left, right))
                })
        };

        let gloss = GLOSS.captures(text).and_then(|c| {
            let term = c.name("term")?.as_str().trim();
            let gloss = c.name("gloss")?.as_str().trim();
            (!term.is_empty() && gloss.chars().count() > MIN_GLOSS_CHARS).then_some((term, gloss))
        });

        let interrogative = text.ends_with('?') && text.chars().count() > MIN_INTERROGATIVE_CHARS;

        Self {
            text,
            heading,
            question,
            answer,
            pair,
            gloss,
            interrogative,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_marker(&self) -> bool {
        self.question.is_some() || self.answer.is_some()
    }

    /// Whether this line ends an answer being collected.
    pub fn is_boundary(&self) -> bool {
        self.heading.is_some() || self.pair.is_some() || self.is_marker() || self.interrogative
    }

    /// Plain prose that may be appended to a pending answer.
    pub fn is_continuation(&self) -> bool {
        !self.is_blank() && !self.is_boundary()
    }
}

/// Classify every line of `text`, preserving line indices.
pub fn classify_lines(text: &str) -> Vec<ClassifiedLine<'_>> {
    text.lines().map(ClassifiedLine::new).collect()
}
