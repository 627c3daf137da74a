//! The five priority-ordered extraction strategies.
//!
//! Each strategy is a pure pass over the full classified line array.

use super::{collect_answer, collect_from, Candidate, Strategy};
use crate::classify::ClassifiedLine;

/// Explicit `Q:` / `A:` blocks.
///
/// A question marker pairs with the nearest following answer marker, unless
/// a heading, delimiter pair, interrogative or another question marker comes
/// first. The answer is the marker text alone. Without an answer marker, the
/// continuation lines after the question become the answer.
pub fn explicit(lines: &[ClassifiedLine<'_>]) -> Vec<Candidate> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(question) = lines[i].question else {
            i += 1;
            continue;
        };

        match find_answer_marker(lines, i + 1) {
            Some((j, answer)) => {
                out.push(Candidate::new(question, answer.to_string(), i..j + 1, Strategy::Explicit));
                i = j + 1;
            }
            None => {
                let (answer, end) = collect_answer(lines, i + 1);
                if !answer.is_empty() {
                    out.push(Candidate::new(question, answer, i..end, Strategy::Explicit));
                }
                i = end.max(i + 1);
            }
        }
    }

    out
}

fn find_answer_marker<'a>(lines: &[ClassifiedLine<'a>], start: usize) -> Option<(usize, &'a str)> {
    for (idx, line) in lines.iter().enumerate().skip(start) {
        if let Some(answer) = line.answer {
            return Some((idx, answer));
        }
        if line.question.is_some() || line.heading.is_some() || line.pair.is_some() || line.interrogative {
            return None;
        }
    }
    None
}

/// `term - definition` style lines. Heading lines are left to [`heading`].
pub fn delimiter(lines: &[ClassifiedLine<'_>]) -> Vec<Candidate> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        match line.pair {
            Some((left, right)) if line.heading.is_none() => {
                let (answer, end) = collect_from(lines, i + 1, right);
                out.push(Candidate::new(left, answer, i..end, Strategy::Delimiter));
                i = end;
            }
            _ => i += 1,
        }
    }

    out
}

/// `term (gloss)` lines, one candidate each. Delimiter pair lines are scanned
/// too; dedupe settles any overlap with [`delimiter`].
pub fn gloss(lines: &[ClassifiedLine<'_>]) -> Vec<Candidate> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.heading.is_none() && !line.is_marker())
        .filter_map(|(idx, line)| {
            let (term, gloss) = line.gloss?;
            Some(Candidate::new(term, gloss, idx..idx + 1, Strategy::Gloss))
        })
        .collect()
}

/// A `?`-terminated line followed by prose.
pub fn interrogative(lines: &[ClassifiedLine<'_>]) -> Vec<Candidate> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        let plain_question = line.interrogative && line.heading.is_none() && !line.is_marker();
        if !plain_question {
            i += 1;
            continue;
        }

        let (answer, end) = collect_answer(lines, i + 1);
        if !answer.is_empty() {
            out.push(Candidate::new(line.text, answer, i..end, Strategy::Interrogative));
        }
        i = end.max(i + 1);
    }

    out
}

/// A markdown heading followed by body text.
pub fn heading(lines: &[ClassifiedLine<'_>]) -> Vec<Candidate> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(title) = lines[i].heading else {
            i += 1;
            continue;
        };

        let (answer, end) = collect_answer(lines, i + 1);
        if !answer.is_empty() {
            out.push(Candidate::new(title, answer, i..end, Strategy::Heading));
        }
        i = end.max(i + 1);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_lines;

    fn pairs(candidates: &[Candidate]) -> Vec<(&str, &str)> {
        candidates
            .iter()
            .map(|c| (c.question.as_str(), c.answer.as_str()))
            .collect()
    }

    #[test]
    fn explicit_pairs_nearest_answer() {
        let lines = classify_lines("Q: What is Rust?\n\nA: A systems language.");
        let out = explicit(&lines);
        assert_eq!(pairs(&out), vec![("What is Rust?", "A systems language.")]);
        assert_eq!(out[0].lines, 0..3);
    }

    #[test]
    fn explicit_answer_stops_at_marker_line() {
        let lines = classify_lines("Q: What is TCP?\nA: A reliable transport protocol.\nUDP is different though");
        let out = explicit(&lines);
        assert_eq!(pairs(&out), vec![("What is TCP?", "A reliable transport protocol.")]);
        assert_eq!(out[0].lines, 0..2);
    }

    #[test]
    fn explicit_without_answer_marker_collects_prose() {
        let lines = classify_lines("Question: Define entropy\nA measure of disorder.\n# Next");
        let out = explicit(&lines);
        assert_eq!(pairs(&out), vec![("Define entropy", "A measure of disorder.")]);
    }

    #[test]
    fn explicit_search_stops_at_heading() {
        let lines = classify_lines("Q: Orphan question\n# Heading\nA: Belongs elsewhere");
        assert!(explicit(&lines).is_empty());
    }

    #[test]
    fn explicit_empty_answer_marker_pairs_empty_text() {
        let lines = classify_lines("Q: Stages of mitosis\nA:\nProphase, metaphase");
        let out = explicit(&lines);
        assert_eq!(pairs(&out), vec![("Stages of mitosis", "")]);
        assert_eq!(out[0].lines, 0..2);
    }

    #[test]
    fn delimiter_extends_with_continuation() {
        let lines = classify_lines("Osmosis - movement of water\nthrough a membrane\nDiffusion - spreading out");
        let out = delimiter(&lines);
        assert_eq!(
            pairs(&out),
            vec![
                ("Osmosis", "movement of water through a membrane"),
                ("Diffusion", "spreading out"),
            ]
        );
    }

    #[test]
    fn delimiter_skips_headings_and_markers() {
        let lines = classify_lines("# Biology: basics\nQ: Term: thing\nA: Yes: really");
        assert!(delimiter(&lines).is_empty());
    }

    #[test]
    fn gloss_one_candidate_per_line() {
        let lines = classify_lines("DNA (deoxyribonucleic acid)\nsome extra prose\nRNA (ribonucleic acid)");
        let out = gloss(&lines);
        assert_eq!(
            pairs(&out),
            vec![("DNA", "deoxyribonucleic acid"), ("RNA", "ribonucleic acid")]
        );
    }

    #[test]
    fn interrogative_needs_following_prose() {
        let lines = classify_lines("What is a cell?\nThe unit of life.\n\nWhy study?\n## Next");
        let out = interrogative(&lines);
        assert_eq!(pairs(&out), vec![("What is a cell?", "The unit of life.")]);
    }

    #[test]
    fn heading_body_strips_hashes() {
        let lines = classify_lines("## Krebs cycle\n\nProduces NADH\nand FADH2.\n### Empty\n# Glycolysis\nSplits glucose.");
        let out = heading(&lines);
        assert_eq!(
            pairs(&out),
            vec![
                ("Krebs cycle", "Produces NADH and FADH2."),
                ("Glycolysis", "Splits glucose."),
            ]
        );
    }
}
