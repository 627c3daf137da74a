//! Loose fallback parser, used only when no strategy matched anything.
//!
//! Three independent scans (`Q:`/`A:` pairing, single-character delimiters,
//! tab-separated columns) run first. If they find nothing, any line holding
//! a `?` with text after it is split into question and answer at that mark.

use regex::Regex;
use std::sync::LazyLock;

use super::{Candidate, Strategy};
use crate::classify::ClassifiedLine;

static LOOSE_DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<left>.+?)\s*[:=-]\s+(?P<right>\S.*)$").expect("loose delimiter pattern")
});

/// Parse `text` with the loose rules.
pub fn parse(text: &str) -> Vec<Candidate> {
    let lines: Vec<(usize, ClassifiedLine<'_>)> = text
        .lines()
        .map(ClassifiedLine::new)
        .enumerate()
        .filter(|(_, line)| !line.is_blank())
        .collect();

    let mut out = markers(&lines);
    out.extend(delimiters(&lines));
    out.extend(tab_columns(&lines));

    if out.is_empty() {
        out = inline_questions(&lines);
    }
    out
}

fn markers(lines: &[(usize, ClassifiedLine<'_>)]) -> Vec<Candidate> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let (start, line) = &lines[i];
        let Some(question) = line.question else {
            i += 1;
            continue;
        };

        let found = lines[i + 1..]
            .iter()
            .position(|(_, l)| l.answer.is_some())
            .map(|offset| i + 1 + offset);

        match found {
            Some(j) => {
                let (end, answer_line) = &lines[j];
                if let Some(answer) = answer_line.answer {
                    out.push(Candidate::new(question, answer, *start..end + 1, Strategy::Loose));
                }
                i = j + 1;
            }
            None => i += 1,
        }
    }

    out
}

fn delimiters(lines: &[(usize, ClassifiedLine<'_>)]) -> Vec<Candidate> {
    lines
        .iter()
        .filter(|(_, line)| !line.is_marker())
        .filter_map(|(idx, line)| {
            let caps = LOOSE_DELIMITER.captures(line.text)?;
            let left = caps.name("left")?.as_str();
            let right = caps.name("right")?.as_str();
            Some(Candidate::new(left, right, *idx..idx + 1, Strategy::Loose))
        })
        .collect()
}

fn tab_columns(lines: &[(usize, ClassifiedLine<'_>)]) -> Vec<Candidate> {
    lines
        .iter()
        .filter_map(|(idx, line)| {
            let (left, right) = line.text.split_once('\t')?;
            let (left, right) = (left.trim(), right.trim());
            (!left.is_empty() && !right.is_empty())
                .then(|| Candidate::new(left, right, *idx..idx + 1, Strategy::Loose))
        })
        .collect()
}

fn inline_questions(lines: &[(usize, ClassifiedLine<'_>)]) -> Vec<Candidate> {
    lines
        .iter()
        .filter_map(|(idx, line)| {
            let mark = line.text.find('?')?;
            let (question, rest) = line.text.split_at(mark + 1);
            let answer = rest.trim();
            (!answer.is_empty())
                .then(|| Candidate::new(question.trim(), answer, *idx..idx + 1, Strategy::Loose))
        })
        .collect()
}
