use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Known,
    Header,
    String,
    Number,
    Comment,
    Special,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub range: Range<usize>,
    pub kind: TokenKind,
}

struct Rule {
    pattern: Regex,
    group: usize,
    kind: TokenKind,
}

fn rule(pattern: &str, group: usize, kind: TokenKind) -> Option<Rule> {
    match Regex::new(pattern) {
        Ok(pattern) => Some(Rule {
            pattern,
            group,
            kind,
        }),
        Err(err) => {
            log::error!("bad highlight pattern {pattern}: {err}");
            None
        }
    }
}

/// Rules in application order; later matches override earlier ones.
fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            rule(r"\b(?:true|false|inf|nan)\b", 0, TokenKind::Keyword),
            rule(
                r"\b(?:start|stop|step|num|name|max_workers|synthetic|MidlatitudeSummer|SubarcticWinter|Tropical|USStandard1962|NoAerosols|Maritime|Continental|Urban|Desert)\b",
                0,
                TokenKind::Known,
            ),
            rule(r"^\s*\[\[?[^\]]*\]\]?", 0, TokenKind::Header),
            rule(
                r"\b[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?\b",
                0,
                TokenKind::Number,
            ),
            rule(r#""[^"]*"|'[^']*'"#, 0, TokenKind::String),
            // Only lines without quotes before the '#' are treated as comments.
            rule(r##"^[^'"#]*(#.*)$"##, 1, TokenKind::Comment),
            rule(r"\b(?:sweep|engine|base)\b", 0, TokenKind::Special),
        ]
        .into_iter()
        .flatten()
        .collect()
    })
}

/// Computes highlight spans for `text`, line by line. Spans cover only
/// highlighted bytes and are sorted by start.
pub fn highlight(text: &str) -> Vec<HighlightSpan> {
    let mut kinds: Vec<Option<TokenKind>> = vec![None; text.len()];
    let mut line_start = 0;
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        for rule in rules() {
            for captures in rule.pattern.captures_iter(content) {
                if let Some(found) = captures.get(rule.group) {
                    for slot in &mut kinds[line_start + found.start()..line_start + found.end()] {
                        *slot = Some(rule.kind);
                    }
                }
            }
        }
        line_start += line.len();
    }

    let mut spans: Vec<HighlightSpan> = Vec::new();
    for (offset, kind) in kinds.into_iter().enumerate() {
        let Some(kind) = kind else {
            continue;
        };
        match spans.last_mut() {
            Some(last) if last.kind == kind && last.range.end == offset => last.range.end += 1,
            _ => spans.push(HighlightSpan {
                range: offset..offset + 1,
                kind,
            }),
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of<'a>(text: &'a str, spans: &[HighlightSpan]) -> Vec<(&'a str, TokenKind)> {
        spans
            .iter()
            .map(|span| (&text[span.range.clone()], span.kind))
            .collect()
    }

    #[test]
    fn header_and_special_identifier() {
        let text = "[sweep]\n";
        let spans = highlight(text);
        assert_eq!(
            kinds_of(text, &spans),
            vec![
                ("[", TokenKind::Header),
                ("sweep", TokenKind::Special),
                ("]", TokenKind::Header)
            ]
        );
    }

    #[test]
    fn comments_only_on_quote_free_lines() {
        let text = "# note 1\nname = \"a # b\"\n";
        let spans = highlight(text);
        let found = kinds_of(text, &spans);
        assert_eq!(found[0], ("# note 1", TokenKind::Comment));
        assert!(found.contains(&("\"a # b\"", TokenKind::String)));
        let comments = found
            .iter()
            .filter(|(_, kind)| *kind == TokenKind::Comment)
            .count();
        assert_eq!(comments, 1);
    }

    #[test]
    fn numbers_inside_strings_stay_strings() {
        let text = "x = \"12\" 3.5\n";
        let found = kinds_of(text, &highlight(text));
        assert_eq!(
            found,
            vec![("\"12\"", TokenKind::String), ("3.5", TokenKind::Number)]
        );
    }
}
