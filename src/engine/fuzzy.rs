//! Subsequence matcher: a query matches a candidate when its characters occur
//! in the candidate in order, with arbitrary gaps. Match quality is the span
//! of the tightest such occurrence, ties broken by the earliest start.

/// Punctuation stripped from queries before matching.
const STRIPPED: &[char] = &['(', ')', '+', ',', '.', '!', '?'];

pub fn sanitize(query: &str) -> String {
    query.chars().filter(|ch| !STRIPPED.contains(ch)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchQuality {
    /// Number of candidate characters covered by the tightest occurrence.
    pub span: usize,
    /// Character offset of that occurrence in the candidate.
    pub start: usize,
}

/// Matches a sanitized query against one candidate. An empty query matches
/// everything trivially with a zero span.
pub fn subsequence_match(query: &str, candidate: &str) -> Option<MatchQuality> {
    let pattern: Vec<char> = query.chars().collect();
    if pattern.is_empty() {
        return Some(MatchQuality { span: 0, start: 0 });
    }

    let chars: Vec<char> = candidate.chars().collect();
    let mut best: Option<MatchQuality> = None;

    for start in 0..chars.len() {
        if chars[start] != pattern[0] {
            continue;
        }
        // Greedy earliest placement of the remaining characters minimizes the
        // span for this start.
        let mut pos = start;
        let mut complete = true;
        for needle in &pattern[1..] {
            match chars[pos + 1..].iter().position(|ch| ch == needle) {
                Some(offset) => pos = pos + 1 + offset,
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            // No later start can complete either: it has fewer characters left.
            break;
        }
        let span = pos - start + 1;
        if best.map_or(true, |quality| span < quality.span) {
            best = Some(MatchQuality { span, start });
        }
        if span == pattern.len() {
            break; // cannot get tighter
        }
    }

    best
}

/// Scans a word sequence and returns the matches ordered worst-to-best by
/// (span descending, start descending), so that enumerating the result gives
/// the best match the highest index. The sort is stable: fully tied words
/// keep their scan order, so the last-loaded of equal matches ranks best.
pub fn matches_worst_to_best<'a>(
    query: &str,
    words: impl IntoIterator<Item = &'a str>,
) -> Vec<&'a str> {
    let mut scored: Vec<(MatchQuality, &str)> = words
        .into_iter()
        .filter_map(|word| subsequence_match(query, word).map(|quality| (quality, word)))
        .collect();
    scored.sort_by(|a, b| (b.0.span, b.0.start).cmp(&(a.0.span, a.0.start)));
    scored.into_iter().map(|(_, word)| word).collect()
}
