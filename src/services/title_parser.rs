use std::sync::LazyLock;

use regex::Regex;

use crate::ports::reddit::Submission;

/// `<rank> :: <artist> - ...`, capturing everything before the last dash separator.
static ARTIST_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{0,5} :: (\w.+) --?").expect("artist pattern compiles"));

/// `... - <title> [tag]`, capturing between the last dash separator and the last `[`.
static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w.+ --? (\w.+) \[").expect("title pattern compiles"));

/// An (artist, title) guess extracted from a submission title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub artist: String,
    pub title: String,
}

/// Parse a submission title shaped like `12 :: Artist - Title [Genre]`.
///
/// This is a lossy heuristic. Titles without the rank prefix or the trailing
/// bracketed tag are dropped, and both captures are greedy, so a title with
/// several dashes or brackets splits on the last of each. Nothing is trimmed
/// or case-folded. The rank prefix is not part of a Reddit title (it is how
/// the submission's score used to be rendered in front of it), so titles fed
/// straight from the API seldom match.
pub fn parse(title: &str) -> Option<Candidate> {
    let artist = ARTIST_PATTERN.captures(title)?.get(1)?.as_str();
    let track = TITLE_PATTERN.captures(title)?.get(1)?.as_str();

    Some(Candidate {
        artist: artist.to_string(),
        title: track.to_string(),
    })
}

/// Lazily parse submissions in feed order, skipping titles that don't match.
pub fn candidates<I>(submissions: I) -> impl Iterator<Item = Candidate>
where
    I: IntoIterator<Item = Submission>,
{
    submissions.into_iter().filter_map(|submission| {
        let candidate = parse(&submission.title);
        if candidate.is_none() {
            tracing::trace!(
                "Skipping unparseable title (score {}): {}",
                submission.score,
                submission.title
            );
        }
        candidate
    })
}
