//! Heuristic PLR scoring.
//!
//! The score is a pure function of the filename, size, category and the
//! archive listing. Every positive signal adds a fixed weight and the
//! penalties can only be lifted by more evidence, so appending evidence to
//! a filename never lowers the score.

use crate::models::{ArchiveEntry, ConfidenceBand, FileCategory, LicenseType};
use crate::sniffer;
use crate::vocab::{
    DEFAULT_NICHE, GENERIC_WORDS, HIGH_VALUE_EXTENSIONS, LICENSE_VOCAB, LICENSE_WORDS,
    NICHE_VOCAB, PACKAGE_WORDS, README_WORDS,
};

pub const MAX_SCORE: u8 = 100;

const LICENSE_KEYWORD_WEIGHT: i32 = 15;
const LICENSE_KEYWORD_CAP: i32 = 45;
const LICENSE_WORD_WEIGHT: i32 = 10;
const PACKAGE_WORD_WEIGHT: i32 = 10;
const LOOSE_FORMAT_WEIGHT: i32 = 10;
const ARCHIVE_WEIGHT: i32 = 5;
const LICENSE_MEMBER_WEIGHT: i32 = 25;
const README_MEMBER_WEIGHT: i32 = 10;
const BUNDLE_WEIGHT: i32 = 10;
const LARGE_BUNDLE_WEIGHT: i32 = 5;
const HIGH_VALUE_MEMBER_WEIGHT: i32 = 10;
const SMALL_FILE_PENALTY: i32 = 10;
const GENERIC_NAME_PENALTY: i32 = 10;

const SMALL_FILE_BYTES: u64 = 1024;
const BUNDLE_MIN_MEMBERS: usize = 3;
const LARGE_BUNDLE_MIN_MEMBERS: usize = 10;

/// Lower bound of each band, ascending. Each band runs up to the next bound.
pub const BANDS: &[(ConfidenceBand, u8)] = &[
    (ConfidenceBand::None, 0),
    (ConfidenceBand::Low, 20),
    (ConfidenceBand::Medium, 45),
    (ConfidenceBand::High, 70),
];

#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub filename: &'a str,
    pub size: u64,
    pub category: FileCategory,
    pub entries: Option<&'a [ArchiveEntry]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlrScore {
    pub score: u8,
    pub band: ConfidenceBand,
    pub niche: String,
    pub license: LicenseType,
}

impl PlrScore {
    /// Result used when there is nothing to score.
    pub fn empty() -> Self {
        Self {
            score: 0,
            band: ConfidenceBand::None,
            niche: DEFAULT_NICHE.to_string(),
            license: LicenseType::Unknown,
        }
    }
}

pub fn band_for(score: u8) -> ConfidenceBand {
    let score = score.min(MAX_SCORE);
    BANDS
        .iter()
        .rev()
        .find(|(_, lower)| score >= *lower)
        .map(|(band, _)| *band)
        .unwrap_or(ConfidenceBand::None)
}

/// Lowercase alphanumeric tokens; letter/digit boundaries also split.
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    tokens: Vec<String>,
    joined: String,
}

impl Tokens {
    pub fn new(text: &str) -> Self {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut last_digit: Option<bool> = None;
        for ch in text.chars() {
            if ch.is_alphanumeric() {
                let digit = ch.is_ascii_digit();
                if last_digit.is_some_and(|d| d != digit) && !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                current.extend(ch.to_lowercase());
                last_digit = Some(digit);
            } else {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                last_digit = None;
            }
        }
        if !current.is_empty() {
            tokens.push(current);
        }
        let joined = format!(" {} ", tokens.join(" "));
        Self { tokens, joined }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    /// Whole-token (or consecutive-token phrase) match.
    pub fn contains(&self, keyword: &str) -> bool {
        self.joined.contains(&format!(" {keyword} "))
    }

    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.contains(k))
    }

    pub fn count_matches(&self, keywords: &[&str]) -> usize {
        keywords.iter().filter(|k| self.contains(k)).count()
    }
}

fn stem_of(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}

fn license_keyword_hits(tokens: &Tokens) -> usize {
    LICENSE_VOCAB
        .iter()
        .map(|rule| tokens.count_matches(rule.keywords))
        .sum()
}

fn is_generic(tokens: &Tokens) -> bool {
    tokens
        .as_slice()
        .iter()
        .all(|t| GENERIC_WORDS.contains(&t.as_str()) || t.chars().all(|c| c.is_ascii_digit()))
}

fn is_license_member(tokens: &Tokens) -> bool {
    tokens.contains_any(LICENSE_WORDS) || license_keyword_hits(tokens) > 0
}

fn is_high_value_member(entry: &ArchiveEntry) -> bool {
    entry
        .name
        .rsplit_once('.')
        .map(|(_, ext)| HIGH_VALUE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Picks the first-declared row with the most keyword hits; `None` when nothing matched.
fn best_match<'a, T>(
    rows: &'a [T],
    keywords: impl Fn(&T) -> &'static [&'static str],
    texts: &[Tokens],
) -> Option<&'a T> {
    let mut best: Option<(&T, usize)> = None;
    for row in rows {
        let hits: usize = texts.iter().map(|t| t.count_matches(keywords(row))).sum();
        if hits == 0 {
            continue;
        }
        if best.map_or(true, |(_, top)| hits > top) {
            best = Some((row, hits));
        }
    }
    best.map(|(row, _)| row)
}

pub fn score(input: &ScoreInput<'_>) -> PlrScore {
    let filename = input.filename.trim();
    if filename.is_empty() {
        return PlrScore::empty();
    }
    let name = Tokens::new(stem_of(filename));
    let entries = input.entries.unwrap_or_default();
    // members are classified by file name; full paths feed the vocab lookups
    let member_names: Vec<Tokens> = entries.iter().map(|e| Tokens::new(stem_of(&e.name))).collect();
    let member_paths: Vec<Tokens> = entries.iter().map(|e| Tokens::new(stem_of(&e.path))).collect();

    let mut total: i32 = 0;

    let keyword_hits = license_keyword_hits(&name) as i32;
    total += (keyword_hits * LICENSE_KEYWORD_WEIGHT).min(LICENSE_KEYWORD_CAP);
    if name.contains_any(LICENSE_WORDS) {
        total += LICENSE_WORD_WEIGHT;
    }
    if name.contains_any(PACKAGE_WORDS) {
        total += PACKAGE_WORD_WEIGHT;
    }
    if matches!(input.category, FileCategory::Document | FileCategory::Video) {
        total += LOOSE_FORMAT_WEIGHT;
    }

    if input.entries.is_some() {
        total += ARCHIVE_WEIGHT;
        let mut license_member = false;
        let mut readme_member = false;
        let mut content_members = 0usize;
        let mut high_value = false;
        // independent checks: renaming a member can only add evidence
        for (entry, tokens) in entries.iter().zip(&member_names) {
            license_member |= is_license_member(tokens);
            readme_member |= tokens.contains_any(README_WORDS);
            if sniffer::category_for_path(std::path::Path::new(&entry.name)) != FileCategory::Other {
                content_members += 1;
                high_value |= is_high_value_member(entry);
            }
        }
        if license_member {
            total += LICENSE_MEMBER_WEIGHT;
        }
        if readme_member {
            total += README_MEMBER_WEIGHT;
        }
        if content_members >= BUNDLE_MIN_MEMBERS {
            total += BUNDLE_WEIGHT;
        }
        if content_members >= LARGE_BUNDLE_MIN_MEMBERS {
            total += LARGE_BUNDLE_WEIGHT;
        }
        if high_value {
            total += HIGH_VALUE_MEMBER_WEIGHT;
        }
    }

    if input.size < SMALL_FILE_BYTES {
        total -= SMALL_FILE_PENALTY;
    }
    if is_generic(&name) {
        total -= GENERIC_NAME_PENALTY;
    }

    let score = total.clamp(0, MAX_SCORE as i32) as u8;

    let mut texts = Vec::with_capacity(member_paths.len() + 1);
    texts.push(name);
    texts.extend(member_paths);
    let license = best_match(LICENSE_VOCAB, |r| r.keywords, &texts)
        .map(|r| r.license)
        .unwrap_or(LicenseType::Unknown);
    let niche = best_match(NICHE_VOCAB, |r| r.keywords, &texts)
        .map(|r| r.niche)
        .unwrap_or(DEFAULT_NICHE)
        .to_string();

    PlrScore {
        score,
        band: band_for(score),
        niche,
        license,
    }
}
