//! Maven version ordering.
//!
//! Versions are compared the way Maven's `ComparableVersion` does it, so
//! `1.10` sorts after `1.9`, `1.0-SNAPSHOT` before `1.0`, and `1.0-sp`
//! after it:
//!
//! ```text
//! alpha < beta < milestone < rc = cr < snapshot < "" = ga = final = release < sp < (other, lexical)
//! ```
//!
//! A version is split on `.` and `-` and on every digit/letter boundary.
//! A `-` or a digit/letter boundary opens a nested list, and trailing
//! "null" items (`0`, release qualifiers, empty lists) are dropped, which
//! makes `1`, `1.0`, `1.0.0` and `1-ga` all equal.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::VersionError;

const QUALIFIERS: [&str; 7] = ["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];
const RELEASE_QUALIFIER_RANK: &str = "5";

#[derive(Debug, Clone)]
enum Item {
    /// Digits with leading zeros stripped; empty means zero.
    Int(String),
    /// Qualifier with aliases resolved.
    Str(String),
    List(Vec<Item>),
}

impl Item {
    fn int(digits: &str) -> Item {
        Item::Int(digits.trim_start_matches('0').to_string())
    }

    fn qualifier(value: &str, followed_by_digit: bool) -> Item {
        let value = match value {
            "a" if followed_by_digit => "alpha",
            "b" if followed_by_digit => "beta",
            "m" if followed_by_digit => "milestone",
            other => other,
        };
        let value = match value {
            "ga" | "final" | "release" => "",
            "cr" => "rc",
            other => other,
        };
        Item::Str(value.to_string())
    }

    fn parse(is_digit: bool, token: &str) -> Item {
        if is_digit {
            Item::int(token)
        } else {
            Item::qualifier(token, false)
        }
    }

    fn is_null(&self) -> bool {
        match self {
            Item::Int(digits) => digits.is_empty(),
            Item::Str(q) => q.is_empty(),
            Item::List(items) => items.is_empty(),
        }
    }

    /// Compare against another item, `None` standing for "nothing here"
    /// (the shorter version ran out of items).
    fn compare(&self, other: Option<&Item>) -> Ordering {
        match (self, other) {
            (Item::Int(digits), None) => {
                if digits.is_empty() {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            (Item::Int(a), Some(Item::Int(b))) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Item::Int(_), Some(_)) => Ordering::Greater,

            (Item::Str(q), None) => qualifier_rank(q).as_str().cmp(RELEASE_QUALIFIER_RANK),
            (Item::Str(_), Some(Item::Int(_))) => Ordering::Less,
            (Item::Str(a), Some(Item::Str(b))) => qualifier_rank(a).cmp(&qualifier_rank(b)),
            (Item::Str(_), Some(Item::List(_))) => Ordering::Less,

            (Item::List(items), None) => match items.first() {
                Some(first) => first.compare(None),
                None => Ordering::Equal,
            },
            (Item::List(_), Some(Item::Int(_))) => Ordering::Less,
            (Item::List(_), Some(Item::Str(_))) => Ordering::Greater,
            (Item::List(left), Some(Item::List(right))) => compare_lists(left, right),
        }
    }
}

fn compare_lists(left: &[Item], right: &[Item]) -> Ordering {
    for i in 0..left.len().max(right.len()) {
        let result = match (left.get(i), right.get(i)) {
            (Some(l), r) => l.compare(r),
            (None, Some(r)) => r.compare(None).reverse(),
            (None, None) => Ordering::Equal,
        };
        if result != Ordering::Equal {
            return result;
        }
    }
    Ordering::Equal
}

fn qualifier_rank(qualifier: &str) -> String {
    match QUALIFIERS.iter().position(|q| *q == qualifier) {
        Some(idx) => idx.to_string(),
        None => format!("{}-{}", QUALIFIERS.len(), qualifier),
    }
}

/// Drop trailing null items. A non-null list does not stop the scan, so
/// `1.0-rc` loses its `0` just like `1.0` does.
fn normalize(items: &mut Vec<Item>) {
    let mut i = items.len();
    while i > 0 {
        i -= 1;
        if items[i].is_null() {
            items.remove(i);
        } else if !matches!(items[i], Item::List(_)) {
            break;
        }
    }
}

/// A parsed, totally ordered Maven version.
///
/// Equality follows the ordering (`1.0 == 1`); the original text is kept
/// for display.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    raw: String,
    items: Vec<Item>,
}

impl MavenVersion {
    /// Parse a version string.
    ///
    /// Fails on empty input and on whitespace or control characters, which
    /// Nexus never produces for a real Maven component.
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        if raw.trim().is_empty() {
            return Err(VersionError::Empty);
        }
        if let Some(ch) = raw.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(VersionError::InvalidCharacter {
                version: raw.to_string(),
                ch,
            });
        }

        let version = raw.to_lowercase();
        // Each nested list is always the last element of its parent, so the
        // open lists form a path that is folded back together at the end.
        let mut stack: Vec<Vec<Item>> = vec![Vec::new()];
        let mut is_digit = false;
        let mut start = 0usize;

        for (i, c) in version.char_indices() {
            let current = stack.len() - 1;
            match c {
                '.' | '-' => {
                    if i == start {
                        stack[current].push(Item::Int(String::new()));
                    } else {
                        stack[current].push(Item::parse(is_digit, &version[start..i]));
                    }
                    start = i + c.len_utf8();
                    if c == '-' {
                        stack.push(Vec::new());
                    }
                }
                c if c.is_ascii_digit() => {
                    if !is_digit && i > start {
                        stack[current].push(Item::qualifier(&version[start..i], true));
                        start = i;
                        stack.push(Vec::new());
                    }
                    is_digit = true;
                }
                _ => {
                    if is_digit && i > start {
                        stack[current].push(Item::int(&version[start..i]));
                        start = i;
                        stack.push(Vec::new());
                    }
                    is_digit = false;
                }
            }
        }

        if version.len() > start {
            // A trailing `.X` qualifier is read as `-X`: 2.0.a < 2-1.
            if !is_digit && stack.last().is_some_and(|list| !list.is_empty()) {
                stack.push(Vec::new());
            }
            let current = stack.len() - 1;
            stack[current].push(Item::parse(is_digit, &version[start..]));
        }

        let mut items = Vec::new();
        while let Some(mut list) = stack.pop() {
            normalize(&mut list);
            match stack.last_mut() {
                Some(parent) => {
                    parent.push(Item::List(list));
                }
                None => items = list,
            }
        }

        Ok(MavenVersion {
            raw: raw.to_string(),
            items,
        })
    }

    /// The version exactly as reported by the repository
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for MavenVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MavenVersion::parse(s)
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_lists(&self.items, &other.items)
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Compare two version strings.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, VersionError> {
    Ok(MavenVersion::parse(a)?.cmp(&MavenVersion::parse(b)?))
}
