//! # Release Version Resolution
//!
//! Queries a release source for the versions it publishes and orders them.
//!
//! Releases are published as branches named `mdm/release/<version>`, so
//! enumeration is a single `ls-remote` with a ref pattern. It works
//! against a local path or any transport URL git supports.
//!
//! Two outcomes are kept distinct: a reachable source publishing nothing
//! returns an empty list, while a source that cannot be queried at all is
//! an error.
//!
//! Version labels have no enforced schema (`1.9`, `2.0-rc1`, `3`), so
//! ordering uses a natural comparator rather than a strict semver parse:
//! runs of digits compare numerically and everything else compares
//! lexically, giving `1.2 < 1.9 < 1.10`.

use std::cmp::Ordering;

use crate::defaults::{RELEASE_REF_PATTERN, RELEASE_REF_PREFIX};
use crate::error::{Error, Result};
use crate::git::Git;

/// Versions published by `source_location`, sorted ascending. An empty
/// vector means the source is reachable but publishes no releases.
pub fn resolve_versions(git: &Git, source_location: &str) -> Result<Vec<String>> {
    let raw = match git.ls_remote_heads(source_location, RELEASE_REF_PATTERN) {
        Ok(out) => out,
        Err(Error::GitCommand { stderr, .. }) => {
            return Err(Error::SourceUnreachable {
                source_location: source_location.to_string(),
                stderr,
            });
        }
        Err(e) => return Err(e),
    };
    let mut versions = extract_versions(&raw);
    versions.sort_by(|a, b| version_cmp(a, b));
    Ok(versions)
}

/// Pull version labels out of raw `ls-remote` output. Each line is
/// `<object id>\t<ref name>`; the label is the ref name past the fixed
/// release prefix.
fn extract_versions(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let ref_name = line.split_whitespace().nth(1)?;
            ref_name
                .strip_prefix(RELEASE_REF_PREFIX)
                .map(str::to_string)
        })
        .collect()
}

/// Natural version ordering: segment-wise, with digit runs compared by
/// numeric value and other runs compared lexically.
pub fn version_cmp(a: &str, b: &str) -> Ordering {
    let mut left = tokens(a).into_iter();
    let mut right = tokens(b).into_iter();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match x.cmp(&y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

/// A maximal run of digits or of non-digits.
#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Number(&'a str),
    Text(&'a str),
}

impl Token<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Token::Number(a), Token::Number(b)) => {
                // Compare by magnitude without parsing, so arbitrarily long
                // numeric segments cannot overflow: strip leading zeros,
                // then longer means larger, then lexical settles it.
                let a = a.trim_start_matches('0');
                let b = b.trim_start_matches('0');
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Token::Text(a), Token::Text(b)) => a.cmp(b),
            // A numeric segment sorts before a textual one in the same
            // position, so "1.2" precedes "1.beta".
            (Token::Number(_), Token::Text(_)) => Ordering::Less,
            (Token::Text(_), Token::Number(_)) => Ordering::Greater,
        }
    }
}

fn tokens(s: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let bytes = s.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        let numeric = bytes[start].is_ascii_digit();
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() == numeric {
            end += 1;
        }
        let run = &s[start..end];
        out.push(if numeric {
            Token::Number(run)
        } else {
            Token::Text(run)
        });
        start = end;
    }
    out
}
