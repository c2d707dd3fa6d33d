//! Merge an ordered sequence of EPG documents into one deduplicated guide
//!
//! The fold is order-sensitive by design: the first occurrence of a
//! channel id or programme key wins, and later duplicates are silently
//! dropped with no field-level reconciliation. Channel entries that
//! arrive without an id are appended unconditionally and never take part
//! in deduplication.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::xmltv::{Document, Element};

/// The single merged output tree: distinct channels followed by
/// distinct programmes, each in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedDocument {
    pub channels: Vec<Element>,
    pub programmes: Vec<Element>,
}

/// Programme identity: `(channel, start, stop)`, with a missing
/// attribute participating as `None` rather than as a wildcard
type ProgrammeKey = (Option<String>, Option<String>, Option<String>);

/// Fold documents into a [`MergedDocument`]
///
/// Pure function of the input order; an empty input yields an empty
/// merged document.
pub fn merge_documents(documents: Vec<Document>) -> MergedDocument {
    let mut merged = MergedDocument::default();
    let mut seen_channels: HashSet<String> = HashSet::new();
    let mut seen_programmes: HashSet<ProgrammeKey> = HashSet::new();
    let mut duplicate_count = 0usize;

    for document in documents {
        for channel in document.channels {
            match channel.attr("id") {
                Some(id) if !id.is_empty() => {
                    if seen_channels.insert(id.to_string()) {
                        merged.channels.push(channel);
                    } else {
                        duplicate_count += 1;
                        debug!("Skipping duplicate channel '{}'", id);
                    }
                }
                // Channels without an id are never deduplicated
                _ => merged.channels.push(channel),
            }
        }

        for programme in document.programmes {
            let key: ProgrammeKey = (
                programme.attr("channel").map(str::to_string),
                programme.attr("start").map(str::to_string),
                programme.attr("stop").map(str::to_string),
            );
            if seen_programmes.insert(key) {
                merged.programmes.push(programme);
            } else {
                duplicate_count += 1;
                debug!(
                    "Skipping duplicate programme on channel '{}' at {}",
                    programme.attr("channel").unwrap_or(""),
                    programme.attr("start").unwrap_or("")
                );
            }
        }
    }

    if duplicate_count > 0 {
        debug!("Dropped {} duplicate entries while merging", duplicate_count);
    }
    info!(
        "Merged {} unique channels and {} programmes",
        merged.channels.len(),
        merged.programmes.len()
    );

    merged
}
