//! Best-effort destination extraction from free text
//!
//! A destination given in the trip form always wins. Otherwise the question is
//! scanned with an ordered list of regexes that look for capitalised place-like
//! phrases after a preposition ("a Roma", "to New York") or before a
//! descriptive verb ("Lima tiene", "Kyoto offers"). Matches that are generic
//! travel words are skipped. False positives and misses are accepted.
//!
//! English prepositions are tried before Spanish ones. The short Spanish
//! prepositions `a`, `de` and `en` also read as English words, so "Is there a
//! Museum in Paris" finds "Paris", while "Is there a Museum" alone still
//! yields "Museum".

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::models::TripInfo;
use crate::{Result, ViajeError};

pub struct DestinationExtractor {
    patterns: Vec<Regex>,
    stopwords: HashSet<String>,
}

impl DestinationExtractor {
    /// Compile the patterns, in priority order
    pub fn new<P, S>(patterns: &[P], stopwords: &[S]) -> Result<Self>
    where
        P: AsRef<str>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|e| {
                    ViajeError::config(format!("Invalid destination pattern '{}': {e}", p.as_ref()))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let stopwords = stopwords
            .iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .collect();

        Ok(Self {
            patterns,
            stopwords,
        })
    }

    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        Self::new(&config.patterns, &config.stopwords)
    }

    /// Pick the destination for weather and photo lookups
    #[must_use]
    pub fn extract(&self, question: &str, trip: Option<&TripInfo>) -> Option<String> {
        if let Some(destination) = trip
            .and_then(|t| t.destination.as_deref())
            .map(str::trim)
            .filter(|d| !d.is_empty())
        {
            return Some(destination.to_string());
        }

        for pattern in &self.patterns {
            for captures in pattern.captures_iter(question) {
                let Some(found) = captures.get(1).or_else(|| captures.get(0)) else {
                    continue;
                };
                let candidate = found.as_str().trim();
                if candidate.is_empty() || self.stopwords.contains(&candidate.to_lowercase()) {
                    debug!("Skipping generic destination candidate '{}'", candidate);
                    continue;
                }
                debug!("Extracted destination '{}' from question", candidate);
                return Some(candidate.to_string());
            }
        }

        None
    }
}
