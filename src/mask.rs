// src/mask.rs

//! Classification of sensitive property keys.
//!
//! Which keys are sensitive is decided by the caller: the configuration
//! lists glob patterns (`sonar.login`, `*.password`, ...) and only keys
//! matching one of them are masked for the duration of a run.

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

#[derive(Clone)]
pub struct SensitiveKeys {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for SensitiveKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensitiveKeys")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl SensitiveKeys {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid masked key pattern '{}'", pattern))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .context("building masked key pattern set")?;

        Ok(Self { patterns, set })
    }

    /// No key is sensitive.
    pub fn none() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        self.set.is_match(key)
    }

    /// The sensitive keys among `keys`, in iteration order.
    pub fn select<'a, I>(&self, keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        keys.into_iter()
            .filter(|key| self.is_sensitive(key))
            .map(str::to_string)
            .collect()
    }
}

impl Default for SensitiveKeys {
    fn default() -> Self {
        Self::none()
    }
}
