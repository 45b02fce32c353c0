// src/session/dump.rs

//! Session that dumps run properties to a file instead of analysing.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use super::{AnalysisSession, Extension, ExtensionConvention};
use crate::project::Properties;

/// Value written in place of a masked property.
pub const MASKED_VALUE: &str = "******";

/// An [`AnalysisSession`] that writes the properties of `run_analysis` to
/// `dump_file`, one sorted `key=value` line each.
///
/// The reported server version is fixed at construction, which makes the
/// version-gated behaviour of a run observable without a server.
#[derive(Debug)]
pub struct DumpSession {
    dump_file: PathBuf,
    server_version: Option<String>,
    started: bool,
    masked: BTreeSet<String>,
    extensions: Vec<(Extension, ExtensionConvention)>,
}

impl DumpSession {
    pub fn new(dump_file: impl Into<PathBuf>, server_version: Option<String>) -> Self {
        Self {
            dump_file: dump_file.into(),
            server_version,
            started: false,
            masked: BTreeSet::new(),
            extensions: Vec::new(),
        }
    }

    pub fn dump_file(&self) -> &Path {
        &self.dump_file
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Keys currently masked.
    pub fn masked_keys(&self) -> impl Iterator<Item = &str> {
        self.masked.iter().map(String::as_str)
    }

    pub fn extensions(&self) -> &[(Extension, ExtensionConvention)] {
        &self.extensions
    }

    fn ensure_started(&self, operation: &str) -> Result<()> {
        if !self.started {
            bail!("cannot {operation}: session is not started");
        }
        Ok(())
    }

    fn render(&self, properties: &Properties) -> String {
        let mut out = String::new();
        for (key, value) in properties {
            let value = if self.masked.contains(key) {
                MASKED_VALUE
            } else {
                value.as_str()
            };
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}

impl AnalysisSession for DumpSession {
    fn start(&mut self) -> Result<()> {
        if self.started {
            bail!("session already started");
        }
        self.started = true;
        debug!(dump_file = ?self.dump_file, "dump session started");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.ensure_started("stop")?;
        self.started = false;
        debug!("dump session stopped");
        Ok(())
    }

    fn server_version(&mut self) -> Result<Option<String>> {
        self.ensure_started("query the server version")?;
        Ok(self.server_version.clone())
    }

    fn run_analysis(&mut self, properties: &Properties) -> Result<()> {
        self.ensure_started("run the analysis")?;

        if let Some(parent) = self.dump_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating dir {:?}", parent))?;
            }
        }
        let mut file = fs::File::create(&self.dump_file)
            .with_context(|| format!("creating file {:?}", self.dump_file))?;
        file.write_all(self.render(properties).as_bytes())
            .with_context(|| format!("writing to file {:?}", self.dump_file))?;

        info!(
            dump_file = ?self.dump_file,
            properties = properties.len(),
            "analysis properties dumped"
        );
        Ok(())
    }

    fn mask(&mut self, key: &str) -> Result<()> {
        self.masked.insert(key.to_string());
        Ok(())
    }

    fn unmask(&mut self, key: &str) -> Result<()> {
        self.masked.remove(key);
        Ok(())
    }

    fn add_extensions(
        &mut self,
        extensions: Vec<Extension>,
        convention: ExtensionConvention,
    ) -> Result<()> {
        self.ensure_started("add extensions")?;
        self.extensions
            .extend(extensions.into_iter().map(|e| (e, convention)));
        Ok(())
    }
}
