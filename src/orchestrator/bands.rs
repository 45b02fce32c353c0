// src/orchestrator/bands.rs

//! Version bands deciding how (and whether) extensions are injected.
//!
//! Bands are checked in order; the first threshold the server is prior to
//! wins. Servers past every threshold resolve their own extensions.

use crate::session::ExtensionConvention;
use crate::version::{
    ServerVersion, VersionThreshold, EXTENSIONS_CURRENT_CONVENTION, SERVER_SIDE_EXTENSIONS,
};

pub const EXTENSION_BANDS: &[(VersionThreshold, ExtensionConvention)] = &[
    (EXTENSIONS_CURRENT_CONVENTION, ExtensionConvention::Legacy),
    (SERVER_SIDE_EXTENSIONS, ExtensionConvention::Current),
];

/// Registration convention for `version`, or `None` when the server needs
/// no injected extensions.
pub fn extension_convention(version: &ServerVersion) -> Option<ExtensionConvention> {
    EXTENSION_BANDS
        .iter()
        .find(|(threshold, _)| version.is_prior_to(*threshold))
        .map(|(_, convention)| *convention)
}
