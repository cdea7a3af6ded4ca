//! The pad registry components request their external ports from.

use crate::catalog::standard_io;
use crate::pads::{IoDecl, PortBundle};
use ethgen_common::{GenError, GenResult, NotFoundKind};
use std::collections::BTreeSet;
use tracing::debug;

/// Hands out pad bundles, each at most once per build.
///
/// Populated once from the catalog before any component asks for ports, then
/// mutated only by [`request`](Self::request) during a single composition.
#[derive(Debug, Default)]
pub struct PadRegistry {
    decls: Vec<IoDecl>,
    requested: BTreeSet<(String, u32)>,
}

impl PadRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry populated with the [standard catalog](standard_io).
    pub fn with_standard_io() -> Self {
        let mut registry = Self::new();
        registry.decls = standard_io();
        registry
    }

    /// Adds pad declarations.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::ResourceConflict`] if a name+index pair is already
    /// declared; nothing is added in that case.
    pub fn add_extension(&mut self, decls: impl IntoIterator<Item = IoDecl>) -> GenResult<()> {
        let decls: Vec<IoDecl> = decls.into_iter().collect();
        let mut seen: BTreeSet<(&str, u32)> = self
            .decls
            .iter()
            .map(|d| (d.name.as_str(), d.index))
            .collect();
        for decl in &decls {
            if !seen.insert((decl.name.as_str(), decl.index)) {
                return Err(GenError::ResourceConflict {
                    name: decl.name.clone(),
                    index: decl.index,
                });
            }
        }
        self.decls.extend(decls);
        Ok(())
    }

    /// Returns the declaration for a name+index pair without requesting it.
    pub fn lookup(&self, name: &str, index: u32) -> Option<&IoDecl> {
        self.decls
            .iter()
            .find(|d| d.name == name && d.index == index)
    }

    /// Returns `true` if the name+index pair has been requested.
    pub fn is_requested(&self, name: &str, index: u32) -> bool {
        self.requested.contains(&(name.to_string(), index))
    }

    /// Iterates over all requested name+index pairs in sorted order.
    pub fn requested(&self) -> impl Iterator<Item = (&str, u32)> {
        self.requested.iter().map(|(n, i)| (n.as_str(), *i))
    }

    /// Requests a pad bundle.
    ///
    /// With `index == None` the lowest declared index of `name` that has not
    /// been requested yet is used.
    ///
    /// # Errors
    ///
    /// - [`GenError::NotFound`] if no declaration matches.
    /// - [`GenError::ResourceConflict`] if the bundle was already requested
    ///   (or, without an index, every declared index was).
    pub fn request(&mut self, name: &str, index: Option<u32>) -> GenResult<PortBundle> {
        let mut candidates: Vec<&IoDecl> = self.decls.iter().filter(|d| d.name == name).collect();
        if candidates.is_empty() {
            return Err(GenError::not_found(NotFoundKind::Pad, name));
        }
        candidates.sort_by_key(|d| d.index);
        let shared_name = candidates.len() > 1;

        let decl = match index {
            Some(i) => {
                let decl = candidates
                    .iter()
                    .find(|d| d.index == i)
                    .ok_or_else(|| GenError::not_found(NotFoundKind::Pad, format!("{name}:{i}")))?;
                if self.is_requested(name, i) {
                    return Err(GenError::ResourceConflict {
                        name: name.to_string(),
                        index: i,
                    });
                }
                *decl
            }
            None => *candidates
                .iter()
                .find(|d| !self.is_requested(name, d.index))
                .ok_or_else(|| GenError::ResourceConflict {
                    name: name.to_string(),
                    index: candidates[candidates.len() - 1].index,
                })?,
        };

        // Shared names get the index appended so top-level ports stay unique.
        let prefix = if shared_name {
            format!("{}{}", decl.name, decl.index)
        } else {
            decl.name.clone()
        };
        let bundle = PortBundle::from_decl(decl, prefix);
        self.requested.insert((bundle.name.clone(), bundle.index));
        debug!(pad = %bundle.name, index = bundle.index, "pad requested");
        Ok(bundle)
    }
}
