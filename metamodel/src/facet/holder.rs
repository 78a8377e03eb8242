//! Facet holders and precedence-aware installation.

use std::collections::BTreeMap;

use tracing::debug;

use super::{Facet, FacetKind, FacetPayload};
use crate::identifier::{FeatureType, Identifier};

/// Outcome of [`FacetHolder::add_facet`].
#[derive(Debug, Clone, PartialEq)]
pub enum FacetChange {
    /// The slot was empty; the candidate is now installed.
    Installed,
    /// The candidate replaced a facet of lower or equal precedence.
    Replaced {
        /// The facet that was removed.
        previous: Facet,
    },
    /// The candidate was semantically equal to the installed facet at the
    /// same precedence; the installed instance is kept.
    Unchanged,
    /// The installed facet has higher precedence; the candidate was dropped.
    Discarded,
}

impl FacetChange {
    /// Returns true if the candidate is now the installed facet.
    #[must_use]
    pub fn took_effect(&self) -> bool {
        matches!(self, FacetChange::Installed | FacetChange::Replaced { .. })
    }
}

/// A type, member or parameter carrying at most one facet per kind.
#[derive(Debug, Clone)]
pub struct FacetHolder {
    identifier: Identifier,
    feature_type: FeatureType,
    facets: BTreeMap<FacetKind, Facet>,
}

impl FacetHolder {
    /// Creates an empty holder.
    #[must_use]
    pub fn new(identifier: Identifier, feature_type: FeatureType) -> Self {
        Self {
            identifier,
            feature_type,
            facets: BTreeMap::new(),
        }
    }

    /// The holder's identity.
    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// What kind of element this holder represents.
    #[must_use]
    pub fn feature_type(&self) -> FeatureType {
        self.feature_type
    }

    /// Offers a facet to the holder.
    ///
    /// An empty slot takes the candidate. Otherwise a candidate of strictly
    /// higher precedence replaces the installed facet and one of strictly
    /// lower precedence is discarded. At equal precedence a semantically
    /// equal candidate leaves the installed instance in place and a
    /// different one replaces it, so the factory running later wins.
    pub fn add_facet(&mut self, candidate: Facet) -> FacetChange {
        let kind = candidate.kind();
        let Some(existing) = self.facets.get(&kind) else {
            self.facets.insert(kind, candidate.attach(&self.identifier));
            return FacetChange::Installed;
        };

        if candidate.precedence() < existing.precedence() {
            debug!(
                holder = %self.identifier,
                %kind,
                installed = ?existing.precedence(),
                candidate = ?candidate.precedence(),
                "facet discarded"
            );
            return FacetChange::Discarded;
        }
        if candidate.precedence() == existing.precedence() && candidate.semantic_equals(existing) {
            return FacetChange::Unchanged;
        }

        debug!(
            holder = %self.identifier,
            %kind,
            installed = ?existing.precedence(),
            candidate = ?candidate.precedence(),
            "facet replaced"
        );
        let attached = candidate.attach(&self.identifier);
        match self.facets.insert(kind, attached) {
            Some(previous) => FacetChange::Replaced { previous },
            None => FacetChange::Installed,
        }
    }

    /// The installed facet of a kind.
    #[must_use]
    pub fn facet(&self, kind: FacetKind) -> Option<&Facet> {
        self.facets.get(&kind)
    }

    /// Returns true if a facet of the kind is installed.
    #[must_use]
    pub fn has_facet(&self, kind: FacetKind) -> bool {
        self.facets.contains_key(&kind)
    }

    /// The installed payload of type `P`.
    #[must_use]
    pub fn lookup<P: FacetPayload>(&self) -> Option<&P> {
        self.facet(P::KIND).and_then(Facet::payload::<P>)
    }

    /// Installed facets, ordered by kind.
    pub fn facets(&self) -> impl Iterator<Item = &Facet> {
        self.facets.values()
    }

    /// Number of installed facets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facets.len()
    }

    /// Returns true if no facet is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}
