//! Property-based tests for facet installation and sequence ordering.

use std::cmp::Ordering;

use causeway_metamodel::facet::{
    FacetChange, FacetSource, MandatoryFacet, MaxLengthFacet, NamedFacet,
};
use causeway_metamodel::sequence::compare_sequences;
use causeway_metamodel::{Facet, FacetHolder, FacetKind, FeatureType, Identifier, Precedence};
use proptest::prelude::*;

const PRECEDENCES: [Precedence; 6] = [
    Precedence::Fallback,
    Precedence::Inferred,
    Precedence::Default,
    Precedence::Synthesized,
    Precedence::Explicit,
    Precedence::High,
];

fn holder() -> FacetHolder {
    FacetHolder::new(
        Identifier::member_identifier("demo.Customer", "name"),
        FeatureType::Property,
    )
}

fn named(text: &str, precedence: Precedence) -> Facet {
    Facet::new(NamedFacet::new(text), precedence, FacetSource::Annotation)
}

fn precedence() -> impl Strategy<Value = Precedence> {
    (0..PRECEDENCES.len()).prop_map(|i| PRECEDENCES[i])
}

fn candidate() -> impl Strategy<Value = (String, Precedence)> {
    ("[a-c]", precedence())
}

fn sequence() -> impl Strategy<Value = String> {
    prop::collection::vec(0u64..20, 1..4).prop_map(|segments| {
        segments
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".")
    })
}

// =============================================================================
// Installation
// =============================================================================

proptest! {
    /// The holder keeps the last candidate offered at the highest precedence,
    /// whatever order the candidates arrive in.
    #[test]
    fn prop_highest_precedence_last_writer_wins(
        candidates in prop::collection::vec(candidate(), 1..12)
    ) {
        let mut holder = holder();
        for (text, precedence) in &candidates {
            holder.add_facet(named(text, *precedence));
        }
        let top = candidates.iter().map(|(_, p)| *p).max().unwrap_or(Precedence::Fallback);
        let winner = candidates
            .iter()
            .filter(|(_, p)| *p == top)
            .last()
            .map(|(text, _)| text.as_str());

        prop_assert_eq!(holder.len(), 1);
        prop_assert_eq!(holder.facet(FacetKind::Named).map(Facet::precedence), Some(top));
        prop_assert_eq!(holder.lookup::<NamedFacet>().map(|n| n.text.as_str()), winner);
    }

    /// Lower precedence never displaces higher; higher always displaces lower.
    #[test]
    fn prop_precedence_decides(a in precedence(), b in precedence()) {
        let mut holder = holder();
        holder.add_facet(named("first", a));
        let change = holder.add_facet(named("second", b));
        match b.cmp(&a) {
            Ordering::Less => prop_assert_eq!(change, FacetChange::Discarded),
            Ordering::Equal | Ordering::Greater => prop_assert!(change.took_effect()),
        }
    }

    /// Offering a semantically equal facet at the same precedence is a no-op.
    #[test]
    fn prop_equal_candidates_are_idempotent((text, precedence) in candidate(), repeats in 1usize..5) {
        let mut holder = holder();
        prop_assert_eq!(holder.add_facet(named(&text, precedence)), FacetChange::Installed);
        for _ in 0..repeats {
            prop_assert_eq!(holder.add_facet(named(&text, precedence)), FacetChange::Unchanged);
        }
        prop_assert_eq!(holder.len(), 1);
    }

    /// At most one facet per kind, however many kinds are offered.
    #[test]
    fn prop_one_facet_per_kind(offers in prop::collection::vec((0u8..3, precedence()), 0..20)) {
        let mut holder = holder();
        for (kind, precedence) in &offers {
            let facet = match kind {
                0 => named("x", *precedence),
                1 => Facet::new(MandatoryFacet::Required, *precedence, FacetSource::Fallback),
                _ => Facet::new(MaxLengthFacet { max: 10 }, *precedence, FacetSource::Annotation),
            };
            holder.add_facet(facet);
        }
        let mut kinds: Vec<u8> = offers.iter().map(|(k, _)| *k).collect();
        kinds.sort_unstable();
        kinds.dedup();
        prop_assert_eq!(holder.len(), kinds.len());
    }
}

// =============================================================================
// Dewey ordering
// =============================================================================

proptest! {
    /// The comparator is a total order consistent with numeric segments.
    #[test]
    fn prop_dewey_matches_numeric_segments(a in sequence(), b in sequence()) {
        let numeric = |s: &str| -> Vec<u64> {
            s.split('.').filter_map(|part| part.parse().ok()).collect()
        };
        prop_assert_eq!(compare_sequences(&a, &b), numeric(&a).cmp(&numeric(&b)));
        prop_assert_eq!(compare_sequences(&b, &a), compare_sequences(&a, &b).reverse());
    }
}

#[test]
fn dewey_sorts_numerically_not_lexically() {
    let mut sequences = vec!["2", "1.10", "1", "1.5"];
    sequences.sort_by(|a, b| compare_sequences(a, b));
    assert_eq!(sequences, vec!["1", "1.5", "1.10", "2"]);
}
