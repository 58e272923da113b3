//! App state: canonical datasets, the provider filter, and the derived
//! visible subsets the globe renders.

mod data;
mod derive;
mod types;

pub use derive::compute_visible;
pub use types::{FilterState, Link, Location, ProviderClass};

use std::sync::Arc;

use leptos::prelude::*;
use log::{error, info};

/// Both visible subsets, produced atomically by one recomputation so no
/// consumer can observe locations updated but links not.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleSets {
	pub locations: Arc<Vec<Location>>,
	pub links: Arc<Vec<Link>>,
}

struct Canonical {
	locations: Vec<Location>,
	links: Vec<Link>,
}

/// The store handle provided via context. Cheap to copy; all slices are
/// reactive-graph handles.
#[derive(Clone, Copy)]
pub struct AppStore {
	/// Read-write filter slice; replaced whole-value via [`AppStore::apply`].
	pub filters: RwSignal<FilterState>,
	/// Derived, read-only: the currently visible locations and links.
	pub visible: Memo<VisibleSets>,
	/// (|locations|, |links|) of the visible sets. Consumers that rebuild
	/// expensive resources key off this rather than deep content.
	pub cardinality: Memo<(usize, usize)>,
}

impl AppStore {
	/// Load the canonical datasets and wire up the derived slices. A data
	/// error degrades to an empty canonical set rather than failing the app.
	pub fn new() -> Self {
		let locations = data::load_locations().unwrap_or_else(|err| {
			error!("location dataset unavailable: {err:#}");
			Vec::new()
		});
		let links = data::load_links().unwrap_or_else(|err| {
			error!("link dataset unavailable: {err:#}");
			Vec::new()
		});
		info!(
			"canonical data loaded: {} locations, {} links",
			locations.len(),
			links.len()
		);
		Self::with_canonical(locations, links)
	}

	/// Build a store over explicit canonical data (tests use this).
	pub fn with_canonical(locations: Vec<Location>, links: Vec<Link>) -> Self {
		let filters = RwSignal::new(FilterState::default());
		let canonical = StoredValue::new(Canonical { locations, links });

		let visible = Memo::new(move |_| {
			let filter = filters.get();
			canonical.with_value(|canonical| {
				let (locations, links) =
					compute_visible(&canonical.locations, &canonical.links, filter);
				VisibleSets {
					locations: Arc::new(locations),
					links: Arc::new(links),
				}
			})
		});

		let cardinality = Memo::new(move |_| {
			let sets = visible.get();
			(sets.locations.len(), sets.links.len())
		});

		Self {
			filters,
			visible,
			cardinality,
		}
	}

	/// Replace all three filter flags in one step. Re-applying the value
	/// already in state is observably a no-op downstream (the derived memo
	/// compares equal and does not notify).
	pub fn apply(&self, filter: FilterState) {
		self.filters.set(filter);
	}
}

impl Default for AppStore {
	fn default() -> Self {
		Self::new()
	}
}

/// Grab the store from context; panics if the app forgot to provide it.
pub fn use_store() -> AppStore {
	expect_context::<AppStore>()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn location(id: &str, provider: &str) -> Location {
		Location {
			id: id.into(),
			name: id.to_uppercase(),
			country: String::new(),
			lat: 10.0,
			lng: 20.0,
			provider: provider.into(),
			region: String::new(),
			weight: 1.0,
		}
	}

	fn link(id: &str, from: &str, to: &str) -> Link {
		Link {
			id: id.into(),
			from: from.into(),
			to: to.into(),
			arc_alt: 0.3,
			active: true,
			order: 0,
		}
	}

	#[test]
	fn apply_replaces_the_whole_filter_and_recomputes_both_sets() {
		let store = AppStore::with_canonical(
			vec![location("a", "aws-east"), location("b", "gcp-west")],
			vec![link("l1", "a", "b")],
		);
		assert_eq!(store.cardinality.get_untracked(), (2, 1));

		store.apply(FilterState {
			aws: true,
			azure: true,
			gcp: false,
		});
		let sets = store.visible.get_untracked();
		assert_eq!(sets.locations.len(), 1);
		assert_eq!(sets.locations[0].id, "a");
		assert!(sets.links.is_empty());
		assert_eq!(store.cardinality.get_untracked(), (1, 0));
	}

	#[test]
	fn reapplying_the_current_filter_leaves_the_derived_value_equal() {
		let store = AppStore::with_canonical(
			vec![location("a", "aws-east"), location("b", "azure-north")],
			vec![link("l1", "a", "b")],
		);
		let before = store.visible.get_untracked();

		// The initial mount dispatch re-submits the default filter.
		store.apply(FilterState::default());
		assert_eq!(store.filters.get_untracked(), FilterState::default());
		assert_eq!(store.visible.get_untracked(), before);
	}

	#[test]
	fn cardinality_ignores_content_and_tracks_sizes() {
		let store = AppStore::with_canonical(
			vec![
				location("a", "aws-east"),
				location("g", "gcp-west"),
				location("z", "azure-north"),
			],
			Vec::new(),
		);
		store.apply(FilterState {
			aws: false,
			azure: true,
			gcp: true,
		});
		assert_eq!(store.cardinality.get_untracked(), (2, 0));
		store.apply(FilterState {
			aws: true,
			azure: false,
			gcp: true,
		});
		assert_eq!(store.cardinality.get_untracked(), (2, 0));
	}
}
