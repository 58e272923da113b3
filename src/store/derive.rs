use std::collections::HashSet;

use super::types::{FilterState, Link, Location};

/// Filter the canonical sets down to what the current provider selection
/// shows. A stable filter: output order preserves input order. A link
/// survives only while both of its endpoints do, so links can never
/// reference a location the rest of the app cannot see.
pub fn compute_visible(
	locations: &[Location],
	links: &[Link],
	filter: FilterState,
) -> (Vec<Location>, Vec<Link>) {
	let visible: Vec<Location> = locations
		.iter()
		.filter(|location| filter.admits(&location.provider))
		.cloned()
		.collect();

	let ids: HashSet<&str> = visible.iter().map(|location| location.id.as_str()).collect();
	let visible_links: Vec<Link> = links
		.iter()
		.filter(|link| ids.contains(link.from.as_str()) && ids.contains(link.to.as_str()))
		.cloned()
		.collect();

	(visible, visible_links)
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

	fn all() -> FilterState {
		FilterState::default()
	}

	#[test]
	fn link_dropped_when_one_endpoint_filtered_out() {
		let locations = vec![location("a", "aws-east"), location("b", "gcp-west")];
		let links = vec![link("l1", "a", "b")];
		let filter = FilterState {
			aws: true,
			azure: true,
			gcp: false,
		};

		let (visible, visible_links) = compute_visible(&locations, &links, filter);
		assert_eq!(visible.len(), 1);
		assert_eq!(visible[0].id, "a");
		assert!(visible_links.is_empty());
	}

	#[test]
	fn link_kept_when_both_endpoints_visible() {
		let locations = vec![location("a", "aws-east"), location("b", "gcp-west")];
		let links = vec![link("l1", "a", "b")];

		let (visible, visible_links) = compute_visible(&locations, &links, all());
		assert_eq!(
			visible.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(),
			["a", "b"]
		);
		assert_eq!(visible_links.len(), 1);
		assert_eq!(visible_links[0].id, "l1");
	}

	#[test]
	fn every_visible_link_has_both_endpoints_visible() {
		let locations = vec![
			location("a", "aws-east"),
			location("b", "gcp-west"),
			location("c", "azure-north"),
			location("d", "unknown-cloud"),
		];
		let links = vec![
			link("l1", "a", "b"),
			link("l2", "b", "c"),
			link("l3", "a", "d"),
			link("l4", "c", "a"),
		];

		for aws in [false, true] {
			for azure in [false, true] {
				for gcp in [false, true] {
					let filter = FilterState { aws, azure, gcp };
					let (visible, visible_links) = compute_visible(&locations, &links, filter);
					let ids: Vec<&str> = visible.iter().map(|l| l.id.as_str()).collect();
					for link in &links {
						let both_in = ids.contains(&link.from.as_str()) && ids.contains(&link.to.as_str());
						let kept = visible_links.iter().any(|k| k.id == link.id);
						assert_eq!(kept, both_in, "link {} under {:?}", link.id, filter);
					}
				}
			}
		}
	}

	#[test]
	fn recomputation_is_idempotent() {
		let locations = vec![location("a", "aws-east"), location("b", "gcp-west")];
		let links = vec![link("l1", "a", "b")];
		let filter = FilterState {
			aws: true,
			azure: false,
			gcp: true,
		};

		let first = compute_visible(&locations, &links, filter);
		let second = compute_visible(&locations, &links, filter);
		assert_eq!(first, second);
	}

	#[test]
	fn disabling_a_flag_removes_all_and_only_that_provider() {
		let locations = vec![
			location("a1", "aws-east"),
			location("g1", "gcp-west"),
			location("a2", "aws-west"),
			location("z1", "azure-north"),
		];

		let (with_aws, _) = compute_visible(&locations, &[], all());
		let no_aws = FilterState {
			aws: false,
			azure: true,
			gcp: true,
		};
		let (without_aws, _) = compute_visible(&locations, &[], no_aws);

		assert!(without_aws.iter().all(|l| !l.provider.contains("aws")));
		let survivors: Vec<&str> = with_aws
			.iter()
			.filter(|l| !l.provider.contains("aws"))
			.map(|l| l.id.as_str())
			.collect();
		assert_eq!(
			without_aws.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(),
			survivors
		);
	}

	#[test]
	fn unknown_provider_absent_even_with_all_flags_on() {
		let locations = vec![location("a", "aws-east"), location("u", "unknown-cloud")];
		let (visible, _) = compute_visible(&locations, &[], all());
		assert!(visible.iter().all(|l| l.id != "u"));
	}

	#[test]
	fn dangling_link_endpoints_are_silently_excluded() {
		let locations = vec![location("a", "aws-east")];
		let links = vec![link("l1", "a", "ghost"), link("l2", "ghost", "a")];
		let (_, visible_links) = compute_visible(&locations, &links, all());
		assert!(visible_links.is_empty());
	}

	#[test]
	fn output_preserves_canonical_order() {
		let locations = vec![
			location("c", "azure-1"),
			location("a", "aws-1"),
			location("b", "gcp-1"),
		];
		let links = vec![link("l2", "b", "a"), link("l1", "a", "c")];
		let (visible, visible_links) = compute_visible(&locations, &links, all());
		assert_eq!(
			visible.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(),
			["c", "a", "b"]
		);
		assert_eq!(
			visible_links.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(),
			["l2", "l1"]
		);
	}
}
