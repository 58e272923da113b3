use anyhow::{Context, Result};
use serde::Deserialize;

use super::types::{Link, Location};

const LOCATIONS_JSON: &str = include_str!("../../data/locations.json");
const LINKS_JSON: &str = include_str!("../../data/links.json");

#[derive(Deserialize)]
struct LocationFile {
	locations: Vec<Location>,
}

#[derive(Deserialize)]
struct LinkFile {
	links: Vec<Link>,
}

/// Canonical location records, embedded at build time and parsed once.
pub fn load_locations() -> Result<Vec<Location>> {
	let file: LocationFile =
		serde_json::from_str(LOCATIONS_JSON).context("parsing data/locations.json")?;
	Ok(file.locations)
}

/// Canonical link records.
pub fn load_links() -> Result<Vec<Link>> {
	let file: LinkFile = serde_json::from_str(LINKS_JSON).context("parsing data/links.json")?;
	Ok(file.links)
}
