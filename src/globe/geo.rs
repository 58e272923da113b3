use anyhow::{Context, Result};
use log::error;
use serde::Deserialize;

use super::PolygonRing;

const OUTLINES_JSON: &str = include_str!("../../data/outlines.json");

#[derive(Deserialize)]
struct OutlineFile {
	rings: Vec<Vec<(f64, f64)>>,
}

/// The embedded coarse landmass outlines used as the globe's static
/// background dataset. A parse failure degrades to a bare sphere.
pub fn outlines() -> Vec<PolygonRing> {
	match parse() {
		Ok(rings) => rings,
		Err(err) => {
			error!("outline dataset unavailable: {err:#}");
			Vec::new()
		}
	}
}

fn parse() -> Result<Vec<PolygonRing>> {
	let file: OutlineFile =
		serde_json::from_str(OUTLINES_JSON).context("parsing data/outlines.json")?;
	Ok(file.rings.into_iter().map(PolygonRing).collect())
}
