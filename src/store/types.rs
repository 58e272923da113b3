use serde::Deserialize;

/// One data-center location from the canonical dataset. Immutable after
/// load; `id` is the join key links refer to.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Location {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub country: String,
	pub lat: f64,
	pub lng: f64,
	pub provider: String,
	#[serde(default)]
	pub region: String,
	#[serde(default = "default_weight")]
	pub weight: f64,
}

fn default_weight() -> f64 {
	1.0
}

/// One inter-region link. Endpoints reference [`Location::id`]; a link is
/// only shown while both endpoints are visible.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Link {
	pub id: String,
	pub from: String,
	pub to: String,
	#[serde(default)]
	pub arc_alt: f64,
	#[serde(default)]
	pub active: bool,
	#[serde(default)]
	pub order: u32,
}

/// Which of the three provider families a raw provider string belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderClass {
	Aws,
	Gcp,
	Azure,
}

impl ProviderClass {
	/// Case-insensitive substring match, checked in this order; first hit
	/// wins. `None` means the provider is outside the three known families
	/// and the location is never shown.
	pub fn classify(provider: &str) -> Option<Self> {
		let p = provider.to_ascii_lowercase();
		if p.contains("aws") {
			Some(Self::Aws)
		} else if p.contains("gcp") {
			Some(Self::Gcp)
		} else if p.contains("azure") {
			Some(Self::Azure)
		} else {
			None
		}
	}

	/// Marker fill color for a raw provider string.
	pub fn marker_color(provider: &str) -> &'static str {
		match Self::classify(provider) {
			Some(Self::Aws) => "#f54242",
			Some(Self::Gcp) => "#42f545",
			Some(Self::Azure) => "#4242f5",
			None => "#888",
		}
	}
}

/// The three provider toggles. Always fully defined; replaced as a whole,
/// never field by field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterState {
	pub aws: bool,
	pub azure: bool,
	pub gcp: bool,
}

impl Default for FilterState {
	fn default() -> Self {
		Self {
			aws: true,
			azure: true,
			gcp: true,
		}
	}
}

impl FilterState {
	/// Whether a location with this provider string passes the filter.
	pub fn admits(&self, provider: &str) -> bool {
		match ProviderClass::classify(provider) {
			Some(ProviderClass::Aws) => self.aws,
			Some(ProviderClass::Gcp) => self.gcp,
			Some(ProviderClass::Azure) => self.azure,
			None => false,
		}
	}
}
