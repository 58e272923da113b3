use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::camera::OrbitCamera;
use super::math::{GLOBE_RADIUS, Vec3, slerp};
use super::scene::Scene;
use super::{ArcDatum, ArcStyle, Globe};

const OUTLINE_COLOR: &str = "rgba(171, 148, 242, 0.35)";
const ARC_SEGMENTS: usize = 48;
const ARC_STROKE_SCALE: f64 = 3.0;

/// Translate `#rrggbb` into an rgba() string with the given alpha.
fn with_alpha(hex: &str, alpha: f64) -> String {
	let channel = |range: std::ops::Range<usize>| {
		hex.get(range)
			.and_then(|s| u8::from_str_radix(s, 16).ok())
			.unwrap_or(255)
	};
	if hex.len() == 7 && hex.starts_with('#') {
		format!(
			"rgba({}, {}, {}, {alpha})",
			channel(1..3),
			channel(3..5),
			channel(5..7)
		)
	} else {
		hex.to_owned()
	}
}

pub(super) fn render_scene(
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
	scene: &Scene,
	camera: &OrbitCamera,
) {
	ctx.set_fill_style_str(&scene.background);
	ctx.fill_rect(0.0, 0.0, width, height);

	let Some(globe_cell) = scene.globe() else {
		return;
	};
	let globe = globe_cell.borrow();
	draw_sphere(ctx, width, height, &globe, scene, camera);
	draw_outlines(ctx, width, height, &globe, camera);
	draw_arcs(ctx, width, height, &globe, camera);
}

fn draw_sphere(
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
	globe: &Globe,
	scene: &Scene,
	camera: &OrbitCamera,
) {
	let (cx, cy) = (width / 2.0, height / 2.0);
	let radius = camera.silhouette_radius(height);
	if radius <= 0.0 {
		return;
	}
	let material = globe.material();

	// Atmosphere halo just past the silhouette.
	let (atmo_color, atmo_alt) = globe.atmosphere();
	let halo = radius * (1.0 + atmo_alt);
	if let Ok(gradient) = ctx.create_radial_gradient(cx, cy, radius * 0.95, cx, cy, halo) {
		let _ = gradient.add_color_stop(0.0, &with_alpha(atmo_color, 0.5));
		let _ = gradient.add_color_stop(1.0, &with_alpha(atmo_color, 0.0));
		ctx.begin_path();
		let _ = ctx.arc(cx, cy, halo, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
	}

	// Shaded body: highlight biased toward the directional light.
	let light = camera.view(scene.directional.direction);
	let (hx, hy) = (
		cx + light.x * radius * 0.4,
		cy - light.y * radius * 0.4,
	);
	let brightness =
		(scene.ambient.intensity + scene.directional.intensity * 0.5).clamp(0.0, 1.0);
	if let Ok(gradient) = ctx.create_radial_gradient(hx, hy, radius * 0.1, cx, cy, radius) {
		let _ = gradient.add_color_stop(0.0, &with_alpha(&material.color, brightness.max(0.6)));
		let _ = gradient.add_color_stop(
			1.0,
			&with_alpha(&material.emissive, 0.85 + material.emissive_intensity),
		);
		ctx.begin_path();
		let _ = ctx.arc(cx, cy, radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
	}
}

fn draw_outlines(
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
	globe: &Globe,
	camera: &OrbitCamera,
) {
	ctx.set_stroke_style_str(OUTLINE_COLOR);
	ctx.set_line_width(1.0);
	for ring in globe.outlines() {
		ctx.begin_path();
		let mut pen_down = false;
		for &(lat, lng) in &ring.0 {
			let p = Vec3::from_lat_lng(lat, lng, GLOBE_RADIUS);
			match camera.project(p, width, height) {
				Some((x, y)) if camera.facing(p) => {
					if pen_down {
						ctx.line_to(x, y);
					} else {
						ctx.move_to(x, y);
						pen_down = true;
					}
				}
				_ => pen_down = false,
			}
		}
		ctx.stroke();
	}
}

/// Sampled screen-space polyline for one arc, `None` where the globe
/// occludes it.
fn sample_arc(
	arc: &ArcDatum,
	camera: &OrbitCamera,
	width: f64,
	height: f64,
) -> Vec<Option<(f64, f64)>> {
	let a = Vec3::from_lat_lng(arc.start.0, arc.start.1, 1.0);
	let b = Vec3::from_lat_lng(arc.end.0, arc.end.1, 1.0);
	(0..=ARC_SEGMENTS)
		.map(|i| {
			let t = i as f64 / ARC_SEGMENTS as f64;
			let r = GLOBE_RADIUS * (1.0 + arc.alt * (PI * t).sin());
			let p = slerp(a, b, t) * r;
			if camera.facing(p) {
				camera.project(p, width, height)
			} else {
				None
			}
		})
		.collect()
}

fn polyline_length(points: &[Option<(f64, f64)>]) -> f64 {
	points
		.windows(2)
		.filter_map(|pair| match (pair[0], pair[1]) {
			(Some((x1, y1)), Some((x2, y2))) => Some(((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()),
			_ => None,
		})
		.sum()
}

fn draw_arcs(
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
	globe: &Globe,
	camera: &OrbitCamera,
) {
	let style: &ArcStyle = globe.arc_style();
	for arc in globe.arcs() {
		let points = sample_arc(arc, camera, width, height);
		let length = polyline_length(&points);
		if length < 1.0 {
			continue;
		}

		let dash = (style.dash_length * length).max(1.0);
		let gap = (style.dash_gap * length).max(1.0);
		let period = dash + gap;
		let phase = (globe.flow_ms() % style.animate_ms) / style.animate_ms;
		let dash_offset = -(phase + (style.initial_gap)(arc)) * period;

		ctx.set_stroke_style_str(&(style.color)(arc));
		ctx.set_line_width((style.stroke)(arc) * ARC_STROKE_SCALE);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		ctx.begin_path();
		let mut pen_down = false;
		for point in &points {
			match point {
				Some((x, y)) => {
					if pen_down {
						ctx.line_to(*x, *y);
					} else {
						ctx.move_to(*x, *y);
						pen_down = true;
					}
				}
				None => pen_down = false,
			}
		}
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}
