use leptos::prelude::*;

use crate::components::control_panel::ControlPanel;
use crate::components::globe_view::GlobeView;

/// Default Home Page: a fixed header carrying the filter controls above the
/// globe region, which takes the rest of the viewport.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<main class="page">
				<header class="page-header">
					<h2>"Cloud Region Latency Globe"</h2>
					<ControlPanel />
				</header>
				<div class="globe-region">
					<GlobeView />
				</div>
			</main>
		</ErrorBoundary>
	}
}
