use leptos::prelude::*;

use crate::store::{FilterState, use_store};

/// The provider filter panel: three checkboxes that always re-submit the
/// whole [`FilterState`] in one apply, never a single flag on its own. The
/// effect below also fires once on mount, seeding the derived sets with the
/// default filter (a no-op when the store already holds it).
#[component]
pub fn ControlPanel() -> impl IntoView {
	let store = use_store();
	let current = store.filters.get_untracked();
	let aws = RwSignal::new(current.aws);
	let azure = RwSignal::new(current.azure);
	let gcp = RwSignal::new(current.gcp);

	Effect::new(move |_| {
		store.apply(FilterState {
			aws: aws.get(),
			azure: azure.get(),
			gcp: gcp.get(),
		});
	});

	view! {
		<div class="control-panel">
			<div class="control-panel-title">"Filters"</div>
			<div class="filter-group">
				<label class="filter-option">
					<input
						type="checkbox"
						aria-label="AWS"
						prop:checked=move || aws.get()
						on:change=move |ev| aws.set(event_target_checked(&ev))
					/>
					<span class="filter-dot dot-aws"></span>
					<span>"AWS"</span>
				</label>
				<label class="filter-option">
					<input
						type="checkbox"
						aria-label="Azure"
						prop:checked=move || azure.get()
						on:change=move |ev| azure.set(event_target_checked(&ev))
					/>
					<span class="filter-dot dot-azure"></span>
					<span>"Azure"</span>
				</label>
				<label class="filter-option">
					<input
						type="checkbox"
						aria-label="GCP"
						prop:checked=move || gcp.get()
						on:change=move |ev| gcp.set(event_target_checked(&ev))
					/>
					<span class="filter-dot dot-gcp"></span>
					<span>"GCP"</span>
				</label>
			</div>
		</div>
	}
}
