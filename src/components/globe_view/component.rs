use leptos::prelude::*;

use crate::store::use_store;

use super::session::RenderSession;

/// The globe region. Owns one [`RenderSession`] at a time: a session is
/// started once the mounting div exists, torn down and rebuilt whenever the
/// visible-set cardinality changes, and disposed on unmount. Deep content
/// changes with identical cardinality do not restart the session.
#[component]
pub fn GlobeView() -> impl IntoView {
	let store = use_store();
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let session: StoredValue<Option<RenderSession>, LocalStorage> = StoredValue::new_local(None);

	Effect::new(move |_| {
		let _cardinality = store.cardinality.get();
		let Some(container) = container_ref.get() else {
			return;
		};
		session.update_value(|slot| {
			if let Some(previous) = slot.take() {
				previous.dispose();
			}
			let snapshot = store.visible.get_untracked();
			*slot = Some(RenderSession::start(container.into(), snapshot));
		});
	});

	on_cleanup(move || {
		session.update_value(|slot| {
			if let Some(active) = slot.take() {
				active.dispose();
			}
		});
	});

	view! { <div node_ref=container_ref class="globe-mount"></div> }
}
