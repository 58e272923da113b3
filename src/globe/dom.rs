use anyhow::anyhow;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, EventTarget};

/// Pairs `addEventListener` with its removal so a listener cannot outlive
/// whatever installed it. Dropping the guard detaches the listener.
pub struct ListenerGuard {
	target: EventTarget,
	event: &'static str,
	closure: Closure<dyn FnMut(Event)>,
}

impl ListenerGuard {
	pub fn listen(
		target: &EventTarget,
		event: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Self {
		let closure: Closure<dyn FnMut(Event)> = Closure::new(handler);
		let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
		Self {
			target: target.clone(),
			event,
			closure,
		}
	}
}

impl Drop for ListenerGuard {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
	}
}

/// Resolves on the next animation frame. This is the readiness handshake
/// session initialization awaits before allocating rendering resources;
/// teardown may happen while a caller is parked here.
pub async fn ready() {
	let promise = js_sys::Promise::new(&mut |resolve, _reject| {
		let _ = web_sys::window()
			.unwrap()
			.request_animation_frame(&resolve);
	});
	let _ = JsFuture::from(promise).await;
}

/// Bridge a JS error value into `anyhow` for the init path.
pub(crate) fn js_err(value: JsValue) -> anyhow::Error {
	anyhow!("{value:?}")
}
