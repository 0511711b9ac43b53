use std::time::Duration;

use leptos::prelude::*;
use log::warn;

/// Last-write-wins timer: scheduling again cancels whatever was pending.
#[derive(Clone, Copy)]
pub struct Debouncer {
	handle: StoredValue<Option<TimeoutHandle>>,
	delay: Duration,
}

impl Debouncer {
	pub fn new(delay: Duration) -> Self {
		Self {
			handle: StoredValue::new(None),
			delay,
		}
	}

	pub fn schedule(&self, f: impl FnOnce() + 'static) {
		self.cancel();
		match set_timeout_with_handle(f, self.delay) {
			Ok(handle) => self.handle.set_value(Some(handle)),
			Err(e) => warn!("could not start timer: {e:?}"),
		}
	}

	pub fn cancel(&self) {
		if let Some(handle) = self.handle.try_update_value(Option::take).flatten() {
			handle.clear();
		}
	}
}
