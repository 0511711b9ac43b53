use std::collections::HashSet;

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use crate::api::ApiClient;
use crate::components::debounce::Debouncer;

pub const MIN_QUERY_LEN: usize = 2;
pub const MAX_SUGGESTIONS: usize = 8;
pub const FALLBACK_OCCUPATIONS: [&str; 5] = [
	"Software Engineer",
	"Teacher",
	"Doctor",
	"Accountant",
	"Graphic Designer",
];

/// Backend matches first, then fallback entries containing the query.
/// Case-insensitive duplicates keep their first spelling.
pub fn merge_suggestions(query: &str, backend: Vec<String>) -> Vec<String> {
	if query.chars().count() < MIN_QUERY_LEN {
		return Vec::new();
	}
	let needle = query.to_lowercase();
	let fallback = FALLBACK_OCCUPATIONS
		.iter()
		.filter(|o| o.to_lowercase().contains(&needle))
		.map(|o| o.to_string());

	let mut seen = HashSet::new();
	backend
		.into_iter()
		.chain(fallback)
		.filter(|o| !o.trim().is_empty() && seen.insert(o.to_lowercase()))
		.take(MAX_SUGGESTIONS)
		.collect()
}

/// Free-text occupation with debounced suggestions underneath.
#[component]
pub fn OccupationInput(
	#[prop(into)] value: Signal<String>,
	#[prop(into)] on_change: Callback<String>,
) -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let search = Debouncer::new(client.config().occupation_debounce);
	let suggestions = RwSignal::new(Vec::<String>::new());
	let loading = RwSignal::new(false);
	let open = RwSignal::new(false);

	let on_input = move |ev: ev::Event| {
		let query = event_target_value(&ev);
		on_change.run(query.clone());
		open.set(true);
		if query.chars().count() < MIN_QUERY_LEN {
			search.cancel();
			suggestions.set(Vec::new());
			return;
		}
		let client = client.clone();
		search.schedule(move || {
			loading.set(true);
			spawn_local(async move {
				let backend = match client.occupations(&query).await {
					Ok(found) => found,
					Err(e) => {
						warn!("occupation search failed: {e}");
						Vec::new()
					}
				};
				suggestions.set(merge_suggestions(&query, backend));
				loading.set(false);
			});
		});
	};

	let pick = move |choice: String| {
		on_change.run(choice);
		open.set(false);
		suggestions.set(Vec::new());
	};

	view! {
		<div class="occupation-input">
			<input
				type="text"
				placeholder="Occupation"
				autocomplete="off"
				prop:value=move || value.get()
				on:input=on_input
				on:focus=move |_| open.set(true)
			/>
			<Show when=move || open.get() && value.with(|v| v.chars().count() >= MIN_QUERY_LEN)>
				<ul class="suggestions">
					<Show when=move || loading.get()>
						<li class="suggestion-status">"Searching..."</li>
					</Show>
					<Show when=move || !loading.get() && suggestions.with(Vec::is_empty)>
						<li class="suggestion-status">"No suggestions found"</li>
					</Show>
					<For
						each=move || suggestions.get()
						key=|s| s.clone()
						children=move |s| {
							let label = s.clone();
							view! {
								<li>
									<button type="button" on:click=move |_| pick(s.clone())>
										{label}
									</button>
								</li>
							}
						}
					/>
				</ul>
			</Show>
		</div>
	}
}
