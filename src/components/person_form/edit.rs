use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};

use super::fields::PersonFields;
use super::model::{FormMode, PersonForm, spouse_options};
use crate::api::{ApiClient, ParentCandidate, PersonRef};

/// Modal editor for one person. Loads the stored record, then PUTs the changes.
#[component]
pub fn EditPersonOverlay(
	person_id: String,
	on_saved: Callback<()>,
	on_cancel: Callback<()>,
) -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let form = RwSignal::new(PersonForm::default());
	let spouses = RwSignal::new(Vec::<PersonRef>::new());
	let parents = RwSignal::new(Vec::<ParentCandidate>::new());
	let error = RwSignal::new(None::<String>);
	let saving = RwSignal::new(false);

	let (loader, id) = (client.clone(), person_id.clone());
	spawn_local(async move {
		match loader.person(&id).await {
			Ok(record) => {
				form.set(PersonForm::from_record(&record));
				match loader.eligible_spouses().await {
					Ok(found) => spouses.set(spouse_options(found, record.spouse_id.as_ref())),
					Err(e) => warn!("eligible spouses unavailable: {e}"),
				}
			}
			Err(e) => {
				warn!("could not load person {id}: {e}");
				error.set(Some(e.user_message()));
			}
		}
		match loader.eligible_parents().await {
			Ok(found) => parents.set(found),
			Err(e) => warn!("eligible parents unavailable: {e}"),
		}
	});

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let current = form.get_untracked();
		if let Err(e) = current.validate(FormMode::Edit) {
			error.set(Some(e.to_string()));
			return;
		}
		error.set(None);
		saving.set(true);
		let (client, id) = (client.clone(), person_id.clone());
		spawn_local(async move {
			let result = client.update_person(&id, &current.to_payload()).await;
			saving.set(false);
			match result {
				Ok(_) => {
					info!("updated person {id}");
					on_saved.run(());
				}
				Err(e) => error.set(Some(e.user_message())),
			}
		});
	};

	view! {
		<div class="modal-backdrop">
			<div class="modal" role="dialog">
				<div class="modal-header">
					<h2>"Edit Person"</h2>
					<button
						type="button"
						class="modal-close"
						aria-label="Close"
						on:click=move |_| on_cancel.run(())
					>
						"×"
					</button>
				</div>
				<form class="person-form" on:submit=on_submit>
					<PersonFields
						form=form
						mode=FormMode::Edit
						spouses=spouses
						parents=parents
					/>
					{move || error.get().map(|e| view! { <p class="form-error">{e}</p> })}
					<div class="form-actions">
						<button type="button" on:click=move |_| on_cancel.run(())>
							"Cancel"
						</button>
						<button type="submit" class="primary" disabled=move || saving.get()>
							{move || if saving.get() { "Saving..." } else { "Save" }}
						</button>
					</div>
				</form>
			</div>
		</div>
	}
}
