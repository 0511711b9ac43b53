use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};
use web_sys::HtmlInputElement;

use super::model::{
	COUNTRY_CODES, Field, FormMode, PersonForm, check_photo_size, parent_label,
};
use super::occupations::OccupationInput;
use crate::api::{ApiClient, ParentCandidate, PersonRef};
use crate::dates;

#[component]
fn TextField(
	form: RwSignal<PersonForm>,
	field: Field,
	label: &'static str,
	#[prop(default = "text")] kind: &'static str,
	#[prop(optional)] required: bool,
) -> impl IntoView {
	view! {
		<label class="form-field">
			{label}
			<input
				type=kind
				placeholder=label
				required=required
				prop:value=move || form.with(|f| f.get(field).to_string())
				on:input=move |ev| form.update(|f| f.set(field, event_target_value(&ev)))
			/>
		</label>
	}
}

/// Uploads a picked image and stores its URL on the form.
#[component]
fn PhotoUpload(form: RwSignal<PersonForm>) -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let uploading = RwSignal::new(false);
	let upload_error = RwSignal::new(None::<String>);

	let on_change = move |ev: ev::Event| {
		let input: HtmlInputElement = event_target(&ev);
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};
		if let Err(e) = check_photo_size(file.size()) {
			upload_error.set(Some(e.to_string()));
			return;
		}
		upload_error.set(None);
		uploading.set(true);
		let client = client.clone();
		spawn_local(async move {
			match client.upload_photo(&file).await {
				Ok(url) => {
					info!("photo uploaded to {url}");
					form.update(|f| f.photo = url);
				}
				Err(e) => {
					warn!("photo upload failed: {e}");
					upload_error.set(Some("Failed to upload image".to_string()));
				}
			}
			uploading.set(false);
		});
	};

	view! {
		<div class="form-field photo-upload">
			"Photo"
			<Show when=move || form.with(|f| !f.photo.is_empty())>
				<img class="photo-preview" src=move || form.with(|f| f.photo.clone()) alt="Uploaded photo" />
			</Show>
			<input type="file" accept="image/*" on:change=on_change />
			<Show when=move || uploading.get()>
				<span class="muted">"Uploading image..."</span>
			</Show>
			{move || upload_error.get().map(|e| view! { <p class="form-error">{e}</p> })}
		</div>
	}
}

/// Every person field. Place of birth is required only when creating.
#[component]
pub fn PersonFields(
	form: RwSignal<PersonForm>,
	mode: FormMode,
	#[prop(into)] spouses: Signal<Vec<PersonRef>>,
	#[prop(into)] parents: Signal<Vec<ParentCandidate>>,
) -> impl IntoView {
	let today = dates::today();
	let spouse_allowed = Memo::new(move |_| form.with(|f| f.offers_spouse(mode, today)));

	// New minors cannot keep a spouse selection.
	Effect::new(move |_| {
		if !spouse_allowed.get() && form.with_untracked(|f| !f.spouse_id.is_empty()) {
			form.update(|f| f.spouse_id.clear());
		}
	});

	let on_parent = move |ev: ev::Event| {
		let id = event_target_value(&ev);
		let picked = parents.with_untracked(|list| list.iter().find(|p| p.id == id).cloned());
		form.update(|f| f.select_parent(picked.as_ref()));
	};

	view! {
		<div class="person-fields">
			<TextField form=form field=Field::Name label="Name" required=true />
			<label class="form-field">
				"Gender"
				<select
					required
					prop:value=move || form.with(|f| f.gender.clone())
					on:change=move |ev| form.update(|f| f.set(Field::Gender, event_target_value(&ev)))
				>
					<option value="">"Gender"</option>
					<option value="Male">"Male"</option>
					<option value="Female">"Female"</option>
					<option value="Other">"Other"</option>
				</select>
			</label>
			<TextField form=form field=Field::DateOfBirth label="Date of Birth" kind="date" required=true />
			<TextField
				form=form
				field=Field::PlaceOfBirth
				label="Place of Birth"
				required={mode == FormMode::Create}
			/>
			<label class="form-field">
				"Occupation"
				<OccupationInput
					value=Signal::derive(move || form.with(|f| f.occupation.clone()))
					on_change=move |v: String| form.update(|f| f.set(Field::Occupation, v))
				/>
			</label>
			<TextField form=form field=Field::CurrentAddress label="Current Address" />
			<label class="form-field">
				"Country Code"
				<select
					prop:value=move || form.with(|f| f.country_code.clone())
					on:change=move |ev| form.update(|f| f.set(Field::CountryCode, event_target_value(&ev)))
				>
					{COUNTRY_CODES
						.iter()
						.map(|c| {
							view! {
								<option value=c.dial_code>{format!("{} ({})", c.name, c.dial_code)}</option>
							}
						})
						.collect_view()}
				</select>
			</label>
			<TextField form=form field=Field::ContactNumber label="Contact Number" kind="tel" />
			<TextField form=form field=Field::Email label="Email" kind="email" />
			<label class="form-field">
				"Parents"
				<select
					prop:value=move || form.with(|f| f.parent_ids.first().cloned().unwrap_or_default())
					on:change=on_parent
				>
					<option value="">"Select parent(s) (optional)"</option>
					<For
						each=move || parents.get()
						key=|p| p.id.clone()
						children=|p| {
							let label = parent_label(&p);
							view! { <option value=p.id>{label}</option> }
						}
					/>
				</select>
			</label>
			<label class="form-field">
				"Spouse"
				<Show
					when=move || spouse_allowed.get()
					fallback=|| view! { <p class="muted">"Person must be 18+ to select a spouse"</p> }
				>
					<select
						prop:value=move || form.with(|f| f.spouse_id.clone())
						on:change=move |ev| form.update(|f| f.set(Field::SpouseId, event_target_value(&ev)))
					>
						<option value="">"Select spouse (optional)"</option>
						<For
							each=move || spouses.get()
							key=|s| s.id.clone()
							children=|s| view! { <option value=s.id>{s.name}</option> }
						/>
					</select>
				</Show>
			</label>
			<PhotoUpload form=form />
		</div>
	}
}
