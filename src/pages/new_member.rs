use std::time::Duration;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use log::{info, warn};

use super::AccessDenied;
use crate::api::ApiClient;
use crate::components::debounce::Debouncer;
use crate::components::person_form::{FormMode, PersonFields, PersonForm};
use crate::session::Session;

const ADDED: &str = "Family member added successfully!";
const SUCCESS_VISIBLE: Duration = Duration::from_secs(5);

/// Add-member form for editors.
#[component]
pub fn NewMemberPage() -> impl IntoView {
	let role = expect_context::<Session>().role_untracked();
	if !role.can_edit() {
		return view! {
			<AccessDenied message="You don't have permission to add family members. Only admins and sub-admins can perform this action." />
		}
		.into_any();
	}
	view! { <NewMemberForm /> }.into_any()
}

#[component]
fn NewMemberForm() -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let navigate = use_navigate();
	let form = RwSignal::new(PersonForm::default());
	let error = RwSignal::new(None::<String>);
	let success = RwSignal::new(None::<&'static str>);
	let saving = RwSignal::new(false);
	let success_timer = Debouncer::new(SUCCESS_VISIBLE);

	let spouse_client = client.clone();
	let spouses = LocalResource::new(move || {
		let client = spouse_client.clone();
		async move { client.eligible_spouses().await }
	});
	let parent_client = client.clone();
	let parents = LocalResource::new(move || {
		let client = parent_client.clone();
		async move { client.eligible_parents().await }
	});
	let spouse_list = Signal::derive(move || {
		spouses
			.get()
			.and_then(|r| r.inspect_err(|e| warn!("eligible spouses unavailable: {e}")).ok())
			.unwrap_or_default()
	});
	let parent_list = Signal::derive(move || {
		parents
			.get()
			.and_then(|r| r.inspect_err(|e| warn!("eligible parents unavailable: {e}")).ok())
			.unwrap_or_default()
	});

	let reset = move || {
		form.set(PersonForm::default());
		error.set(None);
	};

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let current = form.get_untracked();
		if let Err(e) = current.validate(FormMode::Create) {
			error.set(Some(e.to_string()));
			return;
		}
		error.set(None);
		saving.set(true);
		let client = client.clone();
		spawn_local(async move {
			match client.create_person(&current.to_payload()).await {
				Ok(_) => {
					info!("added {}", current.name);
					reset();
					success.set(Some(ADDED));
					success_timer.schedule(move || success.set(None));
					parents.refetch();
					spouses.refetch();
				}
				Err(e) => error.set(Some(e.user_message())),
			}
			saving.set(false);
		});
	};

	let view_tree = move |_| navigate("/dashboard/family-tree", Default::default());

	view! {
		<div class="new-member">
			<h1>"Add New Family Member"</h1>
			{move || error.get().map(|e| view! { <p class="form-error">{e}</p> })}
			{move || {
				success
					.get()
					.map(|msg| {
						view! {
							<div class="form-success">
								<p>{msg}</p>
								<button
									type="button"
									on:click=move |_| {
										success_timer.cancel();
										success.set(None);
										reset();
									}
								>
									"Add Another"
								</button>
								<button type="button" on:click=view_tree.clone()>
									"View Tree"
								</button>
							</div>
						}
					})
			}}
			<form class="person-form" on:submit=on_submit>
				<PersonFields
					form=form
					mode=FormMode::Create
					spouses=spouse_list
					parents=parent_list
				/>
				<div class="form-actions">
					<button type="submit" class="primary" disabled=move || saving.get()>
						{move || if saving.get() { "Adding..." } else { "Add Member" }}
					</button>
				</div>
			</form>
		</div>
	}
}
