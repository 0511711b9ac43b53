//! Account dialogs opened from the dashboard header.

use std::time::Duration;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::info;

use crate::api::{ApiClient, PasswordChange};
use crate::components::debounce::Debouncer;
use crate::error::FormError;

/// How long a success message stays before the dialog closes itself.
const CLOSE_AFTER_SUCCESS: Duration = Duration::from_secs(1);

/// Local check before a password change is sent.
pub fn check_passwords(change: &PasswordChange) -> Result<(), FormError> {
	if change.new_password != change.confirm_password {
		return Err(FormError::PasswordMismatch);
	}
	Ok(())
}

#[component]
fn Dialog(title: &'static str, on_close: Callback<()>, children: Children) -> impl IntoView {
	view! {
		<div class="modal-backdrop">
			<div class="modal account-modal" role="dialog">
				<div class="modal-header">
					<h2>{title}</h2>
					<button
						type="button"
						class="modal-close"
						aria-label="Close"
						on:click=move |_| on_close.run(())
					>
						"×"
					</button>
				</div>
				{children()}
			</div>
		</div>
	}
}

#[component]
fn Feedback(error: RwSignal<Option<String>>, success: RwSignal<Option<&'static str>>) -> impl IntoView {
	view! {
		{move || error.get().map(|e| view! { <p class="form-error">{e}</p> })}
		{move || success.get().map(|s| view! { <p class="form-success">{s}</p> })}
	}
}

#[component]
pub fn ChangeEmailModal(current_email: String, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let email = RwSignal::new(current_email);
	let error = RwSignal::new(None::<String>);
	let success = RwSignal::new(None::<&'static str>);
	let saving = RwSignal::new(false);
	let closer = Debouncer::new(CLOSE_AFTER_SUCCESS);

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		error.set(None);
		success.set(None);
		saving.set(true);
		let client = client.clone();
		let address = email.get_untracked();
		spawn_local(async move {
			match client.change_email(&address).await {
				Ok(_) => {
					info!("account email changed");
					success.set(Some("Email updated successfully"));
					closer.schedule(move || on_close.run(()));
				}
				Err(e) => error.set(Some(e.user_message())),
			}
			saving.set(false);
		});
	};

	view! {
		<Dialog title="Change Email" on_close=on_close>
			<form class="account-form" on:submit=on_submit>
				<input
					type="email"
					required
					prop:value=move || email.get()
					on:input=move |ev| email.set(event_target_value(&ev))
				/>
				<Feedback error=error success=success />
				<div class="form-actions">
					<button type="button" on:click=move |_| on_close.run(())>
						"Cancel"
					</button>
					<button type="submit" class="primary" disabled=move || saving.get()>
						{move || if saving.get() { "Saving..." } else { "Save" }}
					</button>
				</div>
			</form>
		</Dialog>
	}
}

#[component]
pub fn ChangePasswordModal(#[prop(into)] on_close: Callback<()>) -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let change = RwSignal::new(PasswordChange::default());
	let error = RwSignal::new(None::<String>);
	let success = RwSignal::new(None::<&'static str>);
	let saving = RwSignal::new(false);
	let closer = Debouncer::new(CLOSE_AFTER_SUCCESS);

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		error.set(None);
		success.set(None);
		let current = change.get_untracked();
		if let Err(e) = check_passwords(&current) {
			error.set(Some(e.to_string()));
			return;
		}
		saving.set(true);
		let client = client.clone();
		spawn_local(async move {
			match client.change_password(&current).await {
				Ok(_) => {
					info!("account password changed");
					success.set(Some("Password updated successfully"));
					closer.schedule(move || on_close.run(()));
				}
				Err(e) => error.set(Some(e.user_message())),
			}
			saving.set(false);
		});
	};

	view! {
		<Dialog title="Change Password" on_close=on_close>
			<form class="account-form" on:submit=on_submit>
				<input
					type="password"
					required
					placeholder="Previous password"
					prop:value=move || change.with(|c| c.previous_password.clone())
					on:input=move |ev| change.update(|c| c.previous_password = event_target_value(&ev))
				/>
				<input
					type="password"
					required
					placeholder="New password"
					prop:value=move || change.with(|c| c.new_password.clone())
					on:input=move |ev| change.update(|c| c.new_password = event_target_value(&ev))
				/>
				<input
					type="password"
					required
					placeholder="Confirm new password"
					prop:value=move || change.with(|c| c.confirm_password.clone())
					on:input=move |ev| change.update(|c| c.confirm_password = event_target_value(&ev))
				/>
				<Feedback error=error success=success />
				<div class="form-actions">
					<button type="button" on:click=move |_| on_close.run(())>
						"Cancel"
					</button>
					<button type="submit" class="primary" disabled=move || saving.get()>
						{move || if saving.get() { "Saving..." } else { "Save" }}
					</button>
				</div>
			</form>
		</Dialog>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn change(new: &str, confirm: &str) -> PasswordChange {
		PasswordChange {
			previous_password: "old-secret".into(),
			new_password: new.into(),
			confirm_password: confirm.into(),
		}
	}

	#[test]
	fn mismatched_passwords_are_refused() {
		assert_eq!(
			check_passwords(&change("hunter2", "hunter3")),
			Err(FormError::PasswordMismatch)
		);
	}

	#[test]
	fn matching_passwords_pass() {
		assert_eq!(check_passwords(&change("hunter2", "hunter2")), Ok(()));
	}

	#[test]
	fn mismatch_message_is_user_facing() {
		assert_eq!(
			FormError::PasswordMismatch.to_string(),
			"New password and confirm password do not match"
		);
	}
}
