pub mod family_tree;
pub mod home;
pub mod login;
pub mod manage_users;
pub mod new_member;
pub mod not_found;

use leptos::prelude::*;

/// Shown instead of a page the current role may not use.
#[component]
pub fn AccessDenied(message: &'static str) -> impl IntoView {
	view! {
		<div class="access-denied">
			<h1>"Access Denied"</h1>
			<p class="muted">{message}</p>
		</div>
	}
}
