use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use log::{info, warn};

use crate::api::{ApiClient, Credentials};
use crate::error::ApiError;

const HOME_PATH: &str = "/dashboard/home";

fn login_message(error: &ApiError) -> String {
	match error {
		ApiError::Server { message, .. } => message.clone(),
		_ => "An error occurred. Please try again.".to_string(),
	}
}

/// Email and password sign-in.
#[component]
pub fn LoginPage() -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let navigate = use_navigate();
	let email = RwSignal::new(String::new());
	let password = RwSignal::new(String::new());
	let error = RwSignal::new(None::<String>);
	let loading = RwSignal::new(false);

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		error.set(None);
		loading.set(true);
		let credentials = Credentials {
			email: email.get_untracked(),
			password: password.get_untracked(),
		};
		let (client, navigate) = (client.clone(), navigate.clone());
		spawn_local(async move {
			match client.login(&credentials).await {
				Ok(auth) => {
					info!("signed in as {}", auth.email);
					if let Err(e) = client.session().save(auth) {
						warn!("session not persisted: {e}");
					}
					navigate(HOME_PATH, Default::default());
				}
				Err(e) => {
					warn!("login failed: {e}");
					error.set(Some(login_message(&e)));
				}
			}
			loading.set(false);
		});
	};

	view! {
		<div class="auth-page">
			<div class="auth-card">
				<h1>"Welcome Back"</h1>
				<p class="muted">"Sign in to your account to continue"</p>
				{move || error.get().map(|e| view! { <p class="form-error">{e}</p> })}
				<form on:submit=on_submit>
					<label class="form-field">
						"Email"
						<input
							type="email"
							required
							placeholder="info@gmail.com"
							prop:value=move || email.get()
							on:input=move |ev| email.set(event_target_value(&ev))
						/>
					</label>
					<label class="form-field">
						"Password"
						<input
							type="password"
							required
							placeholder="Enter your password"
							prop:value=move || password.get()
							on:input=move |ev| password.set(event_target_value(&ev))
						/>
					</label>
					<button type="submit" class="primary" disabled=move || loading.get()>
						{move || if loading.get() { "Signing in..." } else { "Sign in" }}
					</button>
				</form>
			</div>
		</div>
	}
}
