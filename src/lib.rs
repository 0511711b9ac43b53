//! Leptos client-side family tree dashboard: wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod api;
mod capability;
mod components;
mod config;
mod dates;
mod error;
mod pages;
mod session;

use crate::api::ApiClient;
use crate::components::layout::DashboardLayout;
use crate::config::ApiConfig;
use crate::session::{LocalStorageStore, Session};

// Top-Level pages
use crate::pages::family_tree::FamilyTreePage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::manage_users::ManageUsersPage;
use crate::pages::new_member::NewMemberPage;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Creates the session and API client once and routes between the pages.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = ApiConfig::from_build_env();
	info!(
		"backend at {}, edit success policy {:?}",
		config.base_url, config.edit_success
	);
	let session = Session::new(LocalStorageStore);
	session.load();
	provide_context(session.clone());
	provide_context(ApiClient::new(config, session));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Family Tree Dashboard" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=|| view! { <Redirect path="/dashboard/home" /> } />
				<Route path=path!("/auth/login") view=LoginPage />
				<ParentRoute path=path!("/dashboard") view=DashboardLayout>
					<Route path=path!("") view=|| view! { <Redirect path="/dashboard/home" /> } />
					<Route path=path!("home") view=HomePage />
					<Route path=path!("family-tree") view=FamilyTreePage />
					<Route path=path!("new-member") view=NewMemberPage />
					<Route path=path!("manage-users") view=ManageUsersPage />
				</ParentRoute>
			</Routes>
		</Router>
	}
}
