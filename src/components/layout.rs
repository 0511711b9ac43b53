use leptos::prelude::*;
use leptos_router::components::{A, Outlet, Redirect};
use leptos_router::hooks::{use_location, use_navigate};
use log::info;

use crate::api::LOGIN_PATH;
use crate::components::account::{ChangeEmailModal, ChangePasswordModal};
use crate::capability::Role;
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
	pub name: &'static str,
	pub path: &'static str,
}

const HOME: NavItem = NavItem {
	name: "Home",
	path: "/dashboard/home",
};
const FAMILY_TREE: NavItem = NavItem {
	name: "Family Tree",
	path: "/dashboard/family-tree",
};
const ADD_MEMBER: NavItem = NavItem {
	name: "Add Member",
	path: "/dashboard/new-member",
};
const MANAGE_USERS: NavItem = NavItem {
	name: "Manage Users",
	path: "/dashboard/manage-users",
};

/// Sidebar entries visible to `role`.
pub fn nav_items(role: Role) -> Vec<NavItem> {
	let mut items = vec![HOME, FAMILY_TREE];
	if role.can_edit() {
		items.push(ADD_MEMBER);
	}
	if role.can_manage_users() {
		items.push(MANAGE_USERS);
	}
	items
}

/// Sidebar, header and the routed page. Signed-out visitors go to the login page.
#[component]
pub fn DashboardLayout() -> impl IntoView {
	let session = expect_context::<Session>();
	let signed_in = {
		let session = session.clone();
		move || session.is_authenticated()
	};

	view! {
		<Show when=signed_in fallback=|| view! { <Redirect path=LOGIN_PATH /> }>
			<div class="dashboard">
				<Sidebar />
				<div class="dashboard-main">
					<Header />
					<main class="dashboard-content">
						<Outlet />
					</main>
				</div>
			</div>
		</Show>
	}
}

#[component]
fn Sidebar() -> impl IntoView {
	let session = expect_context::<Session>();
	let pathname = use_location().pathname;
	let items = move || nav_items(session.role());

	view! {
		<aside class="sidebar">
			<div class="sidebar-brand">"Family Tree"</div>
			<nav>
				<ul>
					{move || {
						items()
							.into_iter()
							.map(|item| {
								let active = move || pathname.with(|p| p.starts_with(item.path));
								view! {
									<li class:active=active>
										<A href=item.path>{item.name}</A>
									</li>
								}
							})
							.collect_view()
					}}
				</ul>
			</nav>
		</aside>
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AccountDialog {
	Email,
	Password,
}

#[component]
fn Header() -> impl IntoView {
	let session = expect_context::<Session>();
	let (name_session, email_session, role_session, dialog_session) =
		(session.clone(), session.clone(), session.clone(), session.clone());
	let navigate = use_navigate();
	let menu_open = RwSignal::new(false);
	let dialog = RwSignal::new(None::<AccountDialog>);

	let open = move |which: AccountDialog| {
		menu_open.set(false);
		dialog.set(Some(which));
	};
	let close = Callback::new(move |_: ()| dialog.set(None));

	let logout = move |_| {
		info!("signing out");
		session.clear();
		navigate(LOGIN_PATH, Default::default());
	};

	view! {
		<header class="dashboard-header">
			<div class="user-menu">
				<button type="button" class="user-info" on:click=move |_| menu_open.update(|o| *o = !*o)>
					<span class="user-name">
						{move || {
							name_session.auth().map(|a| a.name).unwrap_or_else(|| "User".to_string())
						}}
					</span>
					<span class="user-role">"Role: " {move || role_session.role().label()}</span>
				</button>
				<Show when=move || menu_open.get()>
					<div class="user-dropdown">
						<p class="muted">
							{
								let email_session = email_session.clone();
								move || email_session.auth().map(|a| a.email).unwrap_or_default()
							}
						</p>
						<button type="button" on:click=move |_| open(AccountDialog::Email)>
							"Change Email"
						</button>
						<button type="button" on:click=move |_| open(AccountDialog::Password)>
							"Change Password"
						</button>
					</div>
				</Show>
			</div>
			<button type="button" class="logout" on:click=logout>
				"Logout"
			</button>
			{move || {
				dialog.get().map(|which| match which {
					AccountDialog::Email => {
						let current = dialog_session.auth_untracked().map(|a| a.email).unwrap_or_default();
						view! { <ChangeEmailModal current_email=current on_close=close /> }.into_any()
					}
					AccountDialog::Password => {
						view! { <ChangePasswordModal on_close=close /> }.into_any()
					}
				})
			}}
		</header>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn names(role: Role) -> Vec<&'static str> {
		nav_items(role).into_iter().map(|i| i.name).collect()
	}

	#[test]
	fn viewers_only_browse() {
		assert_eq!(names(Role::Viewer), ["Home", "Family Tree"]);
	}

	#[test]
	fn editors_can_add_members() {
		assert_eq!(names(Role::SubAdmin), ["Home", "Family Tree", "Add Member"]);
	}

	#[test]
	fn admins_see_everything() {
		assert_eq!(
			names(Role::Admin),
			["Home", "Family Tree", "Add Member", "Manage Users"]
		);
	}
}
