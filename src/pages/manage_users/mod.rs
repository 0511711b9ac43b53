mod guards;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};

use self::guards::{check_person_deletion, check_removal, check_role_change};
use super::AccessDenied;
use crate::api::{ApiClient, FamilyMember, PersonDetails};
use crate::capability::Role;
use crate::dates::{format_birth_date, parse_birth_date};
use crate::session::{AuthData, Session};

fn confirm(message: &str) -> bool {
	web_sys::window()
		.and_then(|w| w.confirm_with_message(message).ok())
		.unwrap_or(false)
}

/// Account roles and tree membership, for admins only.
#[component]
pub fn ManageUsersPage() -> impl IntoView {
	let session = expect_context::<Session>();
	match session.auth_untracked() {
		Some(me) if Role::resolve(Some(&me)).can_manage_users() => {
			view! { <ManageUsers me=me /> }.into_any()
		}
		_ => view! {
			<AccessDenied message="You don't have permission to manage users. Only admins can perform this action." />
		}
		.into_any(),
	}
}

#[component]
fn ManageUsers(me: AuthData) -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let error = RwSignal::new(None::<String>);
	let success = RwSignal::new(None::<&'static str>);
	let me = StoredValue::new(me);

	let members_client = client.clone();
	let members = LocalResource::new(move || {
		let client = members_client.clone();
		async move { client.family_members().await }
	});
	let persons_client = client.clone();
	let persons = LocalResource::new(move || {
		let client = persons_client.clone();
		async move { client.all_persons().await }
	});
	let member_list = move || members.get_untracked().and_then(Result::ok).unwrap_or_default();

	let change_role = {
		let client = client.clone();
		move |user_id: String, role: Role| {
			if let Err(refusal) = check_role_change(&member_list(), &user_id, role) {
				error.set(Some(refusal.to_string()));
				// Puts the select back to the stored role.
				members.refetch();
				return;
			}
			let client = client.clone();
			spawn_local(async move {
				match client.update_role(&user_id, role.as_str()).await {
					Ok(_) => {
						info!("user {user_id} is now {}", role.as_str());
						error.set(None);
						success.set(Some("User role updated successfully"));
					}
					Err(e) => error.set(Some(e.user_message())),
				}
				members.refetch();
			});
		}
	};

	let remove_user = {
		let client = client.clone();
		move |user_id: String| {
			let current = me.with_value(|m| m.id.clone());
			if let Err(refusal) = check_removal(&member_list(), &user_id, &current) {
				error.set(Some(refusal.to_string()));
				return;
			}
			if !confirm("Are you sure you want to remove this user from the family?") {
				return;
			}
			let client = client.clone();
			spawn_local(async move {
				match client.remove_user(&user_id).await {
					Ok(_) => {
						info!("removed user {user_id}");
						error.set(None);
						success.set(Some("User removed from family successfully"));
						members.refetch();
					}
					Err(e) => error.set(Some(e.user_message())),
				}
			});
		}
	};

	let delete_person = move |person: PersonDetails| {
		let current = me.with_value(|m| m.email.clone());
		if let Err(refusal) = check_person_deletion(person.email.as_deref(), &current) {
			error.set(Some(refusal.to_string()));
			return;
		}
		let prompt = format!(
			"Are you sure you want to permanently delete {} from the family tree? This will remove all their relations as well.",
			person.name
		);
		if !confirm(&prompt) {
			return;
		}
		let client = client.clone();
		spawn_local(async move {
			match client.delete_person(&person.id).await {
				Ok(_) => {
					info!("deleted person {}", person.id);
					error.set(None);
					success.set(Some("Person deleted from family tree successfully"));
					persons.refetch();
				}
				Err(e) => error.set(Some(e.user_message())),
			}
		});
	};

	view! {
		<div class="manage-users">
			<h1>"Manage Access"</h1>
			<p class="muted">
				"Your role: " {me.with_value(|m| Role::resolve(Some(m)).label())}
			</p>
			{move || error.get().map(|e| view! { <p class="form-error">{e}</p> })}
			{move || success.get().map(|s| view! { <p class="form-success">{s}</p> })}

			<section class="card">
				<h2>"Family Members"</h2>
				{move || match members.get() {
					None => view! { <p class="muted">"Loading..."</p> }.into_any(),
					Some(Err(e)) => {
						warn!("family members unavailable: {e}");
						view! { <p class="page-error">"Failed to load family members"</p> }.into_any()
					}
					Some(Ok(list)) => {
						let me_id = me.with_value(|m| m.id.clone());
						view! {
							<MemberTable
								members=list
								me_id=me_id
								change_role=change_role.clone()
								remove_user=remove_user.clone()
							/>
						}
							.into_any()
					}
				}}
			</section>

			<section class="card">
				<h2>"Family Tree Members"</h2>
				{move || match persons.get() {
					None => view! { <p class="muted">"Loading..."</p> }.into_any(),
					Some(Err(e)) => {
						warn!("persons unavailable: {e}");
						view! { <p class="page-error">"Failed to load all family members"</p> }.into_any()
					}
					Some(Ok(list)) => {
						let my_email = me.with_value(|m| m.email.clone());
						view! {
							<PersonTable
								persons=list
								my_email=my_email
								delete_person=delete_person.clone()
							/>
						}
							.into_any()
					}
				}}
			</section>
		</div>
	}
}

#[component]
fn MemberTable<C, R>(
	members: Vec<FamilyMember>,
	me_id: String,
	change_role: C,
	remove_user: R,
) -> impl IntoView
where
	C: Fn(String, Role) + Clone + Send + Sync + 'static,
	R: Fn(String) + Clone + Send + Sync + 'static,
{
	let rows = members
		.into_iter()
		.map(|member| {
			let is_me = member.id == me_id;
			let role = Role::from_name(&member.role);
			let joined = member
				.created_at
				.as_deref()
				.and_then(parse_birth_date)
				.map(format_birth_date)
				.unwrap_or_default();
			let (change_role, remove_user) = (change_role.clone(), remove_user.clone());
			let (select_id, remove_id) = (member.id.clone(), member.id.clone());
			view! {
				<tr>
					<td>{member.name}</td>
					<td>{member.email}</td>
					<td>
						<span class=format!("role-badge {}", role.as_str())>{role.label()}</span>
					</td>
					<td>{joined}</td>
					<td class="actions">
						<select
							prop:value=role.as_str()
							disabled=is_me
							on:change=move |ev| {
								change_role(select_id.clone(), Role::from_name(&event_target_value(&ev)))
							}
						>
							{Role::ALL
								.iter()
								.map(|r| view! { <option value=r.as_str()>{r.label()}</option> })
								.collect_view()}
						</select>
						{(!is_me)
							.then(|| {
								view! {
									<button
										type="button"
										class="danger"
										on:click=move |_| remove_user(remove_id.clone())
									>
										"Remove"
									</button>
								}
							})}
					</td>
				</tr>
			}
		})
		.collect_view();

	view! {
		<table class="data-table">
			<thead>
				<tr>
					<th>"Name"</th>
					<th>"Email"</th>
					<th>"Role"</th>
					<th>"Joined"</th>
					<th>"Actions"</th>
				</tr>
			</thead>
			<tbody>{rows}</tbody>
		</table>
	}
}

#[component]
fn PersonTable<D>(persons: Vec<PersonDetails>, my_email: String, delete_person: D) -> impl IntoView
where
	D: Fn(PersonDetails) + Clone + Send + Sync + 'static,
{
	let rows = persons
		.into_iter()
		.map(|person| {
			let deletable = person.email.as_deref() != Some(my_email.as_str());
			let email = person.email.clone().unwrap_or_else(|| "No email".to_string());
			let name = person.name.clone();
			let delete_person = delete_person.clone();
			view! {
				<tr>
					<td>{name}</td>
					<td>{email}</td>
					<td class="actions">
						{deletable
							.then(|| {
								view! {
									<button
										type="button"
										class="danger"
										on:click=move |_| delete_person(person.clone())
									>
										"Delete"
									</button>
								}
							})}
					</td>
				</tr>
			}
		})
		.collect_view();

	view! {
		<table class="data-table">
			<thead>
				<tr>
					<th>"Name"</th>
					<th>"Email"</th>
					<th>"Actions"</th>
				</tr>
			</thead>
			<tbody>{rows}</tbody>
		</table>
	}
}
