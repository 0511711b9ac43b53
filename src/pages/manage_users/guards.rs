//! Checks that keep a family from locking itself out.

use thiserror::Error;

use crate::api::FamilyMember;
use crate::capability::Role;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Refusal {
	#[error("Cannot demote the last admin. Please promote another user to admin first.")]
	LastAdminDemotion,

	#[error("Cannot remove yourself from the family. Your role can only be changed by another admin.")]
	SelfRemoval,

	#[error("Cannot remove the last admin. Please promote another user to admin first.")]
	LastAdminRemoval,

	#[error("Cannot delete yourself from the family tree. This can only be done by another admin.")]
	SelfDeletion,
}

fn admin_count(members: &[FamilyMember]) -> usize {
	members
		.iter()
		.filter(|m| Role::from_name(&m.role) == Role::Admin)
		.count()
}

fn is_last_admin(members: &[FamilyMember], user_id: &str) -> bool {
	members
		.iter()
		.find(|m| m.id == user_id)
		.is_some_and(|m| Role::from_name(&m.role) == Role::Admin)
		&& admin_count(members) <= 1
}

pub fn check_role_change(members: &[FamilyMember], user_id: &str, new_role: Role) -> Result<(), Refusal> {
	if new_role != Role::Admin && is_last_admin(members, user_id) {
		return Err(Refusal::LastAdminDemotion);
	}
	Ok(())
}

pub fn check_removal(members: &[FamilyMember], user_id: &str, current_user_id: &str) -> Result<(), Refusal> {
	if user_id == current_user_id {
		return Err(Refusal::SelfRemoval);
	}
	if is_last_admin(members, user_id) {
		return Err(Refusal::LastAdminRemoval);
	}
	Ok(())
}

/// People are matched to accounts by email.
pub fn check_person_deletion(person_email: Option<&str>, current_email: &str) -> Result<(), Refusal> {
	if person_email == Some(current_email) {
		return Err(Refusal::SelfDeletion);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn member(id: &str, role: &str) -> FamilyMember {
		FamilyMember {
			id: id.into(),
			name: id.to_uppercase(),
			email: format!("{id}@example.com"),
			role: role.into(),
			created_at: None,
		}
	}

	#[test]
	fn last_admin_cannot_be_demoted() {
		let members = [member("a", "admin"), member("b", "viewer")];
		assert_eq!(
			check_role_change(&members, "a", Role::SubAdmin),
			Err(Refusal::LastAdminDemotion)
		);
		assert_eq!(check_role_change(&members, "a", Role::Admin), Ok(()));
		assert_eq!(check_role_change(&members, "b", Role::Admin), Ok(()));
	}

	#[test]
	fn one_of_two_admins_can_be_demoted() {
		let members = [member("a", "admin"), member("b", "admin")];
		assert_eq!(check_role_change(&members, "a", Role::Viewer), Ok(()));
	}

	#[test]
	fn removal_refuses_self_then_last_admin() {
		let members = [member("a", "admin"), member("b", "admin"), member("c", "viewer")];
		assert_eq!(check_removal(&members, "a", "a"), Err(Refusal::SelfRemoval));
		assert_eq!(check_removal(&members, "b", "a"), Ok(()));
		assert_eq!(check_removal(&members, "c", "a"), Ok(()));

		let lone = [member("a", "admin"), member("c", "sub-admin")];
		assert_eq!(check_removal(&lone, "a", "c"), Err(Refusal::LastAdminRemoval));
	}

	#[test]
	fn cannot_delete_own_person_record() {
		assert_eq!(
			check_person_deletion(Some("a@example.com"), "a@example.com"),
			Err(Refusal::SelfDeletion)
		);
		assert_eq!(check_person_deletion(Some("b@example.com"), "a@example.com"), Ok(()));
		assert_eq!(check_person_deletion(None, "a@example.com"), Ok(()));
	}
}
