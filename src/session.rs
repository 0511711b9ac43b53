//! The signed-in user's session.
//!
//! A [`Session`] is created once at startup, loaded from its [`SessionStore`]
//! and handed to the rest of the app through context. Nothing else touches
//! browser storage directly.

use std::sync::Arc;

use leptos::prelude::*;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::capability::Role;
use crate::error::SessionError;

const STORAGE_KEY: &str = "authData";

/// What the login endpoint returns and what we persist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
	#[serde(rename = "_id")]
	pub id: String,
	pub name: String,
	pub email: String,
	#[serde(default)]
	pub family_id: String,
	#[serde(default)]
	pub role: String,
	pub token: String,
}

pub trait SessionStore: Send + Sync {
	fn load(&self) -> Result<Option<AuthData>, SessionError>;
	fn save(&self, auth: &AuthData) -> Result<(), SessionError>;
	fn clear(&self) -> Result<(), SessionError>;
}

/// Persists the session as JSON in `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
	fn storage() -> Result<web_sys::Storage, SessionError> {
		web_sys::window()
			.and_then(|w| w.local_storage().ok().flatten())
			.ok_or(SessionError::StorageUnavailable)
	}
}

fn storage_err(value: wasm_bindgen::JsValue) -> SessionError {
	SessionError::Storage(format!("{value:?}"))
}

impl SessionStore for LocalStorageStore {
	fn load(&self) -> Result<Option<AuthData>, SessionError> {
		let raw = Self::storage()?.get_item(STORAGE_KEY).map_err(storage_err)?;
		match raw {
			Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
			None => Ok(None),
		}
	}

	fn save(&self, auth: &AuthData) -> Result<(), SessionError> {
		let raw = serde_json::to_string(auth)?;
		Self::storage()?
			.set_item(STORAGE_KEY, &raw)
			.map_err(storage_err)
	}

	fn clear(&self) -> Result<(), SessionError> {
		Self::storage()?
			.remove_item(STORAGE_KEY)
			.map_err(storage_err)
	}
}

/// Reactive handle to the current session.
#[derive(Clone)]
pub struct Session {
	store: Arc<dyn SessionStore>,
	auth: ArcRwSignal<Option<AuthData>>,
}

impl Session {
	pub fn new(store: impl SessionStore + 'static) -> Self {
		Self {
			store: Arc::new(store),
			auth: ArcRwSignal::new(None),
		}
	}

	/// Replaces the in-memory session with whatever the store holds.
	/// A corrupt stored session is discarded.
	pub fn load(&self) {
		match self.store.load() {
			Ok(auth) => {
				debug!("session loaded (signed in: {})", auth.is_some());
				self.auth.set(auth);
			}
			Err(e) => {
				warn!("discarding stored session: {e}");
				self.clear();
			}
		}
	}

	pub fn save(&self, auth: AuthData) -> Result<(), SessionError> {
		let persisted = self.store.save(&auth);
		self.auth.set(Some(auth));
		persisted
	}

	/// Keeps the stored session in step with an email change made on the server.
	pub fn update_email(&self, email: &str) -> Result<(), SessionError> {
		match self.auth_untracked() {
			Some(mut auth) => {
				auth.email = email.to_string();
				self.save(auth)
			}
			None => Ok(()),
		}
	}

	pub fn clear(&self) {
		if let Err(e) = self.store.clear() {
			warn!("failed to clear stored session: {e}");
		}
		self.auth.set(None);
	}

	/// Tracked read, for use inside views.
	pub fn auth(&self) -> Option<AuthData> {
		self.auth.get()
	}

	pub fn auth_untracked(&self) -> Option<AuthData> {
		self.auth.get_untracked()
	}

	pub fn token(&self) -> Option<String> {
		self.auth
			.with_untracked(|a| a.as_ref().map(|a| a.token.clone()))
			.filter(|t| !t.is_empty())
	}

	pub fn is_authenticated(&self) -> bool {
		self.auth
			.with(|a| a.as_ref().is_some_and(|a| !a.token.is_empty()))
	}

	pub fn role(&self) -> Role {
		self.auth.with(|a| Role::resolve(a.as_ref()))
	}

	pub fn role_untracked(&self) -> Role {
		self.auth.with_untracked(|a| Role::resolve(a.as_ref()))
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Mutex;

	use super::*;

	/// Keeps the session in memory only.
	#[derive(Debug, Default)]
	pub struct MemoryStore {
		inner: Mutex<Option<AuthData>>,
	}

	impl MemoryStore {
		pub fn with(auth: AuthData) -> Self {
			Self {
				inner: Mutex::new(Some(auth)),
			}
		}
	}

	impl SessionStore for MemoryStore {
		fn load(&self) -> Result<Option<AuthData>, SessionError> {
			Ok(self
				.inner
				.lock()
				.map_err(|e| SessionError::Storage(e.to_string()))?
				.clone())
		}

		fn save(&self, auth: &AuthData) -> Result<(), SessionError> {
			*self
				.inner
				.lock()
				.map_err(|e| SessionError::Storage(e.to_string()))? = Some(auth.clone());
			Ok(())
		}

		fn clear(&self) -> Result<(), SessionError> {
			*self
				.inner
				.lock()
				.map_err(|e| SessionError::Storage(e.to_string()))? = None;
			Ok(())
		}
	}

	fn admin() -> AuthData {
		AuthData {
			id: "u1".into(),
			name: "Asha".into(),
			email: "asha@example.org".into(),
			family_id: "f1".into(),
			role: "admin".into(),
			token: "secret".into(),
		}
	}

	#[test]
	fn load_picks_up_stored_session() {
		let session = Session::new(MemoryStore::with(admin()));
		assert!(session.auth_untracked().is_none());
		session.load();
		assert_eq!(session.token().as_deref(), Some("secret"));
		assert_eq!(session.role_untracked(), Role::Admin);
	}

	#[test]
	fn save_then_clear() {
		let session = Session::new(MemoryStore::default());
		session.save(admin()).unwrap();
		assert_eq!(session.auth_untracked(), Some(admin()));

		session.clear();
		assert!(session.auth_untracked().is_none());
		assert!(session.token().is_none());
		assert_eq!(session.role_untracked(), Role::Viewer);

		// The store was cleared too, so a reload stays signed out.
		session.load();
		assert!(session.auth_untracked().is_none());
	}

	#[test]
	fn email_change_is_persisted() {
		let session = Session::new(MemoryStore::with(admin()));
		session.load();
		session.update_email("new@example.org").unwrap();
		assert_eq!(session.auth_untracked().map(|a| a.email).as_deref(), Some("new@example.org"));

		// The store has the new address too.
		session.load();
		let auth = session.auth_untracked().unwrap();
		assert_eq!(auth.email, "new@example.org");
		assert_eq!(auth.token, "secret");
	}

	#[test]
	fn email_change_without_session_is_a_no_op() {
		let session = Session::new(MemoryStore::default());
		session.update_email("new@example.org").unwrap();
		assert!(session.auth_untracked().is_none());
	}

	#[test]
	fn empty_token_is_not_a_token() {
		let mut auth = admin();
		auth.token.clear();
		let session = Session::new(MemoryStore::with(auth));
		session.load();
		assert!(session.token().is_none());
	}

	#[test]
	fn auth_data_uses_backend_field_names() {
		let raw = r#"{"_id":"u9","name":"Ravi","email":"r@x.org","familyId":"fam","role":"sub-admin","token":"abc"}"#;
		let auth: AuthData = serde_json::from_str(raw).unwrap();
		assert_eq!(auth.id, "u9");
		assert_eq!(auth.family_id, "fam");
		assert_eq!(Role::resolve(Some(&auth)), Role::SubAdmin);

		let back = serde_json::to_value(&auth).unwrap();
		assert_eq!(back["_id"], "u9");
		assert_eq!(back["familyId"], "fam");
	}
}
