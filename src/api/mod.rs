//! Authenticated access to the family-tree backend.
//!
//! Every call goes through [`ApiClient::request`], which attaches the session
//! token and turns a 401 into a global sign-out.

mod types;

use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Request, RequestInit, Response};

pub use types::{
	Credentials, EmailChange, Envelope, ErrorBody, FamilyMember, IdOrRef, ParentCandidate,
	PasswordChange, PersonDetails, PersonNode, PersonPayload, PersonRecord, PersonRef, RoleUpdate,
	UploadedFile,
};

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::session::{AuthData, Session};

pub const LOGIN_PATH: &str = "/auth/login";

/// Turns a finished response into a value or an [`ApiError`].
///
/// `fallback` is used when a failing response has no `message` of its own.
pub fn interpret<T: DeserializeOwned>(status: u16, body: &str, fallback: &str) -> Result<T> {
	match status {
		200..=299 => Ok(serde_json::from_str(body)?),
		401 => Err(ApiError::Unauthorized),
		_ => Err(ApiError::Server {
			status,
			message: server_message(body, fallback),
		}),
	}
}

/// The `message` of an error body, or `fallback` when there is none.
pub fn server_message(body: &str, fallback: &str) -> String {
	serde_json::from_str::<ErrorBody>(body)
		.ok()
		.and_then(|b| b.message)
		.filter(|m| !m.is_empty())
		.unwrap_or_else(|| fallback.to_string())
}

/// Whether a 401 ends the session. Only the login call reports it instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OnUnauthorized {
	SignOut,
	Report,
}

enum Body {
	Empty,
	Json(String),
	Form(FormData),
}

#[derive(Clone)]
pub struct ApiClient {
	config: Arc<ApiConfig>,
	session: Session,
}

impl ApiClient {
	pub fn new(config: ApiConfig, session: Session) -> Self {
		Self {
			config: Arc::new(config),
			session,
		}
	}

	pub fn config(&self) -> &ApiConfig {
		&self.config
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	async fn request(
		&self,
		method: &str,
		url: &str,
		body: Body,
		on_unauthorized: OnUnauthorized,
	) -> Result<Response> {
		let init = RequestInit::new();
		init.set_method(method);
		let is_form = matches!(body, Body::Form(_));
		match body {
			Body::Empty => {}
			Body::Json(json) => init.set_body(&JsValue::from_str(&json)),
			Body::Form(form) => init.set_body(&form),
		}

		let request = Request::new_with_str_and_init(url, &init).map_err(ApiError::from_js)?;
		let headers = request.headers();
		// Multipart bodies need the browser to pick the boundary.
		if !is_form {
			headers
				.set("Content-Type", "application/json")
				.map_err(ApiError::from_js)?;
		}
		if let Some(token) = self.session.token() {
			headers
				.set("Authorization", &token)
				.map_err(ApiError::from_js)?;
		}

		let window = web_sys::window().ok_or(ApiError::NoWindow)?;
		debug!("{method} {url}");
		let response: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(ApiError::from_js)?
			.dyn_into()
			.map_err(ApiError::from_js)?;

		if response.status() == 401 && on_unauthorized == OnUnauthorized::SignOut {
			warn!("{method} {url} was unauthorized, signing out");
			self.session.clear();
			redirect_to_login();
			return Err(ApiError::Unauthorized);
		}
		Ok(response)
	}

	/// Status and body text of a finished request.
	async fn exchange(
		&self,
		method: &str,
		url: &str,
		body: Body,
		on_unauthorized: OnUnauthorized,
	) -> Result<(u16, String)> {
		let response = self.request(method, url, body, on_unauthorized).await?;
		let text = JsFuture::from(response.text().map_err(ApiError::from_js)?)
			.await
			.map_err(ApiError::from_js)?
			.as_string()
			.unwrap_or_default();
		Ok((response.status(), text))
	}

	async fn call<T: DeserializeOwned>(
		&self,
		method: &str,
		url: &str,
		body: Body,
		fallback: &str,
	) -> Result<T> {
		let (status, text) = self
			.exchange(method, url, body, OnUnauthorized::SignOut)
			.await?;
		interpret(status, &text, fallback)
	}

	pub async fn get<T: DeserializeOwned>(&self, url: &str, fallback: &str) -> Result<T> {
		self.call("GET", url, Body::Empty, fallback).await
	}

	pub async fn send_json<B: Serialize, T: DeserializeOwned>(
		&self,
		method: &str,
		url: &str,
		body: &B,
		fallback: &str,
	) -> Result<T> {
		let json = serde_json::to_string(body)?;
		self.call(method, url, Body::Json(json), fallback).await
	}

	pub async fn delete(&self, url: &str, fallback: &str) -> Result<serde_json::Value> {
		self.call("DELETE", url, Body::Empty, fallback).await
	}

	/// Bad credentials come back as [`ApiError::Server`] with the server's message.
	pub async fn login(&self, credentials: &Credentials) -> Result<AuthData> {
		const FALLBACK: &str = "Login failed. Please try again.";
		let json = serde_json::to_string(credentials)?;
		let (status, text) = self
			.exchange(
				"POST",
				&self.config.login(),
				Body::Json(json),
				OnUnauthorized::Report,
			)
			.await?;
		if status == 401 {
			return Err(ApiError::Server {
				status,
				message: server_message(&text, FALLBACK),
			});
		}
		interpret(status, &text, FALLBACK)
	}

	pub async fn change_password(&self, change: &PasswordChange) -> Result<serde_json::Value> {
		self.send_json(
			"PUT",
			&self.config.change_password(),
			change,
			"Failed to update password",
		)
		.await
	}

	/// Changes the account email on the server and in the stored session.
	pub async fn change_email(&self, email: &str) -> Result<serde_json::Value> {
		let reply = self
			.send_json(
				"PUT",
				&self.config.change_email(),
				&EmailChange { email },
				"Failed to update email",
			)
			.await?;
		if let Err(e) = self.session.update_email(email) {
			warn!("email changed but the stored session was not updated: {e}");
		}
		Ok(reply)
	}

	pub async fn family_tree(&self) -> Result<Vec<PersonNode>> {
		let env: Envelope<Vec<PersonNode>> = self
			.get(&self.config.family_tree(), "Error loading family trees.")
			.await?;
		Ok(env.data)
	}

	pub async fn all_persons(&self) -> Result<Vec<PersonDetails>> {
		let env: Envelope<Vec<PersonDetails>> = self
			.get(&self.config.all_persons(), "Failed to load family members")
			.await?;
		Ok(env.data)
	}

	pub async fn person(&self, id: &str) -> Result<PersonRecord> {
		let env: Envelope<PersonRecord> = self
			.get(&self.config.person(id), "Failed to load person data")
			.await?;
		Ok(env.data)
	}

	pub async fn create_person(&self, payload: &PersonPayload) -> Result<serde_json::Value> {
		self.send_json(
			"POST",
			&self.config.create_person(),
			payload,
			"Failed to add member",
		)
		.await
	}

	pub async fn update_person(&self, id: &str, payload: &PersonPayload) -> Result<serde_json::Value> {
		self.send_json(
			"PUT",
			&self.config.update_person(id),
			payload,
			"Failed to update",
		)
		.await
	}

	pub async fn delete_person(&self, id: &str) -> Result<serde_json::Value> {
		self.delete(&self.config.delete_person(id), "Failed to delete person")
			.await
	}

	pub async fn eligible_spouses(&self) -> Result<Vec<PersonRef>> {
		let env: Envelope<Option<Vec<PersonRef>>> = self
			.get(
				&self.config.eligible_spouses(),
				"Failed to fetch eligible spouses",
			)
			.await?;
		Ok(env.data.unwrap_or_default())
	}

	pub async fn eligible_parents(&self) -> Result<Vec<ParentCandidate>> {
		let env: Envelope<Option<Vec<ParentCandidate>>> = self
			.get(
				&self.config.eligible_parents(),
				"Failed to fetch eligible parents",
			)
			.await?;
		Ok(env.data.unwrap_or_default())
	}

	pub async fn occupations(&self, query: &str) -> Result<Vec<String>> {
		let env: Envelope<Option<Vec<String>>> = self
			.get(
				&self.config.occupations(query),
				"Failed to search occupations",
			)
			.await?;
		Ok(env.data.unwrap_or_default())
	}

	pub async fn family_members(&self) -> Result<Vec<FamilyMember>> {
		let env: Envelope<Option<Vec<FamilyMember>>> = self
			.get(
				&self.config.family_members(),
				"Failed to load family members",
			)
			.await?;
		Ok(env.data.unwrap_or_default())
	}

	pub async fn update_role(&self, user_id: &str, role: &str) -> Result<serde_json::Value> {
		self.send_json(
			"PUT",
			&self.config.user_role(user_id),
			&RoleUpdate { role },
			"Failed to update role",
		)
		.await
	}

	pub async fn remove_user(&self, user_id: &str) -> Result<serde_json::Value> {
		self.delete(&self.config.user(user_id), "Failed to remove user")
			.await
	}

	/// Uploads under the multipart field `photo` and returns the absolute file URL.
	pub async fn upload_photo(&self, file: &web_sys::File) -> Result<String> {
		let form = FormData::new().map_err(ApiError::from_js)?;
		form.append_with_blob("photo", file)
			.map_err(ApiError::from_js)?;
		let env: Envelope<UploadedFile> = self
			.call(
				"POST",
				&self.config.upload_image(),
				Body::Form(form),
				"Failed to upload image",
			)
			.await?;
		Ok(self.config.resolve_asset(&env.data.file_url))
	}
}

pub fn redirect_to_login() {
	if let Some(window) = web_sys::window() {
		if let Err(e) = window.location().set_href(LOGIN_PATH) {
			warn!("redirect to login failed: {e:?}");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn success_decodes_body() {
		let tree: Envelope<Vec<PersonNode>> =
			interpret(200, r#"{"success":true,"data":[]}"#, "x").unwrap();
		assert!(tree.data.is_empty());
	}

	#[test]
	fn unauthorized_is_its_own_error() {
		let res: Result<serde_json::Value> = interpret(401, r#"{"message":"jwt expired"}"#, "x");
		assert_eq!(res, Err(ApiError::Unauthorized));
	}

	#[test]
	fn server_message_is_passed_through_verbatim() {
		let res: Result<serde_json::Value> =
			interpret(400, r#"{"message":"Email already in use"}"#, "Failed");
		assert_eq!(
			res,
			Err(ApiError::Server {
				status: 400,
				message: "Email already in use".into()
			})
		);
		assert_eq!(res.unwrap_err().user_message(), "Email already in use");
	}

	#[test]
	fn fallback_message_when_body_is_not_json() {
		let res: Result<serde_json::Value> = interpret(500, "<html>oops</html>", "Failed to update");
		assert_eq!(
			res,
			Err(ApiError::Server {
				status: 500,
				message: "Failed to update".into()
			})
		);
	}

	#[test]
	fn empty_message_uses_fallback() {
		assert_eq!(server_message(r#"{"message":""}"#, "Failed"), "Failed");
		assert_eq!(server_message(r#"{"message":"Invalid credentials"}"#, "Failed"), "Invalid credentials");
	}

	#[test]
	fn malformed_success_body_is_a_decode_error() {
		let res: Result<Envelope<Vec<PersonNode>>> = interpret(200, "not json", "x");
		assert!(matches!(res, Err(ApiError::Decode(_))));
	}
}
