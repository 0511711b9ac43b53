//! Error types shared by the API client, session and forms.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure of a backend call.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ApiError {
	/// The request never produced a response.
	#[error("network error: {0}")]
	Network(String),

	/// The response body was not the JSON we expected.
	#[error("could not read response: {0}")]
	Decode(String),

	/// The token was rejected. The session has already been cleared.
	#[error("session expired, please sign in again")]
	Unauthorized,

	/// Non-success status; `message` is the server's text when it sent one.
	#[error("{message}")]
	Server { status: u16, message: String },

	#[error("no browser window available")]
	NoWindow,
}

impl ApiError {
	pub fn from_js(value: JsValue) -> Self {
		Self::Network(
			value
				.as_string()
				.unwrap_or_else(|| format!("{value:?}")),
		)
	}

	/// Message suitable for showing to the user as-is.
	pub fn user_message(&self) -> String {
		self.to_string()
	}
}

impl From<serde_json::Error> for ApiError {
	fn from(e: serde_json::Error) -> Self {
		Self::Decode(e.to_string())
	}
}

/// Reasons a form refuses to submit.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FormError {
	#[error("Please fill in all required fields.")]
	MissingRequired,

	#[error("Mobile number must be exactly 10 digits.")]
	ContactLength,

	#[error("File size must be less than 5MB")]
	PhotoTooLarge,

	#[error("New password and confirm password do not match")]
	PasswordMismatch,
}

/// Persisting or restoring the session failed.
#[derive(Error, Debug)]
pub enum SessionError {
	#[error("session storage unavailable")]
	StorageUnavailable,

	#[error("session storage rejected the operation: {0}")]
	Storage(String),

	#[error("stored session is corrupt: {0}")]
	Corrupt(#[from] serde_json::Error),
}

/// Result type alias for API calls
pub type Result<T> = std::result::Result<T, ApiError>;
