//! Remote collection client
//!
//! HTTP client for the todo service. Every request carries the bearer token
//! held by the [`SessionStore`](crate::session::SessionStore), and every
//! failure is normalized into [`ApiError`](crate::error::ApiError).
//!
//! ## Endpoints
//!
//! - `POST /login` - exchange email/password for an access token
//! - `GET /todos` - the whole collection
//! - `POST /todos` - create
//! - `PUT /todos/{id}` - partial update
//! - `DELETE /todos/{id}` - delete
//!
//! 401 and 422 both mean the credential is no longer accepted.

mod client;

pub use client::ApiClient;
