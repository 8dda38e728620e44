//! # Sessio
//!
//! `sessio` is a small credential-and-session service built as a
//! role-escalation challenge. Users register and log in; a successful login
//! mints an HS256 session token carrying `{username, role}` claims, handed
//! back in the body and in a cookie the holder can read and edit.
//!
//! The protected `/profile-data` endpoint decodes the token **without
//! verifying its signature** and trusts the `role` claim as-is. Rewriting
//! the payload segment of a legitimate token to claim `role: admin` — while
//! keeping the now-mismatched signature — unlocks the flag. The signing
//! secret also falls back to a well-known literal, so correctly-signed
//! forgeries work too. Both weaknesses are the point of the exercise; do not
//! deploy this anywhere that matters.

pub mod access;
pub mod cli;
pub mod password;
pub mod sessio;
pub mod store;
pub mod token;
