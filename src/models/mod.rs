//! Data models for the portfolio service.
//!
//! `object` describes what the bucket hands back; `photo` describes the
//! manifest documents computed from it. Both serialize as JSON via `serde`.

pub mod object;
pub mod photo;
