//! # Request and Response Schemas
//!
//! Validated request payloads, partial-update payloads and response bodies for every
//! resource. Update payloads carry `Option` fields: only fields that are present overwrite
//! stored values.

pub mod common;
pub mod data_table;
pub mod form;
pub mod link;
pub mod organization;
pub mod pulse;
pub mod request_hub;
pub mod row;
pub mod scan;

pub use common::{MessageResponse, Page, PageLimits};
