//! worklog-feishu: Feishu (Lark) backend for worklog
//!
//! Implements the worklog collaborator seams against the Feishu Open API:
//! calendar events are the report input, drive documents created on the
//! meeting day are the meeting notes, and reports are written as new docx
//! documents in a per-period folder.
//!
//! All calls authenticate with a user access token taken from
//! [`FeishuConfig`].

pub mod blocks;
pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use blocks::{batch_size, blocks_for, extract_text};
pub use client::FeishuClient;
pub use config::{FeishuConfig, DEFAULT_BASE_URL, DEFAULT_DOC_BASE_URL};
pub use error::{FeishuError, Result};
