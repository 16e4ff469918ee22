//! Quest gateway API surface.
//!
//! [`QuestClient`] is the single door to the gateway: every call flows
//! through its request wrapper, which attaches the stored bearer token and
//! transparently revalidates it when the server answers 401. [`types`]
//! holds the wire shapes and their normalized projections.

pub mod client;
pub mod error;
pub mod types;

pub use client::QuestClient;
pub use error::ApiError;
pub use types::{PartnerTask, Profile, QuestTask, TaskAction};
