//! Reconciles an authorization service with a variable capability surface into a
//! single allow-set per query.
//!
//! Each candidate is probed with a ranked chain of [`CheckStrategy`]s; the first
//! explicit verdict wins. When no candidate gets any verdict at all, the
//! configured [`AccessMode`] decides between trusting the retrieval prefilter
//! (`Permissive`) and denying everything (`Strict`). An explicit all-deny is never
//! overridden.

pub mod cerbos;
pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod reconciler;
pub mod strategy;
pub mod types;


pub use cerbos::{CerbosClient, DEFAULT_CERBOS_URL};
pub use client::AuthorizationClient;
pub use error::{AccessError, AccessResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockAuthorizationClient;
pub use reconciler::{AccessReconciler, AllowSet};
pub use strategy::{BooleanCheck, CheckStrategy, DecisionCheck, default_strategies};
pub use types::{AccessMode, Principal, ResourceDecision, ResourceRef, Verdict};
