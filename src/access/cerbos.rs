use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::client::AuthorizationClient;
use super::error::{AccessError, AccessResult};
use super::types::{Principal, ResourceDecision, ResourceRef, Verdict};

pub const DEFAULT_CERBOS_URL: &str = "http://localhost:3592";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const EFFECT_ALLOW: &str = "EFFECT_ALLOW";
const EFFECT_DENY: &str = "EFFECT_DENY";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckRequest<'a> {
    request_id: String,
    principal: PrincipalBody<'a>,
    resources: Vec<ResourceEntry<'a>>,
}

#[derive(Serialize)]
struct PrincipalBody<'a> {
    id: &'a str,
    roles: &'a [String],
    attr: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct ResourceEntry<'a> {
    actions: &'a [&'a str],
    resource: ResourceBody<'a>,
}

#[derive(Serialize)]
struct ResourceBody<'a> {
    kind: &'a str,
    id: &'a str,
    attr: &'a BTreeMap<String, String>,
}

#[derive(Deserialize)]
pub(crate) struct CheckResponse {
    #[serde(default)]
    results: Vec<CheckResult>,
}

#[derive(Deserialize)]
struct CheckResult {
    #[serde(default)]
    actions: HashMap<String, String>,
}

#[derive(Deserialize)]
struct ServerInfo {
    #[serde(default)]
    version: String,
    #[serde(default)]
    commit: String,
}

/// Cerbos PDP over its HTTP API.
///
/// Only structured decisions are offered; `is_allowed` stays unsupported so the
/// reconciler falls through to [`DecisionCheck`](super::DecisionCheck).
#[derive(Debug, Clone)]
pub struct CerbosClient {
    http: HttpClient,
    base_url: String,
}

impl CerbosClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: HttpClient::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<T: for<'de> Deserialize<'de>>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> AccessResult<T> {
        let resp = request
            .send()
            .await
            .map_err(|e| AccessError::RequestFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AccessError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        resp.json().await.map_err(|e| AccessError::MalformedResponse {
            reason: e.to_string(),
        })
    }
}

/// Maps the first result's effects; unknown effect strings are left out.
pub(crate) fn decode_decision(response: CheckResponse) -> AccessResult<ResourceDecision> {
    let result = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| AccessError::MalformedResponse {
            reason: "no results in check response".to_string(),
        })?;

    let actions = result
        .actions
        .into_iter()
        .filter_map(|(action, effect)| match effect.as_str() {
            EFFECT_ALLOW => Some((action, Verdict::Allow)),
            EFFECT_DENY => Some((action, Verdict::Deny)),
            _ => None,
        })
        .collect();
    Ok(ResourceDecision { actions })
}

#[async_trait]
impl AuthorizationClient for CerbosClient {
    #[instrument(skip(self, principal, resource, actions), fields(kind = %resource.kind, id = %resource.id))]
    async fn check_resource(
        &self,
        principal: &Principal,
        resource: &ResourceRef,
        actions: &[&str],
    ) -> AccessResult<ResourceDecision> {
        let url = format!("{}/api/check/resources", self.base_url);
        let body = CheckRequest {
            request_id: uuid::Uuid::new_v4().to_string(),
            principal: PrincipalBody {
                id: &principal.id,
                roles: &principal.roles,
                attr: &principal.attributes,
            },
            resources: vec![ResourceEntry {
                actions,
                resource: ResourceBody {
                    kind: &resource.kind,
                    id: &resource.id,
                    attr: &resource.attributes,
                },
            }],
        };

        let response: CheckResponse = self.send(self.http.post(&url).json(&body), &url).await?;
        let decision = decode_decision(response)?;
        debug!(actions = decision.actions.len(), "Decision received");
        Ok(decision)
    }

    async fn server_info(&self) -> AccessResult<String> {
        let url = format!("{}/api/server_info", self.base_url);
        let info: ServerInfo = self.send(self.http.get(&url), &url).await?;
        Ok(format!("cerbos {} ({})", info.version, info.commit))
    }
}
