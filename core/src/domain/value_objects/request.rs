//! Requests sent to the upstream provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operations supported by the upstream provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpstreamAction {
    #[serde(rename = "getNumber")]
    GetNumber,
    #[serde(rename = "getSms")]
    GetSms,
    #[serde(rename = "cancelNumber")]
    CancelNumber,
    #[serde(rename = "getStatus")]
    GetStatus,
}

impl UpstreamAction {
    pub const ALL: [UpstreamAction; 4] = [
        UpstreamAction::GetNumber,
        UpstreamAction::GetSms,
        UpstreamAction::CancelNumber,
        UpstreamAction::GetStatus,
    ];

    /// Wire name used in the `action` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamAction::GetNumber => "getNumber",
            UpstreamAction::GetSms => "getSms",
            UpstreamAction::CancelNumber => "cancelNumber",
            UpstreamAction::GetStatus => "getStatus",
        }
    }
}

impl fmt::Display for UpstreamAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpstreamAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UpstreamAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("Unknown action: {}", s))
    }
}

/// Already-validated parameters for a number allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetNumberParams {
    pub country: String,
    pub service: String,
    pub token: String,
    /// Rental duration in hours
    pub rent_time: Option<u32>,
}

/// One upstream call: an action plus its ordered query parameters.
///
/// Fields are private so a request cannot change after it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    action: UpstreamAction,
    params: Vec<(String, String)>,
}

impl UpstreamRequest {
    pub fn new(action: UpstreamAction) -> Self {
        Self {
            action,
            params: Vec::new(),
        }
    }

    /// Append a parameter, consuming the builder
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Number allocation request; `rent_time` is only sent when present
    pub fn get_number(params: &GetNumberParams) -> Self {
        let request = Self::new(UpstreamAction::GetNumber)
            .with_param("country", params.country.as_str())
            .with_param("service", params.service.as_str())
            .with_param("token", params.token.as_str());

        match params.rent_time {
            Some(hours) => request.with_param("rent_time", hours.to_string()),
            None => request,
        }
    }

    /// Request addressing an existing activation (`getSms`, `cancelNumber`, `getStatus`)
    pub fn for_activation(action: UpstreamAction, token: &str, activation: &str) -> Self {
        Self::new(action)
            .with_param("token", token)
            .with_param("activation", activation)
    }

    pub fn action(&self) -> UpstreamAction {
        self.action
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Full query string pairs, `action` first
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::with_capacity(self.params.len() + 1);
        query.push(("action".to_string(), self.action.as_str().to_string()));
        query.extend(self.params.iter().cloned());
        query
    }
}
