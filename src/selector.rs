//! Chooses how a query is acquired: scraping the public pages or calling the
//! structured API. The choice is made once per call and never mixed.

use serde::{Deserialize, Serialize};

use crate::extractor::api::ApiEndpoint;
use crate::extractor::html::RuleSet;
use crate::model::QueryType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Html,
    Api,
}

/// `Api` only for a non-blank credential and a query type that supports it.
pub fn select(query_type: QueryType, api_key: Option<&str>) -> Mode {
    let has_key = api_key.is_some_and(|key| !key.trim().is_empty());
    if has_key && query_type.supports_api() {
        Mode::Api
    } else {
        Mode::Html
    }
}

/// One variant per `{query type, mode}` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Html(RuleSet),
    Api(ApiEndpoint),
}

impl Strategy {
    pub fn resolve(query_type: QueryType, mode: Mode) -> Self {
        match mode {
            Mode::Html => Self::Html(RuleSet::for_query(query_type)),
            Mode::Api => Self::Api(ApiEndpoint::for_query(query_type)),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Html(_) => Mode::Html,
            Self::Api(_) => Mode::Api,
        }
    }
}
