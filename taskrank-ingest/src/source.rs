//! Where the member tree comes from.
//!
//! The store is read once per leaderboard request. Any failure to reach or
//! read it is [`RankError::UpstreamUnavailable`]; there are no retries here.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use taskrank_core::{Member, RankError, Result};
use tracing::info;

use crate::members::{parse_members_export, parse_members_map};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSource {
    /// JSON export of the realtime database, tree under `members`.
    File(PathBuf),
    /// Realtime database REST endpoint; reads `<base_url>/members.json`.
    Rest {
        base_url: String,
        auth_token: Option<String>,
        timeout_secs: u64,
    },
}

impl MemberSource {
    pub async fn fetch(&self) -> Result<BTreeMap<String, Member>> {
        match self {
            Self::File(path) => {
                let body = tokio::fs::read_to_string(path).await.map_err(|e| {
                    RankError::upstream(format!("read {}: {e}", path.display()))
                })?;
                let members = parse_members_export(&body)?;
                info!(path = %path.display(), members = members.len(), "loaded members export");
                Ok(members)
            }
            Self::Rest {
                base_url,
                auth_token,
                timeout_secs,
            } => {
                let url = members_url(base_url);
                let client = reqwest::Client::builder()
                    .timeout(Duration::from_secs(*timeout_secs))
                    .build()
                    .map_err(|e| RankError::upstream(format!("http client: {e}")))?;

                let mut req = client.get(&url);
                if let Some(token) = auth_token {
                    req = req.query(&[("auth", token)]);
                }

                let resp = req
                    .send()
                    .await
                    .map_err(|e| RankError::upstream(format!("GET {url}: {e}")))?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(RankError::upstream(format!("GET {url}: HTTP {status}")));
                }
                let body = resp
                    .text()
                    .await
                    .map_err(|e| RankError::upstream(format!("GET {url}: {e}")))?;

                let members = parse_members_map(&body)?;
                info!(%url, members = members.len(), "fetched members");
                Ok(members)
            }
        }
    }
}

fn members_url(base_url: &str) -> String {
    format!("{}/members.json", base_url.trim_end_matches('/'))
}
