use eyre::WrapErr;
use honeygain_http_client::Transport;
use serde::Deserialize;

pub const UPSTREAM_REPOSITORY: &str = "MrLoLf/HoneygainAutoClaim";
pub const GITHUB_API_ROOT: &str = "https://api.github.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStatus {
    UpToDate,
    Behind,
    Unknown,
}

#[derive(Debug, Deserialize)]
struct Commit {
    sha: String,
}

/// Compares the head of `main` in a fork against upstream. Only logs; never fails the run.
pub async fn check_upstream<T: Transport>(transport: &T, repository: &str) -> UpstreamStatus {
    let fork = latest_commit(transport, repository).await;
    let upstream = latest_commit(transport, UPSTREAM_REPOSITORY).await;

    match (fork, upstream) {
        (Ok(fork), Ok(upstream)) if fork == upstream => {
            tracing::info!("Your repo is up-to-date with the original repo");
            UpstreamStatus::UpToDate
        }
        (Ok(_), Ok(_)) => {
            tracing::warn!("Your repo is not up-to-date with the original repo");
            tracing::warn!("Please update your repo to the latest commit to get new updates and bug fixes");
            UpstreamStatus::Behind
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!("Failed to fetch commit information: {e:#}");
            UpstreamStatus::Unknown
        }
    }
}

async fn latest_commit<T: Transport>(transport: &T, repository: &str) -> eyre::Result<String> {
    let url = format!("{GITHUB_API_ROOT}/repos/{repository}/commits/main");
    let reply = transport
        .get(&url, None)
        .await
        .wrap_err_with(|| format!("GET {url}"))?;
    if !reply.is_success() {
        return Err(eyre::eyre!("HTTP {} from {url}", reply.status));
    }
    let commit: Commit = serde_json::from_str(&reply.body).wrap_err("parse commit json")?;
    Ok(commit.sha)
}
