//! Commit and contributor activity for a repository, reshaped for display.

use crate::{
    github::{Commit, Contributor, Stats, Upstream},
    RelayError,
};

/// `owner/repo` pulled out of a repository url.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoLocator {
    pub owner: String,
    pub repo: String,
}

impl RepoLocator {
    /// Takes the owner and repository from the fixed positions of a url like
    /// `https://github.com/owner/repo`.
    pub fn parse(url: &str) -> Result<Self, RelayError> {
        if url.trim().is_empty() {
            return Err(RelayError::InvalidInput(RelayError::MISSING_URL));
        }

        let mut parts = url.split('/').skip(3);
        let owner = parts.next().unwrap_or_default();
        let repo = parts.next().unwrap_or_default();

        if owner.is_empty() || repo.is_empty() {
            return Err(RelayError::InvalidInput(RelayError::INVALID_URL));
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl std::fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub username: String,
    pub author_name: String,
    pub message: String,
    pub date: String,
    pub commit_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorFigure {
    pub username: String,
    pub total_commits: u64,
    pub active_weeks: usize,
    pub additions: u64,
    pub deletions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoActivity {
    pub repository: String,
    pub timeline: Vec<TimelineEntry>,
    pub figures: Vec<ContributorFigure>,
    pub total_commits_fetched: usize,
    pub contributor_count: usize,
}

const UNKNOWN: &str = "Unknown";

impl From<Commit> for TimelineEntry {
    fn from(commit: Commit) -> Self {
        Self {
            username: commit
                .author
                .map(|account| account.login)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            author_name: commit.commit.author.name,
            message: commit.commit.message,
            date: commit.commit.author.date,
            commit_url: commit.html_url,
        }
    }
}

impl From<Contributor> for ContributorFigure {
    fn from(contributor: Contributor) -> Self {
        let (active_weeks, additions, deletions) = contributor.weeks.iter().fold(
            (0, 0, 0),
            |(active, additions, deletions), week| {
                (
                    active + (week.c > 0) as usize,
                    additions + week.a,
                    deletions + week.d,
                )
            },
        );

        Self {
            username: contributor
                .author
                .map(|account| account.login)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            total_commits: contributor.total,
            active_weeks,
            additions,
            deletions,
        }
    }
}

pub const PER_PAGE: usize = 100;
pub const MAX_PAGES: usize = 3;

/// Fetches the newest commits, stopping at the first short page.
pub fn fetch_commits(upstream: &dyn Upstream, repo: &RepoLocator) -> anyhow::Result<Vec<Commit>> {
    let mut commits = Vec::with_capacity(PER_PAGE);
    for page in 1..=MAX_PAGES {
        let batch = upstream.commits(repo, page, PER_PAGE)?;
        let done = batch.len() < PER_PAGE;
        commits.extend(batch);
        if done {
            break;
        }
    }
    Ok(commits)
}

/// Contributor stats that are still being computed count as none.
pub fn fetch_contributors(
    upstream: &dyn Upstream,
    repo: &RepoLocator,
) -> anyhow::Result<Vec<Contributor>> {
    Ok(match upstream.contributor_stats(repo)? {
        Stats::Ready(contributors) => contributors,
        Stats::Computing => vec![],
    })
}

pub fn get_repo_activity(upstream: &dyn Upstream, repo_url: &str) -> Result<RepoActivity, RelayError> {
    let repo = RepoLocator::parse(repo_url)?;
    log::info!("fetching activity for {repo}");

    let commits = fetch_commits(upstream, &repo).map_err(RelayError::UpstreamFailure)?;
    let contributors = fetch_contributors(upstream, &repo).map_err(RelayError::UpstreamFailure)?;

    let timeline = commits
        .into_iter()
        .map(TimelineEntry::from)
        .collect::<Vec<_>>();
    let figures = contributors
        .into_iter()
        .map(ContributorFigure::from)
        .collect::<Vec<_>>();

    log::debug!(
        "{repo}: {} commits, {} contributors",
        timeline.len(),
        figures.len()
    );

    Ok(RepoActivity {
        repository: repo.to_string(),
        total_commits_fetched: timeline.len(),
        contributor_count: figures.len(),
        timeline,
        figures,
    })
}
