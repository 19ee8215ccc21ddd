use crate::{activity::RepoLocator, EnvConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct Account {
    pub login: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Commit {
    /// The linked account, `None` when the commit email isn't tied to one.
    pub author: Option<Account>,
    pub commit: CommitDetail,
    pub html_url: String,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct CommitDetail {
    pub author: Signature,
    pub message: String,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Signature {
    pub name: String,
    pub date: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Contributor {
    pub author: Option<Account>,
    pub total: u64,
    pub weeks: Vec<Week>,
}

/// One week of a contributor's activity.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
pub struct Week {
    /// Start of the week, unix seconds.
    pub w: i64,
    pub a: u64,
    pub d: u64,
    pub c: u64,
}

/// Contributor statistics are computed lazily upstream, the first request
/// for a repository usually only starts the job.
#[derive(Debug, Clone)]
pub enum Stats<T> {
    Ready(T),
    Computing,
}

pub trait Upstream: Send + Sync + 'static {
    /// One page of the commit listing, newest first. Pages start at 1.
    fn commits(
        &self,
        repo: &RepoLocator,
        page: usize,
        per_page: usize,
    ) -> anyhow::Result<Vec<Commit>>;

    fn contributor_stats(&self, repo: &RepoLocator) -> anyhow::Result<Stats<Vec<Contributor>>>;
}

pub struct Client {
    agent: ureq::Agent,
    base: String,
    bearer_token: Option<String>,
}

impl Client {
    const ACCEPT: &'static str = "application/vnd.github+json";
    const USER_AGENT: &'static str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    pub fn new(config: &EnvConfig) -> Self {
        if config.github_token.is_none() {
            log::warn!("GITHUB_TOKEN is not set, upstream requests will be rate limited");
        }

        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(Self::USER_AGENT)
                .build(),
            base: config.github_api_url.trim_end_matches('/').to_string(),
            bearer_token: config
                .github_token
                .as_deref()
                .map(|token| format!("Bearer {token}")),
        }
    }

    fn get<'k, 'v>(
        &self,
        ep: &str,
        query: impl IntoIterator<Item = (&'k str, &'v str)>,
    ) -> anyhow::Result<ureq::Response> {
        let url = format!("{}/{ep}", self.base);
        log::debug!("GET {url}");

        let req = self.agent.get(&url).set("accept", Self::ACCEPT);
        let req = query.into_iter().fold(req, |req, (k, v)| req.query(k, v));
        let req = match &self.bearer_token {
            Some(token) => req.set("authorization", token),
            None => req,
        };

        Ok(req.call()?)
    }
}

impl Upstream for Client {
    fn commits(
        &self,
        repo: &RepoLocator,
        page: usize,
        per_page: usize,
    ) -> anyhow::Result<Vec<Commit>> {
        let (page, per_page) = (page.to_string(), per_page.to_string());
        let resp = self.get(
            &format!("repos/{repo}/commits"),
            [("per_page", &*per_page), ("page", &*page)],
        )?;
        Ok(resp.into_json()?)
    }

    fn contributor_stats(&self, repo: &RepoLocator) -> anyhow::Result<Stats<Vec<Contributor>>> {
        let resp = self.get(&format!("repos/{repo}/stats/contributors"), [])?;
        if resp.status() == 202 {
            log::info!("contributor stats for {repo} are still being computed");
            return Ok(Stats::Computing);
        }
        Ok(Stats::Ready(resp.into_json()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_json() {
        let json = r#"[
            {
                "sha": "6dcb09b",
                "html_url": "https://github.com/acme/widgets/commit/6dcb09b",
                "author": { "login": "octocat", "id": 1 },
                "commit": {
                    "author": { "name": "Mona", "email": "mona@example.com", "date": "2024-01-02T03:04:05Z" },
                    "message": "fix the widget"
                }
            },
            {
                "sha": "aa11bb2",
                "html_url": "https://github.com/acme/widgets/commit/aa11bb2",
                "author": null,
                "commit": {
                    "author": { "name": "Ghost", "date": "2024-01-01T00:00:00Z" },
                    "message": "initial"
                }
            }
        ]"#;

        let commits: Vec<Commit> = serde_json::from_str(json).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].author.as_ref().unwrap().login, "octocat");
        assert_eq!(commits[0].commit.author.date, "2024-01-02T03:04:05Z");
        assert!(commits[1].author.is_none());
        assert_eq!(commits[1].commit.author.name, "Ghost");
    }

    #[test]
    fn contributor_json() {
        let json = r#"[{
            "author": { "login": "octocat" },
            "total": 3,
            "weeks": [
                { "w": 1367712000, "a": 10, "d": 2, "c": 2 },
                { "w": 1368316800, "a": 0, "d": 0, "c": 0 },
                { "w": 1368921600, "a": 5, "d": 1, "c": 1 }
            ]
        }]"#;

        let contributors: Vec<Contributor> = serde_json::from_str(json).unwrap();
        assert_eq!(contributors[0].total, 3);
        assert_eq!(contributors[0].weeks.len(), 3);
        assert_eq!(contributors[0].weeks[2].a, 5);
    }

    #[test]
    fn client_trims_base() {
        let config = EnvConfig {
            github_api_url: "http://localhost:9999/".into(),
            github_token: Some("abc".into()),
            ..EnvConfig::default()
        };
        let client = Client::new(&config);
        assert_eq!(client.base, "http://localhost:9999");
        assert_eq!(client.bearer_token.as_deref(), Some("Bearer abc"));
    }
}
