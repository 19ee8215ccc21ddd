use crate::{activity::RepoActivity, server::ErrorBody, RequestPaint, TaskQueue};

pub type FetchResult = Result<RepoActivity, String>;

/// Asks the relay for a repository's activity on a background thread.
pub struct RelayFetcher {
    queue: TaskQueue<String, FetchResult>,
}

impl RelayFetcher {
    pub fn new(relay_url: impl ToString, repaint: impl RequestPaint + 'static) -> Self {
        let endpoint = format!(
            "{}/repo-data",
            relay_url.to_string().trim_end_matches('/')
        );
        Self {
            queue: TaskQueue::new(repaint, move |repaint, queue, ready| {
                Self::spawn(&endpoint, repaint, queue, ready)
            }),
        }
    }

    pub fn fetch(&self, repo_url: impl ToString) {
        self.queue.enqueue(repo_url.to_string())
    }

    pub fn try_next(&self) -> Option<(String, FetchResult)> {
        self.queue.try_next()
    }

    pub fn join(self) -> Vec<(String, FetchResult)> {
        self.queue.join()
    }

    fn spawn(
        endpoint: &str,
        repaint: impl RequestPaint,
        queue: flume::Receiver<String>,
        ready: flume::Sender<(String, FetchResult)>,
    ) {
        let agent = ureq::agent();
        for repo_url in queue {
            log::debug!("asking {endpoint} for {repo_url}");

            let result = Self::request(&agent, endpoint, &repo_url);
            if let Err(err) = &result {
                log::warn!("cannot fetch {repo_url}: {err}");
            }

            let _ = ready.send((repo_url, result));
            repaint.request_repaint();
        }

        log::debug!("end of fetch loop")
    }

    fn request(agent: &ureq::Agent, endpoint: &str, repo_url: &str) -> FetchResult {
        let resp = agent
            .post(endpoint)
            .send_json(ureq::json!({ "repoUrl": repo_url }));

        match resp {
            Ok(resp) => resp
                .into_json()
                .map_err(|err| format!("unreadable relay response: {err}")),
            Err(ureq::Error::Status(code, resp)) => Err(resp
                .into_json::<ErrorBody>()
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("relay answered {code}"))),
            Err(err) => Err(format!("relay unreachable: {err}")),
        }
    }
}
