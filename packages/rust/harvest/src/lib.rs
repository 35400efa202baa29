//! Harvesting of published meeting-minutes documents.
//!
//! The [`Harvester`] lists the minutes available for a working-group scope
//! via the repository's listing endpoint, then fetches each document's raw
//! text. A failing listing call is absorbed as an empty result set; a
//! failing document fetch is logged and only drops that one record.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use minutegen_shared::{MinutegenError, MinutesRecord, Params, Result};

/// User-Agent string for harvest requests.
const USER_AGENT: &str = concat!("minutegen/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Per-request timeout in seconds.
const TIMEOUT_SECS: u64 = 30;

/// Generated files published next to the minutes; never minutes themselves.
const IGNORED_FILES: &[&str] = &["index.html", "resolutions.html"];

/// One `{name, path}` descriptor from the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingEntry {
    /// Raw file name.
    pub name: String,
    /// Repository-relative path, substituted into the content URL template.
    pub path: String,
}

// ---------------------------------------------------------------------------
// Harvester
// ---------------------------------------------------------------------------

/// HTTP client for the listing and content endpoints of one scope.
pub struct Harvester {
    client: Client,
    scope: String,
    listing_url: String,
    content_url: String,
    concurrency: usize,
}

impl Harvester {
    /// Build a harvester for the configured scope.
    pub fn new(params: &Params) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| MinutegenError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            scope: params.scope.clone(),
            listing_url: params.listing_url.clone(),
            content_url: params.content_url.clone(),
            concurrency: params.fetch_concurrency.max(1),
        })
    }

    /// List the minutes documents available for the scope.
    ///
    /// Entries are sorted by raw file name in descending lexicographic order
    /// (file names are date-prefixed, so this is reverse-chronological), and
    /// known non-content files are filtered out. Any listing failure is
    /// logged and absorbed as an empty result set.
    #[instrument(skip_all, fields(scope = %self.scope))]
    pub async fn list_minutes(&self) -> Result<Vec<MinutesRecord>> {
        let url = self.listing_url.replace("{scope}", &self.scope);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "listing request failed");
                return Ok(vec![]);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "listing endpoint returned non-success status");
            return Ok(vec![]);
        }

        let mut entries: Vec<ListingEntry> = match response.json().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(%url, error = %e, "listing response was not a descriptor array");
                return Ok(vec![]);
            }
        };

        entries.sort_by(|a, b| b.name.cmp(&a.name));

        let records: Vec<MinutesRecord> = entries
            .into_iter()
            .filter(|entry| !IGNORED_FILES.contains(&entry.name.as_str()))
            .filter_map(|entry| {
                let content_url = self
                    .content_url
                    .replace("{scope}", &self.scope)
                    .replace("{path}", &entry.path);
                let record = MinutesRecord::from_file_name(&entry.name, content_url);
                if record.is_none() {
                    warn!(name = %entry.name, "skipping file without a leading date");
                }
                record
            })
            .collect();

        info!(count = records.len(), "minutes listed");
        Ok(records)
    }

    /// Fetch one document's raw text, split on line breaks.
    pub async fn fetch_content(&self, url: &str) -> Result<Vec<String>> {
        fetch_lines(&self.client, url).await
    }

    /// Fetch the content of every record, one task per record, bounded by
    /// the configured concurrency, joined in listing order.
    ///
    /// A fetch failure drops that record only (skip-and-log); it never
    /// aborts the sibling records.
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn fetch_all(
        &self,
        records: Vec<MinutesRecord>,
    ) -> Vec<(MinutesRecord, Vec<String>)> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(records.len());

        for record in records {
            let client = self.client.clone();
            let sem = semaphore.clone();

            handles.push(tokio::spawn(async move {
                let _permit = sem.acquire().await.expect("semaphore closed");
                match fetch_lines(&client, &record.url).await {
                    Ok(lines) => Some((record, lines)),
                    Err(e) => {
                        warn!(url = %record.url, error = %e, "skipping unfetchable document");
                        None
                    }
                }
            }));
        }

        // Awaiting in spawn order keeps the harvester's listing order.
        let mut fetched = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(Some(pair)) => fetched.push(pair),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "document fetch task failed"),
            }
        }

        debug!(fetched = fetched.len(), "document contents fetched");
        fetched
    }
}

/// GET a URL and split the body on `\n`.
async fn fetch_lines(client: &Client, url: &str) -> Result<Vec<String>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| MinutegenError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MinutegenError::Network(format!("{url}: HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| MinutegenError::Network(format!("{url}: body read failed: {e}")))?;

    Ok(body.split('\n').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params(server_uri: &str) -> Params {
        let toml_str = format!(
            r#"
scope = "pm-wg"
listing_url = "{server_uri}/repos/{{scope}}/contents/minutes"
content_url = "{server_uri}/{{scope}}/{{path}}"

[index]
template = "t.html"
slot_id = "list-of-calls"
output = "index.html"
empty_message = "No meeting records available."

[resolutions]
template = "r.html"
slot_id = "list-of-resolutions"
output = "resolutions.html"
empty_message = "No resolutions have been taken."

[[task_forces]]
key = ""
name = "Plenary"

[[task_forces]]
key = "f2f"
name = "Face-to-face"
"#
        );
        toml::from_str(&toml_str).expect("test params")
    }

    fn listing_body() -> serde_json::Value {
        serde_json::json!([
            { "name": "2023-01-09.html", "path": "minutes/2023-01-09.html", "sha": "aa" },
            { "name": "index.html", "path": "minutes/index.html", "sha": "bb" },
            { "name": "2024-02-05-f2f.html", "path": "minutes/2024-02-05-f2f.html", "sha": "cc" },
            { "name": "2024-01-08.html", "path": "minutes/2024-01-08.html", "sha": "dd" },
            { "name": "resolutions.html", "path": "minutes/resolutions.html", "sha": "ee" },
            { "name": "notes.html", "path": "minutes/notes.html", "sha": "ff" }
        ])
    }

    #[tokio::test]
    async fn list_minutes_sorts_filters_and_maps() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/repos/pm-wg/contents/minutes"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(listing_body()))
            .mount(&server)
            .await;

        let harvester = Harvester::new(&test_params(&server.uri())).unwrap();
        let records = harvester.list_minutes().await.unwrap();

        // index/resolutions/undateable names are gone; order is descending by name
        let names: Vec<&str> = records.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["2024-02-05-f2f.html", "2024-01-08.html", "2023-01-09.html"]
        );

        assert_eq!(records[0].task_force, "f2f");
        assert_eq!(records[1].task_force, "");
        assert_eq!(
            records[0].url,
            format!("{}/pm-wg/minutes/2024-02-05-f2f.html", server.uri())
        );
    }

    #[tokio::test]
    async fn list_minutes_absorbs_non_success_status() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/repos/pm-wg/contents/minutes"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let harvester = Harvester::new(&test_params(&server.uri())).unwrap();
        let records = harvester.list_minutes().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn list_minutes_absorbs_undecodable_body() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/repos/pm-wg/contents/minutes"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
            .mount(&server)
            .await;

        let harvester = Harvester::new(&test_params(&server.uri())).unwrap();
        let records = harvester.list_minutes().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn fetch_content_splits_lines() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/doc.html"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_string("<html>\n<body>\n</body>\n</html>"),
            )
            .mount(&server)
            .await;

        let harvester = Harvester::new(&test_params(&server.uri())).unwrap();
        let lines = harvester
            .fetch_content(&format!("{}/doc.html", server.uri()))
            .await
            .unwrap();
        assert_eq!(lines, vec!["<html>", "<body>", "</body>", "</html>"]);
    }

    #[tokio::test]
    async fn fetch_all_skips_failing_documents() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/good.html"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/gone.html"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let harvester = Harvester::new(&test_params(&server.uri())).unwrap();
        let records = vec![
            MinutesRecord::from_file_name("2024-01-08.html", format!("{}/good.html", server.uri()))
                .unwrap(),
            MinutesRecord::from_file_name("2024-01-15.html", format!("{}/gone.html", server.uri()))
                .unwrap(),
        ];

        let fetched = harvester.fetch_all(records).await;
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].0.file_name, "2024-01-08.html");
        assert_eq!(fetched[0].1, vec!["ok"]);
    }
}
