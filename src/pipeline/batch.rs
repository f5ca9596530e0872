// src/pipeline/batch.rs

//! Sequential batch pipeline.
//!
//! Each query runs to completion (search or lookup, rank, select, fetch,
//! log) before the next one starts. Per-query failures are reported and
//! counted; only filesystem setup and markup schema errors end the run.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::{BatchStats, Candidate, Config, Query, Selection};
use crate::services::{CandidateExtractor, CatalogClient, Fetcher, Selector, rank};
use crate::storage::{LocalStorage, RunLog};
use crate::utils::http::Transport;
use crate::utils::log::{Event, Reporter};

/// One configured batch run.
pub struct Batch<'a> {
    catalog: CatalogClient,
    extractor: CandidateExtractor,
    selector: Selector,
    fetcher: Fetcher,
    storage: LocalStorage,
    run_log: Option<RunLog>,
    reporter: &'a dyn Reporter,
    request_delay: Duration,
}

impl<'a> Batch<'a> {
    pub fn new(
        config: &Config,
        transport: Arc<dyn Transport>,
        selector: Selector,
        storage: LocalStorage,
        reporter: &'a dyn Reporter,
    ) -> Result<Self> {
        Ok(Self {
            catalog: CatalogClient::new(config, transport.clone())?,
            extractor: CandidateExtractor::new(config)?,
            fetcher: Fetcher::new(transport, selector.mode()),
            selector,
            storage,
            run_log: None,
            reporter,
            request_delay: Duration::from_millis(config.catalog.request_delay_ms),
        })
    }

    /// Record stored artifacts in the batch's run log. Ignored for dry runs.
    pub fn with_run_log(mut self, enabled: bool) -> Self {
        self.run_log = (enabled && !self.selector.mode().is_dry_run())
            .then(|| self.storage.run_log());
        self
    }

    /// Process every query in order and return the per-outcome counters.
    pub async fn run(&mut self, queries: &[Query]) -> Result<BatchStats> {
        let mode = self.selector.mode();
        self.storage.prepare(mode.is_dry_run()).await?;

        let mut stats = BatchStats {
            total: queries.len(),
            ..BatchStats::default()
        };
        self.reporter.report(&Event::BatchStarted {
            total: queries.len(),
            mode,
        });

        for (i, query) in queries.iter().enumerate() {
            if i > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
            self.reporter.report(&Event::QueryStarted {
                index: i + 1,
                total: queries.len(),
                query,
            });
            self.process(query, &mut stats).await?;
        }

        self.reporter.report(&Event::Finished(&stats));
        Ok(stats)
    }

    async fn process(&mut self, query: &Query, stats: &mut BatchStats) -> Result<()> {
        let selection = match &query.explicit_code {
            Some(code) => match self.catalog.fetch_by_code(code).await {
                Ok(candidate) => {
                    self.reporter.report(&Event::LookedUp { query, code });
                    Selection::Chosen(candidate)
                }
                Err(error) => {
                    self.reporter.report(&Event::LookupFailed { query, error: &error });
                    stats.failed += 1;
                    return Ok(());
                }
            },
            None => {
                let candidates = self.search(query).await?;
                self.selector.select(rank(candidates), self.reporter)?
            }
        };

        match selection {
            Selection::NotFound => {
                self.reporter.report(&Event::NotFound { query });
                stats.not_found += 1;
            }
            Selection::Skipped => {
                self.reporter.report(&Event::Skipped { query });
                stats.skipped += 1;
            }
            Selection::Chosen(candidate) => self.fetch(&candidate, stats).await,
        }
        Ok(())
    }

    /// Run every search text of `query`, merging candidates by code in first-seen order.
    async fn search(&self, query: &Query) -> Result<Vec<Candidate>> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for text in query.search_texts() {
            let rows = self.catalog.search(text).await;
            let mut found = 0;
            for row in &rows {
                let Some(candidate) = self.extractor.extract(row)? else {
                    continue;
                };
                found += 1;
                if seen.insert(candidate.code.clone()) {
                    candidates.push(candidate);
                }
            }
            self.reporter.report(&Event::Searched { query, found });
        }

        Ok(candidates)
    }

    async fn fetch(&self, candidate: &Candidate, stats: &mut BatchStats) {
        let destination = self.storage.artifact_path(candidate);

        let outcome = match self.fetcher.fetch(candidate, &destination).await {
            Ok(outcome) => outcome,
            Err(error) => {
                self.reporter.report(&Event::FetchFailed { candidate, error: &error });
                stats.failed += 1;
                return;
            }
        };

        stats.record(outcome);
        self.reporter.report(&Event::Fetched { candidate, outcome });

        if !outcome.is_stored() {
            return;
        }
        if let Some(run_log) = &self.run_log {
            if let Err(e) = run_log.append(candidate).await {
                log::warn!("Could not write {}: {}", run_log.path().display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Mode, Track};
    use crate::utils::testing::{FakeTransport, RecordingReporter, ScriptedPrompt};
    use tempfile::TempDir;

    const DETAIL_URL: &str = "https://bsaber.com/songs/XYZ99";
    const LOOKUP_ZIP: &str = "https://beatsaver.com/api/download/key/XYZ99";
    const SEARCH_URL: &str = "https://bsaber.com/?s=One+More+Time&orderby=relevance&order=DESC";
    const SEARCH_ZIP: &str = "https://bsaber.com/api/download/key/bbb";

    const DETAIL_PAGE: &str = r#"
        <html><body><header class="post-title"><h1>Angel Voices</h1></header></body></html>"#;

    fn row(code: &str, title: &str, up: u64, down: u64) -> String {
        format!(
            r#"<div class="row">
                 <header class="post-title"><a href="/songs/{code}/">{title}</a></header>
                 <span class="post-stat">0</span>
                 <span class="post-stat">{up}</span>
                 <span class="post-stat">{down}</span>
                 <time content="2020-05-01T12:30:00+00:00"></time>
                 <a class="-download-zip" href="/api/download/key/{code}">Download</a>
               </div>"#
        )
    }

    fn page(rows: &[String]) -> String {
        format!("<html><body>{}</body></html>", rows.concat())
    }

    fn search_page() -> String {
        page(&[
            row("aaa", "One More Time (Remix)", 10, 5),
            r#"<div class="row"><div class="widget">ad</div></div>"#.to_string(),
            row("bbb", "One More Time", 100, 1),
        ])
    }

    fn transport() -> Arc<FakeTransport> {
        Arc::new(
            FakeTransport::new()
                .with_page(DETAIL_URL, DETAIL_PAGE)
                .with_page(SEARCH_URL, search_page())
                .with_file(LOOKUP_ZIP, b"PK angel")
                .with_file(SEARCH_ZIP, b"PK daft"),
        )
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.catalog.request_delay_ms = 0;
        config
    }

    fn queries() -> Vec<Query> {
        vec![
            Query::normalize("Angel Voices #XYZ99"),
            Query::normalize("One More Time"),
        ]
    }

    fn batch<'a>(
        transport: Arc<FakeTransport>,
        mode: Mode,
        answers: &[&str],
        root: &std::path::Path,
        reporter: &'a RecordingReporter,
    ) -> Batch<'a> {
        let selector = Selector::new(mode, Box::new(ScriptedPrompt::new(answers)));
        let storage = LocalStorage::new(root, Some("pack".to_string()));
        Batch::new(&config(), transport, selector, storage, reporter).unwrap()
    }

    #[tokio::test]
    async fn test_auto_downloads_then_reports_already_present() {
        let tmp = TempDir::new().unwrap();
        let transport = transport();
        let reporter = RecordingReporter::default();

        let stats = batch(transport.clone(), Mode::Auto, &[], tmp.path(), &reporter)
            .with_run_log(true)
            .run(&queries())
            .await
            .unwrap();

        assert_eq!(stats.downloaded, 2);
        assert_eq!(
            transport.requests(),
            vec![DETAIL_URL, LOOKUP_ZIP, SEARCH_URL, SEARCH_ZIP]
        );
        assert_eq!(
            reporter.events(),
            vec![
                "start 2 auto",
                "query Angel Voices",
                "lookup XYZ99",
                "fetched XYZ99 Downloaded",
                "query One More Time",
                "searched 2",
                "fetched bbb Downloaded",
                "finished",
            ]
        );

        let pack = tmp.path().join("pack");
        assert_eq!(std::fs::read(pack.join("Angel_Voices.zip")).unwrap(), b"PK angel");
        assert_eq!(std::fs::read(pack.join("One_More_Time.zip")).unwrap(), b"PK daft");
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("pack.log")).unwrap(),
            "Angel Voices #XYZ99\nOne More Time #bbb\n"
        );

        let reporter = RecordingReporter::default();
        let again = Arc::new(
            FakeTransport::new()
                .with_page(DETAIL_URL, DETAIL_PAGE)
                .with_page(SEARCH_URL, search_page()),
        );
        let stats = batch(again.clone(), Mode::Auto, &[], tmp.path(), &reporter)
            .with_run_log(true)
            .run(&queries())
            .await
            .unwrap();

        assert_eq!(stats.already_present, 2);
        assert_eq!(stats.downloaded, 0);
        assert_eq!(again.requests(), vec![DETAIL_URL, SEARCH_URL]);
        let log = std::fs::read_to_string(tmp.path().join("pack.log")).unwrap();
        assert_eq!(log.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_run_log_off_by_default() {
        let tmp = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();

        batch(transport(), Mode::Auto, &[], tmp.path(), &reporter)
            .run(&queries())
            .await
            .unwrap();

        assert!(tmp.path().join("pack").join("One_More_Time.zip").exists());
        assert!(!tmp.path().join("pack.log").exists());
    }

    #[tokio::test]
    async fn test_dry_run_matches_without_writing() {
        let tmp = TempDir::new().unwrap();
        let transport = transport();
        let reporter = RecordingReporter::default();

        let stats = batch(transport.clone(), Mode::Test, &[], tmp.path(), &reporter)
            .with_run_log(true)
            .run(&queries())
            .await
            .unwrap();

        assert_eq!(stats.matched, 2);
        assert!(reporter.events().contains(&"fetched XYZ99 MatchedOnly".to_string()));
        assert!(reporter.events().contains(&"fetched bbb MatchedOnly".to_string()));
        assert_eq!(transport.requests(), vec![DETAIL_URL, SEARCH_URL]);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_list_mode_uses_operator_choice() {
        let tmp = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();
        let queries = vec![Query::normalize("One More Time")];

        let stats = batch(transport(), Mode::List, &["x", "2"], tmp.path(), &reporter)
            .run(&queries)
            .await
            .unwrap();

        // ranked: bbb (2/101) before aaa (6/11)
        assert_eq!(stats.downloaded, 0);
        assert_eq!(stats.failed, 1);
        assert!(reporter.events().contains(&"candidates 2".to_string()));
        assert!(reporter.events().contains(&"invalid x".to_string()));
        assert!(reporter.events().contains(&"fetch-failed aaa".to_string()));
    }

    #[tokio::test]
    async fn test_failed_lookup_does_not_stop_batch() {
        let tmp = TempDir::new().unwrap();
        let reporter = RecordingReporter::default();
        let queries = vec![
            Query::normalize("Gone #missing"),
            Query::normalize("One More Time"),
        ];

        let stats = batch(transport(), Mode::Auto, &[], tmp.path(), &reporter)
            .run(&queries)
            .await
            .unwrap();

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.downloaded, 1);
        assert!(reporter.events().contains(&"lookup-failed".to_string()));
    }

    #[tokio::test]
    async fn test_no_results_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let url = "https://bsaber.com/?s=Nothing&orderby=relevance&order=DESC";
        let transport = Arc::new(FakeTransport::new().with_page(url, page(&[])));
        let reporter = RecordingReporter::default();

        let stats = batch(transport, Mode::Auto, &[], tmp.path(), &reporter)
            .run(&[Query::normalize("Nothing")])
            .await
            .unwrap();

        assert_eq!(stats.not_found, 1);
        assert!(reporter.events().contains(&"not-found".to_string()));
    }

    #[tokio::test]
    async fn test_schema_mismatch_aborts_batch() {
        let tmp = TempDir::new().unwrap();
        let broken = page(&[r#"<div class="row"><header><a href="/songs/zz/">No date</a></header></div>"#
            .to_string()]);
        let transport = Arc::new(FakeTransport::new().with_page(SEARCH_URL, broken));
        let reporter = RecordingReporter::default();

        let queries = vec![Query::normalize("One More Time"), Query::normalize("Angel Voices #XYZ99")];
        let err = batch(transport.clone(), Mode::Auto, &[], tmp.path(), &reporter)
            .run(&queries)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Schema { .. }));
        assert_eq!(transport.requests(), vec![SEARCH_URL]);
        assert!(!reporter.events().contains(&"finished".to_string()));
    }

    #[tokio::test]
    async fn test_missing_root_fails_before_network() {
        let tmp = TempDir::new().unwrap();
        let transport = transport();
        let reporter = RecordingReporter::default();

        let err = batch(transport.clone(), Mode::Auto, &[], &tmp.path().join("absent"), &reporter)
            .run(&queries())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Filesystem { .. }));
        assert!(transport.requests().is_empty());
        assert!(reporter.events().is_empty());
    }

    #[tokio::test]
    async fn test_track_query_merges_both_searches() {
        let tmp = TempDir::new().unwrap();
        let with_artist = "https://bsaber.com/?s=Uprising+Muse&orderby=relevance&order=DESC";
        let title_only = "https://bsaber.com/?s=Uprising&orderby=relevance&order=DESC";
        let transport = Arc::new(
            FakeTransport::new()
                .with_page(with_artist, page(&[row("aa", "Uprising", 5, 5)]))
                .with_page(
                    title_only,
                    page(&[row("cc", "Uprising (Live)", 1, 9), row("aa", "Uprising", 5, 5)]),
                ),
        );
        let reporter = RecordingReporter::default();
        let track = Track {
            title: "Uprising (Remastered)".to_string(),
            artist: "Muse".to_string(),
        };

        let stats = batch(transport.clone(), Mode::List, &["0"], tmp.path(), &reporter)
            .run(&[Query::from_track(&track)])
            .await
            .unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(transport.requests(), vec![with_artist, title_only]);
        assert_eq!(
            reporter.events(),
            vec![
                "start 1 list",
                "query Uprising Muse",
                "searched 1",
                "searched 2",
                "candidates 2",
                "skipped",
                "finished",
            ]
        );
    }
}
