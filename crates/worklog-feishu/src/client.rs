//! Feishu Open API client
//!
//! Reads calendar events, lists drive files, reads and writes docx documents,
//! and implements the worklog collaborator seams on top of those calls.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Utc};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use worklog_core::{
    CalendarSource, Event, NoteDocument, NoteStore, PublishedReport, RenderStyle, ReportPeriod,
    ReportSink, ReportWindow, WorklogError,
};

use crate::blocks::{batch_size, blocks_for, extract_text};
use crate::config::FeishuConfig;
use crate::error::{into_core, FeishuError, Result};
use crate::model::{
    parse_unix_seconds, ApiResponse, AppendChildrenRequest, Block, CalendarEvent,
    CreateDocumentRequest, CreatedDocument, DriveFile, Page,
};

const EVENTS_PAGE_SIZE: &str = "100";
const FILES_PAGE_SIZE: &str = "200";
const BLOCKS_PAGE_SIZE: &str = "500";

/// Feishu client for calendar, drive and docx operations
pub struct FeishuClient {
    config: FeishuConfig,
    http: reqwest::Client,
}

impl FeishuClient {
    /// Create a new client
    pub fn new(config: FeishuConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("worklog/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(FeishuClient { config, http })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(FeishuConfig::from_env())
    }

    pub fn config(&self) -> &FeishuConfig {
        &self.config
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let base = &self.config.base_url;
        let mut url =
            Url::parse(base).map_err(|e| FeishuError::Http(format!("invalid base url {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| FeishuError::Http(format!("base url cannot hold a path: {base}")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Parse the envelope; non-JSON bodies with an error status become
    /// [`FeishuError::Http`].
    async fn decode(response: reqwest::Response) -> Result<ApiResponse> {
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<ApiResponse>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(FeishuError::Http(format!("{status}: {body}"))),
            Err(e) => Err(e.into()),
        }
    }

    /// Follow `page_token` until the listing is exhausted. A token the server
    /// already handed out ends the listing.
    async fn get_all<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let token = self.config.token()?;
        let mut items = Vec::new();
        let mut seen = HashSet::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self.http.get(url.clone()).bearer_auth(token).query(query);
            if let Some(next) = &page_token {
                request = request.query(&[("page_token", next.as_str())]);
            }
            let page: Page<T> = Self::decode(request.send().await?).await?.into_data()?;
            items.extend(page.items);
            match page.page_token {
                Some(next) if page.has_more && !next.is_empty() => {
                    if !seen.insert(next.clone()) {
                        warn!(url = %url, page_token = %next, "page token repeated, stopping");
                        break;
                    }
                    page_token = Some(next);
                }
                _ => break,
            }
        }
        Ok(items)
    }

    /// Raw events of the configured calendar inside `window`.
    pub async fn list_events(&self, window: &ReportWindow) -> Result<Vec<CalendarEvent>> {
        let url = self.url(&["calendar", "v4", "calendars", self.config.calendar()?, "events"])?;
        let start = window.start_timestamp().to_string();
        let end = window.end_timestamp().to_string();
        let events: Vec<CalendarEvent> = self
            .get_all(
                url,
                &[
                    ("start_time", start.as_str()),
                    ("end_time", end.as_str()),
                    ("page_size", EVENTS_PAGE_SIZE),
                ],
            )
            .await?;
        debug!(count = events.len(), "listed calendar events");
        Ok(events)
    }

    /// Drive files of `folder`, or of the drive root.
    pub async fn list_files(&self, folder: Option<&str>) -> Result<Vec<DriveFile>> {
        let url = self.url(&["drive", "v1", "files"])?;
        let mut query = vec![("page_size", FILES_PAGE_SIZE)];
        if let Some(folder) = folder {
            query.push(("folder_token", folder));
        }
        let files: Vec<DriveFile> = self.get_all(url, &query).await?;
        debug!(count = files.len(), folder = ?folder, "listed drive files");
        Ok(files)
    }

    /// All blocks of a document, page root first.
    pub async fn document_blocks(&self, document_id: &str) -> Result<Vec<Block>> {
        let url = self.url(&["docx", "v1", "documents", document_id, "blocks"])?;
        self.get_all(url, &[("page_size", BLOCKS_PAGE_SIZE)]).await
    }

    pub async fn read_document_text(&self, document_id: &str) -> Result<String> {
        Ok(extract_text(&self.document_blocks(document_id).await?))
    }

    /// Create an empty document and return its id.
    pub async fn create_document(&self, title: &str, folder: Option<&str>) -> Result<String> {
        let url = self.url(&["docx", "v1", "documents"])?;
        let response = self
            .http
            .post(url)
            .bearer_auth(self.config.token()?)
            .json(&CreateDocumentRequest {
                title,
                folder_token: folder,
            })
            .send()
            .await?;
        let created: CreatedDocument = Self::decode(response).await?.into_data()?;
        info!(document_id = %created.document.document_id, title = %title, "created document");
        Ok(created.document.document_id)
    }

    /// Block id of the page root, the first block of the listing.
    pub async fn root_block_id(&self, document_id: &str) -> Result<String> {
        self.document_blocks(document_id)
            .await?
            .into_iter()
            .next()
            .and_then(|b| b.block_id)
            .ok_or(FeishuError::MissingField("items[0].block_id"))
    }

    /// Append `blocks` under `parent` in requests of at most `batch` children.
    pub async fn append_blocks(
        &self,
        document_id: &str,
        parent: &str,
        blocks: &[Block],
        batch: usize,
    ) -> Result<()> {
        let url = self.url(&["docx", "v1", "documents", document_id, "blocks", parent, "children"])?;
        let token = self.config.token()?;
        for (i, chunk) in blocks.chunks(batch.max(1)).enumerate() {
            let response = self
                .http
                .post(url.clone())
                .bearer_auth(token)
                .json(&AppendChildrenRequest { children: chunk })
                .send()
                .await?;
            Self::decode(response).await?.into_result()?;
            debug!(batch = i, size = chunk.len(), "appended blocks");
        }
        Ok(())
    }

    fn published(&self, document_id: String, title: &str) -> PublishedReport {
        PublishedReport {
            url: self.config.document_url(&document_id),
            document_id,
            title: title.to_string(),
        }
    }

    async fn events_in(&self, window: &ReportWindow) -> Result<Vec<Event>> {
        let offset = window.start.timezone();
        let mut events = Vec::new();
        for raw in self.list_events(window).await? {
            let title = raw.summary.unwrap_or_default();
            match raw.start_time.resolve(offset) {
                Ok(start) => events.push(Event::new(title, start)),
                Err(err) => {
                    warn!(title = %title, error = %err, "skipping event without a usable start time")
                }
            }
        }
        Ok(events)
    }

    async fn note_documents(&self) -> Result<Vec<NoteDocument>> {
        let utc: FixedOffset = Utc.fix();
        let files = self.list_files(self.config.notes_folder.as_deref()).await?;
        let documents = files
            .into_iter()
            .filter_map(|file| {
                let created = file.created_time.as_deref()?;
                match parse_unix_seconds(created, utc) {
                    Ok(created_at) => Some(NoteDocument {
                        token: file.token,
                        name: file.name,
                        kind: file.kind,
                        created_at,
                    }),
                    Err(err) => {
                        debug!(name = %file.name, error = %err, "ignoring file with bad creation time");
                        None
                    }
                }
            })
            .collect();
        Ok(documents)
    }

    async fn existing_report(
        &self,
        period: ReportPeriod,
        title: &str,
    ) -> Result<Option<PublishedReport>> {
        let folder = self.config.report_folder(period)?;
        let found = self
            .list_files(Some(folder))
            .await?
            .into_iter()
            .find(|file| file.name == title);
        Ok(found.map(|file| self.published(file.token, title)))
    }

    async fn publish_report(
        &self,
        period: ReportPeriod,
        title: &str,
        rendered: &str,
        style: RenderStyle,
    ) -> Result<PublishedReport> {
        let folder = self.config.report_folder(period)?;
        let document_id = self.create_document(title, Some(folder)).await?;
        let root = self.root_block_id(&document_id).await?;
        let blocks = blocks_for(rendered, style);
        self.append_blocks(&document_id, &root, &blocks, batch_size(style))
            .await?;
        info!(
            document_id = %document_id,
            blocks = blocks.len(),
            style = %style,
            "report written"
        );
        Ok(self.published(document_id, title))
    }
}

#[async_trait]
impl CalendarSource for FeishuClient {
    async fn events(&self, window: &ReportWindow) -> worklog_core::Result<Vec<Event>> {
        self.events_in(window)
            .await
            .map_err(|e| into_core(e, WorklogError::Source))
    }
}

#[async_trait]
impl NoteStore for FeishuClient {
    async fn list_documents(&self) -> worklog_core::Result<Vec<NoteDocument>> {
        self.note_documents()
            .await
            .map_err(|e| into_core(e, WorklogError::NoteStore))
    }

    async fn read_text(&self, doc: &NoteDocument) -> worklog_core::Result<String> {
        self.read_document_text(&doc.token)
            .await
            .map_err(|e| into_core(e, WorklogError::NoteStore))
    }
}

#[async_trait]
impl ReportSink for FeishuClient {
    async fn find_existing(
        &self,
        period: ReportPeriod,
        title: &str,
    ) -> worklog_core::Result<Option<PublishedReport>> {
        self.existing_report(period, title)
            .await
            .map_err(|e| into_core(e, WorklogError::Sink))
    }

    async fn publish(
        &self,
        period: ReportPeriod,
        title: &str,
        rendered: &str,
        style: RenderStyle,
    ) -> worklog_core::Result<PublishedReport> {
        self.publish_report(period, title, rendered, style)
            .await
            .map_err(|e| into_core(e, WorklogError::Sink))
    }
}
