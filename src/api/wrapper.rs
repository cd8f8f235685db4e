//! Box content wrapper
//!
//! [`BoxApiWrapper`] owns the credentials and transport settings for one
//! configuration and turns Box API calls into [`Document`]s. The
//! authenticated client is resolved on first use. A configuration or
//! authentication failure is remembered and replayed on every later call;
//! an unreachable token endpoint is retried on the next call.

use super::extensions::is_document_extension;
use super::models::{
    AiAskRequest, AiItem, AiResponse, CurrentUser, FileRepresentations, FolderEntry,
    MetadataQueryEntry, RepresentationInfo, RepresentationState, SearchEntry, TextRepresentation,
};
use crate::auth::{BoxClient, CredentialResolver, Credentials};
use crate::config::{BoxConfig, ClientSettings};
use crate::document::{Document, DocumentStream};
use crate::error::{Error, ErrorKind, Result, ResultExt};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{collect_pages, MarkerPaginator, OffsetPaginator, PageCursor};
use crate::query::QueryDescriptor;
use crate::types::{AiMode, ItemType, JsonObject};
use futures::{future, stream, Stream, StreamExt, TryStreamExt};
use reqwest::Method;
use serde::Serialize;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

const EXTRACTED_TEXT: &str = "extracted_text";
const ASSET_PATH_PLACEHOLDER: &str = "{+asset_path}";

/// Largest `offset` the search endpoint accepts
pub const SEARCH_MAX_OFFSET: u64 = 10_000;

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Who the credentials act as
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<CurrentUser>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success(user: CurrentUser) -> Self {
        Self {
            success: true,
            message: None,
            user: Some(user),
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            user: None,
        }
    }
}

/// Lifecycle of the authenticated client
#[derive(Debug)]
enum ClientState {
    Unresolved,
    Resolved(Arc<BoxClient>),
    Failed { kind: ErrorKind, message: String },
}

/// Box API operations that produce documents
#[derive(Debug)]
pub struct BoxApiWrapper {
    credentials: Credentials,
    settings: ClientSettings,
    state: Mutex<ClientState>,
}

impl BoxApiWrapper {
    /// Create a wrapper; no network access happens until the first call
    pub fn new(credentials: Credentials, settings: ClientSettings) -> Self {
        Self {
            credentials,
            settings,
            state: Mutex::new(ClientState::Unresolved),
        }
    }

    /// Validate the credentials in `config` and create a wrapper.
    ///
    /// Secrets missing from `config` are read from the `BOX_*` environment
    /// variables.
    pub fn from_config(config: &BoxConfig) -> Result<Self> {
        Self::from_config_with_lookup(config, |key| std::env::var(key).ok())
    }

    /// Like [`BoxApiWrapper::from_config`], reading missing secrets from `lookup`
    pub fn from_config_with_lookup<F>(config: &BoxConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Credentials::from_config(&config.clone().with_lookup(lookup))?;
        Ok(Self::new(credentials, config.client.clone()))
    }

    /// Credentials this wrapper authenticates with
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Transport settings
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// The authenticated client, resolving it on first use
    pub async fn client(&self) -> Result<Arc<BoxClient>> {
        let mut state = self.state.lock().await;
        match &*state {
            ClientState::Resolved(client) => return Ok(Arc::clone(client)),
            ClientState::Failed { kind, message } => {
                return Err(replay_failure(*kind, message));
            }
            ClientState::Unresolved => {}
        }

        let resolver = CredentialResolver::new(self.settings.clone());
        match resolver.resolve(&self.credentials).await {
            Ok(client) => {
                let client = Arc::new(client);
                *state = ClientState::Resolved(Arc::clone(&client));
                Ok(client)
            }
            Err(e) => {
                let kind = e.kind();
                if matches!(kind, ErrorKind::Configuration | ErrorKind::Authentication) {
                    warn!("Could not create Box client: {}", e);
                    *state = ClientState::Failed {
                        kind,
                        message: e.to_string(),
                    };
                } else {
                    warn!("Could not create Box client, retrying on next call: {}", e);
                }
                Err(e)
            }
        }
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Extracted text of a file, or `None` when Box has none for it.
    ///
    /// A representation that is not generated yet is requested and polled
    /// a bounded number of times before giving up.
    pub async fn get_text_representation(&self, file_id: &str) -> Result<Option<TextRepresentation>> {
        let client = self.client().await?;
        let http = client.http();

        let file: FileRepresentations = http
            .request_json(
                Method::GET,
                &format!("/files/{file_id}"),
                RequestConfig::new()
                    .query("fields", "name,representations,type")
                    .header("x-rep-hints", format!("[{EXTRACTED_TEXT}]")),
            )
            .await
            .api_context("getting text rep")?;

        let Some(entry) = file
            .representations
            .unwrap_or_default()
            .entries
            .into_iter()
            .find(|e| e.representation == EXTRACTED_TEXT)
        else {
            warn!("No text representation for file {}", file_id);
            return Ok(None);
        };

        let mut state = entry.state();
        if state.needs_generation() {
            if let Some(info) = &entry.info {
                state = self.await_representation(http, &info.url).await?;
            }
        }
        if !state.is_ready() {
            warn!(
                "Text representation for file {} is not available ({:?})",
                file_id, state
            );
            return Ok(None);
        }

        let Some(template) = entry.content else {
            warn!("Text representation for file {} has no content URL", file_id);
            return Ok(None);
        };
        let url = template.url_template.replace(ASSET_PATH_PLACEHOLDER, "");
        Url::parse(&url)?;

        let raw = http.get_text(&url).await.api_context("getting text rep")?;
        let content = truncate_chars(&raw, self.settings.text_limit);
        if content.len() < raw.len() {
            debug!(
                "Truncated text of file {} to {} characters",
                file_id, self.settings.text_limit
            );
        }

        Ok(Some(TextRepresentation {
            file_name: file.name.replace(['.', ' '], "_"),
            content,
            url,
        }))
    }

    /// Trigger generation through `info_url` and poll until Box settles
    async fn await_representation(&self, http: &HttpClient, info_url: &str) -> Result<RepresentationState> {
        let attempts = self.settings.representation_poll_attempts;
        let mut state = RepresentationState::None;

        for attempt in 0..=attempts {
            if attempt > 0 {
                tokio::time::sleep(self.settings.poll_interval()).await;
            }
            let info: RepresentationInfo = http
                .request_json(Method::GET, info_url, RequestConfig::new())
                .await
                .api_context("generating text rep")?;
            state = info.state();
            debug!("Representation state after {} polls: {:?}", attempt, state);
            if !state.needs_generation() {
                break;
            }
        }

        Ok(state)
    }

    /// Document for one file, or `None` when it has no text representation
    pub async fn get_document_by_file_id(&self, file_id: &str) -> Result<Option<Document>> {
        let rep = self.get_text_representation(file_id).await?;
        if rep.is_none() {
            info!("No text representation available for file {}, skipping", file_id);
        }
        Ok(rep.map(|r| Document::new(r.content, r.url, r.file_name)))
    }

    /// Documents for `file_ids`, in order, skipping files without text
    pub async fn get_documents_by_file_ids(&self, file_ids: &[String]) -> Result<Vec<Document>> {
        self.documents_for_ids(file_ids.to_vec()).try_collect().await
    }

    fn documents_for_ids<'a>(
        &'a self,
        file_ids: Vec<String>,
    ) -> impl Stream<Item = Result<Document>> + Send + 'a {
        stream::iter(file_ids)
            .then(move |id| async move { self.get_document_by_file_id(&id).await })
            .try_filter_map(|doc| future::ready(Ok(doc)))
    }

    // ========================================================================
    // Folders
    // ========================================================================

    /// Every entry of a folder, following all pages
    pub async fn get_folder_items(&self, folder_id: &str) -> Result<Vec<FolderEntry>> {
        let client = self.client().await?;
        let http = client.http();
        let paginator = OffsetPaginator::with_total_count(self.settings.page_size);
        let path = format!("/folders/{folder_id}/items");

        collect_pages(&paginator, self.settings.max_items, "folder items", |cursor| {
            let request = RequestConfig::new()
                .query("fields", "id,type,name")
                .query("limit", paginator.limit_value)
                .query("offset", offset_of(&cursor));
            let path = &path;
            async move { http.request_json(Method::GET, path, request).await }
        })
        .await
        .api_context("getting folder content")
    }

    /// Ids of the files in a folder, optionally descending into sub-folders
    pub async fn get_folder_file_ids(&self, folder_id: &str, recursive: bool) -> Result<Vec<String>> {
        let mut file_ids = Vec::new();
        let mut pending = VecDeque::from([folder_id.to_string()]);

        while let Some(current) = pending.pop_front() {
            for entry in self.get_folder_items(&current).await? {
                match entry.kind() {
                    Some(ItemType::File) => file_ids.push(entry.id),
                    Some(ItemType::Folder) if recursive => pending.push_back(entry.id),
                    _ => {}
                }
            }
        }

        debug!("Folder {} holds {} files", folder_id, file_ids.len());
        Ok(file_ids)
    }

    /// Documents for the files in a folder
    pub async fn get_documents_by_folder_id(&self, folder_id: &str, recursive: bool) -> Result<Vec<Document>> {
        let ids = self.get_folder_file_ids(folder_id, recursive).await?;
        self.get_documents_by_file_ids(&ids).await
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Ids of files matching `query` whose extension Box can extract text
    /// from, in the order Box ranked them
    pub async fn get_search_results(&self, query: &str) -> Result<Vec<String>> {
        let client = self.client().await?;
        let http = client.http();
        let paginator = OffsetPaginator::with_total_count(self.settings.page_size)
            .with_max_offset(SEARCH_MAX_OFFSET);

        let entries: Vec<SearchEntry> =
            collect_pages(&paginator, self.settings.max_items, "search results", |cursor| {
                let request = RequestConfig::new()
                    .query("query", query)
                    .query("fields", "id,type,extension")
                    .query("limit", paginator.limit_value)
                    .query("offset", offset_of(&cursor));
                async move { http.request_json(Method::GET, "/search", request).await }
            })
            .await
            .api_context("getting search results")?;

        let ids: Vec<String> = entries
            .into_iter()
            .filter(|e| {
                ItemType::parse(&e.item_type) == Some(ItemType::File)
                    && e.extension.as_deref().is_some_and(is_document_extension)
            })
            .map(|e| e.id)
            .collect();

        debug!("Search '{}' matched {} document files", query, ids.len());
        Ok(ids)
    }

    /// Documents for the files matching `query`
    pub async fn get_documents_by_search(&self, query: &str) -> Result<Vec<Document>> {
        let ids = self.get_search_results(query).await?;
        if ids.is_empty() {
            info!("Search '{}' found no document files", query);
        }
        self.get_documents_by_file_ids(&ids).await
    }

    // ========================================================================
    // Metadata queries
    // ========================================================================

    /// Ids of files matching a metadata query
    pub async fn get_metadata_query_results(
        &self,
        query: &str,
        template: &str,
        params: &JsonObject,
        enterprise_id: &str,
    ) -> Result<Vec<String>> {
        let client = self.client().await?;
        let http = client.http();
        let paginator = MarkerPaginator::new(self.settings.page_size, "next_marker");
        let from = format!("enterprise_{enterprise_id}.{template}");

        let entries: Vec<MetadataQueryEntry> =
            collect_pages(&paginator, self.settings.max_items, "metadata query", |cursor| {
                let mut body = json!({
                    "from": from,
                    "query": query,
                    "query_params": params,
                    "ancestor_folder_id": "0",
                    "limit": paginator.limit_value,
                });
                if let PageCursor::Marker(Some(marker)) = cursor {
                    body["marker"] = json!(marker);
                }
                async move {
                    http.request_json(
                        Method::POST,
                        "/metadata_queries/execute_read",
                        RequestConfig::new().json(body),
                    )
                    .await
                }
            })
            .await
            .api_context("getting metadata query results")?;

        Ok(entries
            .into_iter()
            .filter(|e| {
                e.item_type
                    .as_deref()
                    .map_or(true, |t| ItemType::parse(t) == Some(ItemType::File))
            })
            .map(|e| e.id)
            .collect())
    }

    /// Documents for the files matching a metadata query
    pub async fn get_documents_by_metadata_query(
        &self,
        query: &str,
        template: &str,
        params: &JsonObject,
        enterprise_id: &str,
    ) -> Result<Vec<Document>> {
        let ids = self
            .get_metadata_query_results(query, template, params, enterprise_id)
            .await?;
        self.get_documents_by_file_ids(&ids).await
    }

    // ========================================================================
    // Box AI
    // ========================================================================

    /// Ask Box AI about `file_ids` and return the bare answer
    pub async fn ask_ai_answer(&self, prompt: &str, file_ids: &[String]) -> Result<String> {
        let mode = AiMode::for_item_count(file_ids.len())
            .ok_or_else(|| Error::invalid_argument("Box AI ask requires at least one file id"))?;

        let client = self.client().await?;
        let request = AiAskRequest {
            mode,
            prompt: prompt.to_string(),
            items: file_ids.iter().map(AiItem::file).collect(),
        };
        debug!("Asking Box AI about {} files ({:?})", file_ids.len(), mode);

        let response: AiResponse = client
            .http()
            .request_json(
                Method::POST,
                "/ai/ask",
                RequestConfig::new().json(serde_json::to_value(&request)?),
            )
            .await
            .api_context("asking Box AI")?;

        Ok(response.answer)
    }

    /// Ask Box AI about `file_ids`; the answer comes back as a document
    pub async fn ask_ai(&self, prompt: &str, file_ids: &[String]) -> Result<Document> {
        let answer = self.ask_ai_answer(prompt, file_ids).await?;
        Ok(Document::box_ai_answer(prompt, answer))
    }

    // ========================================================================
    // Connection
    // ========================================================================

    /// The user the credentials act as
    pub async fn current_user(&self) -> Result<CurrentUser> {
        let client = self.client().await?;
        client
            .http()
            .request_json(Method::GET, "/users/me", RequestConfig::new())
            .await
            .api_context("getting current user")
    }

    /// Verify the credentials by fetching the current user
    pub async fn check(&self) -> Result<CheckResult> {
        match self.current_user().await {
            Ok(user) => Ok(CheckResult::success(user)),
            Err(e) => Ok(CheckResult::failure(e.to_string())),
        }
    }

    // ========================================================================
    // Streams
    // ========================================================================

    /// Lazily produce the documents for `query`.
    ///
    /// Nothing is requested until the stream is polled; listing calls
    /// (folder, search, metadata) run once and their files are then read
    /// one at a time.
    pub fn stream_documents<'a>(&'a self, query: &QueryDescriptor) -> DocumentStream<'a> {
        match query.clone() {
            QueryDescriptor::FileIds { ids } => self.documents_for_ids(ids).boxed(),

            QueryDescriptor::Folder { id, recursive } => {
                self.documents_for_listing(async move { self.get_folder_file_ids(&id, recursive).await })
            }

            QueryDescriptor::Search { query } => {
                self.documents_for_listing(async move { self.get_search_results(&query).await })
            }

            QueryDescriptor::MetadataQuery {
                query,
                template,
                params,
                enterprise_id,
            } => self.documents_for_listing(async move {
                self.get_metadata_query_results(&query, &template, &params, &enterprise_id)
                    .await
            }),

            QueryDescriptor::AiAsk { prompt, file_ids } => {
                stream::once(async move { self.ask_ai(&prompt, &file_ids).await }).boxed()
            }
        }
    }

    fn documents_for_listing<'a, F>(&'a self, listing: F) -> DocumentStream<'a>
    where
        F: std::future::Future<Output = Result<Vec<String>>> + Send + 'a,
    {
        stream::once(listing)
            .map_ok(move |ids| self.documents_for_ids(ids))
            .try_flatten()
            .boxed()
    }
}

/// Rebuild the error a failed resolution produced
fn replay_failure(kind: ErrorKind, message: &str) -> Error {
    Error::Replayed {
        kind,
        message: message.to_string(),
    }
}

fn offset_of(cursor: &PageCursor) -> u64 {
    match cursor {
        PageCursor::Offset(offset) => *offset,
        PageCursor::Marker(_) => 0,
    }
}

/// First `limit` characters of `text`
fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
