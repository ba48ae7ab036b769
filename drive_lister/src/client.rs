//! Folder-scoped Google Drive client.

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use tracing::{debug, info, instrument};

use crate::auth::Authenticator;
use crate::config::{DriveConfig, FolderTarget};
use crate::error::{DriveError, Result};
use crate::http::shared_client;
use crate::models::{ApiErrorResponse, FileListResponse, FileMetadata};
use crate::query::{self, FOLDER_LOOKUP_FIELDS, GET_FIELDS, LIST_FIELDS, ROOT_FOLDER_ID};

/// Base URL for Google Drive API v3.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Read-only client that lists and fetches files in one configured folder.
///
/// The target folder is resolved again on every listing call. When the folder
/// is configured by name, a rename or a duplicate created between two calls
/// changes which folder (if any) the second call sees.
///
/// Only [`list_all_files`](Self::list_all_files) follows continuation tokens;
/// [`list_files`](Self::list_files) returns the first page.
pub struct FolderLister {
    auth: Authenticator,
    http: Client,
    api_base: String,
    target: FolderTarget,
}

impl FolderLister {
    /// Create a lister using the process-wide HTTP client.
    ///
    /// Fails with [`DriveError::Configuration`] when the service account key
    /// is missing or blank, and with [`DriveError::CredentialsParseError`]
    /// when it is not a service account JSON document. The key itself is not
    /// exercised until the first request.
    pub fn new(config: &DriveConfig) -> Result<Self> {
        Self::with_client(config, shared_client())
    }

    /// Create a lister that sends requests through `http`.
    pub fn with_client(config: &DriveConfig, http: Client) -> Result<Self> {
        config.validate()?;

        let mut auth = Authenticator::from_json(&config.service_account_key, http.clone())?;
        if let Some(user) = config.impersonate_user() {
            auth = auth.delegated(user);
        }

        let target = config.folder_target();
        info!(
            client_email = auth.client_email(),
            delegated = auth.subject().is_some(),
            folder = ?target,
            "created folder lister"
        );

        Ok(Self {
            auth,
            http,
            api_base: DRIVE_API_BASE.to_string(),
            target,
        })
    }

    /// Send API requests to `api_base` instead of the public Drive endpoint.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// The unresolved folder policy this lister was built with.
    pub fn folder_target(&self) -> &FolderTarget {
        &self.target
    }

    /// Resolve the configured folder to an id.
    ///
    /// An explicit id is returned as-is without checking that it exists; a
    /// name triggers [`find_folder_by_name`](Self::find_folder_by_name); with
    /// neither, the root alias is returned.
    pub async fn resolve_folder_id(&self) -> Result<String> {
        match &self.target {
            FolderTarget::Id(id) => Ok(id.clone()),
            FolderTarget::Name(name) => self.find_folder_by_name(name).await,
            FolderTarget::Root => Ok(ROOT_FOLDER_ID.to_string()),
        }
    }

    /// Find the id of the only non-trashed folder called `name`.
    #[instrument(skip(self))]
    pub async fn find_folder_by_name(&self, name: &str) -> Result<String> {
        let query = query::folder_named(name);
        let response = self.query_page(&query, FOLDER_LOOKUP_FIELDS, None).await?;

        let mut folders = response.files;
        match folders.len() {
            0 => Err(DriveError::NotFound(format!("Folder not found: {}", name))),
            1 => {
                let folder = folders.remove(0);
                debug!(folder_id = %folder.id, "resolved folder by name");
                Ok(folder.id)
            }
            matches => Err(DriveError::AmbiguousName {
                name: name.to_string(),
                matches,
            }),
        }
    }

    /// List the first page of files directly inside the target folder,
    /// optionally restricted to one mime type.
    #[instrument(skip(self))]
    pub async fn list_files(&self, mime_type: Option<&str>) -> Result<Vec<FileMetadata>> {
        let folder_id = self.resolve_folder_id().await?;
        let query = query::folder_children(&folder_id, mime_type);
        let response = self.query_page(&query, LIST_FIELDS, None).await?;

        if response.next_page_token.is_some() {
            debug!(folder_id = %folder_id, "more results available; returning first page only");
        }

        Ok(response.files)
    }

    /// Like [`list_files`](Self::list_files), but follows continuation tokens
    /// until every page has been read.
    #[instrument(skip(self))]
    pub async fn list_all_files(&self, mime_type: Option<&str>) -> Result<Vec<FileMetadata>> {
        let folder_id = self.resolve_folder_id().await?;
        let query = query::folder_children(&folder_id, mime_type);

        let mut all_files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let response = self
                .query_page(&query, LIST_FIELDS, page_token.as_deref())
                .await?;
            all_files.extend(response.files);

            match response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(all_files)
    }

    /// Get file metadata by ID, including its parent folder ids.
    ///
    /// An id that does not exist, or that the credential cannot see, fails
    /// with [`DriveError::NotFound`]. The id is always sent as one escaped
    /// path segment.
    #[instrument(skip(self))]
    pub async fn get_file(&self, file_id: &str) -> Result<FileMetadata> {
        // Dot segments would be dropped from the path rather than escaped.
        if matches!(file_id, "" | "." | "..") {
            return Err(DriveError::NotFound(format!("File not found: {:?}", file_id)));
        }

        let url = self.endpoint(&["files", file_id])?;
        let token = self.auth.get_access_token().await?;

        let request = self
            .http
            .get(url)
            .bearer_auth(&token)
            .query(&[("fields", GET_FIELDS)]);

        let response = send(request).await;
        match response {
            Err(DriveError::ApiError { status: 404, .. }) => {
                Err(DriveError::NotFound(format!("File not found: {}", file_id)))
            }
            other => Ok(other?.json().await?),
        }
    }

    /// Build `<api_base>/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let invalid_base = || {
            DriveError::Configuration(format!("invalid API base URL: {}", self.api_base))
        };

        let mut url = Url::parse(&self.api_base).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue one `files.list` request.
    async fn query_page(
        &self,
        query: &str,
        fields: &str,
        page_token: Option<&str>,
    ) -> Result<FileListResponse> {
        let token = self.auth.get_access_token().await?;
        debug!(q = query, fields, "listing files");

        let url = self.endpoint(&["files"])?;
        let mut request = self
            .http
            .get(url)
            .bearer_auth(&token)
            .query(&[("q", query), ("fields", fields)]);

        if let Some(page_token) = page_token {
            request = request.query(&[("pageToken", page_token)]);
        }

        Ok(send(request).await?.json().await?)
    }
}

/// Send a request and turn any non-success status into [`DriveError::ApiError`].
async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    Err(api_error(status, error_body))
}

fn api_error(status: StatusCode, body: String) -> DriveError {
    match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_error) => DriveError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        },
        Err(_) => DriveError::ApiError {
            status: status.as_u16(),
            message: body,
        },
    }
}
