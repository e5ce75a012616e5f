//! Main client implementation

use crate::{types::*, ClientError, Config, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::{stream, Stream, TryStreamExt};
use reqwest::{header, multipart, Client, Method, RequestBuilder, Response, StatusCode, Url};
use tracing::{debug, instrument};

const FILES_SEGMENTS: [&str; 2] = ["v1", "files"];

/// Files API client
pub struct FilesClient {
    config: Config,
    base: Url,
    http: Client,
}

impl FilesClient {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let base = Url::parse(config.base_url())
            .map_err(|e| ClientError::Config(format!("invalid endpoint {}: {}", config.endpoint, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "endpoint cannot carry a path: {}",
                config.endpoint
            )));
        }

        let mut headers = header::HeaderMap::new();
        let user_agent = config
            .user_agent
            .parse()
            .map_err(|_| ClientError::Config(format!("invalid user agent: {}", config.user_agent)))?;
        headers.insert(header::USER_AGENT, user_agent);

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { config, base, http })
    }

    /// Create with endpoint URL
    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        Self::new(Config::new(endpoint))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Uploads ====================

    /// Upload a raw body
    #[instrument(skip(self, data))]
    pub async fn upload(
        &self,
        file_path: &str,
        data: impl Into<Bytes>,
        content_type: Option<&str>,
    ) -> Result<UploadResult> {
        let mut req = self.request(Method::PUT, self.files_url(Some(file_path))).body(data.into());
        if let Some(ct) = content_type {
            req = req.header(header::CONTENT_TYPE, ct);
        }
        let response = self.send(req, file_path).await?;
        upload_result(response).await
    }

    /// Upload as a `multipart/form-data` form with a single file part
    #[instrument(skip(self, data))]
    pub async fn upload_form(
        &self,
        file_path: &str,
        file_name: &str,
        data: impl Into<Bytes>,
        content_type: &str,
    ) -> Result<UploadResult> {
        let data: Bytes = data.into();
        let part = multipart::Part::bytes(data.to_vec())
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(ClientError::Http)?;
        let form = multipart::Form::new().part("file_content", part);

        let req = self.request(Method::PUT, self.files_url(Some(file_path))).multipart(form);
        let response = self.send(req, file_path).await?;
        upload_result(response).await
    }

    // ==================== Listing ====================

    /// Fetch the first page of a listing
    #[instrument(skip(self))]
    pub async fn list(&self, options: &ListFilesOptions) -> Result<GetFilesResponse> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(page_size) = options.page_size {
            query.push(("page_size", page_size.to_string()));
        }
        if let Some(directory) = &options.directory {
            query.push(("directory", directory.clone()));
        }
        self.list_with_query(&query).await
    }

    /// Fetch the page a token points at
    #[instrument(skip(self))]
    pub async fn list_continuation(&self, page_token: &str) -> Result<GetFilesResponse> {
        self.list_with_query(&[("page_token", page_token.to_string())])
            .await
    }

    /// Stream every page of a listing, following tokens until exhausted
    pub fn pages(
        &self,
        options: ListFilesOptions,
    ) -> impl Stream<Item = Result<GetFilesResponse>> + '_ {
        enum Cursor {
            Start(ListFilesOptions),
            Next(String),
            Done,
        }

        stream::try_unfold(Cursor::Start(options), move |cursor| async move {
            let page = match cursor {
                Cursor::Start(options) => self.list(&options).await?,
                Cursor::Next(token) => self.list_continuation(&token).await?,
                Cursor::Done => return Ok::<_, ClientError>(None),
            };
            let next = match &page.next_page_token {
                Some(token) => Cursor::Next(token.clone()),
                None => Cursor::Done,
            };
            Ok(Some((page, next)))
        })
    }

    /// Collect every file of a listing
    #[instrument(skip(self))]
    pub async fn list_all(&self, options: ListFilesOptions) -> Result<Vec<FileMetadata>> {
        self.pages(options).map_ok(|page| page.files).try_concat().await
    }

    // ==================== Single files ====================

    /// Fetch file metadata
    #[instrument(skip(self))]
    pub async fn head(&self, file_path: &str) -> Result<FileInfo> {
        let req = self.request(Method::HEAD, self.files_url(Some(file_path)));
        let response = self.send(req, file_path).await?;
        Ok(file_info(&response))
    }

    /// Check whether a file exists
    #[instrument(skip(self))]
    pub async fn exists(&self, file_path: &str) -> Result<bool> {
        match self.head(file_path).await {
            Ok(_) => Ok(true),
            Err(ClientError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Download a file
    #[instrument(skip(self))]
    pub async fn get(&self, file_path: &str) -> Result<FileContent> {
        let req = self.request(Method::GET, self.files_url(Some(file_path)));
        let response = self.send(req, file_path).await?;
        let info = file_info(&response);
        let data = response.bytes().await?;
        Ok(FileContent { info, data })
    }

    /// Delete a file; missing files are reported as `NotFound`
    #[instrument(skip(self))]
    pub async fn delete(&self, file_path: &str) -> Result<()> {
        let req = self.request(Method::DELETE, self.files_url(Some(file_path)));
        self.send(req, file_path).await?;
        Ok(())
    }

    // ==================== Internals ====================

    async fn list_with_query(&self, query: &[(&str, String)]) -> Result<GetFilesResponse> {
        let url = self.files_url(None);
        let path = url.path().to_string();
        let req = self.request(Method::GET, url).query(query);
        let response = self.send(req, &path).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// `/v1/files`, or `/v1/files/{file_path}` with every segment percent-encoded
    fn files_url(&self, file_path: Option<&str>) -> Url {
        let mut url = self.base.clone();
        // `new` rejects bases that cannot carry a path
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(FILES_SEGMENTS);
            if let Some(file_path) = file_path {
                segments.extend(file_path.trim_start_matches('/').split('/'));
            }
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("Sending {} request to {}", method, url);
        self.http.request(method, url)
    }

    async fn send(&self, req: RequestBuilder, file_path: &str) -> Result<Response> {
        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::from_response(status.as_u16(), &text, file_path));
        }

        Ok(response)
    }
}

async fn upload_result(response: Response) -> Result<UploadResult> {
    let created = response.status() == StatusCode::CREATED;
    let body: PutFileResponse = response
        .json()
        .await
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
    Ok(UploadResult {
        file_path: body.file_path,
        message: body.message,
        created,
    })
}

fn file_info(response: &Response) -> FileInfo {
    let headers = response.headers();
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    FileInfo {
        content_type: header_str(header::CONTENT_TYPE),
        content_length: header_str(header::CONTENT_LENGTH).and_then(|v| v.parse().ok()),
        last_modified: header_str(header::LAST_MODIFIED)
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|dt| dt.with_timezone(&Utc)),
    }
}
