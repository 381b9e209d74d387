//! REST client for the reels backend

use std::path::{Path, PathBuf};

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use thiserror::Error;

use super::records::{
    parse_list, HashtagRecord, MusicRecord, PostRecord, RegistrationRequest, TokenPair, UserRecord,
};
use super::session::SessionStore;

pub const POSTS_PATH: &str = "/posts/post/";
pub const HASHTAGS_PATH: &str = "/posts/hashtags/";
pub const MUSICS_PATH: &str = "/posts/musics/";
pub const USERS_PATH: &str = "/users/";
pub const ME_PATH: &str = "/users/me/";
pub const LOGIN_PATH: &str = "/users/token/";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx answer; `message` is the server's `detail`/`message` when it sent one
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Authentication required. Please log in.")]
    MissingToken,

    #[error("Could not read {}: {source}", .path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Successful response body, parsed according to its content type
#[derive(Clone, Debug, PartialEq)]
pub enum ApiBody {
    Json(Value),
    Text(String),
}

impl ApiBody {
    pub fn into_json(self) -> ApiResult<Value> {
        match self {
            ApiBody::Json(value) => Ok(value),
            ApiBody::Text(text) => Err(ApiError::Malformed(format!(
                "expected JSON, got text: {}",
                text.chars().take(80).collect::<String>()
            ))),
        }
    }
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| {
            let mime = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

fn server_message(body: &Value) -> Option<String> {
    ["detail", "message"].iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Turn a raw HTTP answer into a body or an error.
///
/// Success bodies are parsed as JSON when the content type says so and kept
/// as text otherwise. Failures carry the server's `detail`/`message` when the
/// body is JSON and has one, and a generic status message otherwise.
pub fn interpret_response(status: u16, content_type: Option<&str>, body: &str) -> ApiResult<ApiBody> {
    let json = is_json(content_type);

    if (200..300).contains(&status) {
        if !json {
            return Ok(ApiBody::Text(body.to_string()));
        }
        if body.trim().is_empty() {
            return Ok(ApiBody::Json(Value::Null));
        }
        return serde_json::from_str(body)
            .map(ApiBody::Json)
            .map_err(|e| ApiError::Malformed(e.to_string()));
    }

    let parsed = if json { serde_json::from_str::<Value>(body).ok() } else { None };
    let message = parsed
        .as_ref()
        .and_then(server_message)
        .unwrap_or_else(|| format!("Request failed with status {}", status));

    Err(ApiError::Status { status, message, body: parsed })
}

/// Upload payload for `POST /posts/post/`
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    pub media_path: PathBuf,
}

/// Backend client; every request carries the session token when one is stored
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionStore) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("reels-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, path: &str, builder: RequestBuilder) -> ApiResult<ApiBody> {
        let builder = match self.session.token().await {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        };

        let response = builder.header(ACCEPT, "application/json").send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        tracing::debug!(path, status, "API response received");
        interpret_response(status, content_type.as_deref(), &body)
    }

    pub async fn get(&self, path: &str) -> ApiResult<ApiBody> {
        crate::log_api_request!("get", path);
        let builder = self.http.request(Method::GET, self.url(path));
        self.send(path, builder).await
    }

    pub async fn get_with_query(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<ApiBody> {
        crate::log_api_request!("get", path, ?query);
        let builder = self.http.request(Method::GET, self.url(path)).query(query);
        self.send(path, builder).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> ApiResult<ApiBody> {
        crate::log_api_request!("post", path);
        let builder = self.http.request(Method::POST, self.url(path)).json(body);
        self.send(path, builder).await
    }

    pub async fn upload_multipart(&self, path: &str, form: Form) -> ApiResult<ApiBody> {
        crate::log_api_request!("upload", path);
        let builder = self.http.request(Method::POST, self.url(path)).multipart(form);
        self.send(path, builder).await
    }

    async fn require_token(&self) -> ApiResult<()> {
        if self.session.is_authenticated().await {
            Ok(())
        } else {
            Err(ApiError::MissingToken)
        }
    }

    // ========================================================================
    // Endpoints
    // ========================================================================

    pub async fn fetch_posts(&self) -> ApiResult<Vec<PostRecord>> {
        let result = self.get(POSTS_PATH).await.and_then(ApiBody::into_json);
        crate::log_api_result!("fetch_posts", result);
        Ok(parse_list(result?))
    }

    pub async fn search_posts(&self, query: &str) -> ApiResult<Vec<PostRecord>> {
        let result = self
            .get_with_query(POSTS_PATH, &[("search", query)])
            .await
            .and_then(ApiBody::into_json);
        crate::log_api_result!("search_posts", result);
        Ok(parse_list(result?))
    }

    pub async fn fetch_hashtags(&self) -> ApiResult<Vec<HashtagRecord>> {
        let result = self.get(HASHTAGS_PATH).await.and_then(ApiBody::into_json);
        crate::log_api_result!("fetch_hashtags", result);
        Ok(parse_list(result?))
    }

    pub async fn fetch_musics(&self) -> ApiResult<Vec<MusicRecord>> {
        let result = self.get(MUSICS_PATH).await.and_then(ApiBody::into_json);
        crate::log_api_result!("fetch_musics", result);
        Ok(parse_list(result?))
    }

    pub async fn fetch_users(&self) -> ApiResult<Vec<UserRecord>> {
        let result = self.get(USERS_PATH).await.and_then(ApiBody::into_json);
        crate::log_api_result!("fetch_users", result);
        Ok(parse_list(result?))
    }

    pub async fn fetch_me(&self) -> ApiResult<UserRecord> {
        self.require_token().await?;
        let result = self.get(ME_PATH).await.and_then(ApiBody::into_json);
        crate::log_api_result!("fetch_me", result);
        serde_json::from_value(result?).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Create an account. A 2xx answer without a `username` is treated as a
    /// failure carrying the raw JSON, since the backend reports field errors that way.
    pub async fn register(&self, request: &RegistrationRequest) -> ApiResult<UserRecord> {
        let payload = serde_json::to_value(request).map_err(|e| ApiError::Malformed(e.to_string()))?;
        let result = self.post(USERS_PATH, &payload).await.and_then(ApiBody::into_json);
        crate::log_api_result!("register", result);
        let value = result?;

        let has_username = value
            .get("username")
            .and_then(Value::as_str)
            .is_some_and(|u| !u.is_empty());
        if !has_username {
            return Err(ApiError::Malformed(value.to_string()));
        }
        serde_json::from_value(value).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenPair> {
        let payload = serde_json::json!({ "username": username, "password": password });
        let result = self.post(LOGIN_PATH, &payload).await.and_then(ApiBody::into_json);
        crate::log_api_result!("login", result);
        serde_json::from_value(result?).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    pub async fn upload_post(&self, request: &UploadRequest) -> ApiResult<ApiBody> {
        self.require_token().await?;
        let form = build_upload_form(request).await?;
        let result = self.upload_multipart(POSTS_PATH, form).await;
        crate::log_api_result!("upload_post", result);
        result
    }
}

async fn build_upload_form(request: &UploadRequest) -> ApiResult<Form> {
    let path: &Path = &request.media_path;
    let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.essence_str())?;

    Ok(Form::new()
        .text("title", request.title.clone())
        .text("description", request.description.clone())
        .part("post", part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const JSON: Option<&str> = Some("application/json; charset=utf-8");

    #[test]
    fn success_body_follows_content_type() {
        assert_eq!(
            interpret_response(200, JSON, r#"{"id": 1}"#).unwrap(),
            ApiBody::Json(json!({"id": 1}))
        );
        assert_eq!(
            interpret_response(201, Some("text/plain"), "created").unwrap(),
            ApiBody::Text("created".to_string())
        );
        assert_eq!(interpret_response(204, JSON, "").unwrap(), ApiBody::Json(Value::Null));
    }

    #[test]
    fn malformed_json_success_is_an_error() {
        let err = interpret_response(200, JSON, "{not json").unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[test]
    fn error_message_comes_from_detail_or_message() {
        let err = interpret_response(401, JSON, r#"{"detail": "Given token not valid"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Given token not valid");
        assert_eq!(err.status(), Some(401));

        let err = interpret_response(400, JSON, r#"{"message": "Bad file"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Bad file");
    }

    #[test]
    fn error_without_server_message_is_generic() {
        let err = interpret_response(500, Some("text/html"), "<h1>oops</h1>").unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 500");

        let err = interpret_response(400, JSON, r#"{"username": ["taken"]}"#).unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 400");
        match err {
            ApiError::Status { body: Some(body), .. } => assert_eq!(body["username"][0], "taken"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn text_body_is_not_json() {
        assert!(matches!(
            ApiBody::Text("hi".into()).into_json(),
            Err(ApiError::Malformed(_))
        ));
    }

    /// Serve one canned HTTP response and hand back the raw request text
    async fn serve_once(status: &str, content_type: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{}", addr), handle)
    }

    /// Read headers and then `content-length` bytes of body
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&raw);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let headers = text[..header_end].to_lowercase();
                if headers.contains("transfer-encoding: chunked") {
                    if text.ends_with("0\r\n\r\n") {
                        break;
                    }
                    continue;
                }
                let body_len = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= header_end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[tokio::test]
    async fn get_sends_bearer_token_and_parses_list() {
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path());
        session.set("tok123".to_string()).await.unwrap();

        let (url, server) = serve_once("200 OK", "application/json", r#"{"results": [{"id": 1, "post": "a.mp4"}]}"#).await;
        let client = ApiClient::new(&url, session).unwrap();

        let posts = client.fetch_posts().await.unwrap();
        let request = server.await.unwrap().to_lowercase();

        assert_eq!(posts.len(), 1);
        assert!(request.starts_with("get /posts/post/ "));
        assert!(request.contains("authorization: bearer tok123"));
    }

    #[tokio::test]
    async fn anonymous_request_has_no_authorization_header() {
        let dir = tempdir().unwrap();
        let (url, server) = serve_once("200 OK", "application/json", "[]").await;
        let client = ApiClient::new(&url, SessionStore::new(dir.path())).unwrap();

        client.fetch_hashtags().await.unwrap();
        assert!(!server.await.unwrap().to_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn non_success_status_surfaces_server_detail() {
        let dir = tempdir().unwrap();
        let (url, _server) = serve_once("403 Forbidden", "application/json", r#"{"detail": "Not allowed"}"#).await;
        let client = ApiClient::new(&url, SessionStore::new(dir.path())).unwrap();

        let err = client.get(POSTS_PATH).await.unwrap_err();
        assert_eq!(err.to_string(), "Not allowed");
        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn search_encodes_the_query() {
        let dir = tempdir().unwrap();
        let (url, server) = serve_once("200 OK", "application/json", "[]").await;
        let client = ApiClient::new(&url, SessionStore::new(dir.path())).unwrap();

        client.search_posts("cat videos").await.unwrap();
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /posts/post/?search=cat+videos "));
    }

    #[tokio::test]
    async fn me_without_token_fails_before_any_request() {
        let dir = tempdir().unwrap();
        // Nothing listens here; a request would be a network error instead
        let client = ApiClient::new("http://127.0.0.1:9", SessionStore::new(dir.path())).unwrap();
        assert!(matches!(client.fetch_me().await, Err(ApiError::MissingToken)));
    }

    #[tokio::test]
    async fn registration_answer_without_username_is_an_error() {
        let dir = tempdir().unwrap();
        let (url, _server) = serve_once("200 OK", "application/json", r#"{"email": ["invalid"]}"#).await;
        let client = ApiClient::new(&url, SessionStore::new(dir.path())).unwrap();

        let request = RegistrationRequest {
            username: "u".into(),
            email: "bad".into(),
            password: "secret1".into(),
            first_name: String::new(),
            last_name: String::new(),
        };
        let err = client.register(&request).await.unwrap_err();
        assert!(err.to_string().contains("invalid"));
    }

    #[tokio::test]
    async fn upload_reports_missing_file() {
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path());
        session.set("tok".to_string()).await.unwrap();
        let client = ApiClient::new("http://127.0.0.1:9", session).unwrap();

        let request = UploadRequest {
            title: "t".into(),
            description: "d".into(),
            media_path: dir.path().join("missing.mp4"),
        };
        assert!(matches!(client.upload_post(&request).await, Err(ApiError::File { .. })));
    }

    #[tokio::test]
    async fn upload_sends_title_description_and_file_part() {
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path());
        session.set("tok".to_string()).await.unwrap();
        let media = dir.path().join("clip.mp4");
        std::fs::write(&media, b"fake video bytes").unwrap();

        let (url, server) = serve_once("201 Created", "application/json", r#"{"id": 5}"#).await;
        let client = ApiClient::new(&url, session).unwrap();

        let request = UploadRequest {
            title: "Sunset".into(),
            description: "Golden hour".into(),
            media_path: media,
        };
        let body = client.upload_post(&request).await.unwrap();
        let raw = server.await.unwrap();
        let lowered = raw.to_lowercase();

        assert_eq!(body, ApiBody::Json(json!({"id": 5})));
        assert!(lowered.starts_with("post /posts/post/ "));
        assert!(lowered.contains("authorization: bearer tok"));
        assert!(lowered.contains("content-type: multipart/form-data; boundary="));
        assert!(raw.contains(r#"name="title""#));
        assert!(raw.contains("Sunset"));
        assert!(raw.contains(r#"name="description""#));
        assert!(raw.contains("Golden hour"));
        assert!(raw.contains(r#"name="post"; filename="clip.mp4""#));
        assert!(raw.contains("video/mp4"));
        assert!(raw.contains("fake video bytes"));
    }
}
