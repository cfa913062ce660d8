use std::path::Path;
use std::time::Duration;

use reqwest::blocking::multipart::Form;
use reqwest::blocking::Client;

use crate::comparison::domain::face_comparer::{ComparisonError, ComparisonResult, FaceComparer};
use crate::shared::constants::{COMPARE_FIELD_FIRST, COMPARE_FIELD_SECOND};

/// Uploads both images as one multipart `POST` and parses the JSON reply.
///
/// No retries. There is no request timeout unless one is set with
/// [`HttpFaceComparer::with_timeout`].
#[derive(Clone, Debug)]
pub struct HttpFaceComparer {
    endpoint_url: String,
    timeout: Option<Duration>,
}

impl HttpFaceComparer {
    pub fn new(endpoint_url: &str) -> Self {
        Self {
            endpoint_url: endpoint_url.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    fn network_err(&self) -> impl FnOnce(reqwest::Error) -> ComparisonError + '_ {
        move |source| ComparisonError::Network {
            url: self.endpoint_url.clone(),
            source,
        }
    }
}

impl FaceComparer for HttpFaceComparer {
    fn compare(&self, first: &Path, second: &Path) -> Result<ComparisonResult, ComparisonError> {
        // The form owns both file handles; they close when the request is done.
        let form = Form::new()
            .file(COMPARE_FIELD_FIRST, first)
            .map_err(io_err(first))?
            .file(COMPARE_FIELD_SECOND, second)
            .map_err(io_err(second))?;

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(self.network_err())?;

        log::info!(
            "Comparing {} and {} via {}",
            first.display(),
            second.display(),
            self.endpoint_url
        );
        let response = client
            .post(&self.endpoint_url)
            .multipart(form)
            .send()
            .map_err(self.network_err())?;

        let status = response.status();
        let body = response.text().map_err(self.network_err())?;
        if !status.is_success() {
            return Err(ComparisonError::Status {
                url: self.endpoint_url.clone(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ComparisonError::InvalidJson {
            url: self.endpoint_url.clone(),
            source,
        })
    }
}

/// Uploads `path_a` and `path_b` to `endpoint_url` and returns the service's JSON verdict.
pub fn compare(
    path_a: &Path,
    path_b: &Path,
    endpoint_url: &str,
) -> Result<ComparisonResult, ComparisonError> {
    HttpFaceComparer::new(endpoint_url).compare(path_a, path_b)
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ComparisonError {
    let path = path.to_path_buf();
    move |source| ComparisonError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/verification/compare-faces";

    fn write_pair(dir: &TempDir) -> (PathBuf, PathBuf) {
        let a = dir.path().join("card_1.jpg");
        let b = dir.path().join("card_2.jpg");
        std::fs::write(&a, b"first-image-bytes").unwrap();
        std::fs::write(&b, b"second-image-bytes").unwrap();
        (a, b)
    }

    /// The blocking client must not run on an async worker thread.
    async fn compare_blocking(
        url: String,
        a: PathBuf,
        b: PathBuf,
    ) -> Result<ComparisonResult, ComparisonError> {
        tokio::task::spawn_blocking(move || compare(&a, &b, &url))
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_returns_service_json_unmodified() {
        let server = MockServer::start().await;
        let verdict = json!({"match": true, "score": 0.97});
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(verdict.clone()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (a, b) = write_pair(&dir);
        let result = compare_blocking(format!("{}{ENDPOINT}", server.uri()), a, b)
            .await
            .unwrap();

        assert_eq!(result, verdict);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_uploads_both_files_under_fixed_field_names() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(body_string_contains("name=\"image1\""))
            .and(body_string_contains("name=\"image2\""))
            .and(body_string_contains("first-image-bytes"))
            .and(body_string_contains("second-image-bytes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (a, b) = write_pair(&dir);
        compare_blocking(format!("{}{ENDPOINT}", server.uri()), a, b)
            .await
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad image"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (a, b) = write_pair(&dir);
        let err = compare_blocking(format!("{}{ENDPOINT}", server.uri()), a, b)
            .await
            .unwrap_err();

        match err {
            ComparisonError::Status { status, body, .. } => {
                assert_eq!(status, 422);
                assert_eq!(body, "bad image");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_malformed_json_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (a, b) = write_pair(&dir);
        let err = compare_blocking(format!("{}{ENDPOINT}", server.uri()), a, b)
            .await
            .unwrap_err();

        assert!(matches!(err, ComparisonError::InvalidJson { .. }));
    }

    #[test]
    fn test_missing_file_fails_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let (a, _) = write_pair(&dir);
        let missing = dir.path().join("missing.jpg");

        let err = compare(&a, &missing, "http://127.0.0.1:1/compare").unwrap_err();
        match err {
            ComparisonError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unreachable_endpoint_is_a_network_error() {
        let dir = tempfile::tempdir().unwrap();
        let (a, b) = write_pair(&dir);

        let err = HttpFaceComparer::new("http://127.0.0.1:1/compare")
            .with_timeout(Duration::from_secs(5))
            .compare(&a, &b)
            .unwrap_err();
        assert!(matches!(err, ComparisonError::Network { .. }));
    }
}
