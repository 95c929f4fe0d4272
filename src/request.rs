use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::{Error, Result};

/// Builds the page URL for a code: `{base}/{code}/home`.
pub fn page_url(base_url: &str, code: u32) -> String {
    format!("{}/{code}/home", base_url.trim_end_matches('/'))
}

/// Requests a page and returns a `Result<String>` containing the HTML.
/// Anything but `200 OK` is an error; the response is dropped on every path.
pub async fn request_page_html(client: &Client, base_url: &str, code: u32) -> Result<String> {
    let res = client.get(page_url(base_url, code)).send().await?;
    let status = res.status();
    if status != StatusCode::OK {
        return Err(Error::BadStatus {
            code,
            status: status.as_u16(),
        });
    }
    let html = res.text().await?;
    debug!(code, bytes = html.len(), "fetched page");
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn url_is_built_from_base_and_code() {
        assert_eq!(
            page_url("https://pts.map.naver.com/end-subway/ends/web/", 221),
            "https://pts.map.naver.com/end-subway/ends/web/221/home"
        );
        assert_eq!(page_url("http://host", 0), "http://host/0/home");
    }

    #[tokio::test]
    async fn returns_body_on_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/7/home"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let html = request_page_html(&Client::new(), &server.uri(), 7)
            .await
            .unwrap();
        assert_eq!(html, "<html>ok</html>");
    }

    #[tokio::test]
    async fn non_200_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = request_page_html(&Client::new(), &server.uri(), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadStatus { code: 3, status: 404 }));
    }
}
