//! End-to-end tests for the grocery site.
//!
//! The tests drive a running `grocery-web` over HTTP and are `#[ignore]`d so
//! `cargo test` stays hermetic.
//!
//! # Running Tests
//!
//! ```bash
//! grocery-cli migrate
//! grocery-web &
//! GROCERY_TEST_BASE_URL=http://localhost:3000 \
//!     cargo test -p grocery-integration-tests -- --ignored
//! ```

use reqwest::header::{HeaderMap, HeaderValue, LOCATION};
use reqwest::{Client, Response, StatusCode, redirect};
use uuid::Uuid;

/// Default server address when `GROCERY_TEST_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Password used for every test account.
pub const TEST_PASSWORD: &str = "correct horse battery";

/// A cookie-carrying browser session against the server under test.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// New session with its own cookie jar.
    ///
    /// Redirects are not followed so tests can assert on `Location`. Each
    /// context reports a distinct `X-Forwarded-For` address so the auth
    /// rate limiter treats contexts as separate clients.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new() -> Self {
        let base_url = std::env::var("GROCERY_TEST_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let [a, b, c, ..] = Uuid::new_v4().into_bytes();
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_str(&format!("10.{a}.{b}.{c}")).expect("valid header value"),
        );

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .default_headers(headers)
            .build()
            .expect("failed to build HTTP client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// GET `path` and return the body, asserting a 200.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the status is not 200.
    pub async fn get_text(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        response.text().await.expect("failed to read body")
    }

    /// POST a url-encoded form to `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Sign up a fresh user and log in as them. Returns the username.
    ///
    /// # Panics
    ///
    /// Panics if either step does not redirect as expected.
    pub async fn sign_up_and_log_in(&self) -> String {
        let username = unique_username();

        let response = self
            .post_form(
                "/auth/signup",
                &[
                    ("username", username.as_str()),
                    ("password", TEST_PASSWORD),
                    ("password_confirm", TEST_PASSWORD),
                ],
            )
            .await;
        assert_redirect(&response, "/auth/login");

        let response = self
            .post_form(
                "/auth/login",
                &[("username", username.as_str()), ("password", TEST_PASSWORD)],
            )
            .await;
        assert_redirect(&response, "/");

        username
    }

    /// Create a store and return its ID.
    ///
    /// # Panics
    ///
    /// Panics if the store is not created.
    pub async fn create_store(&self, title: &str, address: &str) -> i32 {
        let response = self
            .post_form("/new_store", &[("title", title), ("address", address)])
            .await;
        let location = location(&response);
        location
            .strip_prefix("/store/")
            .and_then(|id| id.parse().ok())
            .unwrap_or_else(|| panic!("unexpected redirect after creating store: {location}"))
    }

    /// Create an item in `store_id` and return its ID.
    ///
    /// # Panics
    ///
    /// Panics if the item is not created or cannot be found on the store page.
    pub async fn create_item(&self, store_id: i32, name: &str, price: &str) -> i32 {
        let store = store_id.to_string();
        let response = self
            .post_form(
                "/new_item",
                &[
                    ("name", name),
                    ("price", price),
                    ("category", "produce"),
                    ("photo_url", ""),
                    ("store", store.as_str()),
                ],
            )
            .await;
        assert_redirect(&response, "/");

        let page = self.get_text(&format!("/store/{store_id}")).await;
        item_id_by_name(&page, name)
            .unwrap_or_else(|| panic!("item {name} not listed on store {store_id}"))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A username that will not collide across test runs.
#[must_use]
pub fn unique_username() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(12).collect();
    format!("user_{suffix}")
}

/// The `Location` header of a redirect.
///
/// # Panics
///
/// Panics if the header is missing.
#[must_use]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_else(|| panic!("no Location header (status {})", response.status()))
        .to_string()
}

/// Assert `response` is a 303 to `path`.
///
/// # Panics
///
/// Panics if the response is not the expected redirect.
pub fn assert_redirect(response: &Response, path: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), path);
}

/// Find the ID in the first `/item/{id}` link whose text is `name`.
#[must_use]
pub fn item_id_by_name(html: &str, name: &str) -> Option<i32> {
    let link_text = format!("\">{name}</a>");
    let end = html.find(&link_text)?;
    let start = html.get(..end)?.rfind("/item/")? + "/item/".len();
    html.get(start..end)?.parse().ok()
}
