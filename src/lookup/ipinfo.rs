//! Lookup contract and the ipinfo.io "lite" implementation.

use std::future::Future;
use std::time::Duration;

use http::HeaderValue;
use http::header::ACCEPT;
use url::Url;

use super::{HttpClient, HttpRequest, HttpResponse, IpInfo, LookupError};

/// One request for the host's current external identity.
///
/// Implementations perform exactly one outbound call per invocation and
/// never retry on their own.
pub trait IpLookup: Send + Sync {
    /// Fetches the current [`IpInfo`].
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] when the call times out, the endpoint
    /// answers with a non-success status or an unparseable body, or no
    /// response could be obtained.
    fn fetch(&self) -> impl Future<Output = Result<IpInfo, LookupError>> + Send;
}

/// Lookup client for an ipinfo-compatible metadata endpoint.
///
/// Sends `GET <endpoint>?token=<token>` and decodes the JSON body into
/// [`IpInfo`]. The whole exchange, body included, is bounded by the
/// configured timeout.
///
/// # Example
///
/// ```
/// use extip::lookup::{IpInfoClient, ReqwestClient};
/// use std::time::Duration;
/// use url::Url;
///
/// let client = IpInfoClient::new(
///     ReqwestClient::new(),
///     Url::parse("https://api.ipinfo.io/lite/me").unwrap(),
///     "secret-token",
///     Duration::from_secs(5),
/// );
/// assert_eq!(client.timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug)]
pub struct IpInfoClient<H> {
    client: H,
    endpoint: Url,
    token: String,
    timeout: Duration,
}

impl<H> IpInfoClient<H> {
    /// Creates a lookup client for `endpoint` authenticated with `token`.
    #[must_use]
    pub fn new(client: H, endpoint: Url, token: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            token: token.into(),
            timeout,
        }
    }

    /// Returns the configured endpoint (without the token).
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the per-call time budget.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build_request(&self) -> HttpRequest {
        HttpRequest::get(self.endpoint.clone())
            .with_query("token", &self.token)
            .with_header(ACCEPT, HeaderValue::from_static("application/json"))
    }
}

impl<H: HttpClient> IpLookup for IpInfoClient<H> {
    async fn fetch(&self) -> Result<IpInfo, LookupError> {
        let request = self.build_request();

        let response = tokio::time::timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| LookupError::Timeout)??;

        decode(&response)
    }
}

fn decode(response: &HttpResponse) -> Result<IpInfo, LookupError> {
    if !response.is_success() {
        return Err(LookupError::Status {
            status: response.status,
        });
    }

    serde_json::from_slice(&response.body).map_err(|e| LookupError::Malformed {
        reason: e.to_string(),
    })
}
