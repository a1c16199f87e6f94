use crate::error::Result;
use crate::options::RequestOptions;
use crate::pipeline::{Interceptor, Next, Outcome};
use async_trait::async_trait;
use bridge_traits::HttpRequest;
use tracing::debug;

/// Redirects requests to their mock data path while mocking is enabled.
///
/// The replacement keeps only the method; headers, query and body of the
/// original request are dropped.
pub struct MockRequestInterceptor {
    enabled: bool,
}

impl MockRequestInterceptor {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[async_trait]
impl Interceptor for MockRequestInterceptor {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn intercept(
        &self,
        request: HttpRequest,
        options: &RequestOptions,
        next: Next<'_>,
    ) -> Result<Outcome> {
        let path = options
            .mock_data_path
            .as_deref()
            .filter(|path| self.enabled && !path.is_empty());

        match path {
            Some(path) => {
                debug!(original = %request.url, mock = %path, "Serving request from mock data");
                next.run(HttpRequest::new(request.method, path), options).await
            }
            None => next.run(request, options).await,
        }
    }
}
