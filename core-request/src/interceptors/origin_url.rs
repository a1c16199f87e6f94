use crate::error::Result;
use crate::options::RequestOptions;
use crate::pipeline::{Interceptor, Next, Outcome};
use async_trait::async_trait;
use bridge_traits::HttpRequest;
use tracing::trace;

/// Prefixes relative URLs (leading `/` or `\`) with the configured origin.
pub struct OriginUrlInterceptor {
    origin: String,
}

impl OriginUrlInterceptor {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

fn is_relative(url: &str) -> bool {
    url.starts_with('/') || url.starts_with('\\')
}

#[async_trait]
impl Interceptor for OriginUrlInterceptor {
    fn name(&self) -> &'static str {
        "origin-url"
    }

    async fn intercept(
        &self,
        mut request: HttpRequest,
        options: &RequestOptions,
        next: Next<'_>,
    ) -> Result<Outcome> {
        if options.use_origin_url && is_relative(&request.url) {
            request.url = format!("{}{}", self.origin, request.url);
            trace!(url = %request.url, "Applied origin URL");
        }
        next.run(request, options).await
    }
}
