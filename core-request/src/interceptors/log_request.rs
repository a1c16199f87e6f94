use crate::error::Result;
use crate::options::RequestOptions;
use crate::pipeline::{Interceptor, Next, Outcome};
use async_trait::async_trait;
use bridge_traits::HttpRequest;
use core_logger::RemoteLogger;
use tracing::debug;

/// Sends the request line and body to the remote logger at `DEBUG` for
/// requests that opted in. The request itself is never altered.
pub struct LogRequestInterceptor {
    logger: RemoteLogger,
}

impl LogRequestInterceptor {
    pub fn new(logger: RemoteLogger) -> Self {
        Self { logger }
    }
}

#[async_trait]
impl Interceptor for LogRequestInterceptor {
    fn name(&self) -> &'static str {
        "log-request"
    }

    async fn intercept(
        &self,
        request: HttpRequest,
        options: &RequestOptions,
        next: Next<'_>,
    ) -> Result<Outcome> {
        if options.log_request {
            let url = request.url_with_params();
            let body = request.body_text();
            debug!(method = %request.method, url = %url, "Logging request");
            self.logger.debug([
                "[LogRequestInterceptor.intercept] request:",
                url.as_str(),
                "body:",
                body.as_str(),
            ]);
        }
        next.run(request, options).await
    }
}
