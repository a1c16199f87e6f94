//! Stock interceptors, in the order [`Pipeline::standard`] registers them.
//!
//! [`Pipeline::standard`]: crate::pipeline::Pipeline::standard

mod error_handling;
mod log_request;
mod mock;
mod origin_url;

pub use error_handling::ErrorHandlingInterceptor;
pub use log_request::LogRequestInterceptor;
pub use mock::MockRequestInterceptor;
pub use origin_url::OriginUrlInterceptor;

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HttpClient, HttpRequest, HttpResponse};
    use std::sync::Mutex;

    /// Transport that records every request and answers with a fixed status.
    pub struct RecordingClient {
        pub requests: Mutex<Vec<HttpRequest>>,
        status: u16,
        body: &'static str,
    }

    impl RecordingClient {
        pub fn answering(status: u16, body: &'static str) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                status,
                body,
            }
        }

        pub fn last(&self) -> HttpRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl HttpClient for RecordingClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(HttpResponse::new(self.status, self.body))
        }
    }
}
