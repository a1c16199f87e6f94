//! # Request Pipeline
//!
//! HTTP plumbing shared by the tools services:
//!
//! - [`Pipeline`]: an ordered chain of [`Interceptor`]s in front of an
//!   [`HttpClient`](bridge_traits::HttpClient)
//! - [`RequestOptions`]: per-request switches read by the stock
//!   interceptors
//! - [`HttpErrorTranslator`]: maps failed requests to user-facing messages
//!   in an [`ErrorState`](core_state::ErrorState)
//!
//! ## Usage
//!
//! ```ignore
//! let pipeline = Pipeline::standard(client, &config.request, logger, translator);
//!
//! let options = RequestOptions::new()
//!     .handle_errors(Some("students"))
//!     .default_response(json!([]));
//! let students: Vec<Student> = pipeline.get("/api/students", &options).await?.json()?;
//! ```

pub mod error;
pub mod interceptors;
pub mod options;
pub mod pipeline;
pub mod translator;

pub use error::{RequestError, Result};
pub use interceptors::{
    ErrorHandlingInterceptor, LogRequestInterceptor, MockRequestInterceptor, OriginUrlInterceptor,
};
pub use options::RequestOptions;
pub use pipeline::{Interceptor, Next, Outcome, Pipeline};
pub use translator::{ErrorClass, HttpErrorTranslator};
