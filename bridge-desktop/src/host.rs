//! Desktop Host Environment
//!
//! Desktop processes have no window. They may still know which document
//! (application URL) they serve, which is enough for environment detection
//! and origin-relative requests.

use bridge_traits::{
    error::{BridgeError, Result},
    host::{DocumentInfo, HostEnvironment, WindowInfo},
};
use reqwest::Url;

/// Host environment for native desktop processes
#[derive(Debug, Clone, Default)]
pub struct DesktopHost {
    document: Option<DocumentInfo>,
}

impl DesktopHost {
    /// Host with neither document nor window
    pub fn new() -> Self {
        Self::default()
    }

    /// Host serving the document at `url`
    ///
    /// Only the URL and hostname are known; element metrics stay empty.
    pub fn with_document_url(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| BridgeError::OperationFailed(format!("Invalid document URL {}: {}", url, e)))?;

        let hostname = parsed.host_str().unwrap_or_default().to_string();

        Ok(Self {
            document: Some(DocumentInfo {
                url: parsed.to_string(),
                hostname,
                body: None,
                document_element: None,
            }),
        })
    }
}

impl HostEnvironment for DesktopHost {
    fn is_browser(&self) -> bool {
        false
    }

    fn document(&self) -> Option<DocumentInfo> {
        self.document.clone()
    }

    fn window(&self) -> Option<WindowInfo> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url_populates_hostname() {
        let host = DesktopHost::with_document_url("https://qa.portal.example.ac.il/app/home").unwrap();
        let document = host.document().unwrap();

        assert_eq!(document.hostname, "qa.portal.example.ac.il");
        assert_eq!(document.url, "https://qa.portal.example.ac.il/app/home");
        assert!(document.body.is_none());
        assert!(host.window().is_none());
        assert!(!host.is_browser());
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(DesktopHost::with_document_url("not a url").is_err());
        assert!(DesktopHost::new().document().is_none());
    }
}
