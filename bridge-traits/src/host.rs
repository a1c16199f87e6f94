//! Host Environment Abstraction
//!
//! Read-only snapshot of the document and window the library runs in. Hosts
//! without a browser (desktop, servers, tests) use [`DetachedHost`], which
//! reports neither a document nor a window.

use serde::{Deserialize, Serialize};

/// Layout metrics of a single element; `None` when the host cannot report one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementMetrics {
    pub client_width: Option<i64>,
    pub client_height: Option<i64>,
    pub scroll_width: Option<i64>,
    pub scroll_height: Option<i64>,
    pub offset_width: Option<i64>,
    pub offset_height: Option<i64>,
}

/// The document currently loaded by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Full document URL
    pub url: String,
    /// Hostname part of the document location
    pub hostname: String,
    pub body: Option<ElementMetrics>,
    pub document_element: Option<ElementMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenMetrics {
    pub width: i64,
    pub height: i64,
    pub avail_width: i64,
    pub avail_height: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigatorInfo {
    pub vendor: String,
    pub user_agent: String,
    pub platform: String,
}

/// The window hosting the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub inner_width: i64,
    pub inner_height: i64,
    pub screen: Option<ScreenMetrics>,
    pub navigator: NavigatorInfo,
}

/// How the browser reports `scrollLeft` in right-to-left containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RtlScrollAxisType {
    #[default]
    Normal,
    Negated,
    Inverted,
}

impl RtlScrollAxisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RtlScrollAxisType::Normal => "normal",
            RtlScrollAxisType::Negated => "negated",
            RtlScrollAxisType::Inverted => "inverted",
        }
    }
}

/// Host environment capability trait
///
/// Replaces direct access to global `window`/`document` objects. Every
/// method is a cheap snapshot read.
pub trait HostEnvironment: Send + Sync {
    /// Whether the host is an actual browser
    fn is_browser(&self) -> bool;

    /// The loaded document, if any
    fn document(&self) -> Option<DocumentInfo>;

    /// The hosting window, if any
    fn window(&self) -> Option<WindowInfo>;

    /// HTML input types the host supports
    fn supported_input_types(&self) -> Vec<String> {
        Vec::new()
    }

    fn supports_passive_event_listeners(&self) -> bool {
        false
    }

    fn supports_scroll_behavior(&self) -> bool {
        false
    }

    fn rtl_scroll_axis_type(&self) -> RtlScrollAxisType {
        RtlScrollAxisType::Normal
    }
}

/// Null host for non-browser execution contexts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

impl HostEnvironment for DetachedHost {
    fn is_browser(&self) -> bool {
        false
    }

    fn document(&self) -> Option<DocumentInfo> {
        None
    }

    fn window(&self) -> Option<WindowInfo> {
        None
    }
}
