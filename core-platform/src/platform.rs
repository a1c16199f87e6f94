//! # Platform Introspection
//!
//! Browser engine flags and document metrics derived from a
//! [`HostEnvironment`] snapshot. Engine flags follow the usual user-agent
//! heuristics and are all `false` outside a browser.

use bridge_traits::{ElementMetrics, HostEnvironment, WindowInfo};
use std::sync::Arc;

/// Value reported for metrics the host cannot provide.
pub const UNKNOWN_DIMENSION: i64 = -1;

/// Engine and device flags detected from the user agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowserFlags {
    pub android: bool,
    pub ios: bool,
    pub firefox: bool,
    pub blink: bool,
    pub webkit: bool,
    pub trident: bool,
    pub edge: bool,
    pub safari: bool,
}

impl BrowserFlags {
    /// Flags for `user_agent` as seen by a browser host.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();

        let edge = ua.contains("edge");
        let trident = ua.contains("msie") || ua.contains("trident");
        let blink = (ua.contains("chrome") || ua.contains("chromium")) && !edge && !trident;
        let webkit = ua.contains("applewebkit") && !blink && !edge && !trident;

        Self {
            android: ua.contains("android") && !trident,
            ios: ["ipad", "iphone", "ipod"].iter().any(|d| ua.contains(d)),
            firefox: ua.contains("firefox") || ua.contains("minefield"),
            blink,
            webkit,
            trident,
            edge,
            safari: ua.contains("safari") && webkit,
        }
    }
}

/// Describes the platform the library runs on.
pub struct PlatformInfo {
    host: Arc<dyn HostEnvironment>,
}

impl PlatformInfo {
    pub fn new(host: Arc<dyn HostEnvironment>) -> Self {
        Self { host }
    }

    pub fn is_browser(&self) -> bool {
        self.host.is_browser()
    }

    pub fn flags(&self) -> BrowserFlags {
        if !self.host.is_browser() {
            return BrowserFlags::default();
        }
        self.host
            .window()
            .map(|window| BrowserFlags::from_user_agent(&window.navigator.user_agent))
            .unwrap_or_default()
    }

    /// Largest of the body and root element widths, `-1` when unknown.
    pub fn document_width(&self) -> i64 {
        self.document_extent(
            |body| [body.scroll_width, body.offset_width],
            |html| [html.client_width, html.scroll_width, html.offset_width],
        )
    }

    /// Largest of the body and root element heights, `-1` when unknown.
    pub fn document_height(&self) -> i64 {
        self.document_extent(
            |body| [body.scroll_height, body.offset_height],
            |html| [html.client_height, html.scroll_height, html.offset_height],
        )
    }

    fn document_extent<const B: usize, const H: usize>(
        &self,
        body_metrics: impl Fn(&ElementMetrics) -> [Option<i64>; B],
        html_metrics: impl Fn(&ElementMetrics) -> [Option<i64>; H],
    ) -> i64 {
        let Some(document) = self.host.document() else {
            return UNKNOWN_DIMENSION;
        };

        let body = document.body.unwrap_or_default();
        let html = document.document_element.unwrap_or_default();

        body_metrics(&body)
            .into_iter()
            .chain(html_metrics(&html))
            .map(|value| value.unwrap_or(UNKNOWN_DIMENSION))
            .max()
            .unwrap_or(UNKNOWN_DIMENSION)
    }

    /// One-line description of the platform, suitable for a log line.
    pub fn info(&self) -> String {
        let flags = self.flags();
        let window = self.host.window();
        let url = self.host.document().map(|d| d.url).unwrap_or_default();

        format!(
            "Platform Information: URL: {}, Browser: {}, Android: {}, iOS: {}, Firefox: {}, \
             Blink: {}, Webkit: {}, Trident: {}, Edge: {}, Safari: {}, \
             Supported input types: {}, Supports passive event listeners: {}, \
             Supports scroll behavior: {}, RTL scroll axis type: {}, {}, {}, {}",
            url,
            self.host.is_browser(),
            flags.android,
            flags.ios,
            flags.firefox,
            flags.blink,
            flags.webkit,
            flags.trident,
            flags.edge,
            flags.safari,
            self.host.supported_input_types().join(", "),
            self.host.supports_passive_event_listeners(),
            self.host.supports_scroll_behavior(),
            self.host.rtl_scroll_axis_type().as_str(),
            window.as_ref().map(window_screen_info).unwrap_or_default(),
            self.document_screen_info(),
            window.as_ref().map(browser_info).unwrap_or_default(),
        )
    }

    fn document_screen_info(&self) -> String {
        if self.host.document().is_none() {
            return String::new();
        }
        format!(
            "Document width: {}, Document height: {}",
            self.document_width(),
            self.document_height()
        )
    }
}

fn window_screen_info(window: &WindowInfo) -> String {
    let basic = format!(
        "Inner width: {}, Inner height: {}",
        window.inner_width, window.inner_height
    );
    match window.screen {
        Some(screen) => format!(
            "Width: {}, Height: {}, Available width: {}, Available height: {}, {}",
            screen.width, screen.height, screen.avail_width, screen.avail_height, basic
        ),
        None => basic,
    }
}

fn browser_info(window: &WindowInfo) -> String {
    format!(
        "Browser Vendor: {}, User Agent: {}, Platform: {}",
        window.navigator.vendor, window.navigator.user_agent, window.navigator.platform
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{DetachedHost, DocumentInfo, NavigatorInfo, RtlScrollAxisType, ScreenMetrics};

    const CHROME_UA: &str = "Mozilla/5.0 (Linux; Android 13) AppleWebKit/537.36 \
                             (KHTML, like Gecko) Chrome/120.0 Mobile Safari/537.36";
    const SAFARI_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
                             AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

    struct BrowserHost {
        document: Option<DocumentInfo>,
        window: Option<WindowInfo>,
    }

    impl HostEnvironment for BrowserHost {
        fn is_browser(&self) -> bool {
            true
        }

        fn document(&self) -> Option<DocumentInfo> {
            self.document.clone()
        }

        fn window(&self) -> Option<WindowInfo> {
            self.window.clone()
        }

        fn supported_input_types(&self) -> Vec<String> {
            vec!["text".to_string(), "date".to_string()]
        }

        fn rtl_scroll_axis_type(&self) -> RtlScrollAxisType {
            RtlScrollAxisType::Negated
        }
    }

    fn window(user_agent: &str) -> WindowInfo {
        WindowInfo {
            inner_width: 390,
            inner_height: 844,
            screen: Some(ScreenMetrics {
                width: 390,
                height: 844,
                avail_width: 390,
                avail_height: 800,
            }),
            navigator: NavigatorInfo {
                vendor: "Google Inc.".to_string(),
                user_agent: user_agent.to_string(),
                platform: "Linux armv8l".to_string(),
            },
        }
    }

    #[test]
    fn test_flags_from_user_agent() {
        let chrome = BrowserFlags::from_user_agent(CHROME_UA);
        assert!(chrome.android && chrome.blink);
        assert!(!chrome.webkit && !chrome.safari && !chrome.ios);

        let safari = BrowserFlags::from_user_agent(SAFARI_UA);
        assert!(safari.ios && safari.webkit && safari.safari);
        assert!(!safari.blink);

        let legacy_edge = BrowserFlags::from_user_agent("Mozilla/5.0 Chrome/70.0 Safari/537.36 Edge/18.0");
        assert!(legacy_edge.edge && !legacy_edge.blink);

        let ie = BrowserFlags::from_user_agent("Mozilla/5.0 (Windows NT 10.0; Trident/7.0; rv:11.0)");
        assert!(ie.trident && !ie.android);

        assert!(BrowserFlags::from_user_agent("Mozilla/5.0 Firefox/121.0").firefox);
    }

    #[test]
    fn test_detached_host_has_no_flags_or_dimensions() {
        let platform = PlatformInfo::new(Arc::new(DetachedHost));

        assert_eq!(platform.flags(), BrowserFlags::default());
        assert_eq!(platform.document_width(), UNKNOWN_DIMENSION);
        assert_eq!(platform.document_height(), UNKNOWN_DIMENSION);
    }

    #[test]
    fn test_document_dimensions_take_largest_known_metric() {
        let host = BrowserHost {
            document: Some(DocumentInfo {
                url: "https://portal.haifa.ac.il/".to_string(),
                hostname: "portal.haifa.ac.il".to_string(),
                body: Some(ElementMetrics {
                    scroll_width: Some(1200),
                    offset_height: Some(3000),
                    ..ElementMetrics::default()
                }),
                document_element: Some(ElementMetrics {
                    client_width: Some(1280),
                    client_height: Some(720),
                    ..ElementMetrics::default()
                }),
            }),
            window: None,
        };
        let platform = PlatformInfo::new(Arc::new(host));

        assert_eq!(platform.document_width(), 1280);
        assert_eq!(platform.document_height(), 3000);
    }

    #[test]
    fn test_document_without_metrics_reports_unknown() {
        let host = BrowserHost {
            document: Some(DocumentInfo::default()),
            window: None,
        };
        let platform = PlatformInfo::new(Arc::new(host));

        assert_eq!(platform.document_width(), UNKNOWN_DIMENSION);
        assert_eq!(platform.document_height(), UNKNOWN_DIMENSION);
    }

    #[test]
    fn test_info_describes_browser_host() {
        let host = BrowserHost {
            document: Some(DocumentInfo {
                url: "https://portal.haifa.ac.il/".to_string(),
                hostname: "portal.haifa.ac.il".to_string(),
                body: None,
                document_element: None,
            }),
            window: Some(window(CHROME_UA)),
        };
        let info = PlatformInfo::new(Arc::new(host)).info();

        assert!(info.starts_with("Platform Information: URL: https://portal.haifa.ac.il/, Browser: true, Android: true"));
        assert!(info.contains("Blink: true, Webkit: false"));
        assert!(info.contains("Supported input types: text, date,"));
        assert!(info.contains("RTL scroll axis type: negated,"));
        assert!(info.contains("Width: 390, Height: 844, Available width: 390, Available height: 800, Inner width: 390, Inner height: 844"));
        assert!(info.contains("Document width: -1, Document height: -1"));
        assert!(info.ends_with("Platform: Linux armv8l"));
    }

    #[test]
    fn test_info_for_detached_host() {
        let info = PlatformInfo::new(Arc::new(DetachedHost)).info();

        assert!(info.starts_with("Platform Information: URL: , Browser: false,"));
        assert!(info.ends_with("RTL scroll axis type: normal, , , "));
    }
}
