use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, warn};

use crate::config::{BrowserConfig, ScreenshotConfig};
use crate::utils::error::{AppError, Result};

/// One live browser plus the window the page objects currently act on.
///
/// The session is passed by reference into every page object; it is never a
/// global. The current-window slot sits behind a mutex so one-way page
/// transitions can adopt a freshly opened window through a shared reference.
pub struct Session {
    browser: Browser,
    tab: Mutex<Arc<Tab>>,
}

impl Session {
    pub fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false) // Often needed in containerized environments
            .window_size(Some((config.window_width, config.window_height)))
            .args(vec![
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| AppError::Browser(format!("failed to create launch options: {e}")))?;

        if let Some(chrome_path) = &config.chrome_path {
            launch_options.path = Some(PathBuf::from(chrome_path));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| AppError::Browser(format!("failed to launch browser: {e}")))?;
        let tab = browser
            .new_tab()
            .map_err(|e| AppError::Browser(format!("failed to open window: {e}")))?;
        tab.set_user_agent(&config.user_agent, None, None)
            .map_err(|e| AppError::Browser(format!("failed to set user agent: {e}")))?;

        Ok(Self {
            browser,
            tab: Mutex::new(tab),
        })
    }

    fn tab(&self) -> Arc<Tab> {
        self.tab.lock().unwrap().clone()
    }

    pub fn navigate(&self, url: &str) -> Result<()> {
        let tab = self.tab();
        tab.navigate_to(url)
            .map_err(|e| AppError::Browser(format!("navigation to {url} failed: {e}")))?;
        tab.wait_until_navigated()
            .map_err(|e| AppError::Browser(format!("page load of {url} failed: {e}")))?;
        Ok(())
    }

    pub fn click(&self, selector: &str) -> Result<()> {
        let tab = self.tab();
        let element = tab.find_element(selector).map_err(|e| classify(selector, e))?;
        element.click().map_err(|e| classify(selector, e))?;
        Ok(())
    }

    pub fn type_into(&self, selector: &str, text: &str) -> Result<()> {
        let tab = self.tab();
        let element = tab.find_element(selector).map_err(|e| classify(selector, e))?;
        element.type_into(text).map_err(|e| classify(selector, e))?;
        Ok(())
    }

    pub fn press_enter(&self) -> Result<()> {
        self.tab()
            .press_key("Enter")
            .map_err(|e| AppError::Browser(format!("key press failed: {e}")))?;
        Ok(())
    }

    /// Number of elements currently matching the selector. Zero matches is a
    /// count, not an error.
    pub fn count(&self, selector: &str) -> Result<usize> {
        let tab = self.tab();
        match tab.find_elements(selector) {
            Ok(elements) => Ok(elements.len()),
            Err(e) if is_no_match(&e) => Ok(0),
            Err(e) => Err(classify(selector, e)),
        }
    }

    /// Inner text of the first match; `None` while the selector matches
    /// nothing yet.
    pub fn text_of_first(&self, selector: &str) -> Result<Option<String>> {
        let tab = self.tab();
        let elements = match tab.find_elements(selector) {
            Ok(elements) => elements,
            Err(e) if is_no_match(&e) => return Ok(None),
            Err(e) => return Err(classify(selector, e)),
        };
        match elements.first() {
            Some(element) => {
                let text = element
                    .get_inner_text()
                    .map_err(|e| classify(selector, e))?;
                Ok(Some(text.trim().to_string()))
            }
            None => Ok(None),
        }
    }

    /// Outer HTML of every element matching the selector, in page order.
    pub fn html_of_all(&self, selector: &str) -> Result<Vec<String>> {
        let tab = self.tab();
        let elements = match tab.find_elements(selector) {
            Ok(elements) => elements,
            Err(e) if is_no_match(&e) => return Ok(Vec::new()),
            Err(e) => return Err(classify(selector, e)),
        };
        elements
            .iter()
            .map(|element| element.get_content().map_err(|e| classify(selector, e)))
            .collect()
    }

    pub fn current_window(&self) -> String {
        self.tab().get_target_id().to_string()
    }

    pub fn current_url(&self) -> String {
        self.tab().get_url()
    }

    /// Target id of a window other than `origin` whose URL satisfies the
    /// predicate. Content-based selection keeps the choice deterministic when
    /// more than two windows are open.
    pub fn find_other_window(&self, origin: &str, matches: impl Fn(&str) -> bool) -> Option<String> {
        let tabs = self.browser.get_tabs().lock().unwrap();
        tabs.iter()
            .filter(|tab| {
                let id: &str = tab.get_target_id();
                id != origin
            })
            .find(|tab| matches(&tab.get_url()))
            .map(|tab| tab.get_target_id().to_string())
    }

    /// Close the current window and continue on the one with the given target
    /// id.
    pub fn replace_current_window(&self, target_id: &str) -> Result<()> {
        let next = {
            let tabs = self.browser.get_tabs().lock().unwrap();
            tabs.iter()
                .find(|tab| {
                    let id: &str = tab.get_target_id();
                    id == target_id
                })
                .cloned()
                .ok_or_else(|| AppError::Browser(format!("no window with target id {target_id}")))?
        };

        let stale = self.tab();
        if let Err(e) = stale.close(true) {
            warn!("failed to close stale window: {e}");
        }
        next.activate()
            .map_err(|e| AppError::Browser(format!("failed to activate window: {e}")))?;
        *self.tab.lock().unwrap() = next;
        Ok(())
    }

    /// Close every window except the current one.
    pub fn close_extra_windows(&self) -> Result<()> {
        let current = self.current_window();
        let extras: Vec<Arc<Tab>> = {
            let tabs = self.browser.get_tabs().lock().unwrap();
            tabs.iter()
                .filter(|tab| {
                    let id: &str = tab.get_target_id();
                    id != current
                })
                .cloned()
                .collect()
        };

        for tab in extras {
            debug!("closing stray window {}", tab.get_target_id());
            if let Err(e) = tab.close(true) {
                warn!("failed to close stray window: {e}");
            }
        }
        Ok(())
    }

    /// PNG screenshot of the current window, written under `config.dir`.
    pub fn capture_screenshot(&self, config: &ScreenshotConfig) -> Result<PathBuf> {
        let data = self
            .tab()
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| AppError::Browser(format!("screenshot capture failed: {e}")))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let filename = format!("product_{}_{}.png", timestamp, uuid::Uuid::new_v4().simple());
        let path = Path::new(&config.dir).join(filename);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, data)?;
        Ok(path)
    }
}

fn is_no_match(error: &anyhow::Error) -> bool {
    error.to_string().contains("No element found")
}

/// Sort driver failures into the retry taxonomy. The protocol reports stale
/// handles and covered elements with distinct message shapes; anything
/// unrecognized is a fatal browser error.
fn classify(selector: &str, error: anyhow::Error) -> AppError {
    let message = error.to_string();
    if message.contains("No element found") {
        AppError::ElementNotFound {
            selector: selector.to_string(),
        }
    } else if message.contains("Could not find node")
        || message.contains("No node with given id")
        || message.contains("not belong to the document")
        || message.contains("detached from document")
    {
        AppError::StaleElement {
            selector: selector.to_string(),
        }
    } else if message.contains("not visible")
        || message.contains("not clickable")
        || message.contains("not an HTMLElement")
    {
        AppError::NotInteractable {
            selector: selector.to_string(),
        }
    } else {
        AppError::Browser(message)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn classifies_missing_elements_as_fatal() {
        let err = classify(".price", anyhow!("No element found for selector: .price"));
        assert!(matches!(err, AppError::ElementNotFound { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn classifies_stale_handles_as_retryable() {
        for message in [
            "Could not find node with given id",
            "Node with given id does not belong to the document",
            "Node is detached from document",
        ] {
            let err = classify(".price", anyhow!("{message}"));
            assert!(matches!(err, AppError::StaleElement { .. }), "{message}");
            assert!(err.is_retryable());
        }
    }

    #[test]
    fn classifies_blocked_elements_as_retryable() {
        let err = classify(
            "button",
            anyhow!("Node is either not visible or not an HTMLElement"),
        );
        assert!(matches!(err, AppError::NotInteractable { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn unknown_driver_failures_stay_fatal() {
        let err = classify("body", anyhow!("Chrome process exited"));
        assert!(matches!(err, AppError::Browser(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn no_match_detection() {
        assert!(is_no_match(&anyhow!("No element found")));
        assert!(!is_no_match(&anyhow!("something else")));
    }
}
