//! Headless Chromium snapshot provider.
//!
//! Launches one browser per run and opens one page per venue. After
//! navigation the provider polls for the grid selector until the configured
//! timeout, then reads the rendered DOM and hands it to
//! [`crate::extract_slots`]. When the grid never shows up, a full-page
//! screenshot is written as `debug-<venue>.png` for later inspection.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::ScreenshotParams;
use court_watch_occupancy_models::Slot;
use court_watch_venue_models::VenueDefinition;
use futures::StreamExt as _;
use tokio::task::JoinHandle;

use crate::{ScrapeError, SnapshotProvider, extract_slots};

/// Settings for [`BrowserSnapshotProvider`].
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// How long to wait for the grid selector to appear.
    pub grid_timeout: Duration,
    /// Delay between grid selector checks.
    pub poll_interval: Duration,
    /// Where to write `debug-<venue>.png` when the grid never appears.
    /// `None` disables screenshots.
    pub screenshot_dir: Option<PathBuf>,
    /// Launch Chromium with `--no-sandbox` (needed in most CI containers).
    pub no_sandbox: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            grid_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(250),
            screenshot_dir: Some(PathBuf::from(".")),
            no_sandbox: false,
        }
    }
}

/// Snapshot provider backed by a headless Chromium instance.
pub struct BrowserSnapshotProvider {
    browser: Browser,
    handler: JoinHandle<()>,
    options: BrowserOptions,
}

impl BrowserSnapshotProvider {
    /// Launches headless Chromium.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::BrowserConfig`] if the launch options are
    /// rejected, or [`ScrapeError::Browser`] if Chromium fails to start.
    pub async fn launch(options: BrowserOptions) -> Result<Self, ScrapeError> {
        let mut builder = BrowserConfig::builder();
        if options.no_sandbox {
            builder = builder.no_sandbox();
        }
        let config = builder.build().map_err(ScrapeError::BrowserConfig)?;

        log::debug!("Launching headless browser");
        let (browser, mut events) = Browser::launch(config).await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    log::debug!("Browser event error: {e}");
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            options,
        })
    }

    /// Closes the browser and waits for its process to exit.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if the browser cannot be shut down cleanly.
    pub async fn close(mut self) -> Result<(), ScrapeError> {
        self.browser.close().await?;
        self.browser.wait().await?;
        if let Err(e) = self.handler.await {
            log::debug!("Browser event handler ended abnormally: {e}");
        }
        Ok(())
    }

    async fn read_grid(
        &self,
        page: &Page,
        venue: &VenueDefinition,
    ) -> Result<Vec<Slot>, ScrapeError> {
        page.wait_for_navigation().await?;

        if let Err(e) = self.wait_for_grid(page, &venue.selectors.grid).await {
            if matches!(e, ScrapeError::GridTimeout { .. }) {
                self.save_debug_screenshot(page, &venue.key).await;
            }
            return Err(e);
        }

        let html = page.content().await?;
        let slots = extract_slots(&html, &venue.selectors)?;
        log::debug!("[{}] Extracted {} slots", venue.key, slots.len());
        Ok(slots)
    }

    /// Polls until `selector` matches an element or the grid timeout passes.
    async fn wait_for_grid(&self, page: &Page, selector: &str) -> Result<(), ScrapeError> {
        let deadline = Instant::now() + self.options.grid_timeout;

        loop {
            match page.find_element(selector).await {
                Ok(_) => return Ok(()),
                Err(e) if is_missing_element(&e) => {
                    log::trace!("Grid '{selector}' not rendered yet: {e}");
                }
                Err(e) => return Err(e.into()),
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::GridTimeout {
                    selector: selector.to_owned(),
                    timeout: self.options.grid_timeout,
                });
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    async fn save_debug_screenshot(&self, page: &Page, key: &str) {
        let Some(dir) = &self.options.screenshot_dir else {
            return;
        };
        let path = dir.join(format!("debug-{key}.png"));
        let params = ScreenshotParams::builder().full_page(true).build();

        match page.save_screenshot(params, &path).await {
            Ok(_) => log::warn!(
                "[{key}] Grid not found, saved screenshot to {}",
                path.display()
            ),
            Err(e) => log::error!("[{key}] Grid not found and screenshot failed: {e}"),
        }
    }
}

/// Whether a `find_element` failure only means the selector has no match
/// yet. Chromium reports an unmatched query as a protocol error on node 0;
/// anything else (dropped socket, crashed target) is fatal.
const fn is_missing_element(error: &CdpError) -> bool {
    matches!(error, CdpError::Chrome(_) | CdpError::NotFound)
}

/// Closes a venue's page when the snapshot finishes or is dropped mid-way
/// (e.g. by the runner's per-venue timeout).
struct PageGuard {
    page: Option<Page>,
    key: String,
}

impl PageGuard {
    async fn close(mut self) {
        if let Some(page) = self.page.take() {
            close_page(page, &self.key).await;
        }
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };
        let key = std::mem::take(&mut self.key);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                log::debug!("[{key}] Snapshot cancelled, closing page");
                handle.spawn(async move { close_page(page, &key).await });
            }
            Err(_) => log::warn!("[{key}] Snapshot cancelled outside a runtime, page left open"),
        }
    }
}

async fn close_page(page: Page, key: &str) {
    if let Err(e) = page.close().await {
        log::warn!("[{key}] Failed to close page: {e}");
    }
}

impl SnapshotProvider for BrowserSnapshotProvider {
    async fn snapshot(&self, venue: &VenueDefinition) -> Result<Vec<Slot>, ScrapeError> {
        log::info!("[{}] Loading {}", venue.key, venue.url);

        let page = self.browser.new_page(venue.url.as_str()).await?;
        let guard = PageGuard {
            page: Some(page.clone()),
            key: venue.key.clone(),
        };

        let result = self.read_grid(&page, venue).await;
        guard.close().await;

        result
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}
