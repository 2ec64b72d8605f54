//! Application state management for shopcache.
//!
//! This module contains the core `App` struct: the product list and loading
//! flag owned by the list screen, the navigator, and the channel that
//! carries load results back from the background task.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use shopcache_core::cache::manager::{age_display, is_stale};
use shopcache_core::{
    ApiClient, CacheManager, Config, LoadOutcome, Notice, Product, ProductLoader, Provenance,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::navigator::{Navigator, Route};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background load channel.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Product cards per row on the list screen.
pub const GRID_COLUMNS: usize = 2;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ShowingNotice,
    ConfirmingQuit,
    Quitting,
}

/// A finished load, tagged with the mount it belongs to.
struct LoadMessage {
    generation: u64,
    outcome: LoadOutcome,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    loader: ProductLoader,

    pub state: AppState,
    pub navigator: Navigator,

    // List screen state, reset on every mount
    pub products: Vec<Product>,
    pub loading: bool,
    pub provenance: Option<Provenance>,
    pub cached_at: Option<DateTime<Utc>>,
    pub selection: usize,

    pub notice: Option<Notice>,
    pub status_message: Option<String>,

    /// Incremented on every mount and unmount of the list screen.
    generation: u64,
    load_rx: mpsc::Receiver<LoadMessage>,
    load_tx: mpsc::Sender<LoadMessage>,
}

impl App {
    /// Create the application from user configuration
    pub fn new(config: &Config) -> Result<Self> {
        let cache_dir = config.cache_dir()?;
        debug!(?cache_dir, "Cache directory configured");
        let cache = CacheManager::new(cache_dir).context("Failed to open cache directory")?;

        let endpoint = config.catalog_url();
        info!(endpoint = %endpoint, "Catalog endpoint configured");
        let client = ApiClient::with_endpoint(endpoint, config.request_timeout())
            .context("Failed to build HTTP client")?;

        Ok(Self::with_loader(ProductLoader::new(
            Arc::new(client),
            Arc::new(cache),
        )))
    }

    pub fn with_loader(loader: ProductLoader) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            loader,
            state: AppState::Normal,
            navigator: Navigator::new(),
            products: Vec::new(),
            loading: false,
            provenance: None,
            cached_at: None,
            selection: 0,
            notice: None,
            status_message: None,
            generation: 0,
            load_rx: rx,
            load_tx: tx,
        }
    }

    // =========================================================================
    // List screen lifecycle
    // =========================================================================

    /// Mount the list screen: reset its state and start one load.
    pub fn mount_products(&mut self) {
        self.generation += 1;
        self.products.clear();
        self.provenance = None;
        self.cached_at = None;
        self.selection = 0;
        self.loading = true;
        self.status_message = Some("Loading products...".to_string());

        let generation = self.generation;
        let loader = self.loader.clone();
        let tx = self.load_tx.clone();
        info!(generation, "Loading products");

        tokio::spawn(async move {
            let outcome = loader.load().await;
            if let Err(e) = tx.send(LoadMessage { generation, outcome }).await {
                error!(error = %e, "Failed to send load result - channel closed");
            }
        });
    }

    /// Unmount the list screen. Any load still in flight is discarded.
    pub fn unmount_products(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    /// Drain finished loads and apply the one for the current mount
    pub fn check_background_tasks(&mut self) {
        while let Ok(message) = self.load_rx.try_recv() {
            if message.generation != self.generation {
                debug!(
                    generation = message.generation,
                    current = self.generation,
                    "Ignoring load result for a previous mount"
                );
                continue;
            }
            self.apply_outcome(message.outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        self.products = outcome.catalog.into_products();
        self.provenance = Some(outcome.provenance);
        self.cached_at = outcome.cached_at;
        self.selection = 0;
        self.loading = false;

        self.status_message = Some(match outcome.provenance {
            Provenance::Network => format!("{} products", self.products.len()),
            Provenance::Cache => format!(
                "Offline - showing {} products cached {}",
                self.products.len(),
                self.cache_age().unwrap_or_else(|| "earlier".to_string())
            ),
            Provenance::Empty => "No products available".to_string(),
        });

        if let Some(notice) = outcome.notice {
            self.notice = Some(notice);
            if self.state == AppState::Normal {
                self.state = AppState::ShowingNotice;
            }
        }
    }

    pub fn cache_age(&self) -> Option<String> {
        self.cached_at.map(age_display)
    }

    pub fn cache_is_stale(&self) -> bool {
        self.cached_at.is_some_and(is_stale)
    }

    /// Close the help or quit overlay. A notice that arrived while it was
    /// open is shown next.
    pub fn close_overlay(&mut self) {
        self.state = if self.notice.is_some() {
            AppState::ShowingNotice
        } else {
            AppState::Normal
        };
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        if self.state == AppState::ShowingNotice {
            self.state = AppState::Normal;
        }
    }

    // =========================================================================
    // Selection and navigation
    // =========================================================================

    pub fn selected_product(&self) -> Option<&Product> {
        self.products.get(self.selection)
    }

    pub fn move_selection_left(&mut self) {
        if self.selection % GRID_COLUMNS > 0 {
            self.selection -= 1;
        }
    }

    pub fn move_selection_right(&mut self) {
        if self.selection % GRID_COLUMNS < GRID_COLUMNS - 1 && self.selection + 1 < self.products.len() {
            self.selection += 1;
        }
    }

    pub fn move_selection_up(&mut self) {
        self.selection = self.selection.saturating_sub(GRID_COLUMNS);
    }

    pub fn move_selection_down(&mut self) {
        if self.selection + GRID_COLUMNS < self.products.len() {
            self.selection += GRID_COLUMNS;
        } else if self.selection / GRID_COLUMNS + 1 < self.row_count() {
            // Last row is short; land on its final card
            self.selection = self.products.len() - 1;
        }
    }

    pub fn row_count(&self) -> usize {
        self.products.len().div_ceil(GRID_COLUMNS)
    }

    /// Hand the selected record to the detail screen
    pub fn open_selected(&mut self) {
        if self.loading {
            return;
        }
        if let Some(product) = self.selected_product().cloned() {
            debug!(id = product.id, "Opening product details");
            self.navigator.navigate(Route::ProductDetails { product });
        }
    }

    pub fn go_back(&mut self) -> bool {
        self.navigator.go_back()
    }

    pub fn quit(&mut self) {
        self.unmount_products();
        self.state = AppState::Quitting;
    }
}
