//! Screen routing for the catalog browser.
//!
//! Two routes exist: the product list, which takes no parameters, and the
//! product detail screen, which carries exactly one product record. The
//! detail screen renders from that record alone.

use shopcache_core::Product;

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Products,
    ProductDetails { product: Product },
}

impl Route {
    pub fn title(&self) -> &str {
        match self {
            Route::Products => "Products",
            Route::ProductDetails { .. } => "Product Details",
        }
    }
}

/// Stack navigator. The bottom entry is always `Route::Products`.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Route::Products],
        }
    }

    pub fn current(&self) -> &Route {
        // The initial route is never popped
        &self.stack[self.stack.len() - 1]
    }

    pub fn navigate(&mut self, route: Route) {
        self.stack.push(route);
    }

    /// Pop back one screen. Returns false when already at the initial route.
    pub fn go_back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }
}
