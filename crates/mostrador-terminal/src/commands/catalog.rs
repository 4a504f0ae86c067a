//! # Catalog Commands
//!
//! Product grid and search box. Only products with stock in this
//! register's warehouse are listed.

use mostrador_core::pricing::active_promotions;
use mostrador_core::{Money, PricingContext, Product};
use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use crate::Terminal;

/// Product card for the catalog grid.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub unit_price: Money,
    /// Units on hand in this warehouse
    pub stock: i64,
    /// Promotion that would apply today, if any
    pub promotion_label: Option<String>,
}

impl ProductView {
    fn build(product: &Product, warehouse_id: &str, ctx: &PricingContext<'_>) -> Self {
        let promotion_label = active_promotions(ctx.promotions, ctx.today)
            .find(|p| p.matches(product))
            .map(|p| p.name.clone());

        ProductView {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            unit_price: product.unit_price,
            stock: product.stock_in(warehouse_id),
            promotion_label,
        }
    }
}

/// Lists every product available in this warehouse, sorted by name.
pub fn browse_catalog(terminal: &Terminal) -> Vec<ProductView> {
    debug!("browse_catalog command");
    search_catalog(terminal, "")
}

/// Case-insensitive search on product name or category.
pub fn search_catalog(terminal: &Terminal, query: &str) -> Vec<ProductView> {
    debug!(query = %query, "search_catalog command");
    let warehouse_id = &terminal.config.terminal.warehouse_id;

    terminal.with_pricing(|data, ctx| {
        data.catalog
            .search(query, warehouse_id)
            .into_iter()
            .map(|p| ProductView::build(p, warehouse_id, ctx))
            .collect()
    })
}
