//! Product listing.

use pocket_shop_storefront::shop::Shop;
use tracing::info;

/// Log every product whose name contains `query`.
pub fn list(shop: &Shop, query: &str) {
    let cards = shop.on_search(query);
    if cards.is_empty() {
        info!("No products match {query:?}");
        return;
    }

    for card in &cards {
        info!("#{} {} ({}) {}", card.id, card.name, card.category, card.price);
    }
}
