//! Theme commands.

use pocket_shop_storefront::shop::Shop;
use tracing::info;

/// Log the current theme.
pub fn show(shop: &Shop) {
    let theme = shop.theme();
    info!("Theme: {theme} {}", theme.icon());
}

/// Switch between light and dark.
pub fn toggle(shop: &Shop) {
    let theme = shop.on_toggle_theme();
    info!("Theme switched to {theme} {}", theme.icon());
}
