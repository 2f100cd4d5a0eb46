//! Cart commands.
//!
//! Each command logs the cart as it stands after the change.

use pocket_shop_core::ProductId;
use pocket_shop_storefront::shop::Shop;
use pocket_shop_storefront::view::CartView;
use tracing::info;

use super::CliError;

/// Log the cart lines and total.
pub fn show(shop: &Shop) {
    report(&shop.cart_view());
}

/// Add one unit of `product_id`.
///
/// # Errors
///
/// Returns `CliError::Cart` if the product is not in the catalog.
pub fn add(shop: &Shop, product_id: ProductId) -> Result<(), CliError> {
    let view = shop.on_add_to_cart(product_id)?;
    info!(%product_id, "Added to cart");
    report(&view);
    Ok(())
}

/// Remove the line for `product_id`.
pub fn remove(shop: &Shop, product_id: ProductId) {
    report(&shop.on_remove_from_cart(product_id));
}

/// Change the quantity of `product_id` by `delta`.
pub fn change(shop: &Shop, product_id: ProductId, delta: i32) {
    report(&shop.on_change_quantity(product_id, delta));
}

/// Remove every line.
pub fn clear(shop: &Shop) {
    report(&shop.clear_cart());
}

fn report(view: &CartView) {
    if view.is_empty {
        info!("{}", view.empty_message());
        return;
    }

    for item in &view.items {
        info!(
            "#{} {} x{} @ {} = {}",
            item.product_id, item.name, item.quantity, item.price, item.line_price
        );
    }
    info!(items = view.item_count, "Total: {}", view.total);
}
