//! Cart commands.
//!
//! Each mutating command applies one cart operation and then renders the
//! resulting cart, the same view `show` prints.

use std::fmt::Write as _;

use pocket_cart::{CartStorage, CartStore, ProductLookup, Result, StockOracle};
use pocket_cart_core::CartState;
use tracing::instrument;

use crate::Commands;

/// Run `command` against `store` and return the text to print.
///
/// # Errors
///
/// Returns the cart error of a rejected operation; the cart is unchanged.
#[instrument(skip(store))]
pub async fn run<C, S>(store: &CartStore<C, S>, command: Commands) -> Result<String>
where
    C: StockOracle + ProductLookup,
    S: CartStorage,
{
    match command {
        Commands::Show => {}
        Commands::Add { product_id } => store.add_product(product_id).await?,
        Commands::Remove { product_id } => store.remove_product(product_id).await?,
        Commands::Set {
            product_id,
            quantity,
        } => store.set_quantity(product_id, quantity).await?,
        Commands::Inc { product_id } => store.increment(product_id).await?,
        Commands::Dec { product_id } => store.decrement(product_id).await?,
    }

    Ok(render(&store.items().await))
}

/// Render the cart as a plain-text table.
fn render(cart: &CartState) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let summary = cart.summary();
    let title_width = cart
        .items()
        .iter()
        .map(|item| item.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("PRODUCT".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<title_width$}  {:>10}  {:>5}  {:>11}",
        "ID", "PRODUCT", "PRICE", "QTY", "SUBTOTAL"
    );
    for (item, line) in cart.items().iter().zip(&summary.lines) {
        let _ = writeln!(
            out,
            "{:>4}  {:<title_width$}  {:>10}  {:>5}  {:>11}",
            item.product_id.to_string(),
            item.title,
            item.unit_price.to_string(),
            item.quantity.get(),
            line.subtotal.to_string(),
        );
    }
    let _ = writeln!(
        out,
        "{} item(s)  TOTAL {}",
        summary.item_count, summary.total
    );
    out
}
