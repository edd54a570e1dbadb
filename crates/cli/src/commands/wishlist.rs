use std::io::Write;

use clap::Subcommand;
use vastrakala_core::ProductId;
use vastrakala_storefront::AppState;

use crate::error::CliError;
use crate::render;

#[derive(Subcommand)]
pub enum WishlistAction {
    /// List favourited products
    Show,
    /// Add the product if absent, remove it if present
    Toggle { product_id: String },
}

pub async fn run(
    state: &AppState,
    out: &mut impl Write,
    action: WishlistAction,
) -> Result<(), CliError> {
    match action {
        WishlistAction::Show => {
            let wishlist = state.refresh_wishlist().await?;
            if wishlist.is_empty() {
                writeln!(out, "Your wishlist is empty")?;
            }
            for entry in wishlist.entries() {
                render::product_row(out, &entry.product)?;
            }
        }
        WishlistAction::Toggle { product_id } => {
            let product_id = ProductId::new(product_id);
            if state.toggle_wishlist(&product_id).await? {
                writeln!(out, "Added {product_id} to your wishlist")?;
            } else {
                writeln!(out, "Removed {product_id} from your wishlist")?;
            }
        }
    }
    Ok(())
}
