use std::io::Write;

use clap::Subcommand;
use vastrakala_core::{CartLineId, ProductId, Quantity};
use vastrakala_storefront::AppState;

use crate::error::CliError;
use crate::render;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart and its totals
    Show,
    /// Add a product to the cart
    Add {
        product_id: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (values below 1 become 1)
    Update {
        line_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { line_id: String },
    /// Empty the cart
    Clear,
}

pub async fn run(state: &AppState, out: &mut impl Write, action: CartAction) -> Result<(), CliError> {
    let cart = match action {
        CartAction::Show => state.refresh_cart().await?,
        CartAction::Add {
            product_id,
            size,
            color,
            quantity,
        } => {
            let quantity = Quantity::new(quantity)
                .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
            state
                .add_to_cart(
                    &ProductId::new(product_id),
                    size.as_deref(),
                    color.as_deref(),
                    quantity,
                )
                .await?
        }
        CartAction::Update { line_id, quantity } => {
            state
                .update_quantity(&CartLineId::new(line_id), quantity)
                .await?
        }
        CartAction::Remove { line_id } => state.remove_line(&CartLineId::new(line_id)).await?,
        CartAction::Clear => state.clear_cart().await?,
    };
    render::cart(out, &cart)?;
    Ok(())
}
