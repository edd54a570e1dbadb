use std::io::Write;

use clap::Subcommand;
use vastrakala_core::OrderId;
use vastrakala_storefront::AppState;

use crate::error::CliError;
use crate::render;

#[derive(Subcommand)]
pub enum OrdersAction {
    /// List your orders, newest first
    List,
    /// Show an order with its tracking timeline
    Show { order_id: String },
}

pub async fn run(state: &AppState, out: &mut impl Write, action: OrdersAction) -> Result<(), CliError> {
    match action {
        OrdersAction::List => {
            let orders = state.orders().await?;
            if orders.is_empty() {
                writeln!(out, "No orders yet")?;
            }
            for order in &orders {
                render::order_row(out, order)?;
            }
        }
        OrdersAction::Show { order_id } => {
            let timeline = state.timeline(&OrderId::new(order_id)).await?;
            render::timeline(out, &timeline)?;
        }
    }
    Ok(())
}
