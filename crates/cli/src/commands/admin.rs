use std::io::Write;

use clap::Subcommand;
use vastrakala_core::{OrderId, OrderStatus};
use vastrakala_storefront::AppState;
use vastrakala_storefront::api::StatusUpdate;

use crate::error::CliError;
use crate::render;

#[derive(Subcommand)]
pub enum AdminAction {
    /// List every order in the store
    Orders,
    /// Append a tracking event and move the order to a new status
    Status {
        order_id: String,
        /// e.g. confirmed, packed, shipped, in_transit, out_for_delivery, delivered
        status: String,
        #[arg(short, long)]
        message: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
    },
    /// Walk an order through every step up to delivery
    Simulate { order_id: String },
}

pub async fn run(state: &AppState, out: &mut impl Write, action: AdminAction) -> Result<(), CliError> {
    let console = state.admin();
    match action {
        AdminAction::Orders => {
            for order in console.all_orders().await? {
                render::order_row(out, &order)?;
            }
        }
        AdminAction::Status {
            order_id,
            status,
            message,
            location,
        } => {
            let status = status.trim();
            if status.is_empty() {
                return Err(CliError::InvalidArgument("status cannot be empty".to_string()));
            }
            let update = StatusUpdate {
                message,
                location,
                ..StatusUpdate::new(OrderStatus::from(status))
            };
            let event = console.update_status(&OrderId::new(order_id), update).await?;
            render::event(out, &event)?;
        }
        AdminAction::Simulate { order_id } => {
            let order_id = OrderId::new(order_id);
            let status = console.simulate_delivery(&order_id).await?;
            writeln!(out, "Order {order_id} is now {status}")?;
        }
    }
    Ok(())
}
