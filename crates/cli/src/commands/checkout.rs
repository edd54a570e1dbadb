use std::io::Write;

use clap::Args;
use vastrakala_core::ShippingAddress;
use vastrakala_storefront::AppState;

use crate::error::CliError;
use crate::render;

/// Shipping address for the order.
#[derive(Args)]
pub struct AddressArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    street: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    pincode: String,
}

impl From<AddressArgs> for ShippingAddress {
    fn from(args: AddressArgs) -> Self {
        Self {
            name: args.name,
            phone: args.phone,
            street: args.street,
            city: args.city,
            state: args.state,
            pincode: args.pincode,
        }
    }
}

pub async fn run(state: &AppState, out: &mut impl Write, address: AddressArgs) -> Result<(), CliError> {
    let receipt = state.checkout(address.into()).await?;
    writeln!(out, "Order {} placed", receipt.order_id())?;
    render::order_row(out, &receipt.order)?;
    Ok(())
}
