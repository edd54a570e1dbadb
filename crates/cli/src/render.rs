//! Plain-text rendering of storefront data.

use std::io::{self, Write};

use rust_decimal::Decimal;
use vastrakala_core::{Order, Product, TrackingEvent};
use vastrakala_storefront::services::cart::CartSnapshot;
use vastrakala_storefront::services::orders::OrderTimeline;

pub fn money(amount: Decimal) -> String {
    format!("₹{}", amount.round_dp(2))
}

pub fn product_row(out: &mut impl Write, product: &Product) -> io::Result<()> {
    write!(out, "{}  {}  {}", product.id, product.name, money(product.price))?;
    if let Some(pct) = product.discount_percent() {
        write!(out, "  ({pct}% off)")?;
    }
    writeln!(out)
}

pub fn cart(out: &mut impl Write, cart: &CartSnapshot) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty");
    }
    for line in cart.lines() {
        writeln!(
            out,
            "{}  {} [{} / {}] x{}  {}",
            line.id,
            line.product_name,
            line.size,
            line.color,
            line.quantity,
            money(line.line_total())
        )?;
    }
    let totals = cart.totals();
    writeln!(out, "Items:    {}", cart.count())?;
    writeln!(out, "Subtotal: {}", money(totals.subtotal))?;
    writeln!(out, "Shipping: {}", money(totals.shipping))?;
    writeln!(out, "Total:    {}", money(totals.total))
}

pub fn order_row(out: &mut impl Write, order: &Order) -> io::Result<()> {
    writeln!(
        out,
        "{}  {}  {} item(s)  {}  {} / {}",
        order.id,
        order.created_at.format("%Y-%m-%d %H:%M"),
        order.item_count(),
        money(order.total),
        order.order_status,
        order.payment_status
    )
}

fn event_row(out: &mut impl Write, event: &TrackingEvent) -> io::Result<()> {
    write!(
        out,
        "  {}  {:<16} {}",
        event.timestamp.format("%Y-%m-%d %H:%M"),
        event.status,
        event.message
    )?;
    if let Some(location) = &event.location {
        write!(out, " ({location})")?;
    }
    writeln!(out)
}

pub fn timeline(out: &mut impl Write, timeline: &OrderTimeline) -> io::Result<()> {
    let order = &timeline.order;
    order_row(out, order)?;
    for item in &order.items {
        writeln!(
            out,
            "  - {} [{} / {}] x{}  {}",
            item.product_name,
            item.size,
            item.color,
            item.quantity,
            money(item.price)
        )?;
    }

    writeln!(out, "Progress:")?;
    for step in timeline.milestones() {
        let mark = if step.reached { "x" } else { " " };
        match step.at {
            Some(at) => writeln!(
                out,
                "  [{mark}] {}  {}",
                step.milestone.label(),
                at.format("%Y-%m-%d %H:%M")
            )?,
            None => writeln!(out, "  [{mark}] {}", step.milestone.label())?,
        }
    }

    writeln!(out, "Tracking:")?;
    for event in timeline.events() {
        event_row(out, event)?;
    }
    Ok(())
}

pub fn event(out: &mut impl Write, event: &TrackingEvent) -> io::Result<()> {
    event_row(out, event)
}
