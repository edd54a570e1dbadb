use std::io::Write;

use clap::{Subcommand, ValueEnum};
use rust_decimal::Decimal;
use vastrakala_core::{ProductId, ProductQuery, SortOrder};
use vastrakala_storefront::AppState;

use crate::error::CliError;
use crate::render;

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    PriceAsc,
    PriceDesc,
    Newest,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::PriceAsc => Self::PriceAsc,
            SortArg::PriceDesc => Self::PriceDesc,
            SortArg::Newest => Self::Newest,
        }
    }
}

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List products matching the filters
    List {
        #[arg(long)]
        category: Option<String>,
        /// Free-text search over name and description
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        featured: bool,
        #[arg(long)]
        new_arrival: bool,
        #[arg(long)]
        min_price: Option<Decimal>,
        #[arg(long)]
        max_price: Option<Decimal>,
        #[arg(long)]
        fabric: Option<String>,
        #[arg(long)]
        occasion: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Show one product with its sizes and colours
    Show { id: String },
    /// Show the available filter values
    Filters,
}

pub async fn run(state: &AppState, out: &mut impl Write, action: ProductsAction) -> Result<(), CliError> {
    match action {
        ProductsAction::List {
            category,
            search,
            featured,
            new_arrival,
            min_price,
            max_price,
            fabric,
            occasion,
            sort,
        } => {
            let query = ProductQuery {
                category,
                featured: featured.then_some(true),
                new_arrival: new_arrival.then_some(true),
                search,
                min_price,
                max_price,
                fabric,
                occasion,
                sort_by: sort.map(SortOrder::from),
            };
            let products = state.products(&query).await?;
            if products.is_empty() {
                writeln!(out, "No products found")?;
            }
            for product in &products {
                render::product_row(out, product)?;
            }
        }
        ProductsAction::Show { id } => {
            let product = state.product(&ProductId::new(id)).await?;
            render::product_row(out, &product)?;
            writeln!(out, "{}", product.description)?;
            if !product.sizes.is_empty() {
                writeln!(out, "Sizes:   {}", product.sizes.join(", "))?;
            }
            let colors: Vec<&str> = product.colors().collect();
            if !colors.is_empty() {
                writeln!(out, "Colours: {}", colors.join(", "))?;
            }
            if state.is_favorited(&product.id) {
                writeln!(out, "In your wishlist")?;
            }
        }
        ProductsAction::Filters => {
            let filters = state.filter_options().await?;
            writeln!(out, "Fabrics:   {}", filters.fabrics.join(", "))?;
            writeln!(out, "Occasions: {}", filters.occasions.join(", "))?;
            writeln!(
                out,
                "Price:     {} - {}",
                render::money(filters.price_range.min_price),
                render::money(filters.price_range.max_price)
            )?;
        }
    }
    Ok(())
}
