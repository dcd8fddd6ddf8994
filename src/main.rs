//! SalesDesk CLI
//!
//! Command-line front end over the same controllers the browser UI uses:
//! - Browse, search and sort customers
//! - List a customer's orders and show one order in full
//! - Place a new order
//! - Print lookup lists and a default config file

use anyhow::{bail, Context};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use salesdesk::config::{self, Config, ListingConfig, LoggingConfig};
use salesdesk::dialogs::{CustomerRef, NewOrderDialog, OrdersDialog};
use salesdesk::listing::{Listing, ListingController, SortDirection, Sortable};
use salesdesk::models::{Customer, CustomerColumn, Lookup, Order, OrderSummary, OrderSummaryColumn};
use salesdesk::{ApiClient, HttpTransport};

#[derive(Parser)]
#[command(name = "salesdesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse customers and their orders")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List customers with their predicted next order
    Customers {
        /// Only customers whose name matches
        #[arg(short, long)]
        search: Option<String>,
        /// Sort column
        #[arg(long, value_enum)]
        sort: Option<CustomerColumn>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Page to show (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Rows per page, one of listing.page_size_options (default: from config)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// List a customer's orders
    Orders {
        /// Customer id
        customer_id: i64,
        /// Sort column
        #[arg(long, value_enum)]
        sort: Option<OrderSummaryColumn>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Page to show (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Rows per page, one of listing.page_size_options (default: from config)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show one order with its lines
    Order {
        /// Order id
        order_id: i64,
    },

    /// Place a new order
    NewOrder {
        /// Customer id
        #[arg(long)]
        customer: i64,
        /// Employee id
        #[arg(long)]
        employee: i64,
        /// Shipper id
        #[arg(long)]
        shipper: i64,
        #[arg(long)]
        ship_name: String,
        #[arg(long, default_value = "")]
        ship_address: String,
        #[arg(long, default_value = "")]
        ship_city: String,
        #[arg(long, default_value = "")]
        ship_country: String,
        /// Required date (default: a week from today)
        #[arg(long)]
        required_date: Option<String>,
        #[arg(long, default_value = "0")]
        freight: f64,
        /// Line item as PRODUCT:QTY[:PRICE[:DISCOUNT]]; price defaults to the list price
        #[arg(long = "line", required = true)]
        lines: Vec<String>,
    },

    /// Print a selection list
    Lookups {
        #[arg(value_enum)]
        list: LookupList,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LookupList {
    Employees,
    Shippers,
    Products,
}

/// One `--line` argument
#[derive(Debug, Clone, PartialEq)]
struct LineArg {
    product_id: i64,
    qty: i32,
    unit_price: Option<f64>,
    discount: f64,
}

fn parse_line(raw: &str) -> anyhow::Result<LineArg> {
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
    if parts.len() < 2 || parts.len() > 4 {
        bail!("Invalid line item '{}'. Use PRODUCT:QTY[:PRICE[:DISCOUNT]]", raw);
    }

    let product_id = parts[0]
        .parse()
        .with_context(|| format!("Invalid product id in '{}'", raw))?;
    let qty = parts[1]
        .parse()
        .with_context(|| format!("Invalid quantity in '{}'", raw))?;
    let unit_price = parts
        .get(2)
        .map(|p| p.parse::<f64>())
        .transpose()
        .with_context(|| format!("Invalid price in '{}'", raw))?;
    let discount = parts
        .get(3)
        .map(|d| d.parse::<f64>())
        .transpose()
        .with_context(|| format!("Invalid discount in '{}'", raw))?
        .unwrap_or(0.0);

    Ok(LineArg {
        product_id,
        qty,
        unit_price,
        discount,
    })
}

fn page_size_for(listing: &ListingConfig, requested: Option<usize>) -> anyhow::Result<usize> {
    match listing.resolve_page_size(requested) {
        Some(size) => Ok(size),
        None => bail!(
            "Page size {} is not one of {:?} (see listing.page_size_options)",
            requested.unwrap_or_default(),
            listing.page_size_options
        ),
    }
}

/// `RUST_LOG` if set, else `salesdesk={level}`
fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("salesdesk={}", level)))
}

/// Plain formatter used only while the config file is being read
fn bootstrap_subscriber<W>(filter: EnvFilter, writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().without_time().with_writer(writer))
}

fn init_logging(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(default_filter(&config.level));

    // stdout is reserved for command output
    if config.format == "json" {
        registry.with(fmt::layer().json().with_writer(io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Cannot use config file {:?}", path))?,
        None => Config::load_default(),
    };

    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // The configured subscriber needs the config; report loading on a plain one
    let bootstrap = bootstrap_subscriber(default_filter("info"), io::stderr);
    let config = tracing::subscriber::with_default(bootstrap, || load_config(&cli))?;
    init_logging(&config.logging);

    let transport = HttpTransport::new(&config.api).context("Failed to build HTTP client")?;
    tracing::debug!(base_url = transport.base_url(), "Using backend");
    let api = ApiClient::new(Rc::new(transport)).with_lookup_page_size(config.lookups.page_size);

    match cli.command {
        Commands::Customers {
            search,
            sort,
            desc,
            page,
            page_size,
        } => {
            let page_size = page_size_for(&config.listing, page_size)?;
            let mut customers = ListingController::new(api.customers(), page_size);
            match search.as_deref() {
                Some(term) => customers.search(term).await,
                None => customers.load().await,
            }

            let listing = customers.listing_mut();
            apply_view(listing, sort, desc, page)?;
            print_listing(listing, cli.format, &CustomerColumn::ALL, |c: &Customer| {
                vec![
                    c.row_id().to_string(),
                    c.customer_id.to_string(),
                    c.customer_name.clone(),
                    display_date(c.last_order_date.as_deref()),
                    display_date(c.next_predicted_order.as_deref()),
                ]
            })?;
        }

        Commands::Orders {
            customer_id,
            sort,
            desc,
            page,
            page_size,
        } => {
            let mut dialog = OrdersDialog::new(page_size_for(&config.listing, page_size)?);
            let customer = CustomerRef {
                id: customer_id,
                name: format!("Customer {}", customer_id),
            };
            dialog.open_and_load(&api.orders(), customer).await;

            let listing = dialog.orders_mut();
            apply_view(listing, sort, desc, page)?;
            print_listing(listing, cli.format, &OrderSummaryColumn::ALL, |o: &OrderSummary| {
                vec![
                    o.order_id.to_string(),
                    display_date(o.required_date.as_deref()),
                    display_date(o.shipped_date.as_deref()),
                    o.ship_name.clone().unwrap_or_default(),
                    o.ship_address.clone().unwrap_or_default(),
                    o.ship_city.clone().unwrap_or_default(),
                ]
            })?;
        }

        Commands::Order { order_id } => {
            let mut dialog = OrdersDialog::new(config.listing.page_size);
            dialog.show_order(&api.orders(), order_id).await;
            if let Some(error) = dialog.detail_error() {
                bail!("{}", error);
            }
            if let Some(order) = dialog.detail() {
                print_order(order, cli.format)?;
            }
        }

        Commands::NewOrder {
            customer,
            employee,
            shipper,
            ship_name,
            ship_address,
            ship_city,
            ship_country,
            required_date,
            freight,
            lines,
        } => {
            let lines = lines
                .iter()
                .map(|l| parse_line(l))
                .collect::<anyhow::Result<Vec<_>>>()?;

            let mut dialog = NewOrderDialog::new();
            dialog.open(
                Some(CustomerRef {
                    id: customer,
                    name: String::new(),
                }),
                Local::now().date_naive(),
            );

            if lines.iter().any(|l| l.unit_price.is_none()) {
                dialog.load_lookups(&api).await;
                if let Some(error) = dialog.error() {
                    bail!("{}", error);
                }
            }

            for (index, line) in lines.iter().enumerate() {
                if index > 0 {
                    dialog.add_line_item();
                }
                dialog.select_product(index, line.product_id);
                if let Some(item) = dialog.draft_mut().line_item_mut(index) {
                    item.qty = line.qty;
                    item.discount = line.discount;
                    if let Some(price) = line.unit_price {
                        item.unit_price = price;
                    }
                }
            }

            let draft = dialog.draft_mut();
            draft.employee_id = employee;
            draft.shipper_id = shipper;
            draft.ship_name = ship_name;
            draft.ship_address = ship_address;
            draft.ship_city = ship_city;
            draft.ship_country = ship_country;
            draft.freight = freight;
            if let Some(date) = required_date {
                draft.required_date = date;
            }

            if !dialog.draft().is_form_valid() {
                bail!("Employee, shipper, ship name and at least one product line are required");
            }

            let total = dialog.total();
            match dialog.submit(&api.orders()).await {
                Some(created) => match cli.format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&created)?),
                    _ => {
                        let id = created
                            .get("orderId")
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        println!("Created order {} (total {:.2})", id, total);
                    }
                },
                None => bail!("{}", dialog.error().unwrap_or("Order was not submitted")),
            }
        }

        Commands::Lookups { list } => {
            let format = cli.format;
            match list {
                LookupList::Employees => print_lookups(&api.employees().all().await?, format)?,
                LookupList::Shippers => print_lookups(&api.shippers().all().await?, format)?,
                LookupList::Products => {
                    let products = api.products().all().await?;
                    match format {
                        OutputFormat::Table => {
                            let rows = products
                                .iter()
                                .map(|p| {
                                    vec![
                                        p.product_id.to_string(),
                                        p.product_name.clone(),
                                        p.unit_price.map(|u| format!("{:.2}", u)).unwrap_or_default(),
                                    ]
                                })
                                .collect();
                            print_table(&["Id", "Name", "Unit Price"], rows);
                        }
                        _ => print_records(&products, format)?,
                    }
                }
            }
        }

        Commands::Config { output } => write_default_config(output.as_ref())?,
    }

    Ok(())
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let content = config::generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &content)?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn direction(desc: bool) -> SortDirection {
    if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

/// Sort and page a loaded listing, surfacing a load failure
fn apply_view<T: Sortable + Clone>(
    listing: &mut Listing<T>,
    sort: Option<T::Column>,
    desc: bool,
    page: usize,
) -> anyhow::Result<()> {
    if let Some(error) = listing.error() {
        bail!("{}", error);
    }
    if let Some(column) = sort {
        listing.sort_by(column, direction(desc));
    }
    if page != 1 && !listing.page(page) {
        bail!("Page {} is out of range (1-{})", page, listing.total_pages().max(1));
    }
    Ok(())
}

/// Date part of a backend timestamp, or `-`
fn display_date(raw: Option<&str>) -> String {
    match raw.and_then(salesdesk::listing::parse_date) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

trait ColumnLabel {
    fn header(&self) -> &'static str;
}

impl ColumnLabel for CustomerColumn {
    fn header(&self) -> &'static str {
        self.label()
    }
}

impl ColumnLabel for OrderSummaryColumn {
    fn header(&self) -> &'static str {
        self.label()
    }
}

fn print_listing<T, C, F>(listing: &Listing<T>, format: OutputFormat, columns: &[C], row: F) -> anyhow::Result<()>
where
    T: Sortable + Clone + Serialize,
    C: ColumnLabel,
    F: Fn(&T) -> Vec<String>,
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(listing.page_items())?),
        OutputFormat::Csv => print_records(listing.page_items(), format)?,
        OutputFormat::Table => {
            let headers: Vec<&str> = columns.iter().map(ColumnLabel::header).collect();
            print_table(&headers, listing.page_items().iter().map(row).collect());
            println!();
            println!(
                "{}-{} of {} (page {}/{})",
                listing.start_item(),
                listing.end_item(),
                listing.total(),
                listing.current_page(),
                listing.total_pages().max(1)
            );
        }
    }
    Ok(())
}

fn print_order(order: &Order, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(order)?),
        OutputFormat::Csv => print_records(&order.details, format)?,
        OutputFormat::Table => {
            println!("Order {}", order.order_id);
            if let Some(customer) = order.cust_id {
                println!("  Customer:  {}", customer);
            }
            println!("  Employee:  {}", order.emp_id);
            println!("  Shipper:   {}", order.shipper_id);
            println!("  Ordered:   {}", display_date(order.order_date.as_deref()));
            println!("  Required:  {}", display_date(order.required_date.as_deref()));
            println!("  Shipped:   {}", display_date(order.shipped_date.as_deref()));
            println!("  Freight:   {:.2}", order.freight);
            let destination: Vec<&str> = [
                order.ship_name.as_deref(),
                order.ship_address.as_deref(),
                order.ship_city.as_deref(),
                order.ship_country.as_deref(),
            ]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
            if !destination.is_empty() {
                println!("  Ship to:   {}", destination.join(", "));
            }
            println!();

            let rows = order
                .details
                .iter()
                .map(|d| {
                    vec![
                        d.product_id.to_string(),
                        d.product_name.clone().unwrap_or_default(),
                        format!("{:.2}", d.unit_price),
                        d.qty.to_string(),
                        format!("{}", d.discount),
                    ]
                })
                .collect();
            print_table(&["Product", "Name", "Unit Price", "Qty", "Discount"], rows);
        }
    }
    Ok(())
}

fn print_lookups<T: Lookup + Serialize>(items: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            let rows = items
                .iter()
                .map(|i| vec![i.id().to_string(), i.display_name().to_string()])
                .collect();
            print_table(&["Id", "Name"], rows);
            Ok(())
        }
        _ => print_records(items, format),
    }
}

/// JSON array or CSV with a header row
fn print_records<T: Serialize>(items: &[T], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(io::stdout());
    for item in items {
        writer.serialize(item)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        println!("No rows");
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", line(headers.to_vec()));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1)));
    for row in &rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_config_warnings_reach_bootstrap_log() {
        let mut broken = tempfile::NamedTempFile::new().unwrap();
        broken.write_all(b"[api\nbase_url = ").unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = bootstrap_subscriber(EnvFilter::new("salesdesk=info"), move || writer.clone());
        let config = tracing::subscriber::with_default(subscriber, || {
            Config::load_first(&[broken.path().to_path_buf()])
        });

        assert_eq!(config.listing.page_size, Config::from_env().listing.page_size);
        let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(log.contains("Skipping config file"), "log was: {}", log);
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("11:12").unwrap(),
            LineArg {
                product_id: 11,
                qty: 12,
                unit_price: None,
                discount: 0.0
            }
        );
        assert_eq!(
            parse_line("42:10:9.8:15").unwrap(),
            LineArg {
                product_id: 42,
                qty: 10,
                unit_price: Some(9.8),
                discount: 15.0
            }
        );
        assert!(parse_line("11").is_err());
        assert!(parse_line("eleven:1").is_err());
        assert!(parse_line("1:2:3:4:5").is_err());
    }

    #[test]
    fn test_page_size_for() {
        let listing = ListingConfig::default();

        assert_eq!(page_size_for(&listing, None).unwrap(), 10);
        assert_eq!(page_size_for(&listing, Some(50)).unwrap(), 50);
        let err = page_size_for(&listing, Some(12)).unwrap_err();
        assert!(err.to_string().contains("[5, 10, 25, 50]"));
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(Some("1998-05-06T00:00:00")), "1998-05-06");
        assert_eq!(display_date(None), "-");
        assert_eq!(display_date(Some("soon")), "-");
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "salesdesk",
            "customers",
            "--sort",
            "last-order-date",
            "--desc",
            "--format",
            "csv",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Csv);
        match cli.command {
            Commands::Customers { sort, desc, .. } => {
                assert_eq!(sort, Some(CustomerColumn::LastOrderDate));
                assert!(desc);
            }
            _ => panic!("expected customers"),
        }
    }
}
