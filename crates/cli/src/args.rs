//! Command-line surface.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use invoiceflow_auth::{Capability, Role};
use invoiceflow_core::money::parse_cents;
use invoiceflow_core::{InvoiceId, ProductId, PurchaseOrderId, UserId};
use invoiceflow_invoicing::InvoiceStatus;

#[derive(Debug, Parser)]
#[command(name = "invoiceflow")]
#[command(about = "Invoicing and inventory for small businesses")]
#[command(version)]
pub struct Cli {
    /// Data directory (overrides INVOICEFLOW_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and keep the session in the data directory
    Login { username: String, password: String },

    /// End the current session
    Logout,

    /// Show the session user and their effective capabilities
    Whoami,

    /// Create an account with inventory and invoices access, and log in
    Register {
        username: String,
        password: String,
        #[arg(long, default_value = "member")]
        role: Role,
    },

    /// Catalog products
    #[command(subcommand)]
    Product(ProductCommand),

    /// Category tags
    #[command(subcommand)]
    Category(TagCommand),

    /// Brand tags
    #[command(subcommand)]
    Brand(TagCommand),

    /// Customer invoices
    #[command(subcommand)]
    Invoice(InvoiceCommand),

    /// Purchase orders
    #[command(subcommand)]
    Po(PoCommand),

    /// Sales returns
    #[command(subcommand)]
    Return(ReturnCommand),

    /// Team members and their permissions
    #[command(subcommand)]
    Team(TeamCommand),

    /// Dashboard, financial and billing reports
    #[command(subcommand)]
    Report(ReportCommand),

    /// Generate a marketing description for a product name
    Describe { name: String },
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    List,
    Add(ProductArgs),
    /// Edit a product; unset fields keep their value
    Update {
        id: ProductId,
        #[command(flatten)]
        changes: ProductChanges,
    },
    Delete { id: ProductId },
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    pub name: String,
    /// Sale price, e.g. 29.99
    #[arg(long, value_parser = parse_amount)]
    pub price: u64,
    /// Unit cost, e.g. 15.00
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub cost: u64,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub stock: i64,
    #[arg(long, default_value = "")]
    pub sku: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProductChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, value_parser = parse_amount)]
    pub price: Option<u64>,
    #[arg(long, value_parser = parse_amount)]
    pub cost: Option<u64>,
    #[arg(long, allow_negative_numbers = true)]
    pub stock: Option<i64>,
    #[arg(long)]
    pub sku: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
}

/// Shared by categories and brands.
#[derive(Debug, Subcommand)]
pub enum TagCommand {
    List,
    Add { name: String },
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum InvoiceCommand {
    List,
    Show { id: InvoiceId },
    Create {
        #[arg(long)]
        customer: String,
        /// PRODUCT_ID:QTY[:PRICE]; repeat for more lines
        #[arg(long = "line", required = true)]
        lines: Vec<LineSpec>,
        #[arg(long, default_value = "draft")]
        status: InvoiceStatus,
        /// Invoice date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Due date (defaults to one week after the invoice date)
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
        /// Use this id instead of minting one
        #[arg(long)]
        id: Option<InvoiceId>,
    },
    /// Re-save an invoice; given lines replace all existing lines
    Update {
        id: InvoiceId,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long = "line")]
        lines: Vec<LineSpec>,
        #[arg(long)]
        status: Option<InvoiceStatus>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change only the status of a saved invoice
    Status { id: InvoiceId, status: InvoiceStatus },
    Delete { id: InvoiceId },
}

#[derive(Debug, Subcommand)]
pub enum PoCommand {
    List,
    Create {
        #[arg(long)]
        supplier: String,
        /// PRODUCT_NAME:QTY:COST; repeat for more lines
        #[arg(long = "line", required = true)]
        lines: Vec<PoLineSpec>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Approve a pending order and receive its lines into stock
    Approve { id: PurchaseOrderId },
    Reject { id: PurchaseOrderId },
}

#[derive(Debug, Subcommand)]
pub enum ReturnCommand {
    List,
    Add {
        #[arg(long)]
        invoice: InvoiceId,
        #[arg(long)]
        reason: String,
        #[arg(long, value_parser = parse_amount)]
        refund: u64,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Debug, Subcommand)]
pub enum TeamCommand {
    List,
    Add {
        username: String,
        password: String,
        #[arg(long, default_value = "member")]
        role: Role,
    },
    /// Activate or deactivate a member
    Toggle { id: UserId },
    /// Grant or revoke permission flags
    Permissions {
        id: UserId,
        #[arg(long, value_delimiter = ',')]
        grant: Vec<Capability>,
        #[arg(long, value_delimiter = ',')]
        revoke: Vec<Capability>,
    },
    Delete { id: UserId },
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    Dashboard,
    Financial,
    Billing,
    /// Generated advice from the current figures
    Insights,
}

/// `PRODUCT_ID:QTY[:PRICE]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpec {
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: Option<u64>,
}

impl FromStr for LineSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let (id, qty, price) = match parts.as_slice() {
            [id, qty] => (*id, *qty, None),
            [id, qty, price] => (*id, *qty, Some(*price)),
            _ => return Err(format!("expected PRODUCT_ID:QTY[:PRICE], got '{s}'")),
        };
        let product_id = id.parse::<ProductId>().map_err(|e| e.to_string())?;
        let quantity = parse_quantity(qty)?;
        let price = price.map(parse_amount).transpose()?;
        Ok(Self {
            product_id,
            quantity,
            price,
        })
    }
}

/// `PRODUCT_NAME:QTY:COST`. The name may itself contain colons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoLineSpec {
    pub product_name: String,
    pub quantity: i64,
    pub cost: u64,
}

impl FromStr for PoLineSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let (Some(cost), Some(qty), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("expected PRODUCT_NAME:QTY:COST, got '{s}'"));
        };
        if name.trim().is_empty() {
            return Err(format!("missing product name in '{s}'"));
        }
        Ok(Self {
            product_name: name.trim().to_string(),
            quantity: parse_quantity(qty)?,
            cost: parse_amount(cost)?,
        })
    }
}

fn parse_quantity(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("invalid quantity '{raw}'"))
}

/// Decimal currency input, e.g. `29.99`.
pub fn parse_amount(raw: &str) -> Result<u64, String> {
    parse_cents(raw).map_err(|e| e.to_string())
}
