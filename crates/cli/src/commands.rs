//! Subcommand handlers over an open [`InvoiceFlow`].

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};

use invoiceflow_auth::{NewUser, User, effective_capabilities};
use invoiceflow_core::money::{format_cents, format_signed_cents};
use invoiceflow_core::{BrandId, CategoryId, ProductId, ReturnId};
use invoiceflow_infra::InvoiceFlow;
use invoiceflow_inventory::{Product, StockMovement};
use invoiceflow_invoicing::{Invoice, InvoiceDraft, InvoiceLine};
use invoiceflow_purchasing::{PoLine, PurchaseOrderDraft, ReturnStatus, SalesReturn};

use crate::args::{
    Command, InvoiceCommand, LineSpec, PoCommand, ProductCommand, ReportCommand, ReturnCommand,
    TagCommand, TeamCommand,
};

pub fn run(app: &mut InvoiceFlow, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let user = app.login(&username, &password)?;
            println!("logged in as {} ({})", user.username, user.role);
        }
        Command::Logout => match app.logout()? {
            Some(user) => println!("logged out {}", user.username),
            None => println!("no active session"),
        },
        Command::Whoami => match app.whoami() {
            Some(user) => print_user(user),
            None => println!("not logged in"),
        },
        Command::Register {
            username,
            password,
            role,
        } => match app.sign_up(&username, &password, role)? {
            Some(user) => println!("registered and logged in as {} ({})", user.username, user.id),
            None => println!("username '{}' is taken; nothing changed", username.trim()),
        },
        Command::Product(cmd) => product(app, cmd)?,
        Command::Category(cmd) => category(app, cmd)?,
        Command::Brand(cmd) => brand(app, cmd)?,
        Command::Invoice(cmd) => invoice(app, cmd)?,
        Command::Po(cmd) => purchase_order(app, cmd)?,
        Command::Return(cmd) => sales_return(app, cmd)?,
        Command::Team(cmd) => team(app, cmd)?,
        Command::Report(cmd) => report(app, cmd)?,
        Command::Describe { name } => println!("{}", app.describe_product(&name)?),
    }
    Ok(())
}

fn product(app: &mut InvoiceFlow, cmd: ProductCommand) -> Result<()> {
    match cmd {
        ProductCommand::List => {
            for p in app.list_products()? {
                println!(
                    "{:<38} {:<24} {:>10} {:>6}  {}",
                    p.id,
                    p.name,
                    format_cents(p.price),
                    p.stock,
                    p.sku
                );
            }
        }
        ProductCommand::Add(args) => {
            let product = app.add_product(Product {
                id: ProductId::from(""),
                name: args.name,
                description: args.description,
                price: args.price,
                cost: args.cost,
                stock: args.stock,
                sku: args.sku,
                category: args.category,
                brand: args.brand,
            })?;
            println!("added product {} ({})", product.name, product.id);
        }
        ProductCommand::Update { id, changes } => {
            let mut product = app.get_product(&id)?.clone();
            if let Some(name) = changes.name {
                product.name = name;
            }
            if let Some(price) = changes.price {
                product.price = price;
            }
            if let Some(cost) = changes.cost {
                product.cost = cost;
            }
            if let Some(stock) = changes.stock {
                product.stock = stock;
            }
            if let Some(sku) = changes.sku {
                product.sku = sku;
            }
            if let Some(description) = changes.description {
                product.description = description;
            }
            if changes.category.is_some() {
                product.category = changes.category;
            }
            if changes.brand.is_some() {
                product.brand = changes.brand;
            }
            app.update_product(product)?;
            println!("updated product {id}");
        }
        ProductCommand::Delete { id } => {
            let removed = app.delete_product(&id)?;
            println!("deleted product {}", removed.name);
        }
    }
    Ok(())
}

fn category(app: &mut InvoiceFlow, cmd: TagCommand) -> Result<()> {
    match cmd {
        TagCommand::List => {
            for c in app.list_categories()? {
                println!("{:<38} {}", c.id, c.name);
            }
        }
        TagCommand::Add { name } => {
            let c = app.add_category(&name)?;
            println!("added category {} ({})", c.name, c.id);
        }
        TagCommand::Delete { id } => {
            let c = app.delete_category(&CategoryId::from(id))?;
            println!("deleted category {}", c.name);
        }
    }
    Ok(())
}

fn brand(app: &mut InvoiceFlow, cmd: TagCommand) -> Result<()> {
    match cmd {
        TagCommand::List => {
            for b in app.list_brands()? {
                println!("{:<38} {}", b.id, b.name);
            }
        }
        TagCommand::Add { name } => {
            let b = app.add_brand(&name)?;
            println!("added brand {} ({})", b.name, b.id);
        }
        TagCommand::Delete { id } => {
            let b = app.delete_brand(&BrandId::from(id))?;
            println!("deleted brand {}", b.name);
        }
    }
    Ok(())
}

fn invoice(app: &mut InvoiceFlow, cmd: InvoiceCommand) -> Result<()> {
    match cmd {
        InvoiceCommand::List => {
            for inv in app.list_invoices()? {
                println!(
                    "{:<38} {:<10} {:<24} {:>12}  {}",
                    inv.id,
                    inv.date,
                    inv.customer_name,
                    format_cents(inv.total),
                    inv.status
                );
            }
        }
        InvoiceCommand::Show { id } => print_invoice(app.get_invoice(&id)?),
        InvoiceCommand::Create {
            customer,
            lines,
            status,
            date,
            due,
            notes,
            id,
        } => {
            let mut draft = InvoiceDraft::new(customer, date.unwrap_or_else(today), snapshot(app, &lines)?);
            draft.due_date = due;
            draft.notes = notes;
            let invoice = match id {
                Some(id) => app.create_invoice_with_id(id, draft, status)?,
                None => app.create_invoice(draft, status)?,
            };
            println!(
                "saved invoice {} ({}, {})",
                invoice.id,
                invoice.status,
                format_cents(invoice.total)
            );
        }
        InvoiceCommand::Update {
            id,
            customer,
            lines,
            status,
            date,
            due,
            notes,
        } => {
            let saved = app.get_invoice(&id)?;
            let status = status.unwrap_or(saved.status);
            let mut draft = saved.to_draft();
            if let Some(customer) = customer {
                draft.customer_name = customer;
            }
            if let Some(date) = date {
                draft.date = date;
            }
            if due.is_some() {
                draft.due_date = due;
            }
            if notes.is_some() {
                draft.notes = notes;
            }
            if !lines.is_empty() {
                draft.items = snapshot(app, &lines)?;
            }
            let invoice = app.update_invoice(&id, draft, status)?;
            println!(
                "saved invoice {} ({}, {})",
                invoice.id,
                invoice.status,
                format_cents(invoice.total)
            );
        }
        InvoiceCommand::Status { id, status } => {
            let invoice = app.set_invoice_status(&id, status)?;
            println!("invoice {} is now {}", invoice.id, invoice.status);
        }
        InvoiceCommand::Delete { id } => {
            let removed = app.delete_invoice(&id)?;
            println!("deleted invoice {} ({})", removed.id, removed.status);
        }
    }
    Ok(())
}

fn snapshot(app: &InvoiceFlow, lines: &[LineSpec]) -> Result<Vec<InvoiceLine>> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, spec)| {
            app.invoice_line(&spec.product_id, spec.quantity, spec.price)
                .with_context(|| format!("line {}", idx + 1))
        })
        .collect()
}

fn purchase_order(app: &mut InvoiceFlow, cmd: PoCommand) -> Result<()> {
    match cmd {
        PoCommand::List => {
            for po in app.list_purchase_orders()? {
                println!(
                    "{:<38} {:<10} {:<24} {:>12}  {}",
                    po.id,
                    po.date,
                    po.supplier,
                    format_cents(po.total_cost),
                    po.status
                );
            }
        }
        PoCommand::Create {
            supplier,
            lines,
            date,
        } => {
            let items = lines
                .into_iter()
                .map(|l| PoLine {
                    product_name: l.product_name,
                    quantity: l.quantity,
                    cost: l.cost,
                })
                .collect();
            let po = app.create_purchase_order(PurchaseOrderDraft::new(
                supplier,
                date.unwrap_or_else(today),
                items,
            ))?;
            println!("created purchase order {} ({})", po.id, format_cents(po.total_cost));
        }
        PoCommand::Approve { id } => {
            let moved = app.approve_purchase_order(&id)?;
            if moved.is_empty() {
                println!("purchase order {id}: no stock received");
            } else {
                print_movements(&moved);
            }
        }
        PoCommand::Reject { id } => {
            if app.reject_purchase_order(&id)? {
                println!("rejected purchase order {id}");
            } else {
                println!("purchase order {id} is not pending; nothing changed");
            }
        }
    }
    Ok(())
}

fn sales_return(app: &mut InvoiceFlow, cmd: ReturnCommand) -> Result<()> {
    match cmd {
        ReturnCommand::List => {
            for r in app.list_returns()? {
                println!(
                    "{:<38} {:<10} {:<38} {:>10}  {}  {}",
                    r.id,
                    r.date,
                    r.invoice_id,
                    format_cents(r.refund_amount),
                    r.status,
                    r.reason
                );
            }
        }
        ReturnCommand::Add {
            invoice,
            reason,
            refund,
            date,
        } => {
            let record = app.add_return(SalesReturn {
                id: ReturnId::from(""),
                invoice_id: invoice,
                reason,
                date: date.unwrap_or_else(today),
                status: ReturnStatus::Pending,
                refund_amount: refund,
            })?;
            println!("recorded return {}", record.id);
        }
    }
    Ok(())
}

fn team(app: &mut InvoiceFlow, cmd: TeamCommand) -> Result<()> {
    match cmd {
        TeamCommand::List => {
            for user in app.list_users()? {
                print_user(user);
            }
        }
        TeamCommand::Add {
            username,
            password,
            role,
        } => match app.add_member(NewUser::new(username.as_str(), password, role))? {
            Some(user) => println!("added {} ({}, {})", user.username, user.role, user.id),
            None => println!("username '{}' is taken; nothing changed", username.trim()),
        },
        TeamCommand::Toggle { id } => {
            let user = app.toggle_user_status(&id)?;
            let state = if user.is_active { "active" } else { "inactive" };
            println!("{} is now {state}", user.username);
        }
        TeamCommand::Permissions { id, grant, revoke } => {
            if grant.is_empty() && revoke.is_empty() {
                bail!("nothing to change; pass --grant and/or --revoke");
            }
            let mut user: Option<User> = None;
            for cap in grant {
                user = Some(app.set_user_permission(&id, cap, true)?);
            }
            for cap in revoke {
                user = Some(app.set_user_permission(&id, cap, false)?);
            }
            if let Some(user) = user {
                print_user(&user);
            }
        }
        TeamCommand::Delete { id } => {
            let removed = app.delete_user(&id)?;
            println!("deleted {}", removed.username);
        }
    }
    Ok(())
}

fn report(app: &mut InvoiceFlow, cmd: ReportCommand) -> Result<()> {
    match cmd {
        ReportCommand::Dashboard => {
            let stats = app.dashboard()?;
            println!("revenue (paid): {}", format_cents(stats.total_revenue));
            println!("invoices:       {}", stats.invoice_count);
            println!(
                "low stock:      {} (below {})",
                stats.low_stock_count, stats.low_stock_threshold
            );
            for (month, amount) in invoiceflow_infra::services::reports::MONTHS
                .iter()
                .zip(stats.revenue_by_month)
            {
                println!("  {month} {:>12}", format_cents(amount));
            }
        }
        ReportCommand::Financial => {
            let r = app.financial_report()?;
            println!("revenue:             {:>12}", format_cents(r.revenue));
            println!("cost of goods sold:  {:>12}", format_cents(r.cost_of_goods_sold));
            println!("gross profit:        {:>12}", format_signed_cents(r.gross_profit));
            println!("inventory valuation: {:>12}", format_signed_cents(r.inventory_valuation));
        }
        ReportCommand::Billing => {
            let b = app.billing_summary()?;
            println!("plan:     {}", b.plan);
            println!("users:    {}", b.users);
            println!("products: {}", b.products);
            println!("invoices: {}", b.invoices);
        }
        ReportCommand::Insights => println!("{}", app.business_insights()?),
    }
    Ok(())
}

/// Shows the flags in force right now, so an inactive user lists none.
fn print_user(user: &User) {
    let capabilities = effective_capabilities(user);
    let granted = if capabilities.is_empty() {
        "-".to_string()
    } else {
        capabilities
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(",")
    };
    let state = if user.is_active { "active" } else { "inactive" };
    println!(
        "{:<38} {:<16} {:<10} {:<8} {}",
        user.id, user.username, user.role, state, granted
    );
}

fn print_invoice(inv: &Invoice) {
    println!("invoice  {}", inv.id);
    println!("customer {}", inv.customer_name);
    println!("date     {} (due {})", inv.date, inv.due_date);
    println!("status   {}", inv.status);
    for line in &inv.items {
        println!(
            "  {:<24} {:>5} x {:>10}",
            line.product_name,
            line.quantity,
            format_cents(line.price)
        );
    }
    println!("total    {}", format_cents(inv.total));
    if let Some(notes) = &inv.notes {
        println!("notes    {notes}");
    }
}

fn print_movements(moved: &[StockMovement]) {
    for m in moved {
        println!("{:<38} {:+} -> {}", m.product_id, m.delta, m.new_stock);
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
