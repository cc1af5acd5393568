use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Instrument};

use storefront::admin::{todays_orders, DashboardStats};
use storefront::app_system::{setup_tracing, StorefrontSystem};
use storefront::cart::CartSnapshot;
use storefront::checkout::{CheckoutError, CheckoutOutcome, CheckoutRequest};
use storefront::config::StorefrontConfig;
use storefront::domain::{format_vnd, PaymentType};
use storefront::error::{Result, StorefrontError};
use storefront::payment::{PaymentEntry, PaymentOutcome};
use storefront::session::{Route, Session};

#[derive(Parser)]
#[command(name = "storefront", version, about = "Storefront client: shop, pay and manage orders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the credential
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored credential
    Logout,
    /// List products, optionally filtered by name
    Catalog {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show the cart
    Cart,
    /// Add one unit of a product to the cart
    Add { product_id: String },
    /// Remove one unit of a product from the cart
    Remove { product_id: String },
    /// Empty the cart
    Clear,
    /// Place an order for the cart contents
    Checkout {
        #[arg(long, default_value = "PREPAID")]
        payment_type: PaymentType,
        /// Defaults to the profile address, then the configured default
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Confirm or cancel the pending payment
    Pay {
        /// Pay a pending order from the order history instead
        #[arg(long)]
        order: Option<String>,
        #[arg(long)]
        cancel: bool,
        /// On cancel, put the order's items back into the cart
        #[arg(long, requires = "cancel")]
        restore_cart: bool,
    },
    /// List your orders
    Orders,
    /// Cancel one of your orders
    CancelOrder { order_id: String },
    /// Show notifications
    Notifications {
        #[arg(long)]
        mark_read: bool,
        /// Keep printing pushed notifications until interrupted
        #[arg(long)]
        follow: bool,
    },
    /// Admin overview of today's and this month's orders
    Dashboard,
    /// Admin list of delivery statuses
    Deliveries,
}

#[tokio::main]
async fn main() {
    setup_tracing();
    let cli = Cli::parse();

    let result = async {
        let config = StorefrontConfig::from_env()?;
        let mut system = StorefrontSystem::new(config)?;
        let outcome = run(&mut system, cli.command).await;
        system.shutdown().await?;
        outcome
    }
    .instrument(tracing::info_span!("storefront"))
    .await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Runs the route guard for `route` and returns the session it allowed.
fn enter(system: &StorefrontSystem, route: Route) -> Result<Option<Session>> {
    let now = Utc::now();
    let shown = system.session.guard(route, now);
    if shown != route {
        return Err(StorefrontError::Redirected(shown));
    }
    if route.requires_session() {
        return Ok(Some(system.session.current(now)?));
    }
    Ok(None)
}

fn signed_in(system: &StorefrontSystem, route: Route) -> Result<Session> {
    enter(system, route)?.ok_or(StorefrontError::Redirected(Route::Login))
}

async fn run(system: &mut StorefrontSystem, command: Commands) -> Result<()> {
    match command {
        Commands::Login { username, password } => {
            enter(system, Route::Login)?;
            let session = system.session.login(&username, &password).await?;
            println!("Signed in as {} ({})", session.user_id(), session.role());
            println!("Continue at {}", session.landing_route());
        }
        Commands::Logout => {
            system.session.logout()?;
            println!("Signed out");
        }
        Commands::Catalog { search } => {
            signed_in(system, Route::UserPage)?;
            let catalog = system.catalog().await?;
            for product in catalog.search(search.as_deref().unwrap_or_default()) {
                let stock = if product.is_out_of_stock() {
                    "out of stock".to_string()
                } else {
                    format!("{} available", product.available())
                };
                println!(
                    "{:>6}  {:<32} {:>14}  {}  {}",
                    product.id,
                    product.name,
                    format_vnd(product.price),
                    stock,
                    product.image_url(&system.config.image_base_url, &system.config.default_image)
                );
            }
        }
        Commands::Cart => {
            signed_in(system, Route::UserPage)?;
            print_cart(&system.cart.snapshot().await?);
        }
        Commands::Add { product_id } => {
            signed_in(system, Route::UserPage)?;
            let catalog = system.catalog().await?;
            let product = catalog
                .get(&product_id)
                .cloned()
                .ok_or_else(|| StorefrontError::UnknownProduct(product_id.clone()))?;
            let snapshot = system.cart.add(product).await?;
            print_cart(&snapshot);
        }
        Commands::Remove { product_id } => {
            signed_in(system, Route::UserPage)?;
            print_cart(&system.cart.remove(product_id).await?);
        }
        Commands::Clear => {
            signed_in(system, Route::UserPage)?;
            system.cart.clear().await?;
            println!("Cart cleared");
        }
        Commands::Checkout { payment_type, address, name } => {
            let session = signed_in(system, Route::UserPage)?;
            let checkout = system.checkout();
            let defaults = checkout.buyer_defaults(session.user_id()).await;
            let request = CheckoutRequest {
                user_id: session.user_id().to_string(),
                buyer_name: name.or(defaults.name),
                address: address.unwrap_or(defaults.address),
                payment_type,
            };

            let receipt = match checkout.submit(request).await {
                Ok(receipt) => receipt,
                Err(CheckoutError::Rejected(e)) => {
                    warn!(error = %e, "Order rejected, refreshing cart");
                    for adjustment in checkout.resync().await? {
                        println!("Cart updated: {:?}", adjustment);
                    }
                    return Err(CheckoutError::Rejected(e).into());
                }
                Err(e) => return Err(e.into()),
            };
            if let Some(e) = &receipt.cart_not_cleared {
                eprintln!("Warning: the order went through but the cart still holds it ({e}); run `storefront clear`");
            }
            match receipt.outcome {
                CheckoutOutcome::AwaitingPayment(context) => {
                    println!("Order {} placed, {} to pay", context.order_id(), format_vnd(context.amount()));
                    system.payment(Some(context))?;
                    println!("Continue at {}: run `storefront pay` or `storefront pay --cancel`", Route::Payment);
                }
                CheckoutOutcome::Placed(result) => {
                    println!("Order {} placed, pay on delivery", result.id);
                }
            }
        }
        Commands::Pay { order, cancel, restore_cart } => {
            let session = signed_in(system, Route::Payment)?;
            let nav_state = match order {
                Some(order_id) => {
                    let mut history = system.order_history(session.user_id());
                    history.load().await?;
                    Some(history.pay_now(&order_id)?)
                }
                None => None,
            };
            let mut flow = system.payment(nav_state)?;
            if flow.entry() == PaymentEntry::Unavailable {
                println!("No order to pay for");
                println!("Continue at {}", flow.go_back());
                return Ok(());
            }
            if let Some(context) = flow.context() {
                println!(
                    "Order {} to {}: {}",
                    context.order_id(),
                    context.order_data.address,
                    format_vnd(context.amount())
                );
            }
            let outcome = if cancel {
                flow.cancel(restore_cart).await?
            } else {
                flow.confirm().await?
            };
            print_payment(&outcome);
        }
        Commands::Orders => {
            let session = signed_in(system, Route::Orders)?;
            let mut history = system.order_history(session.user_id());
            for order in history.load().await? {
                println!(
                    "{:<12} {:<26} {:>14}  {:<10} {}",
                    order.order_id,
                    order.order_date,
                    format_vnd(order.total_amount),
                    order.order_status.label(),
                    order.shipping_address
                );
            }
        }
        Commands::CancelOrder { order_id } => {
            let session = signed_in(system, Route::Orders)?;
            let mut history = system.order_history(session.user_id());
            history.load().await?;
            history.cancel(&order_id).await?;
            println!("Order {} canceled", order_id);
        }
        Commands::Notifications { mark_read, follow } => {
            let session = signed_in(system, Route::UserPage)?;
            let feed = system.notification_feed(session.user_id());
            let mut shown = 0;
            for notification in feed.notifications().await?.iter().rev() {
                print_notification(notification);
                shown += 1;
            }
            println!("{} unread", feed.unread_count().await?);
            if mark_read {
                let changed = feed.mark_all_read().await?;
                println!("Marked {} as read", changed);
            }
            if follow {
                info!("Following notifications, press Ctrl-C to stop");
                loop {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => break,
                        _ = tokio::time::sleep(std::time::Duration::from_millis(500)) => {
                            let notifications = feed.notifications().await?;
                            for notification in notifications.iter().take(notifications.len().saturating_sub(shown)).rev() {
                                print_notification(notification);
                            }
                            shown = notifications.len();
                        }
                    }
                }
            }
        }
        Commands::Dashboard => {
            signed_in(system, Route::AdminPage)?;
            let mut screen = system.order_screen();
            let orders = screen.load().await?;
            let today = Local::now().date_naive();
            let stats = DashboardStats::compute(orders, today);
            println!("Revenue today:      {}", format_vnd(stats.today_revenue));
            println!("Orders today:       {}", stats.today_orders);
            println!("Revenue this month: {}", format_vnd(stats.month_revenue));
            println!("Orders this month:  {}", stats.month_orders);
            for order in todays_orders(orders, today) {
                println!(
                    "  {:<12} {:<24} {:<10} {}",
                    order.order_id,
                    order.full_name,
                    order.order_status,
                    format_vnd(order.total_amount)
                );
            }
        }
        Commands::Deliveries => {
            signed_in(system, Route::AdminPage)?;
            let mut screen = system.delivery_screen();
            for delivery in screen.load().await? {
                println!(
                    "{:>6}  {:<14} {:<12} {:<24} {:<10} {}",
                    delivery.order_id,
                    or_na(&delivery.tracking_number),
                    delivery.status.label(),
                    delivery.current_position,
                    or_na(&delivery.shipping_date),
                    or_na(&delivery.delivery_date)
                );
            }
        }
    }
    Ok(())
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

fn print_cart(cart: &CartSnapshot) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }
    for line in &cart.lines {
        println!(
            "{:>6}  {:<32} x{:<4} {:>14}",
            line.product.id,
            line.display_name(),
            line.quantity,
            format_vnd(line.line_total())
        );
    }
    println!("Total: {}", format_vnd(cart.total));
}

fn print_payment(outcome: &PaymentOutcome) {
    println!(
        "Payment {:?} recorded as {} at {}",
        outcome.record.status, outcome.record.transaction_id, outcome.record.payment_time
    );
    if outcome.restored_lines > 0 {
        println!("{} items returned to the cart", outcome.restored_lines);
    }
    println!("Continue at {}", outcome.next);
}

fn print_notification(notification: &storefront::domain::Notification) {
    let marker = if notification.read { " " } else { "*" };
    println!(
        "{} {}  {}",
        marker,
        notification.sent_at.as_deref().unwrap_or("-"),
        notification.message
    );
}
