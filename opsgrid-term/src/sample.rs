//! Sample order data served by the demo client.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use opsgrid_lib::catalog::{ActorRoles, ColumnCatalog, ColumnDescriptor};
use opsgrid_lib::format::{self, Formatters};
use opsgrid_lib::model::{Row, Value};

pub const ORDER_COUNT: u32 = 137;

const SHOPS: [&str; 4] = ["Flagship", "Outlet", "Marketplace", "Wholesale"];
const STATUSES: [&str; 5] = ["paid", "shipped", "delivered", "refunded", "pending"];
const CHANNELS: [&str; 3] = ["web", "app", "partner"];
const CUSTOMERS: [&str; 9] = [
    "Ada Park",
    "Bo Chen",
    "Cleo Ruiz",
    "Dev Patel",
    "Eli Novak",
    "Fen Ito",
    "Gus Moreau",
    "Hana Sato",
    "Ivo Berg",
];

/// Columns of the orders list.
pub fn order_catalog() -> ColumnCatalog {
    ColumnCatalog::new(vec![
        ColumnDescriptor::new("order_no", "Order", 96),
        ColumnDescriptor::new("date", "Date", 96),
        ColumnDescriptor::new("shop", "Shop", 112).category("Store"),
        ColumnDescriptor::new("channel", "Channel", 72)
            .category("Store")
            .hidden(),
        ColumnDescriptor::new("customer", "Customer", 112),
        ColumnDescriptor::new("status", "Status", 88),
        ColumnDescriptor::new("items", "Items", 56).category("Sales"),
        ColumnDescriptor::new("amount", "Amount", 96).category("Sales"),
        ColumnDescriptor::new("discount", "Disc.", 64)
            .category("Sales")
            .hidden(),
        ColumnDescriptor::new("cost", "Cost", 96)
            .category("Finance")
            .restricted_to(["admin", "finance"]),
        ColumnDescriptor::new("margin", "Margin", 72)
            .category("Finance")
            .hidden()
            .restricted_to(["admin", "finance"]),
        ColumnDescriptor::new("note", "Note", 160).hidden().unsortable(),
    ])
}

/// Role check for the roles named in a comma separated list.
pub fn actor_roles(catalog: &ColumnCatalog, roles: &str) -> ActorRoles {
    ActorRoles::new(
        catalog,
        roles.split(',').map(str::trim).filter(|r| !r.is_empty()),
    )
}

/// Cell formatters of the orders list.
pub fn order_formatters() -> Formatters {
    Formatters::new()
        .with("date", format::date("%Y-%m-%d"))
        .with("amount", format::currency("$"))
        .with("cost", format::currency("$"))
        .with("items", format::integer())
        .with("discount", format::percent(0))
        .with("margin", format::percent(1))
        .with("status", |value: &Value, _row: &Row| match value.as_str() {
            Some(status) => status.to_uppercase(),
            None => format::plain(value),
        })
}

/// Deterministic order rows.
pub fn order_rows() -> Vec<Row> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 8, 30, 0).single();
    (1..=ORDER_COUNT)
        .map(|n| {
            let i = n as usize;
            let items = 1 + (n * 7) % 9;
            let unit = Decimal::new(i64::from(1999 + (n * 379) % 8000), 2);
            let amount = unit * Decimal::from(items);
            let cost = amount * Decimal::new(55 + i64::from(n % 20), 2);
            let margin = if amount.is_zero() {
                Decimal::ZERO
            } else {
                (amount - cost) / amount
            };

            let mut row = Row::new(n.to_string())
                .set("order_no", format!("SO-{:05}", 10_000 + n))
                .set("shop", SHOPS[i % SHOPS.len()])
                .set("channel", CHANNELS[(i / 3) % CHANNELS.len()])
                .set("customer", CUSTOMERS[(i * 5) % CUSTOMERS.len()])
                .set("status", STATUSES[(i * 3) % STATUSES.len()])
                .set("items", items)
                .set("amount", amount.round_dp(2))
                .set("discount", Decimal::new(i64::from(n % 4) * 5, 2))
                .set("cost", cost.round_dp(2))
                .set("margin", margin.round_dp(4));
            if let Some(start) = start {
                row.insert("date", start + Duration::hours(i64::from(n) * 13));
            }
            if n % 11 == 0 {
                row.insert("note", "gift wrap");
            }
            row
        })
        .collect()
}
