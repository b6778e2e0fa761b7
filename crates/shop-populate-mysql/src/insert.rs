//! Parameterized INSERT statements for the shop tables.

use crate::ddl::qualified_table;
use mysql_async::Value;
use shop_generator::{NewItem, NewPurchase, NewUser};

/// Default number of rows per multi-row INSERT.
pub const DEFAULT_BATCH_SIZE: usize = 100;

pub const ITEM_COLUMNS: [&str; 3] = ["name", "price", "daily_inventory"];
pub const USER_COLUMNS: [&str; 3] = ["name", "email", "is_vip"];
pub const PURCHASE_COLUMNS: [&str; 4] = ["user_id", "item_id", "quantity", "purchase_price"];

/// Build a multi-row INSERT with one `(?, ...)` group per row.
pub fn batch_insert_sql(database: &str, table: &str, columns: &[&str], row_count: usize) -> String {
    let col_placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    let row_template = format!("({})", col_placeholders.join(", "));
    let rows_template: Vec<&str> = (0..row_count).map(|_| row_template.as_str()).collect();

    format!(
        "INSERT INTO {} ({}) VALUES {}",
        qualified_table(database, table),
        columns
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", "),
        rows_template.join(", ")
    )
}

// Decimals travel as strings; MySQL converts them to DECIMAL without loss.

pub fn item_params(item: &NewItem) -> Vec<Value> {
    vec![
        Value::from(item.name.as_str()),
        Value::from(item.price.to_string()),
        Value::from(item.daily_inventory),
    ]
}

pub fn user_params(user: &NewUser) -> Vec<Value> {
    vec![
        Value::from(user.name.as_str()),
        Value::from(user.email.as_str()),
        Value::from(user.is_vip),
    ]
}

pub fn purchase_params(purchase: &NewPurchase) -> Vec<Value> {
    vec![
        Value::from(purchase.user_id),
        Value::from(purchase.item_id),
        Value::from(purchase.quantity),
        Value::from(purchase.purchase_price.to_string()),
    ]
}
