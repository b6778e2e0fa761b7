//! DDL for the shop schema.
//!
//! Provisioning drops the whole database and recreates it, so running it twice
//! in a row always ends in the same empty schema.

use crate::error::MySQLShopError;

/// Tables in creation order. Purchases reference the other two.
pub const SHOP_TABLES: [&str; 3] = ["users", "items", "purchases"];

/// Purchase status written when none is given.
pub const PURCHASE_STATUS_ACTIVE: u8 = 1;

/// Reject anything but a plain identifier, since the name is spliced into DDL.
pub fn validate_database_name(name: &str) -> Result<(), MySQLShopError> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(MySQLShopError::InvalidDatabaseName(name.to_string()))
    }
}

/// Backtick-quoted `database`.`table`.
pub fn qualified_table(database: &str, table: &str) -> String {
    format!("`{database}`.`{table}`")
}

/// Generate DROP DATABASE statement.
pub fn generate_drop_database(database: &str) -> String {
    format!("DROP DATABASE IF EXISTS `{database}`")
}

/// Generate CREATE DATABASE statement.
pub fn generate_create_database(database: &str) -> String {
    format!("CREATE DATABASE `{database}`")
}

/// Generate CREATE TABLE statement for one of [`SHOP_TABLES`].
pub fn generate_create_table(database: &str, table: &str) -> Option<String> {
    let columns = match table {
        "users" => "`id` SERIAL PRIMARY KEY,
    `name` VARCHAR(100),
    `email` VARCHAR(255),
    `is_vip` BOOLEAN DEFAULT FALSE,"
            .to_string(),
        "items" => "`id` SERIAL PRIMARY KEY,
    `name` VARCHAR(100),
    `price` DECIMAL(7,2),
    `daily_inventory` INT,"
            .to_string(),
        "purchases" => format!(
            "`id` SERIAL PRIMARY KEY,
    `user_id` BIGINT UNSIGNED NOT NULL,
    `item_id` BIGINT UNSIGNED NOT NULL,
    `status` TINYINT UNSIGNED DEFAULT {PURCHASE_STATUS_ACTIVE},
    `quantity` INT UNSIGNED DEFAULT 1,
    `purchase_price` DECIMAL(12,2),
    FOREIGN KEY (`user_id`) REFERENCES {users}(`id`),
    FOREIGN KEY (`item_id`) REFERENCES {items}(`id`),",
            users = qualified_table(database, "users"),
            items = qualified_table(database, "items"),
        ),
        _ => return None,
    };

    Some(format!(
        "CREATE TABLE {} (
    {columns}
    `created_at` TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    `updated_at` DATETIME DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
)",
        qualified_table(database, table)
    ))
}

/// Every statement needed to reset `database` to an empty shop schema.
pub fn provision_statements(database: &str) -> Result<Vec<String>, MySQLShopError> {
    validate_database_name(database)?;

    let mut statements = vec![
        generate_drop_database(database),
        generate_create_database(database),
    ];
    statements.extend(
        SHOP_TABLES
            .iter()
            .filter_map(|table| generate_create_table(database, table)),
    );
    Ok(statements)
}
