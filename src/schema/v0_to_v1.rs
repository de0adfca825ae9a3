pub const UPGRADE_0_TO_1_SQL: &str = r#"
--
-- Schema Upgrade: Version 0 → 1
--
-- Creates the products table. AUTOINCREMENT keeps SQLite from handing out
-- the id of a deleted row again.
--

CREATE TABLE products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(255),
    price INTEGER,
    category VARCHAR(255)
);
"#;

pub const DOWNGRADE_1_TO_0_SQL: &str = r#"
DROP TABLE products;
"#;
