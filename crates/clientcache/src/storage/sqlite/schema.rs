//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Filter predicates are appended to [`SELECT_RECORDS`] by
//! `clientcache_core::filter::build_predicate`.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS product_services (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    mdm_gems_ult_parent_id TEXT NOT NULL,
    parent_name TEXT NOT NULL,
    mdm_client_gems_id TEXT NOT NULL,
    client_name TEXT NOT NULL,
    mdm_cust_gems_id TEXT NOT NULL,
    customer_name TEXT NOT NULL,
    mdm_client_segment TEXT,
    region_cd TEXT,
    country_cd TEXT,
    parent_counts TEXT NOT NULL,
    client_counts TEXT NOT NULL,
    customer_counts TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_product_services_parent ON product_services(mdm_gems_ult_parent_id);
CREATE INDEX IF NOT EXISTS idx_product_services_client ON product_services(mdm_client_gems_id);
CREATE INDEX IF NOT EXISTS idx_product_services_region ON product_services(region_cd);
"#;

/// Base query for record reads. Rows come back in insertion order.
pub const SELECT_RECORDS: &str = r#"SELECT mdm_gems_ult_parent_id, parent_name, mdm_client_gems_id, client_name, mdm_cust_gems_id, customer_name, mdm_client_segment, region_cd, country_cd, parent_counts, client_counts, customer_counts FROM product_services"#;

pub const ORDER_BY_ID: &str = " ORDER BY id";

pub const INSERT_RECORD: &str = r#"
INSERT INTO product_services (
    mdm_gems_ult_parent_id, parent_name, mdm_client_gems_id, client_name,
    mdm_cust_gems_id, customer_name, mdm_client_segment, region_cd, country_cd,
    parent_counts, client_counts, customer_counts
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
"#;

pub const COUNT_RECORDS: &str = "SELECT COUNT(*) FROM product_services";
