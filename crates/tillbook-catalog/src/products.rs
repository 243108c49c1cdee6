use crate::CatalogError;
use rusqlite::{params, Connection, Row};
use tillbook_types::{NewProduct, Page, Product};

const PRODUCT_COLUMNS: &str = "id, name, type, buying_price, selling_price";

/// Inserts a product and returns the persisted row.
///
/// The insert and the read-back happen in one transaction; if either fails
/// the transaction is dropped uncommitted and nothing is stored.
pub fn create_product(conn: &Connection, new: &NewProduct) -> Result<Product, CatalogError> {
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO products (name, type, buying_price, selling_price)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            new.name,
            new.product_type,
            new.buying_price,
            new.selling_price
        ],
    )?;
    let id = tx.last_insert_rowid();

    let product = tx.query_row(
        &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
        [id],
        map_row_to_product,
    )?;

    tx.commit()?;
    tracing::debug!(id = product.id, "product stored");
    Ok(product)
}

/// Lists products in `id` order, skipping `page.skip` and returning at most
/// `page.limit` rows.
pub fn list_products(conn: &Connection, page: Page) -> Result<Vec<Product>, CatalogError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC LIMIT ?1 OFFSET ?2"
    ))?;

    let rows = stmt.query_map(
        params![i64::from(page.limit), i64::from(page.skip)],
        map_row_to_product,
    )?;
    let mut products = Vec::new();
    for row in rows {
        products.push(row?);
    }
    Ok(products)
}

fn map_row_to_product(row: &Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        product_type: row.get(2)?,
        buying_price: row.get(3)?,
        selling_price: row.get(4)?,
    })
}
