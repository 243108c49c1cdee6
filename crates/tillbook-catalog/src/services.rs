use crate::CatalogError;
use rusqlite::{params, Connection, Row};
use tillbook_types::{NewService, Page, Service};

const SERVICE_COLUMNS: &str = "id, name, description, price";

/// Inserts a service and returns the persisted row.
///
/// Same transactional contract as [`crate::create_product`].
pub fn create_service(conn: &Connection, new: &NewService) -> Result<Service, CatalogError> {
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO services (name, description, price) VALUES (?1, ?2, ?3)",
        params![new.name, new.description, new.price],
    )?;
    let id = tx.last_insert_rowid();

    let service = tx.query_row(
        &format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?1"),
        [id],
        map_row_to_service,
    )?;

    tx.commit()?;
    tracing::debug!(id = service.id, "service stored");
    Ok(service)
}

/// Lists services in `id` order within the given skip/limit window.
pub fn list_services(conn: &Connection, page: Page) -> Result<Vec<Service>, CatalogError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SERVICE_COLUMNS} FROM services ORDER BY id ASC LIMIT ?1 OFFSET ?2"
    ))?;

    let rows = stmt.query_map(
        params![i64::from(page.limit), i64::from(page.skip)],
        map_row_to_service,
    )?;
    let mut services = Vec::new();
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

fn map_row_to_service(row: &Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
    })
}
