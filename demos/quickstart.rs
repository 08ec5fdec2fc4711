//! Quickstart walk-through of the shaledb surface: schema, inserts,
//! indexes, queries and mutations.
//!
//! Run with: cargo run --example quickstart

use shaledb::{ColumnType, CompareOp, Database, IndexKind, Query, Row, Schema};

fn main() -> shaledb::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db = Database::new("inventory");

    let products = db.create_table(
        "products",
        Schema::builder()
            .column("sku", ColumnType::Int)
            .column("name", ColumnType::Str)
            .column("price", ColumnType::Float)
            .column("in_stock", ColumnType::Bool)
            .build(),
    )?;

    products.insert_batch(&[
        Row::new().set("sku", 1001i64).set("name", "anvil").set("price", 55.0).set("in_stock", true),
        Row::new().set("sku", 1002i64).set("name", "rope").set("price", 7.5).set("in_stock", true),
        Row::new().set("sku", 1003i64).set("name", "dynamite").set("price", 22.0).set("in_stock", false),
        Row::new().set("sku", 1004i64).set("name", "magnet").set("price", 12.0).set("in_stock", true),
    ])?;

    db.create_index("products", "in_stock", IndexKind::Equality)?;
    db.create_index("products", "price", IndexKind::Ordered)?;

    // cheapest two items currently in stock
    let query = Query::new()
        .filter("in_stock", CompareOp::Eq, true)
        .order_by("price", true)
        .limit(2)
        .select(["name", "price"]);
    let result = products.select(&query)?;

    println!("cheapest in stock:");
    for row in result.iter() {
        println!("  {} at {}", row[0], row[1]);
    }

    // restock and reprice
    let restocked = products.update(
        &Row::new().set("in_stock", true).set("price", 19.5),
        Some(&Query::new().filter("sku", CompareOp::Eq, 1003i64)),
    )?;
    println!("restocked {} product(s)", restocked);

    let discontinued = products.delete(Some(&Query::new().filter("price", CompareOp::Gt, 50.0)))?;
    println!(
        "discontinued {} product(s), {} remain",
        discontinued,
        products.row_count()
    );

    Ok(())
}
