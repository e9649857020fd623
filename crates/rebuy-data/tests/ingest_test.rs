//! Integration tests for file-based ingestion.

use std::fs;
use std::path::PathBuf;

use rebuy_data::{load_customers, load_orders, DataError, OrderStatus};

fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("rebuy-ingest-{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_extracts_end_to_end() {
    let customers = write_fixture(
        "customers.csv",
        "customer_id,customer_unique_id\nc1,u1\nc2,u2\nc3,u1\n",
    );
    let orders = write_fixture(
        "orders.csv",
        "order_id,customer_id,order_status,order_purchase_timestamp,order_delivered_customer_date\n\
         o1,c1,delivered,2017-03-01 08:00:00,2017-03-06 14:00:00\n\
         o2,c3,delivered,2017-05-10 08:00:00,2017-05-15 14:00:00\n\
         o3,c2,canceled,2017-04-01 08:00:00,\n",
    );

    let customer_table = load_customers(&customers).unwrap();
    assert_eq!(customer_table.len(), 3);

    let table = load_orders(&orders, &customer_table).unwrap();
    assert_eq!(table.orders.len(), 3);
    assert_eq!(table.stats.order_rows_read, 3);
    assert_eq!(table.stats.rows_excluded(), 0);

    // c1 and c3 map to the same longitudinal customer.
    assert_eq!(table.orders[0].customer, "u1");
    assert_eq!(table.orders[1].customer, "u1");
    assert_eq!(table.orders[2].customer, "u2");
    assert_eq!(table.orders[2].status, OrderStatus::Canceled);

    fs::remove_file(customers).ok();
    fs::remove_file(orders).ok();
}

#[test]
fn test_extra_columns_are_ignored() {
    let customers = write_fixture("customers-extra.csv", "customer_id,customer_unique_id\nc1,u1\n");
    let orders = write_fixture(
        "orders-extra.csv",
        "order_id,customer_id,order_status,order_purchase_timestamp,order_approved_at,\
         order_delivered_carrier_date,order_delivered_customer_date,order_estimated_delivery_date\n\
         o1,c1,delivered,2017-03-01 08:00:00,2017-03-01 09:00:00,2017-03-02 10:00:00,\
         2017-03-06 14:00:00,2017-03-20 00:00:00\n",
    );

    let customer_table = load_customers(&customers).unwrap();
    let table = load_orders(&orders, &customer_table).unwrap();

    assert_eq!(table.orders.len(), 1);
    assert!(table.orders[0].delivery_ts.is_some());

    fs::remove_file(customers).ok();
    fs::remove_file(orders).ok();
}

#[test]
fn test_missing_customers_file_is_fatal() {
    let err = load_customers(&std::env::temp_dir().join("rebuy-does-not-exist.csv")).unwrap_err();
    assert!(matches!(err, DataError::MissingInput { .. }));
}
