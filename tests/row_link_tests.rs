//! Row link tests: the link relation and its mirror in the source row's data.

mod test_utils;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use test_utils::{seed_table, seed_workspace, send, setup_test_app};
use uuid::Uuid;
use workspace_hub::repositories::TableRowRepository;

struct Fixture {
    app: axum::Router,
    state: workspace_hub::server::AppState,
    orders: Uuid,
    customers: Uuid,
    link_column: Uuid,
    order_row: Uuid,
    customer_rows: Vec<Uuid>,
}

async fn fixture() -> Fixture {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (customers, _) = seed_table(&state.db, workspace_id, "Customers", &[("name", "text")])
        .await
        .unwrap();
    let (orders, _) = seed_table(&state.db, workspace_id, "Orders", &[("reference", "text")])
        .await
        .unwrap();

    let (status, column) = send(
        &app,
        Method::POST,
        &format!("/data-tables/{}/columns", orders.id),
        Some(json!({
            "name": "customer",
            "label": "Customer",
            "column_type": "link",
            "linked_table_id": customers.id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, created) = send(
        &app,
        Method::POST,
        &format!("/data-tables/{}/rows/bulk", customers.id),
        Some(json!({"rows": [{"name": "Ada"}, {"name": "Grace"}, {"name": "Linus"}]})),
    )
    .await;
    let customer_rows = created
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_str().unwrap().parse().unwrap())
        .collect();

    let (_, order) = send(
        &app,
        Method::POST,
        &format!("/data-tables/{}/rows", orders.id),
        Some(json!({"data": {"reference": "ORD-1"}})),
    )
    .await;

    Fixture {
        app,
        state,
        orders: orders.id,
        customers: customers.id,
        link_column: column["id"].as_str().unwrap().parse().unwrap(),
        order_row: order["id"].as_str().unwrap().parse().unwrap(),
        customer_rows,
    }
}

impl Fixture {
    fn links_uri(&self) -> String {
        format!("/data-tables/{}/rows/{}/links", self.orders, self.order_row)
    }

    async fn link(&self, target: Uuid) -> (StatusCode, Value) {
        send(
            &self.app,
            Method::POST,
            &self.links_uri(),
            Some(json!({"column_id": self.link_column, "target_row_id": target})),
        )
        .await
    }

    async fn order_data(&self) -> Value {
        TableRowRepository::new(&self.state.db)
            .get(self.orders, self.order_row)
            .await
            .unwrap()
            .data
    }
}

#[tokio::test]
async fn linking_twice_keeps_one_id() {
    let fx = fixture().await;
    let target = fx.customer_rows[0];

    let (status, body) = fx.link(target).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["links"], json!([target.to_string()]));

    let (status, body) = fx.link(target).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["links"], json!([target.to_string()]));

    let data = fx.order_data().await;
    assert_eq!(data["customer"], json!([target.to_string()]));
    assert_eq!(data["reference"], "ORD-1");
}

#[tokio::test]
async fn links_keep_link_order_and_unlink_removes_one() {
    let fx = fixture().await;
    let [first, second, third] = [fx.customer_rows[0], fx.customer_rows[1], fx.customer_rows[2]];
    for target in [second, first, third] {
        fx.link(target).await;
    }

    let (status, body) = send(
        &fx.app,
        Method::DELETE,
        &format!("{}/{}?column_id={}", fx.links_uri(), first, fx.link_column),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["links"], json!([second.to_string(), third.to_string()]));
    assert_eq!(
        fx.order_data().await["customer"],
        json!([second.to_string(), third.to_string()])
    );

    // Unlinking a pair that is not linked succeeds without changes.
    let (status, body) = send(
        &fx.app,
        Method::DELETE,
        &format!("{}/{}?column_id={}", fx.links_uri(), first, fx.link_column),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["links"].as_array().unwrap().len(), 2);

    let (status, listed) = send(&fx.app, Method::GET, &fx.links_uri(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["total_count"], 2);
    assert_eq!(listed["has_more"], false);
    assert_eq!(listed["records"][0]["data"]["name"], "Grace");
    assert_eq!(listed["records"][1]["data"]["name"], "Linus");
}

#[tokio::test]
async fn deleting_a_target_row_removes_its_id_from_sources() {
    let fx = fixture().await;
    let (kept, deleted) = (fx.customer_rows[0], fx.customer_rows[1]);
    fx.link(kept).await;
    fx.link(deleted).await;

    let (_subscriber, mut updates) = fx.state.broadcaster.register(fx.orders).await;
    let (status, _) = send(
        &fx.app,
        Method::DELETE,
        &format!("/data-tables/{}/rows/{}", fx.customers, deleted),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(fx.order_data().await["customer"], json!([kept.to_string()]));

    let message: Value = serde_json::from_str(&updates.recv().await.unwrap()).unwrap();
    assert_eq!(message["type"], "row_updated");
    assert_eq!(message["row_id"], fx.order_row.to_string());
    assert_eq!(message["data"]["customer"], json!([kept.to_string()]));
    assert_eq!(message["unlinked_row_id"], deleted.to_string());
}

#[tokio::test]
async fn link_mutations_are_broadcast_to_the_source_table() {
    let fx = fixture().await;
    let (_subscriber, mut updates) = fx.state.broadcaster.register(fx.orders).await;

    fx.link(fx.customer_rows[2]).await;

    let message: Value = serde_json::from_str(&updates.recv().await.unwrap()).unwrap();
    assert_eq!(message["type"], "row_updated");
    assert_eq!(message["table_id"], fx.orders.to_string());
    assert_eq!(message["column_id"], fx.link_column.to_string());
    assert_eq!(message["data"]["customer"], json!([fx.customer_rows[2].to_string()]));
}

#[tokio::test]
async fn non_link_column_is_rejected() {
    let fx = fixture().await;
    let (_, table) = send(&fx.app, Method::GET, &format!("/data-tables/{}", fx.orders), None).await;
    let text_column = table["columns"]
        .as_array()
        .unwrap()
        .iter()
        .find(|column| column["name"] == "reference")
        .unwrap()["id"]
        .clone();

    let (status, body) = send(
        &fx.app,
        Method::POST,
        &fx.links_uri(),
        Some(json!({"column_id": text_column, "target_row_id": fx.customer_rows[0]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["message"], "Invalid link column");
}

#[tokio::test]
async fn target_from_another_table_is_rejected() {
    let fx = fixture().await;

    let (status, body) = fx.link(fx.order_row).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(fx.order_data().await.get("customer").is_none());

    let (status, _) = fx.link(Uuid::new_v4()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn available_records_report_link_state_and_search() {
    let fx = fixture().await;
    fx.link(fx.customer_rows[1]).await;

    let (status, body) = send(
        &fx.app,
        Method::GET,
        &format!(
            "/data-tables/{}/columns/{}/available-records?row_id={}",
            fx.orders, fx.link_column, fx.order_row
        ),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 3);
    let records = body["records"].as_array().unwrap();
    let linked: Vec<&str> = records
        .iter()
        .filter(|record| record["is_linked"] == true)
        .map(|record| record["display_name"].as_str().unwrap())
        .collect();
    assert_eq!(linked, ["Grace"]);

    let (status, body) = send(
        &fx.app,
        Method::GET,
        &format!(
            "/data-tables/{}/columns/{}/available-records?search=LIN&limit=1",
            fx.orders, fx.link_column
        ),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["has_more"], false);
    assert_eq!(body["records"][0]["display_name"], "Linus");
    assert_eq!(body["records"][0]["is_linked"], false);
}

#[tokio::test]
async fn deleting_the_target_table_clears_links_in_other_tables() {
    let fx = fixture().await;
    fx.link(fx.customer_rows[0]).await;
    fx.link(fx.customer_rows[1]).await;

    let (_subscriber, mut updates) = fx.state.broadcaster.register(fx.orders).await;
    let (status, _) = send(&fx.app, Method::DELETE, &format!("/data-tables/{}", fx.customers), None).await;
    assert_eq!(status, StatusCode::OK);

    let data = fx.order_data().await;
    assert_eq!(data["customer"], json!([]));
    assert_eq!(data["reference"], "ORD-1");

    let message: Value = serde_json::from_str(&updates.recv().await.unwrap()).unwrap();
    assert_eq!(message["type"], "row_updated");
    assert_eq!(message["row_id"], fx.order_row.to_string());
    assert_eq!(message["data"]["customer"], json!([]));
    assert!(updates.try_recv().is_err());
}

#[tokio::test]
async fn deleting_another_workspace_clears_links_into_it() {
    let fx = fixture().await;
    let other_workspace = seed_workspace(&fx.state.db).await.unwrap();
    let (vendors, _) = seed_table(&fx.state.db, other_workspace, "Vendors", &[("name", "text")])
        .await
        .unwrap();
    let vendor_row = TableRowRepository::new(&fx.state.db)
        .create(vendors.id, test_utils::payload(json!({"data": {"name": "Initech"}})))
        .await
        .unwrap();

    let (_, column) = send(
        &fx.app,
        Method::POST,
        &format!("/data-tables/{}/columns", fx.orders),
        Some(json!({
            "name": "vendor",
            "label": "Vendor",
            "column_type": "link",
            "linked_table_id": vendors.id,
        })),
    )
    .await;
    fx.link(fx.customer_rows[0]).await;
    let (status, _) = send(
        &fx.app,
        Method::POST,
        &fx.links_uri(),
        Some(json!({"column_id": column["id"], "target_row_id": vendor_row.id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fx.order_data().await["vendor"], json!([vendor_row.id.to_string()]));

    let (status, _) = send(&fx.app, Method::DELETE, &format!("/workspaces/{other_workspace}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let data = fx.order_data().await;
    assert_eq!(data["vendor"], json!([]));
    assert_eq!(data["customer"], json!([fx.customer_rows[0].to_string()]));
}

#[tokio::test]
async fn replacing_row_data_keeps_the_link_list() {
    let fx = fixture().await;
    let target = fx.customer_rows[2];
    fx.link(target).await;
    let row_uri = format!("/data-tables/{}/rows/{}", fx.orders, fx.order_row);

    let (status, row) = send(&fx.app, Method::PATCH, &row_uri, Some(json!({"data": {"reference": "ORD-2"}}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row["data"]["reference"], "ORD-2");
    assert_eq!(row["data"]["customer"], json!([target.to_string()]));

    // Link values written through the data map are replaced by the real links.
    let (status, row) = send(
        &fx.app,
        Method::PUT,
        &row_uri,
        Some(json!({"data": {"reference": "ORD-3", "customer": [Uuid::new_v4()]}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row["data"]["customer"], json!([target.to_string()]));
    assert_eq!(fx.order_data().await["customer"], json!([target.to_string()]));

    let (_, listed) = send(&fx.app, Method::GET, &fx.links_uri(), None).await;
    assert_eq!(listed["total_count"], 1);
}
