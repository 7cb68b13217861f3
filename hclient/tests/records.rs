//! Record operations against a mock platform

mod support;

use hclient::{BizRecord, FieldValue, HClientError, QueryOptions};
use serde_json::json;
use support::{client, mount_token, request_count};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn lead(name: &str) -> BizRecord {
    BizRecord::new().with("name", name).with("status", "open")
}

#[tokio::test]
async fn test_create_then_get_returns_sent_fields() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/data/objects/lead"))
        .and(body_json(json!({"name": "Acme", "status": "open"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "L100"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/data/objects/lead/L100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "L100",
            "name": "Acme",
            "status": "open",
            "createdAt": 1700000000000i64,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let sent = lead("Acme");
    let code = client.create_data("lead", sent.clone()).await.unwrap();
    assert_eq!(code, "L100");

    let fetched = client.get_data("lead", &code).await.unwrap();
    assert_eq!(fetched.code(), Some("L100"));
    assert!(fetched.contains_fields_of(&sent));
    server.verify().await;
}

#[tokio::test]
async fn test_update_sends_put_to_record_path() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("PUT"))
        .and(path("/v1/data/objects/lead/L100"))
        .and(body_json(json!({"status": "won"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "L100"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let code = client
        .update_data("lead", "L100", BizRecord::new().with("status", "won"))
        .await
        .unwrap();
    assert_eq!(code, "L100");
    server.verify().await;
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("DELETE"))
        .and(path("/v1/data/objects/lead/GONE"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "record not found"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/data/objects/lead/GONE"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client.delete_data("lead", "GONE").await.unwrap_err();
    assert_eq!(err, HClientError::NotFound("record not found".into()));

    let err = client
        .update_data("lead", "GONE", BizRecord::new().with("status", "won"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    server.verify().await;
}

#[tokio::test]
async fn test_delete_returns_code() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("DELETE"))
        .and(path("/v1/data/objects/lead/L7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "L7"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.delete_data("lead", "L7").await.unwrap(), "L7");
    server.verify().await;
}

#[tokio::test]
async fn test_rejected_payload_is_validation_error() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/data/objects/lead"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"code": 40001, "desc": "field name is required"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client
        .create_data("lead", BizRecord::new().with("status", "open"))
        .await
        .unwrap_err();
    assert_eq!(err, HClientError::Validation("field name is required".into()));
    server.verify().await;
}

#[tokio::test]
async fn test_batch_create_preserves_input_order() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/data/objects/lead/batch"))
        .and(body_json(json!({
            "records": [
                {"name": "first", "status": "open"},
                {"name": "second", "status": "open"},
                {"name": "third", "status": "open"},
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"codes": ["C1", "C2", "C3"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let codes = client
        .batch_create_data("lead", vec![lead("first"), lead("second"), lead("third")])
        .await
        .unwrap();
    assert_eq!(codes, vec!["C1", "C2", "C3"]);
    server.verify().await;
}

#[tokio::test]
async fn test_batch_size_is_checked_before_sending() {
    let server = MockServer::start().await;
    let client = client(&server);

    let err = client.batch_create_data("lead", Vec::new()).await.unwrap_err();
    assert!(err.is_validation());

    let records: Vec<_> = (0..31).map(|i| lead(&format!("lead-{}", i))).collect();
    let err = client.batch_create_data("lead", records).await.unwrap_err();
    assert!(err.is_validation());

    let records: Vec<_> = (0..31).map(|i| lead("x").with_code(format!("L{}", i))).collect();
    let err = client.batch_update_data("lead", records).await.unwrap_err();
    assert!(err.is_validation());

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_batch_of_thirty_is_accepted() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    let codes: Vec<String> = (0..30).map(|i| format!("C{}", i)).collect();
    Mock::given(method("POST"))
        .and(path("/v1/data/objects/lead/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "codes": codes })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let records: Vec<_> = (0..30).map(|i| lead(&format!("lead-{}", i))).collect();
    let created = client.batch_create_data("lead", records).await.unwrap();
    assert_eq!(created, codes);
    server.verify().await;
}

#[tokio::test]
async fn test_batch_update_requires_every_code() {
    let server = MockServer::start().await;
    let client = client(&server);

    let records = vec![lead("a").with_code("L1"), lead("b")];
    let err = client.batch_update_data("lead", records).await.unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains("record 1 "), "error should name the index: {err}");
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_batch_update_sends_put() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("PUT"))
        .and(path("/v1/data/objects/lead/batch"))
        .and(body_json(json!({
            "records": [
                {"name": "a", "status": "open", "code": "L1"},
                {"name": "b", "status": "open", "code": "L2"},
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"codes": ["L1", "L2"]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let codes = client
        .batch_update_data("lead", vec![lead("a").with_code("L1"), lead("b").with_code("L2")])
        .await
        .unwrap();
    assert_eq!(codes, vec!["L1", "L2"]);
    server.verify().await;
}

#[tokio::test]
async fn test_short_code_list_is_decode_error() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/data/objects/lead/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"codes": ["C1"]})))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client
        .batch_create_data("lead", vec![lead("a"), lead("b")])
        .await
        .unwrap_err();
    assert!(matches!(err, HClientError::Decode(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_query_applies_default_pagination() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/data/objects/lead/query"))
        .and(body_json(json!({"selectFields": [], "pageNo": 1, "pageSize": 10, "query": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{"code": "L1"}, {"code": "L2"}],
            "totalCount": 12,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let result = client.query_data("lead", &QueryOptions::new()).await.unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.total_count, 12);
    assert_eq!(result.page_no, 1);
    assert_eq!(result.page_size, Some(10));
    assert!(result.has_more());
    server.verify().await;
}

#[tokio::test]
async fn test_query_sends_filter_and_selection() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/data/objects/lead/query"))
        .and(body_json(json!({
            "selectFields": ["code", "name"],
            "pageNo": 2,
            "pageSize": 5,
            "query": {"status": "open"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{"code": "L6", "name": "Acme"}],
            "totalCount": 6,
            "pageNo": 2,
            "pageSize": 5,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let options = QueryOptions::new()
        .select(["code", "name"])
        .filter("status", "open")
        .page(2)
        .page_size(5);
    let result = client.query_data("lead", &options).await.unwrap();

    assert_eq!(result.records[0].get("name"), Some(&FieldValue::from("Acme")));
    assert_eq!(result.total_pages(), Some(2));
    assert!(!result.has_more());
    server.verify().await;
}

#[tokio::test]
async fn test_zero_page_size_is_rejected_locally() {
    let server = MockServer::start().await;
    let client = client(&server);

    let err = client
        .query_data("lead", &QueryOptions::new().page_size(0))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_auxiliary_query_uses_auxiliary_path() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/data/auxiliary/user/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{"code": "U1", "name": "Ada"}],
            "totalCount": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let result = client
        .query_auxiliary_data("user", &QueryOptions::new().filter("name", "Ada"))
        .await
        .unwrap();
    assert_eq!(result.records[0].code(), Some("U1"));
    server.verify().await;
}

#[tokio::test]
async fn test_sql_is_sent_unmodified() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    let sql = "select code, status from lead where status = 'open' order by code limit 2 offset 0";
    Mock::given(method("POST"))
        .and(path("/v1/data/sql"))
        .and(body_json(json!({ "sql": sql })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                {"code": "L1", "status": "open"},
                {"code": "L2", "status": "open"},
            ],
            "totalCount": 2,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let result = client.query_data_by_sql(sql).await.unwrap();

    let codes: Vec<_> = result.iter().filter_map(BizRecord::code).collect();
    assert_eq!(codes, vec!["L1", "L2"]);
    assert!(result
        .iter()
        .all(|record| record.get("status").and_then(FieldValue::as_str) == Some("open")));
    assert_eq!(result.page_size, None);
    server.verify().await;
}

#[tokio::test]
async fn test_transfer_owner_sends_flags() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/data/objects/lead/L1/transfer"))
        .and(body_json(json!({"newOwner": "U42", "addTeam": 1, "deptFollowNewOwner": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "L1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let code = client
        .transfer_owner("lead", "L1", "U42", true, false)
        .await
        .unwrap();
    assert_eq!(code, "L1");
    server.verify().await;
}

#[tokio::test]
async fn test_blank_arguments_are_rejected_locally() {
    let server = MockServer::start().await;
    let client = client(&server);

    assert!(client.get_data("lead", "").await.unwrap_err().is_validation());
    assert!(client.delete_data("", "L1").await.unwrap_err().is_validation());
    assert!(client
        .transfer_owner("lead", "L1", " ", false, false)
        .await
        .unwrap_err()
        .is_validation());
    assert_eq!(request_count(&server).await, 0);
}
