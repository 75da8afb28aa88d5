//! Tests of the HTTP routes, with the database and the completion service replaced by fakes.

pub mod common;

use axum::http::StatusCode;
use serde_json::json;
use similar_asserts::assert_eq;

use query_engine_execution::connection::Access;
use query_engine_execution::result_set::ResultSet;
use query_engine_sql::sql::string::Param;
use tests_common::fakes::{table, FakeCompletion, FakeConnector};
use tests_common::requests::{get_json, get_text, post_body, post_form, post_json};

fn patients() -> ResultSet {
    table(
        &["Comunidad Autónoma", "Sexo", "Edad", "Diagnóstico"],
        vec![
            vec![json!("Madrid"), json!(1), json!(34), json!("Gripe A")],
            vec![json!("Cataluña"), json!(2), json!(51), json!("Gripe estacional")],
        ],
    )
}

fn catalog_or(answer: ResultSet) -> FakeConnector {
    let catalog = table(
        &["table_name", "column_name"],
        vec![
            vec![json!("ENFERMEDADES"), json!("Comunidad Autónoma")],
            vec![json!("ENFERMEDADES"), json!("Sexo")],
        ],
    );
    FakeConnector::responding(move |statement| {
        if statement.sql.contains("information_schema") {
            Ok(catalog.clone())
        } else {
            Ok(answer.clone())
        }
    })
}

#[tokio::test]
async fn query_returns_rows_from_a_parameterized_statement() {
    let connector = FakeConnector::returning(patients());
    let log = connector.log();
    let router = common::create_router(connector, FakeCompletion::failing("unused")).await;

    let (status, body) = post_json(
        router,
        "/query",
        &json!({
            "comunidad": ["Madrid", "Cataluña"],
            "diagnostico": "gripe",
            "edad_min": "abc",
            "numPacientes": "2"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], serde_json::Value::Null);
    assert_eq!(
        body["columns"],
        json!(["Comunidad Autónoma", "Sexo", "Edad", "Diagnóstico"])
    );
    assert_eq!(body["rows"][1][2], json!(51));
    assert!(body.get("generatedSql").is_none());

    let statements = log.statements();
    assert_eq!(statements.len(), 1);
    insta::assert_snapshot!(statements[0].sql, @r#"SELECT * FROM "ENFERMEDADES" WHERE true AND (UPPER("Comunidad Autónoma") IN ($1, $2)) AND ("Diagnóstico" ILIKE $3) LIMIT $4"#);
    assert_eq!(
        statements[0].params,
        vec![
            Param::String("MADRID".to_string()),
            Param::String("CATALUÑA".to_string()),
            Param::String("%gripe%".to_string()),
            Param::Integer(2),
        ]
    );
    assert_eq!((log.opened(), log.closed()), (1, 1));
}

#[tokio::test]
async fn query_reports_connection_failures() {
    let router = common::create_router(
        FakeConnector::unreachable("connection refused"),
        FakeCompletion::failing("unused"),
    )
    .await;

    let (status, body) = post_json(router, "/query", &json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "columns": [],
            "rows": [],
            "error": "could not connect to the database: connection refused"
        })
    );
}

#[tokio::test]
async fn query_reports_statement_failures() {
    let connector =
        FakeConnector::responding(|_| Err("relation \"ENFERMEDADES\" does not exist".to_string()));
    let log = connector.log();
    let router = common::create_router(connector, FakeCompletion::failing("unused")).await;

    let (_, body) = post_json(router, "/query", &json!({ "sexo": 1 })).await;

    assert_eq!(body["rows"], json!([]));
    assert_eq!(
        body["error"],
        json!("the database could not run the statement: relation \"ENFERMEDADES\" does not exist")
    );
    assert_eq!((log.opened(), log.closed()), (1, 1));
}

#[tokio::test]
async fn query_drops_list_values_of_the_wrong_type() {
    let connector = FakeConnector::returning(patients());
    let log = connector.log();
    let router = common::create_router(connector, FakeCompletion::failing("unused")).await;

    let (status, body) = post_json(
        router,
        "/query",
        &json!({
            "comunidad": ["Madrid", 5, null],
            "diagnostico": [7, { "nombre": "gripe" }],
            "sexo": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], serde_json::Value::Null);
    let statements = log.statements();
    insta::assert_snapshot!(statements[0].sql, @r#"SELECT * FROM "ENFERMEDADES" WHERE true AND (UPPER("Comunidad Autónoma") IN ($1)) LIMIT $2"#);
    assert_eq!(
        statements[0].params,
        vec![Param::String("MADRID".to_string()), Param::Integer(100)]
    );
}

#[tokio::test]
async fn query_accepts_form_bodies() {
    let connector = FakeConnector::returning(patients());
    let log = connector.log();
    let router = common::create_router(connector, FakeCompletion::failing("unused")).await;

    let (status, body) = post_form(
        router,
        "/query",
        &[
            ("comunidad", "Madrid"),
            ("comunidad", "Galicia"),
            ("sexo", "2"),
            ("edad_min", "18"),
            ("numPacientes", "10"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"][0][0], json!("Madrid"));
    let statements = log.statements();
    insta::assert_snapshot!(statements[0].sql, @r#"SELECT * FROM "ENFERMEDADES" WHERE true AND (UPPER("Comunidad Autónoma") IN ($1, $2)) AND ("Sexo" = $3) AND ("Edad" >= $4) LIMIT $5"#);
    assert_eq!(
        statements[0].params,
        vec![
            Param::String("MADRID".to_string()),
            Param::String("GALICIA".to_string()),
            Param::Integer(2),
            Param::Integer(18),
            Param::Integer(10),
        ]
    );
}

#[tokio::test]
async fn query_without_a_body_applies_no_filters() {
    let connector = FakeConnector::returning(patients());
    let log = connector.log();
    let router = common::create_router(connector, FakeCompletion::failing("unused")).await;

    let (status, _) = post_body(router, "/query", "application/json", String::new()).await;

    assert_eq!(status, StatusCode::OK);
    insta::assert_snapshot!(log.statements()[0].sql, @r#"SELECT * FROM "ENFERMEDADES" WHERE true LIMIT $1"#);
}

#[tokio::test]
async fn query_rejects_bodies_that_are_not_filters() {
    let connector = FakeConnector::returning(patients());
    let log = connector.log();
    let router = common::create_router(connector, FakeCompletion::failing("unused")).await;

    let (status, body) =
        post_body(router, "/query", "application/json", "[1, 2]".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["columns"], json!([]));
    assert_eq!(body["rows"], json!([]));
    assert!(body["error"]
        .as_str()
        .is_some_and(|error| error.starts_with("invalid filters")));
    assert_eq!(log.opened(), 0);
}

#[tokio::test]
async fn chart_groups_filtered_records() {
    let connector = FakeConnector::returning(table(
        &["label", "total"],
        vec![vec![json!(2), json!(7)], vec![json!(1), json!(5)]],
    ));
    let log = connector.log();
    let router = common::create_router(connector, FakeCompletion::failing("unused")).await;

    let (status, body) = post_json(
        router,
        "/chart?dimension=sex",
        &json!({ "edad_max": 30, "numPacientes": 3 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["columns"], json!(["label", "total"]));
    assert_eq!(body["rows"][0], json!([2, 7]));

    let statements = log.statements();
    insta::assert_snapshot!(statements[0].sql, @r#"SELECT "Sexo" AS "label", COUNT(*) AS "total" FROM "ENFERMEDADES" WHERE true AND ("Edad" <= $1) GROUP BY "Sexo" ORDER BY "total" DESC"#);
    assert_eq!(statements[0].params, vec![Param::Integer(30)]);
}

#[tokio::test]
async fn chart_rejects_unknown_dimensions() {
    let connector = FakeConnector::returning(ResultSet::empty());
    let log = connector.log();
    let router = common::create_router(connector, FakeCompletion::failing("unused")).await;

    let (status, body) = post_json(router, "/chart?dimension=planeta", &json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rows"], json!([]));
    assert!(body["error"].is_string());
    assert_eq!(log.opened(), 0);
}

#[tokio::test]
async fn schema_describes_the_requested_owner() {
    let connector = catalog_or(ResultSet::empty());
    let log = connector.log();
    let router = common::create_router(connector, FakeCompletion::failing("unused")).await;

    let (status, body) = get_json(router, "/schema?owner=SALUD").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "owner": "SALUD",
            "tables": { "ENFERMEDADES": ["Comunidad Autónoma", "Sexo"] },
            "rendered": "ENFERMEDADES(Comunidad Autónoma, Sexo)",
            "error": null
        })
    );
    assert_eq!(
        log.statements()[0].params,
        vec![Param::String("SALUD".to_string())]
    );
}

#[tokio::test]
async fn schema_defaults_to_the_configured_owner() {
    let connector = catalog_or(ResultSet::empty());
    let log = connector.log();
    let router = common::create_router(connector, FakeCompletion::failing("unused")).await;

    let (_, body) = get_json(router, "/schema").await;

    assert_eq!(body["owner"], json!("salud"));
    assert_eq!(
        log.statements()[0].params,
        vec![Param::String("salud".to_string())]
    );
}

#[tokio::test]
async fn ask_runs_the_generated_statement() {
    let connector = catalog_or(table(&["total"], vec![vec![json!(12)]]));
    let log = connector.log();
    let completion =
        FakeCompletion::answering("```sql\nSELECT COUNT(*) AS total\nFROM \"ENFERMEDADES\";\n```");
    let router = common::create_router(connector, completion.clone()).await;

    let (status, body) = post_json(
        router,
        "/ask",
        &json!({ "question": "¿Cuántos pacientes hay?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], serde_json::Value::Null);
    assert_eq!(body["columns"], json!(["total"]));
    assert_eq!(body["rows"], json!([[12]]));
    assert_eq!(
        body["generatedSql"],
        json!("SELECT COUNT(*) AS total FROM \"ENFERMEDADES\" ")
    );
    assert!(body["formattedSql"]
        .as_str()
        .is_some_and(|formatted| formatted.contains("FROM")));

    let prompts = completion.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("ENFERMEDADES(Comunidad Autónoma, Sexo)"));
    assert!(prompts[0].ends_with("Question: ¿Cuántos pacientes hay?"));

    let statements = log.statements();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[1].sql,
        "SELECT COUNT(*) AS total FROM \"ENFERMEDADES\" "
    );
    assert!(statements[1].params.is_empty());
    assert_eq!(log.accesses(), vec![Access::ReadWrite, Access::ReadOnly]);
    assert_eq!((log.opened(), log.closed()), (2, 2));
}

#[tokio::test]
async fn ask_reports_completion_failures() {
    let connector = catalog_or(ResultSet::empty());
    let log = connector.log();
    let router = common::create_router(connector, FakeCompletion::failing("timed out")).await;

    let (_, body) = post_json(router, "/ask", &json!({ "question": "¿Cuántos?" })).await;

    assert_eq!(
        body,
        json!({
            "columns": [],
            "rows": [],
            "generatedSql": "",
            "formattedSql": "",
            "error": "the completion service failed: timed out"
        })
    );
    assert_eq!(log.statements().len(), 1);
    assert_eq!((log.opened(), log.closed()), (1, 1));
}

#[tokio::test]
async fn ask_refuses_statements_that_modify_data() {
    let connector = catalog_or(ResultSet::empty());
    let log = connector.log();
    let router = common::create_router(
        connector,
        FakeCompletion::answering("DELETE FROM \"ENFERMEDADES\""),
    )
    .await;

    let (_, body) = post_json(router, "/ask", &json!({ "question": "Borra todo" })).await;

    assert_eq!(
        body["error"],
        json!("could not generate a statement: only read-only statements may be generated, found 'DELETE'")
    );
    assert_eq!(body["generatedSql"], json!(""));
    assert_eq!(log.statements().len(), 1);
    assert_eq!((log.opened(), log.closed()), (1, 1));
}

#[tokio::test]
async fn ask_rejects_requests_without_a_question() {
    let connector = catalog_or(ResultSet::empty());
    let log = connector.log();
    let completion = FakeCompletion::answering("SELECT 1");
    let router = common::create_router(connector, completion.clone()).await;

    let (status, body) = post_json(router, "/ask", &json!({ "pregunta": "¿Cuántos?" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["generatedSql"], json!(""));
    assert!(body["error"].is_string());
    assert!(completion.prompts().is_empty());
    assert_eq!(log.opened(), 0);
}

#[tokio::test]
async fn health_reflects_database_reachability() {
    let healthy = common::create_router(
        FakeConnector::returning(table(&["?column?"], vec![vec![json!(1)]])),
        FakeCompletion::failing("unused"),
    )
    .await;
    let (status, _) = get_text(healthy, "/health").await;
    assert_eq!(status, StatusCode::OK);

    let unreachable = common::create_router(
        FakeConnector::unreachable("no route to host"),
        FakeCompletion::failing("unused"),
    )
    .await;
    let (status, _) = get_text(unreachable, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn metrics_count_queries() {
    let router = common::create_router(
        FakeConnector::returning(patients()),
        FakeCompletion::failing("unused"),
    )
    .await;

    let client = axum_test_helper::TestClient::new(router);
    client
        .post("/query")
        .body("{}")
        .header("Content-Type", "application/json")
        .send()
        .await;
    let metrics = client.get("/metrics").send().await.text().await;

    assert!(metrics.contains("disease_dashboard_query_total 1"));
    assert!(metrics.contains("disease_dashboard_query_error_total 0"));
}
