mod common;

use axum::http::StatusCode;
use common::{CaptureServer, refused_addr, setup_pool};
use lavanderia_lib::AppState;
use lavanderia_lib::presentation::dto::sync_dto::UpdateSettingsRequest;
use lavanderia_lib::shared::AppConfig;
use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::TempDir;

async fn setup_state() -> AppState {
    AppState::from_parts(AppConfig::default(), setup_pool().await, reqwest::Client::new())
}

fn write_form(dir: &TempDir, name: &str, form: Value) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string_pretty(&form).unwrap()).unwrap();
    path
}

fn scenario_form() -> Value {
    json!({
        "fecha_base": "2024-06-10",
        "nota": "",
        "jaulas": [{ "num_jaula": "", "categoria": "SÁBANAS", "bruto": "60", "tara": "" }],
        "tickets": [{ "producto": "Caminos", "unidades": "5" }],
        "extra_kg": "",
        "lavado": {
            "BLANCA": { "n55": "", "n24": "", "n13": "", "n8": "" },
            "PISCINA": { "n55": "", "n24": "", "n13": "", "n8": "" },
            "VARIOS": { "n55": "", "n24": "", "n13": "", "n8": "" }
        },
        "piscina": { "dobladas": "", "subidas": "", "stock": "" }
    })
}

#[tokio::test]
async fn save_and_export_scenario() {
    let state = setup_state().await;
    let dir = TempDir::new().unwrap();
    let form = write_form(&dir, "parte.json", scenario_form());

    let saved = state.queue_handler.save_from_file(&form).await.unwrap();
    assert_eq!(saved.rows, 2);
    assert_eq!(state.queue_handler.status().await.unwrap().queued, "2");

    let out = dir.path().join("export.json");
    let (path, rows) = state.queue_handler.export(Some(&out)).await.unwrap();
    assert_eq!(path, out);
    assert_eq!(rows, 2);

    let exported: Vec<Value> =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(exported.len(), 2);

    let cage = &exported[0];
    assert_eq!(cage["evento"], "SUCIO_JAULAS");
    assert_eq!(cage["categoria"], "SÁBANAS");
    assert_eq!(cage["kg_bruto"], 60);
    assert_eq!(cage["tara_kg"], 42);
    assert_eq!(cage["kg_neto"], 18);
    assert_eq!(cage["fecha_base"], "2024-06-10");
    assert_eq!(cage["fecha_evento"], "2024-06-10");
    assert_eq!(cage["unidades"], "");
    assert_eq!(cage["n55"], "");

    let ticket = &exported[1];
    assert_eq!(ticket["evento"], "TICKET_UNIDADES");
    assert_eq!(ticket["detalle"], "Caminos");
    assert_eq!(ticket["unidades"], 5);
    assert_eq!(ticket["fecha_evento"], "2024-06-11");
    assert_eq!(ticket["kg_neto"], "");

    let cage_id = cage["id"].as_str().unwrap();
    let ticket_id = ticket["id"].as_str().unwrap();
    assert!(cage_id.ends_with(":1"));
    assert!(ticket_id.ends_with(":2"));
    assert_eq!(
        cage_id.rsplit_once(':').unwrap().0,
        ticket_id.rsplit_once(':').unwrap().0
    );
    assert_eq!(cage["createdAt"], ticket["createdAt"]);

    let history = state.queue_handler.history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].kind, "TICKET_UNIDADES");
}

#[tokio::test]
async fn rejected_form_queues_nothing() {
    let state = setup_state().await;
    let dir = TempDir::new().unwrap();
    let mut form = scenario_form();
    form["tickets"][0]["unidades"] = json!("");
    let path = write_form(&dir, "parte.json", form);

    assert!(state.queue_handler.save_from_file(&path).await.is_err());
    assert_eq!(state.queue_handler.status().await.unwrap().queued, "0");
}

#[tokio::test]
async fn sync_requires_settings() {
    let state = setup_state().await;
    let err = state.sync_handler.sync().await.unwrap_err();
    assert_eq!(err.code(), "configuration");
}

#[tokio::test]
async fn sync_to_unreachable_endpoint_is_not_sent() {
    let addr = refused_addr().await;
    let state = setup_state().await;
    let dir = TempDir::new().unwrap();
    let form = write_form(&dir, "parte.json", scenario_form());
    state.queue_handler.save_from_file(&form).await.unwrap();
    state
        .settings_handler
        .update(UpdateSettingsRequest {
            url: Some(format!("http://{}/exec", addr)),
            token: Some("tok-123".into()),
        })
        .await
        .unwrap();

    let err = state.sync_handler.sync().await.unwrap_err();
    assert_eq!(err.code(), "network");
    assert!(err.to_string().contains("not sent"));

    let status = state.queue_handler.status().await.unwrap();
    assert_eq!(status.queued, "2");
    assert_eq!(status.last_sent, "-");
    assert!(!status.needs_verification());
}

#[tokio::test]
async fn sync_keeps_rows_until_confirmed_clear() {
    let server = CaptureServer::spawn(StatusCode::OK).await;
    let state = setup_state().await;
    let dir = TempDir::new().unwrap();
    let form = write_form(&dir, "parte.json", scenario_form());
    state.queue_handler.save_from_file(&form).await.unwrap();

    state
        .settings_handler
        .update(UpdateSettingsRequest {
            url: Some(server.url("/exec")),
            token: Some("tok-123".into()),
        })
        .await
        .unwrap();

    let report = state.sync_handler.sync().await.unwrap();
    assert_eq!(report.rows, 2);
    assert_eq!(report.transport.as_deref(), Some("beacon"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["token"], "tok-123");
    assert_eq!(body["rows"].as_array().unwrap().len(), 2);
    assert_eq!(body["rows"][0]["evento"], "SUCIO_JAULAS");

    let status = state.queue_handler.status().await.unwrap();
    assert_eq!(status.queued, "2");
    assert!(status.needs_verification());

    state.queue_handler.verify().await.unwrap();
    assert!(!state.queue_handler.status().await.unwrap().needs_verification());

    state.sync_handler.sync().await.unwrap();
    assert!(state.queue_handler.status().await.unwrap().needs_verification());

    assert_eq!(state.queue_handler.clear(true).await.unwrap(), 2);
    let status = state.queue_handler.status().await.unwrap();
    assert_eq!(status.queued, "0");
    assert!(!status.needs_verification());

    let report = state.sync_handler.sync().await.unwrap();
    assert_eq!(report.rows, 0);
    assert_eq!(server.requests().len(), 2);
}
