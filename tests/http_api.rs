use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use cnpj_sheets::app::CompanyService;
use cnpj_sheets::config::ServerConfig;
use cnpj_sheets::pipeline::processing::RowTransformer;
use cnpj_sheets::pipeline::storage::{InMemoryRecordStore, RecordStore};
use cnpj_sheets::server::create_server;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

mod support;
use support::multipart_body;

const BOUNDARY: &str = "cnpjsheetsboundary";

fn app_with_limit(max_upload_bytes: usize) -> (Router, TempDir) {
    let dir = tempdir().expect("tempdir");
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let service = Arc::new(CompanyService::new(
        store,
        RowTransformer::new("https://lookup.example/cnpj"),
        dir.path().to_path_buf(),
    ));
    let config = ServerConfig {
        max_upload_bytes,
        ..ServerConfig::default()
    };
    (create_server(service, &config), dir)
}

fn app() -> (Router, TempDir) {
    app_with_limit(1024 * 1024)
}

fn upload_request(field: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    let body = multipart_body(BOUNDARY, field, filename, bytes);
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(req).await?;
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

const CSV: &[u8] = b"Raz\xC3\xA3o Social,CNPJ\nAcme Ltda,11222333000181\n,22333444000199\nBeta SA,33444555000122\n";

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    let (app, _dir) = app();
    let (status, body) = send(&app, get("/health")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn upload_then_list_and_fetch() -> Result<()> {
    let (app, _dir) = app();

    let (status, body) = send(&app, upload_request("planilha", "empresas.csv", CSV)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sucesso"], true);
    assert_eq!(body["total"], 2);

    let (status, body) = send(&app, get("/api/empresas")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "id": 0,
                "razaoSocial": "Acme Ltda",
                "cnpj": "11.222.333/0001-81",
                "url": "https://lookup.example/cnpj?cnpj=11222333000181"
            },
            {
                "id": 1,
                "razaoSocial": "Beta SA",
                "cnpj": "33.444.555/0001-22",
                "url": "https://lookup.example/cnpj?cnpj=33444555000122"
            }
        ])
    );

    let (status, body) = send(&app, get("/api/empresa/1")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["razaoSocial"], "Beta SA");
    Ok(())
}

#[tokio::test]
async fn unknown_ids_are_404() -> Result<()> {
    let (app, _dir) = app();
    send(&app, upload_request("planilha", "empresas.csv", CSV)).await?;

    for uri in ["/api/empresa/2", "/api/empresa/-1", "/api/empresa/abc"] {
        let (status, body) = send(&app, get(uri)).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body["erro"].is_string());
    }
    Ok(())
}

#[tokio::test]
async fn delete_clears_records() -> Result<()> {
    let (app, _dir) = app();
    send(&app, upload_request("planilha", "empresas.csv", CSV)).await?;

    let req = Request::builder()
        .method("DELETE")
        .uri("/api/empresas")
        .body(Body::empty())?;
    let (status, body) = send(&app, req).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sucesso"], true);

    let (_, body) = send(&app, get("/api/empresas")).await?;
    assert_eq!(body, json!([]));
    let (status, _) = send(&app, get("/api/empresa/0")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unsupported_format_is_400_and_keeps_records() -> Result<()> {
    let (app, _dir) = app();
    send(&app, upload_request("planilha", "empresas.csv", CSV)).await?;

    let (status, body) = send(&app, upload_request("planilha", "notas.txt", CSV)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["erro"].as_str().unwrap_or_default().contains("txt"));

    let (_, body) = send(&app, get("/api/empresas")).await?;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn broken_workbook_is_500_with_generic_message() -> Result<()> {
    let (app, _dir) = app();
    let (status, body) =
        send(&app, upload_request("planilha", "lista.xlsx", b"garbage bytes")).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["erro"], "Failed to process workbook file");
    Ok(())
}

#[tokio::test]
async fn missing_file_field_is_400() -> Result<()> {
    let (app, _dir) = app();
    let (status, body) = send(&app, upload_request("outro", "empresas.csv", CSV)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["erro"], "No file uploaded");
    Ok(())
}

#[tokio::test]
async fn oversized_upload_is_rejected() -> Result<()> {
    let (app, _dir) = app_with_limit(64);
    let big = vec![b'a'; 4096];
    let response = app
        .clone()
        .oneshot(upload_request("planilha", "big.csv", &big))
        .await?;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    Ok(())
}

#[tokio::test]
async fn oversized_chunked_upload_is_rejected() -> Result<()> {
    let (app, dir) = app_with_limit(64);
    let body = multipart_body(BOUNDARY, "planilha", "big.csv", &[b'a'; 4096]);

    let (mut sender, streamed) = Body::channel();
    tokio::spawn(async move {
        for chunk in body.chunks(512) {
            if sender
                .send_data(hyper::body::Bytes::copy_from_slice(chunk))
                .await
                .is_err()
            {
                break;
            }
        }
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(streamed)?;

    let (status, body) = send(&app, req).await?;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["erro"], "Uploaded file is too large");
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}
