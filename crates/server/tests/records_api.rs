use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use configs::StorageConfig;
use server::routes;
use service::resources::Catalog;

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

struct TestApp {
    router: Router,
    data_dir: PathBuf,
}

impl TestApp {
    /// Fresh data directory seeded with the given `(file, content)` pairs.
    async fn with_files(files: &[(&str, &str)]) -> anyhow::Result<Self> {
        let data_dir = std::env::temp_dir().join(format!("ensino_api_{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&data_dir).await?;
        for (name, content) in files {
            tokio::fs::write(data_dir.join(name), content).await?;
        }
        let storage = StorageConfig { data_dir: data_dir.to_string_lossy().into_owned(), ..StorageConfig::default() };
        let router = routes::build_router(&Catalog::open(&storage), cors());
        Ok(Self { router, data_dir })
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Vec<u8>)> {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&v)?)
            }
            None => Body::empty(),
        };
        let res = self.router.clone().oneshot(req.body(body)?).await?;
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
        Ok((status, bytes.to_vec()))
    }

    async fn json(&self, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
        let (status, bytes) = self.send(method, uri, body).await?;
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok((status, value))
    }

    async fn file(&self, name: &str) -> anyhow::Result<Value> {
        let text = tokio::fs::read_to_string(self.data_dir.join(name)).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let app = TestApp::with_files(&[]).await?;
    let (status, body) = app.json("GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn create_into_empty_collection_then_list() -> anyhow::Result<()> {
    let app = TestApp::with_files(&[("alunos.json", "[]")]).await?;

    let (status, created) = app.json("POST", "/alunos", Some(json!({"nome": "Ana"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["nome"], "Ana");
    let id = created["id"].as_str().expect("string id").to_string();
    assert!(!id.is_empty());

    let (status, list) = app.json("GET", "/alunos", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let (status, fetched) = app.json("GET", &format!("/alunos/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    assert_eq!(app.file("alunos.json").await?, json!([created]));
    Ok(())
}

#[tokio::test]
async fn put_merges_partial_fields() -> anyhow::Result<()> {
    let app = TestApp::with_files(&[("alunos.json", r#"[{"id":"1","nome":"Ana"}]"#)]).await?;

    let (status, merged) = app.json("PUT", "/alunos/1", Some(json!({"necessidade": "X"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged, json!({"id": "1", "nome": "Ana", "necessidade": "X"}));
    assert_eq!(app.file("alunos.json").await?, json!([merged]));
    Ok(())
}

#[tokio::test]
async fn put_unknown_id_is_404_and_changes_nothing() -> anyhow::Result<()> {
    let seed = r#"[{"id":"1","nome":"Ana"}]"#;
    let app = TestApp::with_files(&[("professores.json", seed)]).await?;

    let (status, body) = app.json("PUT", "/professores/9", Some(json!({"nome": "Bia"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Professor não encontrado");

    let (_, after) = app.json("GET", "/professores", None).await?;
    assert_eq!(after, serde_json::from_str::<Value>(seed)?);
    Ok(())
}

#[tokio::test]
async fn delete_unknown_id_is_404_and_changes_nothing() -> anyhow::Result<()> {
    let app = TestApp::with_files(&[("eventos.json", r#"[{"id":"1"}]"#)]).await?;

    let (status, body) = app.json("DELETE", "/eventos/2", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Evento não encontrado");
    assert_eq!(app.file("eventos.json").await?, json!([{"id": "1"}]));
    Ok(())
}

#[tokio::test]
async fn delete_removes_one_and_returns_no_content() -> anyhow::Result<()> {
    let app = TestApp::with_files(&[("usuarios.json", r#"[{"id":"1"},{"id":"2"}]"#)]).await?;

    let (status, bytes) = app.send("DELETE", "/usuarios/1", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(bytes.is_empty());

    let (status, _) = app.json("GET", "/usuarios/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.file("usuarios.json").await?, json!([{"id": "2"}]));
    Ok(())
}

#[tokio::test]
async fn empty_or_invalid_create_body_is_400() -> anyhow::Result<()> {
    let app = TestApp::with_files(&[("agenda.json", "[]")]).await?;

    let (status, body) = app.json("POST", "/agendamentos", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Dados inválidos para inclusão!");

    let (status, _) = app.json("POST", "/agendamentos", Some(json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.json("POST", "/agendamentos", Some(json!(["not", "an", "object"]))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.file("agenda.json").await?, json!([]));
    Ok(())
}

#[tokio::test]
async fn storage_failures_map_to_500_with_message() -> anyhow::Result<()> {
    let app = TestApp::with_files(&[
        ("alunos.json", "[{\"id\":"),
        ("eventos.json", r#"{"id":"1"}"#),
    ])
    .await?;

    let (status, body) = app.json("GET", "/alunos", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Erro na leitura dos dados dos alunos.");

    let (status, body) = app.json("POST", "/eventos", Some(json!({"titulo": "Feira"}))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Formato inválido para arquivo JSON dos eventos.");

    // collection file never provisioned
    let (status, _) = app.json("GET", "/profissional", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(tokio::fs::metadata(app.data_dir.join("profissional.json")).await.is_err());
    Ok(())
}

#[tokio::test]
async fn failed_write_is_500_and_keeps_the_file() -> anyhow::Result<()> {
    let seed = r#"[{"id":"1"}]"#;
    let app = TestApp::with_files(&[("alunos.json", seed)]).await?;
    tokio::fs::create_dir_all(app.data_dir.join(".alunos.json.tmp")).await?;

    let (status, body) = app.json("POST", "/alunos", Some(json!({"nome": "Ana"}))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Erro ao gravar dados do novo aluno.");

    let (status, body) = app.json("DELETE", "/alunos/1", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Erro ao excluir aluno.");

    assert_eq!(tokio::fs::read_to_string(app.data_dir.join("alunos.json")).await?, seed);
    Ok(())
}

#[tokio::test]
async fn every_resource_is_mounted() -> anyhow::Result<()> {
    let files = [
        ("alunos.json", "[]"),
        ("professores.json", "[]"),
        ("profissional.json", "[]"),
        ("agenda.json", "[]"),
        ("eventos.json", "[]"),
        ("usuarios.json", "[]"),
    ];
    let app = TestApp::with_files(&files).await?;
    for prefix in ["/alunos", "/professores", "/profissional", "/agendamentos", "/eventos", "/usuarios"] {
        let (status, created) = app.json("POST", prefix, Some(json!({"nome": "x"}))).await?;
        assert_eq!(status, StatusCode::CREATED, "{prefix}");
        let id = created["id"].as_str().expect("id").to_string();
        let (status, _) = app.json("GET", &format!("{prefix}/{id}"), None).await?;
        assert_eq!(status, StatusCode::OK, "{prefix}");
    }
    Ok(())
}

#[tokio::test]
async fn concurrent_posts_never_lose_records() -> anyhow::Result<()> {
    let app = Arc::new(TestApp::with_files(&[("alunos.json", "[]")]).await?);
    let mut handles = Vec::new();
    for n in 0..20 {
        let app = Arc::clone(&app);
        handles.push(tokio::spawn(async move { app.json("POST", "/alunos", Some(json!({"n": n}))).await }));
    }
    for h in handles {
        let (status, _) = h.await??;
        assert_eq!(status, StatusCode::CREATED);
    }

    let list = app.file("alunos.json").await?;
    let ids: std::collections::HashSet<&str> =
        list.as_array().expect("array").iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids.len(), 20);
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let app = TestApp::with_files(&[]).await?;
    let (status, doc) = app.json("GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/usuarios/{id}"]["put"].is_object());
    Ok(())
}

#[tokio::test]
async fn swagger_ui_is_mounted() -> anyhow::Result<()> {
    let app = TestApp::with_files(&[]).await?;
    let (status, _) = app.send("GET", "/api-docs", None).await?;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    let (status, _) = app.send("GET", "/swagger-ui/", None).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, doc) = app.json("GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(doc["paths"]["/usuarios"]["post"]["requestBody"]["content"]["application/json"]["schema"]["example"]["usuario"], "PSoares21");
    Ok(())
}
