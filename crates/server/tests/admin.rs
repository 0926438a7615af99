use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use common::admin_http::admin_router;
use service::metrics::encode_metrics;

#[tokio::test]
async fn admin_router_serves_healthz_and_metrics() -> anyhow::Result<()> {
    let router = admin_router(encode_metrics);

    let res = router.clone().oneshot(Request::get("/healthz").body(Body::empty())?).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"OK");

    let res = router.oneshot(Request::get("/metrics").body(Body::empty())?).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn spawned_admin_server_rejects_bad_address() {
    let res = common::admin_http::spawn_admin_server("not-an-address", encode_metrics).await;
    assert!(res.is_err());
}

#[tokio::test]
async fn spawned_admin_server_stops_when_aborted() -> anyhow::Result<()> {
    let handle = common::admin_http::spawn_admin_server("127.0.0.1:0", encode_metrics).await?;
    assert!(!handle.is_finished());

    handle.abort();
    let joined = handle.await;
    assert!(joined.is_err_and(|e| e.is_cancelled()));
    Ok(())
}
