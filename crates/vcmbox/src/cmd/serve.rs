use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::{error, info};
use vcmbox_export::{render_metrics, CONTENT_TYPE};
use vcmbox_mailbox::PropertyClient;
use vcmbox_transport::DeviceControl;

use crate::cmd::{Context, ServeArgs};
use crate::exit::{io_error, CliResult, SUCCESS};

type SharedClient<D> = Arc<Mutex<PropertyClient<D>>>;

pub fn run(args: ServeArgs, ctx: &Context) -> CliResult<i32> {
    // Fail before binding when there is no device.
    let client = ctx.open_client()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| io_error("start runtime", err))?;
    runtime.block_on(serve(args.addr, router(client)))?;
    Ok(SUCCESS)
}

async fn serve(addr: SocketAddr, app: Router) -> CliResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| io_error(&format!("bind {addr}"), err))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| io_error("serve", err))?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

/// `GET /metrics` backed by one shared client.
pub fn router<D>(client: PropertyClient<D>) -> Router
where
    D: DeviceControl + Send + 'static,
{
    let state: SharedClient<D> = Arc::new(Mutex::new(client));
    Router::new()
        .route("/metrics", get(metrics::<D>))
        .with_state(state)
}

async fn metrics<D>(State(client): State<SharedClient<D>>) -> Response
where
    D: DeviceControl + Send + 'static,
{
    // Exchanges block, and only one may use the mailbox buffer at a time.
    let rendered = tokio::task::spawn_blocking(move || {
        let mut client = client.lock().unwrap_or_else(PoisonError::into_inner);
        render_metrics(&mut client)
    })
    .await;

    match rendered {
        Ok(Ok(body)) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Ok(Err(err)) => {
            error!(error = %err, "metrics request failed");
            internal_error()
        }
        Err(err) => {
            error!(error = %err, "metrics task failed");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    (status, status.canonical_reason().unwrap_or_default()).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use vcmbox_mailbox::{MailboxConfig, SimulatedFirmware};

    use super::*;

    fn client(sim: SimulatedFirmware) -> PropertyClient<SimulatedFirmware> {
        PropertyClient::with_device(sim, MailboxConfig::default())
    }

    async fn get_path(app: Router, path: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn metrics_renders_exposition() {
        let app = router(client(SimulatedFirmware::pi4()));
        let (status, content_type, body) = get_path(app, "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some(CONTENT_TYPE));
        assert!(body.starts_with("# HELP rpi_vc_revision"));
        assert!(body.contains("rpi_clock_rate_hz{id=\"arm\"} 1500000000\n"));
        assert!(body.ends_with("rpi_voltage_max{id=\"sdram_i\"} 1.100000\n"));
    }

    #[tokio::test]
    async fn failed_read_is_500_without_partial_body() {
        let mut sim = SimulatedFirmware::pi4();
        sim.fail_with_errno(Some(5));
        let (status, _, body) = get_path(router(client(sim)), "/metrics").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("rpi_"));
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let app = router(client(SimulatedFirmware::pi4()));
        let (status, _, _) = get_path(app, "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn client_is_reused_across_requests() {
        let state: SharedClient<SimulatedFirmware> =
            Arc::new(Mutex::new(client(SimulatedFirmware::pi4())));
        let app = Router::new()
            .route("/metrics", get(metrics::<SimulatedFirmware>))
            .with_state(state.clone());
        let requests = || {
            let mut client = state.lock().unwrap();
            client.mailbox().device().requests().len()
        };

        let (status, _, _) = get_path(app.clone(), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        let first = requests();
        assert!(first > 0);

        let (status, _, _) = get_path(app, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(requests(), first * 2);
    }
}
