//!
//! HTTP listener serving the dispatcher. Every POST body is decoded as an IPP request,
//! the encoded response goes back with content type `application/ipp`.
//!
use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode as HttpStatus},
    response::{IntoResponse, Response},
    Router,
};
use bytes::Bytes;
use log::{debug, error, info, warn};
use tokio::net::TcpListener;

use crate::{config::ProxyConfig, dispatch::IppDispatcher, error::IppError, request::IppRequestResponse};

const MAX_BODY_SIZE: usize = 64 * 1024 * 1024;
const IPP_CONTENT_TYPE: &str = "application/ipp";

fn status_only(status: HttpStatus) -> http::Response<Bytes> {
    let mut response = http::Response::new(Bytes::new());
    *response.status_mut() = status;
    response
}

/// Answer one HTTP exchange
pub fn process(dispatcher: &IppDispatcher, method: &Method, body: Bytes) -> http::Response<Bytes> {
    if method != Method::POST {
        debug!("Rejecting {method} request");
        return status_only(HttpStatus::NOT_IMPLEMENTED);
    }

    let request = match IppRequestResponse::from_bytes(body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Cannot decode IPP request: {e}");
            return status_only(HttpStatus::BAD_REQUEST);
        }
    };
    debug!("Received {request}");

    let ipp_response = dispatcher.handle(request);
    debug!("Answering {ipp_response}");

    let body = match ipp_response.to_bytes() {
        Ok(body) => body,
        Err(e) => {
            error!("Cannot encode IPP response: {e}");
            return status_only(HttpStatus::INTERNAL_SERVER_ERROR);
        }
    };

    let mut response = http::Response::new(body);
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(IPP_CONTENT_TYPE));
    response
}

async fn handle_ipp(State(dispatcher): State<Arc<IppDispatcher>>, method: Method, body: Bytes) -> Response {
    match tokio::task::spawn_blocking(move || process(&dispatcher, &method, body)).await {
        Ok(response) => response.map(Body::from).into_response(),
        Err(e) => {
            error!("IPP handler failed: {e}");
            HttpStatus::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Router answering IPP requests on any path
pub fn router(dispatcher: Arc<IppDispatcher>) -> Router {
    Router::new()
        .fallback(handle_ipp)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(dispatcher)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for shutdown signal: {e}");
    }
    info!("Shutting down");
}

/// Listen on the configured address until Ctrl-C
pub async fn serve(config: ProxyConfig) -> Result<(), IppError> {
    let dispatcher = Arc::new(IppDispatcher::from_config(&config));
    let addr = SocketAddr::new(config.bind, config.port);
    let listener = TcpListener::bind(addr).await?;

    info!("Listening on {addr}, forwarding to {}", config.target);

    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use crate::{
        client::IppClient,
        config::ForwardTarget,
        model::{IppVersion, JobState, Operation, StatusCode},
        operation::{builder::IppOperationBuilder, IppOperation},
    };

    fn local() -> IppDispatcher {
        IppDispatcher::new(ForwardTarget::Local(env::temp_dir().join("ipp-relay-server-test")))
    }

    #[test]
    fn test_non_post_not_implemented() {
        let response = process(&local(), &Method::GET, Bytes::new());
        assert_eq!(response.status(), HttpStatus::NOT_IMPLEMENTED);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_undecodable_bad_request() {
        let response = process(&local(), &Method::POST, Bytes::from_static(&[2, 0, 0]));
        assert_eq!(response.status(), HttpStatus::BAD_REQUEST);
    }

    #[test]
    fn test_create_job_answered() {
        let mut op = IppOperationBuilder::create_job("ipp://localhost:631/printers/p".parse().unwrap()).build();
        op.set_request_id(12);

        let response = process(&local(), &Method::POST, op.into_request().to_bytes().unwrap());
        assert_eq!(response.status(), HttpStatus::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], IPP_CONTENT_TYPE);

        let ipp = IppRequestResponse::from_bytes(response.into_body()).unwrap();
        assert_eq!(ipp.request_id(), 12);
        assert_eq!(ipp.job_id().unwrap(), 1);
        assert_eq!(ipp.job_state().unwrap(), JobState::PendingHeld);
    }

    #[test]
    fn test_send_document_without_target() {
        let request = IppOperation::send_document().into_request();
        let response = process(&local(), &Method::POST, request.to_bytes().unwrap());
        assert_eq!(response.status(), HttpStatus::OK);

        let ipp = IppRequestResponse::from_bytes(response.into_body()).unwrap();
        assert_eq!(ipp.header().status_code(), StatusCode::ClientErrorBadRequest);
    }

    #[test]
    fn test_unsupported_operation() {
        let request = IppRequestResponse::new(IppVersion::v2_0(), Operation::PausePrinter, None);
        let response = process(&local(), &Method::POST, request.to_bytes().unwrap());
        let ipp = IppRequestResponse::from_bytes(response.into_body()).unwrap();
        assert_eq!(ipp.header().status_code(), StatusCode::ServerErrorOperationNotSupported);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_serve_over_http() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let app = router(Arc::new(local()));
        tokio::spawn(async move { axum::serve(listener, app).await });

        let uri: http::Uri = format!("http://127.0.0.1:{port}/printers/test-printer").parse().unwrap();
        let response = tokio::task::spawn_blocking(move || {
            let op = IppOperationBuilder::get_printer_attributes(uri.clone()).build();
            IppClient::new(uri).send(op)
        })
        .await
        .unwrap()
        .unwrap();

        assert!(response.header().status_code().is_success());
        assert_eq!(
            response.attribute("printer-name").unwrap().string_value(),
            "test-printer"
        );
    }
}
