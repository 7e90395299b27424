//! Admission webhook server.
//!
//! Serves one mutating and one validating endpoint per machine kind, using
//! the paths the API server is configured with:
//!
//! - `/mutate-infrastructure-cluster-x-k8s-io-v1beta2-<kind>`
//! - `/validate-infrastructure-cluster-x-k8s-io-v1beta2-<kind>`
//!
//! TLS certificates are expected at the configured paths (typically mounted
//! from a cert-manager Certificate secret).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use axum_server::Handle;
use kube::core::DynamicObject;
use kube::core::GroupVersionKind;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use tracing::{debug, error, info, warn};

use super::admission::{AdmissionContext, CustomDefaulterValidator, Warnings, dispatch_validation};
use super::error::AdmissionError;
use super::object::MachineObject;
use super::{
    PowerVSMachineTemplateWebhook, PowerVSMachineWebhook, VPCMachineTemplateWebhook,
    VPCMachineWebhook,
};
use crate::config::Config;
use crate::crd::{GROUP, VERSION};
use crate::health::HealthState;

/// Shared state for webhook handlers
pub struct WebhookState {
    pub health: Arc<HealthState>,
}

impl WebhookState {
    pub fn new(health: Arc<HealthState>) -> Self {
        Self { health }
    }
}

/// Every kind served, in registration order.
pub fn registered_webhooks() -> Vec<Arc<dyn CustomDefaulterValidator>> {
    vec![
        Arc::new(PowerVSMachineWebhook),
        Arc::new(PowerVSMachineTemplateWebhook),
        Arc::new(VPCMachineWebhook),
        Arc::new(VPCMachineTemplateWebhook),
    ]
}

/// Path of the mutating endpoint for a kind.
pub fn mutate_path(kind: &str) -> String {
    format!(
        "/mutate-{}-{}-{}",
        GROUP.replace('.', "-"),
        VERSION,
        kind.to_lowercase()
    )
}

/// Path of the validating endpoint for a kind.
pub fn validate_path(kind: &str) -> String {
    format!(
        "/validate-{}-{}-{}",
        GROUP.replace('.', "-"),
        VERSION,
        kind.to_lowercase()
    )
}

/// Create a denial response with reason embedded in message.
/// kube-rs deny() only sets status.message, so we format as "[reason] message"
fn deny_with_reason(
    request: &AdmissionRequest<DynamicObject>,
    err: &AdmissionError,
) -> AdmissionResponse {
    let message = format!("[{}] {}", err.reason(), err);
    AdmissionResponse::from(request).deny(message)
}

fn operation_label(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "CREATE",
        Operation::Update => "UPDATE",
        Operation::Delete => "DELETE",
        Operation::Connect => "CONNECT",
    }
}

fn decode(
    gvk: &GroupVersionKind,
    obj: Option<&DynamicObject>,
) -> Result<Option<MachineObject>, AdmissionError> {
    obj.map(|o| MachineObject::decode(gvk, o)).transpose()
}

/// Apply defaults and compute the JSON patch that turns the submitted object
/// into the defaulted one.
fn default_patch(
    webhook: &dyn CustomDefaulterValidator,
    ctx: &AdmissionContext,
    request: &AdmissionRequest<DynamicObject>,
) -> Result<json_patch::Patch, AdmissionError> {
    let obj = request
        .object
        .as_ref()
        .ok_or(AdmissionError::MissingObject("object"))?;
    let mut machine = MachineObject::decode(&request.kind, obj)?;

    let encode_err = |source| AdmissionError::Decode {
        kind: request.kind.kind.clone(),
        source,
    };
    let before = machine.to_value().map_err(encode_err)?;
    webhook.default(ctx, &mut machine)?;
    let after = machine.to_value().map_err(encode_err)?;

    Ok(json_patch::diff(&before, &after))
}

/// Handle a mutating admission request.
pub fn mutate(
    webhook: &dyn CustomDefaulterValidator,
    request: &AdmissionRequest<DynamicObject>,
) -> AdmissionResponse {
    let ctx = AdmissionContext::for_request(request);

    // Nothing to default on DELETE
    if request.operation == Operation::Delete {
        return AdmissionResponse::from(request);
    }

    match default_patch(webhook, &ctx, request) {
        Ok(patch) if patch.0.is_empty() => {
            debug!(parent: &ctx.span, "No defaults applied");
            AdmissionResponse::from(request)
        }
        Ok(patch) => {
            debug!(parent: &ctx.span, operations = patch.0.len(), "Applying defaults");
            match AdmissionResponse::from(request).with_patch(patch) {
                Ok(response) => response,
                Err(e) => {
                    error!(parent: &ctx.span, error = %e, "Failed to serialize patch");
                    AdmissionResponse::from(request)
                        .deny(format!("[InternalError] patch serialization error: {e}"))
                }
            }
        }
        Err(e) => {
            warn!(parent: &ctx.span, error = %e, "Defaulting failed");
            deny_with_reason(request, &e)
        }
    }
}

/// Decode both objects and run the validator for the request's operation.
fn run_validation(
    webhook: &dyn CustomDefaulterValidator,
    ctx: &AdmissionContext,
    request: &AdmissionRequest<DynamicObject>,
) -> Result<Warnings, AdmissionError> {
    let new = decode(&request.kind, request.object.as_ref())?;
    let old = decode(&request.kind, request.old_object.as_ref())?;
    dispatch_validation(
        webhook,
        ctx,
        &request.operation,
        old.as_ref(),
        new.as_ref(),
    )
}

/// Handle a validating admission request.
pub fn validate(
    webhook: &dyn CustomDefaulterValidator,
    request: &AdmissionRequest<DynamicObject>,
) -> AdmissionResponse {
    let ctx = AdmissionContext::for_request(request);

    match run_validation(webhook, &ctx, request) {
        Ok(warnings) => {
            info!(parent: &ctx.span, "Admission request allowed");
            let mut response = AdmissionResponse::from(request);
            if !warnings.is_empty() {
                response.warnings = Some(warnings);
            }
            response
        }
        // Deletion is never blocked by spec content
        Err(e) if request.operation == Operation::Delete => {
            debug!(parent: &ctx.span, error = %e, "Ignoring undecodable object on DELETE");
            AdmissionResponse::from(request)
        }
        Err(e) if e.is_user_error() => {
            warn!(
                parent: &ctx.span,
                reason = e.reason(),
                message = %e,
                "Admission request denied"
            );
            deny_with_reason(request, &e)
        }
        // A request the webhook cannot interpret points at a misrouted
        // registration rather than a bad object
        Err(e) => {
            error!(
                parent: &ctx.span,
                reason = e.reason(),
                message = %e,
                "Admission request rejected as malformed"
            );
            deny_with_reason(request, &e)
        }
    }
}

type AdmissionHandler =
    fn(&dyn CustomDefaulterValidator, &AdmissionRequest<DynamicObject>) -> AdmissionResponse;

/// Decode the review, run the handler and record metrics.
async fn handle_review(
    state: Arc<WebhookState>,
    webhook: Arc<dyn CustomDefaulterValidator>,
    handler: AdmissionHandler,
    review: AdmissionReview<DynamicObject>,
) -> impl IntoResponse {
    let started = Instant::now();

    let request: AdmissionRequest<DynamicObject> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            let response = AdmissionResponse::invalid(format!("Invalid AdmissionReview: {e}"));
            return (StatusCode::BAD_REQUEST, Json(response.into_review()));
        }
    };

    debug!(
        uid = %request.uid,
        kind = webhook.kind(),
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = %request.name,
        "Processing admission request"
    );

    let response = handler(webhook.as_ref(), &request);

    state.health.metrics.record_admission(
        webhook.kind(),
        operation_label(&request.operation),
        response.allowed,
        started.elapsed().as_secs_f64(),
    );

    (StatusCode::OK, Json(response.into_review()))
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    let mut router = Router::new();

    for webhook in registered_webhooks() {
        let kind = webhook.kind();

        let mutator = webhook.clone();
        router = router.route(
            &mutate_path(kind),
            post(
                move |State(state): State<Arc<WebhookState>>,
                      Json(body): Json<AdmissionReview<DynamicObject>>| {
                    handle_review(state, mutator.clone(), mutate, body)
                },
            ),
        );

        let validator = webhook.clone();
        router = router.route(
            &validate_path(kind),
            post(
                move |State(state): State<Arc<WebhookState>>,
                      Json(body): Json<AdmissionReview<DynamicObject>>| {
                    handle_review(state, validator.clone(), validate, body)
                },
            ),
        );
    }

    router.with_state(state)
}

/// Errors that can occur when running the webhook server
#[derive(Debug)]
pub enum WebhookError {
    /// TLS configuration error
    TlsConfig(String),
    /// Server error
    Server(String),
}

impl std::fmt::Display for WebhookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebhookError::TlsConfig(msg) => write!(f, "TLS configuration error: {}", msg),
            WebhookError::Server(msg) => write!(f, "Webhook server error: {}", msg),
        }
    }
}

impl std::error::Error for WebhookError {}

/// Run the webhook server with TLS
///
/// Binds to 0.0.0.0 on the configured webhook port and serves every
/// registered mutating and validating endpoint. The readiness flag is raised
/// once the certificates have been loaded.
pub async fn run_webhook_server(
    config: &Config,
    health: Arc<HealthState>,
) -> Result<(), WebhookError> {
    use axum_server::tls_rustls::RustlsConfig;

    let state = Arc::new(WebhookState::new(health.clone()));
    let app = create_webhook_router(state);

    let tls = RustlsConfig::from_pem_file(
        PathBuf::from(&config.cert_path),
        PathBuf::from(&config.key_path),
    )
    .await
    .map_err(|e| WebhookError::TlsConfig(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.webhook_port));
    let handle = Handle::new();
    tokio::spawn(mark_ready_when_listening(handle.clone(), health));

    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| WebhookError::Server(e.to_string()))?;

    Ok(())
}

/// Raise the readiness flag once the server behind `handle` has bound its port.
///
/// Readiness stays down if the server fails to bind.
async fn mark_ready_when_listening(handle: Handle, health: Arc<HealthState>) {
    match handle.listening().await {
        Some(bound) => {
            info!(address = %bound, "Webhook server listening with TLS");
            health.set_ready(true).await;
        }
        None => error!("Webhook server failed to bind, staying not ready"),
    }
}
