//! Webhook entry point contracts.
//!
//! Each served kind provides a defaulter and a validator. The HTTP layer
//! decodes the request, builds an [`AdmissionContext`] and dispatches to the
//! matching entry point; the entry points never touch HTTP.

use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, Operation};
use tracing::{Span, info_span};

use super::error::{AdmissionError, Result};
use super::object::MachineObject;

/// Non-fatal messages returned to the client alongside an admission decision.
pub type Warnings = Vec<String>;

/// Per-request state handed to every entry point.
#[derive(Debug, Clone)]
pub struct AdmissionContext {
    /// Request-scoped span. Entry points log through it rather than a global logger.
    pub span: Span,
}

impl AdmissionContext {
    /// Build the context for an incoming admission request.
    pub fn for_request(request: &AdmissionRequest<DynamicObject>) -> Self {
        let span = info_span!(
            "admission",
            uid = %request.uid,
            kind = %request.kind.kind,
            operation = ?request.operation,
            namespace = ?request.namespace,
            name = %request.name,
            dry_run = request.dry_run,
        );
        Self { span }
    }

    /// Context that is not attached to any request, for direct calls.
    pub fn detached() -> Self {
        let span = Span::none();
        Self { span }
    }
}

/// Fills in absent optional fields of an object.
pub trait CustomDefaulter {
    /// Apply defaults in place. Fails only when the object is not the served kind.
    fn default(&self, ctx: &AdmissionContext, obj: &mut MachineObject) -> Result<()>;
}

/// Validates an object on each lifecycle event.
pub trait CustomValidator {
    /// Validate an object being created.
    fn validate_create(&self, ctx: &AdmissionContext, obj: &MachineObject) -> Result<Warnings>;

    /// Validate an object being updated from `old` to `new`.
    fn validate_update(
        &self,
        ctx: &AdmissionContext,
        old: &MachineObject,
        new: &MachineObject,
    ) -> Result<Warnings>;

    /// Validate an object being deleted.
    fn validate_delete(&self, ctx: &AdmissionContext, obj: &MachineObject) -> Result<Warnings>;
}

/// A kind served by both a mutating and a validating webhook.
pub trait CustomDefaulterValidator: CustomDefaulter + CustomValidator + Send + Sync {
    /// Kind this webhook serves.
    fn kind(&self) -> &'static str;
}

/// Dispatch a validating request to the entry point for its operation.
pub fn dispatch_validation(
    webhook: &dyn CustomDefaulterValidator,
    ctx: &AdmissionContext,
    operation: &Operation,
    old: Option<&MachineObject>,
    new: Option<&MachineObject>,
) -> Result<Warnings> {
    match operation {
        Operation::Create => {
            let obj = new.ok_or(AdmissionError::MissingObject("object"))?;
            webhook.validate_create(ctx, obj)
        }
        Operation::Update => {
            let old = old.ok_or(AdmissionError::MissingObject("oldObject"))?;
            let new = new.ok_or(AdmissionError::MissingObject("object"))?;
            webhook.validate_update(ctx, old, new)
        }
        Operation::Delete => match old.or(new) {
            Some(obj) => webhook.validate_delete(ctx, obj),
            None => Ok(Warnings::new()),
        },
        Operation::Connect => Ok(Warnings::new()),
    }
}
