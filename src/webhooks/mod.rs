//! Defaulting and validating admission webhooks for the IBM Cloud machine kinds.
//!
//! Each kind has a webhook type implementing [`CustomDefaulter`] and
//! [`CustomValidator`]. The server decodes every request into a
//! [`MachineObject`] and hands it to the registered webhook for its path:
//! - Defaulting fills unset fields and is returned as a JSON patch
//! - Validation collects every field error and denies with all of them

pub mod admission;
pub mod defaults;
pub mod error;
pub mod field;
pub mod object;
pub mod policies;
mod powervs_machine;
mod powervs_machine_template;
mod server;
mod vpc_machine;
mod vpc_machine_template;

pub use admission::{
    AdmissionContext, CustomDefaulter, CustomDefaulterValidator, CustomValidator, Warnings,
    dispatch_validation,
};
pub use error::AdmissionError;
pub use field::{AggregateInvalid, ErrorList, FieldError, FieldErrorType, FieldPath};
pub use object::{MachineKind, MachineObject};
pub use powervs_machine::{PowerVSMachineWebhook, validate_powervs_machine};
pub use powervs_machine_template::{
    PowerVSMachineTemplateWebhook, validate_powervs_machine_template,
};
pub use server::{
    WebhookError, WebhookState, create_webhook_router, mutate, mutate_path, registered_webhooks,
    run_webhook_server, validate, validate_path,
};
pub use vpc_machine::{VPCMachineWebhook, validate_vpc_machine};
pub use vpc_machine_template::{VPCMachineTemplateWebhook, validate_vpc_machine_template};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
