//! PowerVS machine spec policies.
//!
//! Validates:
//! - Network reference is present and well formed
//! - Exactly one of `image` / `imageRef` is set
//! - Memory is at least MIN_MEMORY_GIB
//! - Processors are at least MIN_PROCESSORS

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use super::validate_resource_reference;
use crate::crd::IBMPowerVSMachineSpec;
use crate::webhooks::field::{ErrorList, FieldError, FieldPath};

/// Smallest memory size a partition can be created with.
pub const MIN_MEMORY_GIB: i32 = 2;

/// Smallest processor entitlement a shared partition can be created with.
pub const MIN_PROCESSORS: f64 = 0.25;

/// Validate the network reference.
pub fn validate_network(spec: &IBMPowerVSMachineSpec, path: &FieldPath) -> Option<FieldError> {
    validate_resource_reference(&spec.network, &path.child("network"), "Network")
}

/// Validate that exactly one image source is set, and the inline one if used.
pub fn validate_image(spec: &IBMPowerVSMachineSpec, path: &FieldPath) -> Option<FieldError> {
    match (&spec.image, &spec.image_ref) {
        (None, None) => Some(FieldError::invalid(
            path,
            "",
            "One of - Image or ImageRef must be specified",
        )),
        (Some(_), Some(_)) => Some(FieldError::invalid(
            path,
            "",
            "Only one of - Image or ImageRef maybe be specified",
        )),
        (Some(image), None) => validate_resource_reference(image, &path.child("image"), "Image"),
        (None, Some(_)) => None,
    }
}

/// Validate the memory size. An unset value counts as zero.
pub fn validate_memory(spec: &IBMPowerVSMachineSpec, path: &FieldPath) -> Option<FieldError> {
    let memory = spec.memory_gib.unwrap_or(0);
    if memory >= MIN_MEMORY_GIB {
        return None;
    }
    Some(FieldError::invalid(
        &path.child("memoryGiB"),
        &memory,
        "Invalid Memory value - must be a positive integer no lesser than 2",
    ))
}

/// Validate the processor entitlement.
pub fn validate_processors(spec: &IBMPowerVSMachineSpec, path: &FieldPath) -> Option<FieldError> {
    if processors_valid(spec.processors.as_ref()) {
        return None;
    }
    Some(FieldError::invalid(
        &path.child("processors"),
        &spec.processors,
        "Invalid Processors value - must be non-empty and positive floating-point number no lesser than 0.25",
    ))
}

/// Whole numbers must be positive; strings must parse, without surrounding
/// whitespace, to a finite value of at least MIN_PROCESSORS.
pub fn processors_valid(processors: Option<&IntOrString>) -> bool {
    match processors {
        None => false,
        Some(IntOrString::Int(n)) => *n > 0,
        Some(IntOrString::String(s)) => s
            .parse::<f64>()
            .is_ok_and(|v| v.is_finite() && v >= MIN_PROCESSORS),
    }
}

/// Run every PowerVS policy against a spec found at `path`.
///
/// All policies run; violations are returned in the order the policies ran.
pub fn validate_spec(spec: &IBMPowerVSMachineSpec, path: &FieldPath) -> ErrorList {
    let mut errs = ErrorList::new();
    errs.extend(validate_network(spec, path));
    errs.extend(validate_image(spec, path));
    errs.extend(validate_memory(spec, path));
    errs.extend(validate_processors(spec, path));
    errs
}
