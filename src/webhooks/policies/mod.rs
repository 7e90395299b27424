//! Field validation policies for machine specs.
//!
//! Every policy is a pure function over a slice of a spec. Policies take the
//! path of the spec they inspect so the same check reports
//! `spec.memoryGiB` on a machine and `spec.template.spec.memoryGiB` on a
//! template.
//!
//! - `powervs`: network, image, memory and processor checks for PowerVS
//! - `boot_volume`: boot volume shape checks for VPC

pub mod boot_volume;
pub mod powervs;

use regex::Regex;

use super::field::{FieldError, FieldPath};
use crate::crd::IBMPowerVSResourceReference;

/// Check that a PowerVS reference names its target exactly one way.
///
/// Exactly one of `id`, `name` or `regex` must be set, it must not be blank,
/// and a `regex` must compile.
pub fn validate_resource_reference(
    reference: &IBMPowerVSResourceReference,
    path: &FieldPath,
    res_type: &str,
) -> Option<FieldError> {
    let fields = [
        ("id", reference.id.as_deref()),
        ("name", reference.name.as_deref()),
        ("regex", reference.regex.as_deref()),
    ];

    match fields.iter().filter(|(_, value)| value.is_some()).count() {
        0 => {
            return Some(FieldError::required(
                path,
                &format!("One of {res_type} - ID, Name or RegEx must be specified"),
            ));
        }
        1 => {}
        _ => {
            return Some(FieldError::invalid(
                path,
                reference,
                &format!("Only one of {res_type} - ID, Name or RegEx may be specified"),
            ));
        }
    }

    for (field, value) in fields {
        if let Some(value) = value
            && value.trim().is_empty()
        {
            return Some(FieldError::invalid(
                &path.child(field),
                value,
                &format!("{res_type} {field} must not be empty"),
            ));
        }
    }

    if let Some(pattern) = reference.regex.as_deref()
        && let Err(e) = Regex::new(pattern)
    {
        return Some(FieldError::invalid(
            &path.child("regex"),
            pattern,
            &format!("{res_type} RegEx is not a valid regular expression: {e}"),
        ));
    }

    None
}
