//! Defaulting for machine specs.
//!
//! Defaulters only fill fields that are absent, so applying them twice is the
//! same as applying them once.

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use crate::crd::{IBMPowerVSMachineSpec, IBMVPCMachineSpec, PowerVSProcessorType};

/// Memory given to a partition that does not ask for any.
pub const DEFAULT_POWERVS_MEMORY_GIB: i32 = 2;

/// Processor entitlement given to a partition that does not ask for any.
pub const DEFAULT_POWERVS_PROCESSORS: &str = "0.25";

/// Machine type used when none is requested.
pub const DEFAULT_POWERVS_SYSTEM_TYPE: &str = "s922";

/// Processor allocation mode used when none is requested.
pub const DEFAULT_POWERVS_PROCESSOR_TYPE: PowerVSProcessorType = PowerVSProcessorType::Shared;

/// Instance profile used when none is requested.
pub const DEFAULT_VPC_PROFILE: &str = "bx2-2x8";

/// Fill absent fields of a PowerVS machine spec.
pub fn default_powervs_machine_spec(spec: &mut IBMPowerVSMachineSpec) {
    if spec.memory_gib.is_none_or(|m| m == 0) {
        spec.memory_gib = Some(DEFAULT_POWERVS_MEMORY_GIB);
    }
    if spec.processors.as_ref().is_none_or(is_zero_processors) {
        spec.processors = Some(IntOrString::String(DEFAULT_POWERVS_PROCESSORS.to_string()));
    }
    if spec.system_type.as_deref().is_none_or(str::is_empty) {
        spec.system_type = Some(DEFAULT_POWERVS_SYSTEM_TYPE.to_string());
    }
    if spec.processor_type.is_none() {
        spec.processor_type = Some(DEFAULT_POWERVS_PROCESSOR_TYPE);
    }
}

/// Fill absent fields of a VPC machine spec.
pub fn default_vpc_machine_spec(spec: &mut IBMVPCMachineSpec) {
    if spec.profile.as_deref().is_none_or(str::is_empty) {
        spec.profile = Some(DEFAULT_VPC_PROFILE.to_string());
    }
}

// Zero and the empty string are how clients spell "unset" for int-or-string.
fn is_zero_processors(processors: &IntOrString) -> bool {
    match processors {
        IntOrString::Int(n) => *n == 0,
        IntOrString::String(s) => s.is_empty(),
    }
}
