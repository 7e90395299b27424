//! Boot volume policy, shared by IBMVPCMachine and IBMVPCMachineTemplate.
//!
//! Validates:
//! - Size is unset (0) or within BOOT_VOLUME_MIN_SIZE_GIB..=BOOT_VOLUME_MAX_SIZE_GIB
//! - Profile, when set, is a known volume profile
//! - IOPS are only set together with the `custom` profile

use crate::crd::IBMVPCMachineSpec;
use crate::webhooks::field::{ErrorList, FieldError, FieldPath};

/// Smallest boot volume accepted by VPC.
pub const BOOT_VOLUME_MIN_SIZE_GIB: i64 = 10;

/// Largest boot volume accepted by VPC.
pub const BOOT_VOLUME_MAX_SIZE_GIB: i64 = 250;

/// Profile that allows explicit IOPS.
pub const CUSTOM_PROFILE: &str = "custom";

/// Volume profiles offered by VPC block storage.
pub const VOLUME_PROFILES: &[&str] = &[
    "general-purpose",
    "5iops-tier",
    "10iops-tier",
    CUSTOM_PROFILE,
];

/// Validate the boot volume of a VPC machine spec found at `path`.
pub fn validate(spec: &IBMVPCMachineSpec, path: &FieldPath) -> ErrorList {
    let mut errs = ErrorList::new();
    let Some(volume) = &spec.boot_volume else {
        return errs;
    };
    let path = path.child("bootVolume");

    let sizes = BOOT_VOLUME_MIN_SIZE_GIB..=BOOT_VOLUME_MAX_SIZE_GIB;
    if volume.size_gib != 0 && !sizes.contains(&volume.size_gib) {
        errs.push(FieldError::invalid(
            &path.child("sizeGiB"),
            &volume.size_gib,
            "valid Boot VPCVolume size is 10 - 250 GB",
        ));
    }

    let profile = volume.profile.as_deref();
    if let Some(profile) = profile
        && !VOLUME_PROFILES.contains(&profile)
    {
        errs.push(FieldError::invalid(
            &path.child("profile"),
            profile,
            &format!("supported values: {}", VOLUME_PROFILES.join(", ")),
        ));
    }

    if volume.iops < 0 {
        errs.push(FieldError::invalid(
            &path.child("iops"),
            &volume.iops,
            "iops must not be negative",
        ));
    } else if volume.iops != 0 && profile != Some(CUSTOM_PROFILE) {
        errs.push(FieldError::invalid(
            &path.child("iops"),
            &volume.iops,
            "iops applicable only to volumes using a profile of type `custom`",
        ));
    }

    errs
}
