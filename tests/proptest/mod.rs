// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for capi-ibmcloud-webhooks.
//!
//! Uses proptest to generate random machine specs and verify that the
//! validators and defaulters hold their invariants.

#[path = "../common/mod.rs"]
mod common;

use proptest::prelude::*;

use capi_ibmcloud_webhooks::crd::{IBMPowerVSResourceReference, PowerVSProcessorType};
use capi_ibmcloud_webhooks::region::{region_from_zone, transit_gateway_location_and_routing};
use capi_ibmcloud_webhooks::webhooks::defaults::{
    default_powervs_machine_spec, default_vpc_machine_spec,
};
use capi_ibmcloud_webhooks::webhooks::policies::{boot_volume, powervs};
use capi_ibmcloud_webhooks::webhooks::{
    AdmissionContext, CustomValidator, FieldPath, MachineObject, PowerVSMachineTemplateWebhook,
};
use common::fixtures::{PowerVSSpecBuilder, VPCSpecBuilder};

fn spec_path() -> FieldPath {
    FieldPath::new("spec").child("template").child("spec")
}

/// Strategy for generating memory values below the minimum.
fn low_memory() -> impl Strategy<Value = i32> {
    -1024..2i32
}

/// Strategy for fractional processor strings below 0.25.
fn low_processors() -> impl Strategy<Value = String> {
    (0u32..25).prop_map(|hundredths| format!("0.{hundredths:02}"))
}

/// Strategy for an optional image reference field value.
fn maybe_value() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), "[a-z0-9-]{1,12}".prop_map(Some)]
}

proptest! {
    #[test]
    fn memory_below_minimum_is_rejected(memory in low_memory()) {
        let spec = PowerVSSpecBuilder::new().memory(memory).spec();
        let errors = powervs::validate_spec(&spec, &spec_path());
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors.errors()[0].field.as_str(), "spec.template.spec.memoryGiB");
    }

    #[test]
    fn memory_at_or_above_minimum_is_accepted(memory in 2..1_000_000i32) {
        let spec = PowerVSSpecBuilder::new().memory(memory).spec();
        prop_assert!(powervs::validate_spec(&spec, &spec_path()).is_empty());
    }

    #[test]
    fn processors_below_minimum_are_rejected(processors in low_processors()) {
        let spec = PowerVSSpecBuilder::new().processors(&processors).spec();
        let errors = powervs::validate_spec(&spec, &spec_path());
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors.errors()[0].field.as_str(), "spec.template.spec.processors");
    }

    #[test]
    fn positive_whole_processors_are_accepted(processors in 1..=64i32) {
        let spec = PowerVSSpecBuilder::new().whole_processors(processors).spec();
        prop_assert!(powervs::validate_spec(&spec, &spec_path()).is_empty());
    }

    #[test]
    fn exactly_one_image_source_required(has_image in any::<bool>(), has_ref in any::<bool>()) {
        let mut builder = PowerVSSpecBuilder::new().no_image();
        if has_image && has_ref {
            builder = builder.image_and_image_ref();
        } else if has_image {
            builder = builder.image_name("rhcos-4-15");
        } else if has_ref {
            builder = PowerVSSpecBuilder::new();
        }
        let errors = powervs::validate_spec(&builder.spec(), &spec_path());
        prop_assert_eq!(errors.is_empty(), has_image != has_ref);
    }

    #[test]
    fn network_needs_exactly_one_field(
        id in maybe_value(),
        name in maybe_value(),
        regex in maybe_value(),
    ) {
        let set = [&id, &name, &regex].iter().filter(|v| v.is_some()).count();
        let network = IBMPowerVSResourceReference { id, name, regex };
        let spec = PowerVSSpecBuilder::new().network(network).spec();
        let errors = powervs::validate_spec(&spec, &spec_path());
        prop_assert_eq!(errors.is_empty(), set == 1);
    }

    #[test]
    fn defaulting_is_idempotent(
        memory in prop::option::of(-4..64i32),
        processors in prop::option::of(0..8i32),
    ) {
        let mut builder = PowerVSSpecBuilder::new().no_memory().no_processors();
        if let Some(memory) = memory {
            builder = builder.memory(memory);
        }
        if let Some(processors) = processors {
            builder = builder.whole_processors(processors);
        }
        let mut once = builder.spec();
        default_powervs_machine_spec(&mut once);
        let mut twice = once.clone();
        default_powervs_machine_spec(&mut twice);

        prop_assert_eq!(&once, &twice);
        prop_assert!(once.memory_gib.is_some_and(|m| m != 0));
        prop_assert!(once.processors.is_some());
        prop_assert_eq!(once.processor_type, Some(PowerVSProcessorType::Shared));
    }

    #[test]
    fn vpc_defaulting_is_idempotent(profile in prop::option::of("[a-z0-9-]{0,10}")) {
        let mut builder = VPCSpecBuilder::new();
        if let Some(profile) = &profile {
            builder = builder.profile(profile);
        }
        let mut once = builder.spec();
        default_vpc_machine_spec(&mut once);
        let mut twice = once.clone();
        default_vpc_machine_spec(&mut twice);

        prop_assert_eq!(&once, &twice);
        prop_assert!(once.profile.as_deref().is_some_and(|p| !p.is_empty()));
    }

    #[test]
    fn defaulting_never_overrides_explicit_memory(memory in 1..64i32) {
        let mut spec = PowerVSSpecBuilder::new().memory(memory).spec();
        default_powervs_machine_spec(&mut spec);
        prop_assert_eq!(spec.memory_gib, Some(memory));
    }

    #[test]
    fn delete_is_always_allowed(memory in any::<i32>(), processors in ".{0,6}") {
        let template = PowerVSSpecBuilder::empty()
            .memory(memory)
            .processors(&processors)
            .build_template("worker");
        let obj = MachineObject::from(template);
        let ctx = AdmissionContext::detached();
        let result = PowerVSMachineTemplateWebhook.validate_delete(&ctx, &obj);
        prop_assert!(result.is_ok());
    }

    #[test]
    fn boot_volume_size_bounds(size in -10..400i64) {
        let spec = VPCSpecBuilder::new()
            .boot_volume(size, Some("general-purpose"), 0)
            .spec();
        let errors = boot_volume::validate(&spec, &FieldPath::new("spec"));
        prop_assert_eq!(errors.is_empty(), size == 0 || (10..=250).contains(&size));
    }

    #[test]
    fn iops_only_with_custom_profile(iops in 1..20_000i64, custom in any::<bool>()) {
        let profile = if custom { "custom" } else { "10iops-tier" };
        let spec = VPCSpecBuilder::new().boot_volume(100, Some(profile), iops).spec();
        let errors = boot_volume::validate(&spec, &FieldPath::new("spec"));
        prop_assert_eq!(errors.is_empty(), custom);
    }

    #[test]
    fn datacenter_zone_suffix_is_stripped(prefix in "[a-z]{3}", number in 1..99u32) {
        let zone = format!("{prefix}{number}");
        prop_assert_eq!(region_from_zone(&zone), prefix.as_str());
    }

    #[test]
    fn explicit_vpc_region_is_the_location(zone in "[a-z]{3}[0-9]{2}", vpc in "[a-z]{2}-[a-z]{3,5}") {
        let resolved = transit_gateway_location_and_routing(Some(&zone), Some(&vpc)).unwrap();
        prop_assert_eq!(resolved.location, vpc);
    }
}
