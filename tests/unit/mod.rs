// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Unit tests for capi-ibmcloud-webhooks.
//!
//! These tests run without a Kubernetes cluster or TLS listener and drive
//! the webhooks through the same entry points the server uses.

#[path = "../common/mod.rs"]
mod common;

mod crd_tests {
    use capi_ibmcloud_webhooks::crd::{
        IBMPowerVSMachine, IBMPowerVSMachineTemplate, IBMVPCMachine, IBMVPCMachineTemplate,
        PowerVSProcessorType,
    };
    use kube::{CustomResourceExt, Resource};

    #[test]
    fn test_processor_type_display() {
        assert_eq!(PowerVSProcessorType::Dedicated.to_string(), "Dedicated");
        assert_eq!(PowerVSProcessorType::Shared.to_string(), "Shared");
        assert_eq!(PowerVSProcessorType::Capped.to_string(), "Capped");
    }

    #[test]
    fn test_crd_names() {
        let crds = [
            IBMPowerVSMachine::crd(),
            IBMPowerVSMachineTemplate::crd(),
            IBMVPCMachine::crd(),
            IBMVPCMachineTemplate::crd(),
        ];
        let names: Vec<String> = crds.iter().map(|c| c.spec.names.plural.clone()).collect();
        assert_eq!(
            names,
            vec![
                "ibmpowervsmachines",
                "ibmpowervsmachinetemplates",
                "ibmvpcmachines",
                "ibmvpcmachinetemplates"
            ]
        );
        for crd in &crds {
            assert_eq!(crd.spec.group, "infrastructure.cluster.x-k8s.io");
        }
    }

    #[test]
    fn test_api_version() {
        assert_eq!(
            IBMPowerVSMachineTemplate::api_version(&()),
            "infrastructure.cluster.x-k8s.io/v1beta2"
        );
    }
}

mod region_tests {
    use capi_ibmcloud_webhooks::region::{
        ResolutionError, is_global_routing_required,
        transit_gateway_location_and_routing as resolve, vpc_region_for_powervs_region,
    };

    #[test]
    fn test_local_routing_from_zone() {
        let resolved = resolve(Some("osa21"), None).unwrap();
        assert_eq!(resolved.location, "jp-osa");
        assert!(!resolved.global_routing);
    }

    #[test]
    fn test_explicit_vpc_region_in_other_geography() {
        let resolved = resolve(Some("lon06"), Some("us-south")).unwrap();
        assert_eq!(resolved.location, "us-south");
        assert!(resolved.global_routing);
    }

    #[test]
    fn test_missing_zone() {
        assert_eq!(
            resolve(None, Some("us-south")),
            Err(ResolutionError::MissingInput)
        );
    }

    #[test]
    fn test_region_without_vpc() {
        let err = vpc_region_for_powervs_region("che").unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to fetch vpc region associated with powervs region 'che'"
        );
        assert!(is_global_routing_required("che", "eu-de"));
    }
}

mod admission_tests {
    use crate::common::fixtures::{PowerVSSpecBuilder, VPCSpecBuilder, admission_request};
    use capi_ibmcloud_webhooks::webhooks::{
        PowerVSMachineTemplateWebhook, PowerVSMachineWebhook, VPCMachineTemplateWebhook,
        VPCMachineWebhook, mutate, validate,
    };
    use serde_json::Value;

    const TEMPLATE: &str = "IBMPowerVSMachineTemplate";

    fn patch_ops(patch: &[u8]) -> Vec<Value> {
        let value: Value = serde_json::from_slice(patch).unwrap();
        value.as_array().unwrap().clone()
    }

    #[test]
    fn test_valid_template_allowed() {
        let template = PowerVSSpecBuilder::new().build_template("worker");
        let req = admission_request("CREATE", TEMPLATE, Some(&template), None);
        assert!(validate(&PowerVSMachineTemplateWebhook, &req).allowed);
    }

    #[test]
    fn test_all_errors_reported_together() {
        let template = PowerVSSpecBuilder::new()
            .memory(1)
            .processors("0.1")
            .image_and_image_ref()
            .build_template("worker");
        let req = admission_request("CREATE", TEMPLATE, Some(&template), None);

        let response = validate(&PowerVSMachineTemplateWebhook, &req);
        assert!(!response.allowed);
        let message = &response.result.message;
        assert!(message.starts_with(
            "[Invalid] IBMPowerVSMachineTemplate.infrastructure.cluster.x-k8s.io \"worker\" is invalid: ["
        ));
        for expected in [
            "Only one of - Image or ImageRef maybe be specified",
            "spec.template.spec.memoryGiB: Invalid value: 1",
            "spec.template.spec.processors: Invalid value: \"0.1\"",
        ] {
            assert!(message.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn test_missing_image() {
        let machine = PowerVSSpecBuilder::new()
            .no_image()
            .build_machine("worker-0");
        let req = admission_request("CREATE", "IBMPowerVSMachine", Some(&machine), None);

        let response = validate(&PowerVSMachineWebhook, &req);
        assert!(!response.allowed);
        let expected = "One of - Image or ImageRef must be specified";
        assert!(response.result.message.contains(expected));
    }

    #[test]
    fn test_update_to_invalid_denied() {
        let old = PowerVSSpecBuilder::new().build_template("worker-template");
        let new = PowerVSSpecBuilder::new()
            .memory(0)
            .build_template("worker-template");
        let req = admission_request("UPDATE", TEMPLATE, Some(&new), Some(&old));
        assert!(!validate(&PowerVSMachineTemplateWebhook, &req).allowed);
    }

    #[test]
    fn test_delete_of_invalid_object_allowed() {
        let template = PowerVSSpecBuilder::empty()
            .memory(-4)
            .build_template("broken");
        let req = admission_request("DELETE", TEMPLATE, None, Some(&template));
        assert!(validate(&PowerVSMachineTemplateWebhook, &req).allowed);
    }

    #[test]
    fn test_defaulting_patch_for_template() {
        let template = PowerVSSpecBuilder::new()
            .no_memory()
            .no_processors()
            .build_template("worker");
        let req = admission_request("CREATE", TEMPLATE, Some(&template), None);

        let response = mutate(&PowerVSMachineTemplateWebhook, &req);
        assert!(response.allowed);
        let patch = response.patch.expect("defaults should produce a patch");
        let ops = patch_ops(&patch);

        let value = |path: &str| {
            let op = ops.iter().find(|op| op["path"] == path).unwrap();
            op["value"].clone()
        };
        assert_eq!(value("/spec/template/spec/memoryGiB"), 2);
        assert_eq!(value("/spec/template/spec/processors"), "0.25");
        assert_eq!(value("/spec/template/spec/systemType"), "s922");
        assert_eq!(value("/spec/template/spec/processorType"), "Shared");
    }

    #[test]
    fn test_defaulted_object_passes_validation() {
        let template = PowerVSSpecBuilder::new()
            .no_memory()
            .no_processors()
            .build_template("worker");
        let req = admission_request("CREATE", TEMPLATE, Some(&template), None);
        let response = mutate(&PowerVSMachineTemplateWebhook, &req);

        let patch = response.patch.expect("patch");
        let patch: json_patch::Patch = serde_json::from_slice(&patch).unwrap();
        let mut value = serde_json::to_value(&template).unwrap();
        json_patch::patch(&mut value, &patch).unwrap();

        let defaulted: capi_ibmcloud_webhooks::crd::IBMPowerVSMachineTemplate =
            serde_json::from_value(value).unwrap();
        let req = admission_request("CREATE", TEMPLATE, Some(&defaulted), None);
        assert!(validate(&PowerVSMachineTemplateWebhook, &req).allowed);
    }

    #[test]
    fn test_vpc_machine_boot_volume() {
        let machine = VPCSpecBuilder::new()
            .boot_volume(300, Some("general-purpose"), 0)
            .build_machine("vpc-0");
        let req = admission_request("CREATE", "IBMVPCMachine", Some(&machine), None);

        let response = validate(&VPCMachineWebhook, &req);
        assert!(!response.allowed);
        let expected = "spec.bootVolume.sizeGiB: Invalid value: 300: \
                        valid Boot VPCVolume size is 10 - 250 GB";
        assert!(response.result.message.contains(expected));
    }

    #[test]
    fn test_vpc_template_iops_requires_custom_profile() {
        let template = VPCSpecBuilder::new()
            .profile("bx2-4x16")
            .boot_volume(100, Some("general-purpose"), 3000)
            .build_template("vpc-template");
        let kind = "IBMVPCMachineTemplate";
        let req = admission_request("UPDATE", kind, Some(&template), Some(&template));

        let response = validate(&VPCMachineTemplateWebhook, &req);
        assert!(!response.allowed);
        let expected = "iops applicable only to volumes using a profile of type `custom`";
        assert!(response.result.message.contains(expected));
    }

    #[test]
    fn test_vpc_profile_default_patch() {
        let machine = VPCSpecBuilder::new().build_machine("vpc-0");
        let req = admission_request("CREATE", "IBMVPCMachine", Some(&machine), None);
        let response = mutate(&VPCMachineWebhook, &req);
        let ops = patch_ops(&response.patch.expect("patch"));
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0]["path"], "/spec/profile");
        assert_eq!(ops[0]["value"], "bx2-2x8");
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let machine = VPCSpecBuilder::new().build_machine("vpc-0");
        let req = admission_request("CREATE", "IBMVPCMachine", Some(&machine), None);
        let response = validate(&PowerVSMachineTemplateWebhook, &req);
        assert!(!response.allowed);
        assert_eq!(
            response.result.message,
            "[BadRequest] expected a IBMPowerVSMachineTemplate but got a IBMVPCMachine"
        );
    }
}
