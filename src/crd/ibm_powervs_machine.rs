//! IBMPowerVSMachine and IBMPowerVSMachineTemplate Custom Resource Definitions.
//!
//! A PowerVS machine is a logical partition carved out of an IBM Power
//! Virtual Server workspace. The template kind wraps the same spec so a
//! higher-level scaling construct (a MachineDeployment) can stamp out
//! machines from it.

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// IBMPowerVSMachine describes a single PowerVS partition.
///
/// Example:
/// ```yaml
/// apiVersion: infrastructure.cluster.x-k8s.io/v1beta2
/// kind: IBMPowerVSMachine
/// metadata:
///   name: worker-0
/// spec:
///   serviceInstanceID: 3229a94c-af54-4212-bf60-6202b6fd0a07
///   imageRef:
///     name: rhcos-4-15
///   network:
///     name: capi-net
///   memoryGiB: 8
///   processors: "0.5"
/// ```
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta2",
    kind = "IBMPowerVSMachine",
    plural = "ibmpowervsmachines",
    derive = "PartialEq",
    derive = "Default",
    namespaced,
    printcolumn = r#"{"name":"Memory", "type":"integer", "jsonPath":".spec.memoryGiB"}"#,
    printcolumn = r#"{"name":"Processors", "type":"string", "jsonPath":".spec.processors"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct IBMPowerVSMachineSpec {
    /// GUID of the PowerVS workspace the partition is created in.
    #[serde(rename = "serviceInstanceID", skip_serializing_if = "Option::is_none")]
    pub service_instance_id: Option<String>,

    /// Name of the SSH key pair injected into the partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,

    /// Boot image, resolved by ID, name or regular expression.
    /// Mutually exclusive with `imageRef`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<IBMPowerVSResourceReference>,

    /// Reference to an IBMPowerVSImage object in the same namespace.
    /// Mutually exclusive with `image`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<LocalObjectReference>,

    /// Machine type backing the partition (s922, e880, e980, s1022).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_type: Option<String>,

    /// How processors are allocated to the partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor_type: Option<PowerVSProcessorType>,

    /// Processor capacity, either a whole number or a fractional string
    /// such as "0.25".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processors: Option<IntOrString>,

    /// Memory in GiB (minimum 2).
    #[serde(rename = "memoryGiB", skip_serializing_if = "Option::is_none")]
    pub memory_gib: Option<i32>,

    /// Network the partition attaches to.
    #[serde(default)]
    pub network: IBMPowerVSResourceReference,

    /// Provider ID set by the controller once the partition exists.
    #[serde(rename = "providerID", skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

/// Reference to a PowerVS resource by exactly one of ID, name or regex.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IBMPowerVSResourceReference {
    /// Unique identifier of the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name of the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Regular expression matched against resource names. The first match wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// Reference to another object in the same namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct LocalObjectReference {
    /// Name of the referent.
    #[serde(default)]
    pub name: String,
}

/// Processor allocation mode of a PowerVS partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum PowerVSProcessorType {
    /// Whole processors reserved for the partition.
    Dedicated,
    /// Fractional processors from the shared pool, uncapped.
    Shared,
    /// Fractional processors from the shared pool, capped at the entitlement.
    Capped,
}

impl std::fmt::Display for PowerVSProcessorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerVSProcessorType::Dedicated => write!(f, "Dedicated"),
            PowerVSProcessorType::Shared => write!(f, "Shared"),
            PowerVSProcessorType::Capped => write!(f, "Capped"),
        }
    }
}

/// IBMPowerVSMachineTemplate is a reusable IBMPowerVSMachine blueprint.
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta2",
    kind = "IBMPowerVSMachineTemplate",
    plural = "ibmpowervsmachinetemplates",
    derive = "PartialEq",
    derive = "Default",
    namespaced,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct IBMPowerVSMachineTemplateSpec {
    /// Machine template.
    pub template: IBMPowerVSMachineTemplateResource,
}

/// Machine template body.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IBMPowerVSMachineTemplateResource {
    /// Spec of every machine created from this template.
    pub spec: IBMPowerVSMachineSpec,
}
