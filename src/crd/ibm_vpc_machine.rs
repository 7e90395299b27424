//! IBMVPCMachine and IBMVPCMachineTemplate Custom Resource Definitions.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// IBMVPCMachine describes a single VPC virtual server instance.
///
/// Example:
/// ```yaml
/// apiVersion: infrastructure.cluster.x-k8s.io/v1beta2
/// kind: IBMVPCMachine
/// metadata:
///   name: control-plane-0
/// spec:
///   zone: us-south-1
///   image:
///     name: ubuntu-24-04
///   bootVolume:
///     sizeGiB: 100
///     profile: general-purpose
/// ```
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta2",
    kind = "IBMVPCMachine",
    plural = "ibmvpcmachines",
    derive = "PartialEq",
    derive = "Default",
    namespaced,
    printcolumn = r#"{"name":"Zone", "type":"string", "jsonPath":".spec.zone"}"#,
    printcolumn = r#"{"name":"Profile", "type":"string", "jsonPath":".spec.profile"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct IBMVPCMachineSpec {
    /// Instance name; defaults to the object name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Boot image by ID or name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<IBMVPCResourceReference>,

    /// Availability zone of the instance.
    #[serde(default)]
    pub zone: String,

    /// Instance profile (e.g. bx2-2x8).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Boot volume overrides. Omitted means the profile's defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_volume: Option<VPCVolume>,

    /// Primary network interface.
    #[serde(default)]
    pub primary_network_interface: NetworkInterface,

    /// SSH keys injected into the instance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_keys: Vec<IBMVPCResourceReference>,

    /// Provider ID set by the controller once the instance exists.
    #[serde(rename = "providerID", skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

/// Reference to a VPC resource by ID or name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IBMVPCResourceReference {
    /// Unique identifier of the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name of the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Primary network interface of a VPC instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    /// Subnet the interface is attached to.
    #[serde(default)]
    pub subnet: String,
}

/// Boot volume of a VPC instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VPCVolume {
    /// Delete the volume when the instance is deleted.
    #[serde(default)]
    pub delete_volume_on_instance_delete: bool,

    /// Volume name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Capacity in GiB (10 - 250). Zero keeps the image's size.
    #[serde(rename = "sizeGiB", default)]
    pub size_gib: i64,

    /// Volume profile (general-purpose, 5iops-tier, 10iops-tier, custom).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Maximum I/O operations per second. Only valid with the `custom` profile.
    #[serde(default)]
    pub iops: i64,

    /// CRN of the root key encrypting the volume.
    #[serde(rename = "encryptionKeyCRN", skip_serializing_if = "Option::is_none")]
    pub encryption_key_crn: Option<String>,
}

/// IBMVPCMachineTemplate is a reusable IBMVPCMachine blueprint.
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta2",
    kind = "IBMVPCMachineTemplate",
    plural = "ibmvpcmachinetemplates",
    derive = "PartialEq",
    derive = "Default",
    namespaced,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct IBMVPCMachineTemplateSpec {
    /// Machine template.
    pub template: IBMVPCMachineTemplateResource,
}

/// Machine template body.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IBMVPCMachineTemplateResource {
    /// Spec of every machine created from this template.
    pub spec: IBMVPCMachineSpec,
}
