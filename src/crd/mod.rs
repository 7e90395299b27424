//! Custom Resource Definitions (CRDs) for IBM Cloud infrastructure machines.
//!
//! - `IBMPowerVSMachine` / `IBMPowerVSMachineTemplate`: Power Virtual Server partitions
//! - `IBMVPCMachine` / `IBMVPCMachineTemplate`: VPC virtual server instances

mod ibm_powervs_machine;
mod ibm_vpc_machine;

pub use ibm_powervs_machine::*;
pub use ibm_vpc_machine::*;

/// API group shared by every infrastructure kind served here.
pub const GROUP: &str = "infrastructure.cluster.x-k8s.io";

/// API version shared by every infrastructure kind served here.
pub const VERSION: &str = "v1beta2";
