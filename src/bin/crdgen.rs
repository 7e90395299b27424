//! Print the CustomResourceDefinitions served by the webhooks as a YAML stream.

use kube::CustomResourceExt;

use capi_ibmcloud_webhooks::crd::{
    IBMPowerVSMachine, IBMPowerVSMachineTemplate, IBMVPCMachine, IBMVPCMachineTemplate,
};

fn main() -> Result<(), serde_yaml::Error> {
    let crds = [
        IBMPowerVSMachine::crd(),
        IBMPowerVSMachineTemplate::crd(),
        IBMVPCMachine::crd(),
        IBMVPCMachineTemplate::crd(),
    ];
    for crd in &crds {
        println!("---");
        print!("{}", serde_yaml::to_string(crd)?);
    }
    Ok(())
}
