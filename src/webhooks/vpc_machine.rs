//! Admission webhooks for IBMVPCMachine.

use kube::{Resource, ResourceExt};
use tracing::info;

use super::admission::{
    AdmissionContext, CustomDefaulter, CustomDefaulterValidator, CustomValidator, Warnings,
};
use super::defaults::default_vpc_machine_spec;
use super::error::Result;
use super::field::FieldPath;
use super::object::{MachineKind, MachineObject};
use super::policies::boot_volume;
use crate::crd::IBMVPCMachine;

/// Defaulting and validating webhook for IBMVPCMachine.
#[derive(Debug, Clone, Copy)]
pub struct VPCMachineWebhook;

impl CustomDefaulter for VPCMachineWebhook {
    fn default(&self, ctx: &AdmissionContext, obj: &mut MachineObject) -> Result<()> {
        let machine = IBMVPCMachine::narrow_mut(obj)?;
        info!(parent: &ctx.span, name = %machine.name_any(), "default");
        default_vpc_machine_spec(&mut machine.spec);
        Ok(())
    }
}

impl CustomValidator for VPCMachineWebhook {
    fn validate_create(&self, ctx: &AdmissionContext, obj: &MachineObject) -> Result<Warnings> {
        let machine = IBMVPCMachine::narrow(obj)?;
        info!(parent: &ctx.span, name = %machine.name_any(), "validate create");
        validate_vpc_machine(machine)
    }

    fn validate_update(
        &self,
        ctx: &AdmissionContext,
        old: &MachineObject,
        new: &MachineObject,
    ) -> Result<Warnings> {
        IBMVPCMachine::narrow(old)?;
        let machine = IBMVPCMachine::narrow(new)?;
        info!(parent: &ctx.span, name = %machine.name_any(), "validate update");
        validate_vpc_machine(machine)
    }

    fn validate_delete(&self, ctx: &AdmissionContext, obj: &MachineObject) -> Result<Warnings> {
        info!(parent: &ctx.span, name = %obj.name(), "validate delete");
        Ok(Warnings::new())
    }
}

impl CustomDefaulterValidator for VPCMachineWebhook {
    fn kind(&self) -> &'static str {
        "IBMVPCMachine"
    }
}

/// Validate the machine's boot volume.
pub fn validate_vpc_machine(machine: &IBMVPCMachine) -> Result<Warnings> {
    boot_volume::validate(&machine.spec, &FieldPath::new("spec"))
        .into_result(&IBMVPCMachine::kind(&()), &machine.name_any())?;
    Ok(Warnings::new())
}
