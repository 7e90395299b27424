//! Admission webhooks for IBMPowerVSMachine.

use kube::{Resource, ResourceExt};
use tracing::info;

use super::admission::{
    AdmissionContext, CustomDefaulter, CustomDefaulterValidator, CustomValidator, Warnings,
};
use super::defaults::default_powervs_machine_spec;
use super::error::Result;
use super::field::FieldPath;
use super::object::{MachineKind, MachineObject};
use super::policies::powervs;
use crate::crd::IBMPowerVSMachine;

/// Defaulting and validating webhook for IBMPowerVSMachine.
#[derive(Debug, Clone, Copy)]
pub struct PowerVSMachineWebhook;

impl CustomDefaulter for PowerVSMachineWebhook {
    fn default(&self, ctx: &AdmissionContext, obj: &mut MachineObject) -> Result<()> {
        let machine = IBMPowerVSMachine::narrow_mut(obj)?;
        info!(parent: &ctx.span, name = %machine.name_any(), "default");
        default_powervs_machine_spec(&mut machine.spec);
        Ok(())
    }
}

impl CustomValidator for PowerVSMachineWebhook {
    fn validate_create(&self, ctx: &AdmissionContext, obj: &MachineObject) -> Result<Warnings> {
        let machine = IBMPowerVSMachine::narrow(obj)?;
        info!(parent: &ctx.span, name = %machine.name_any(), "validate create");
        validate_powervs_machine(machine)
    }

    fn validate_update(
        &self,
        ctx: &AdmissionContext,
        old: &MachineObject,
        new: &MachineObject,
    ) -> Result<Warnings> {
        IBMPowerVSMachine::narrow(old)?;
        let machine = IBMPowerVSMachine::narrow(new)?;
        info!(parent: &ctx.span, name = %machine.name_any(), "validate update");
        validate_powervs_machine(machine)
    }

    fn validate_delete(&self, ctx: &AdmissionContext, obj: &MachineObject) -> Result<Warnings> {
        info!(parent: &ctx.span, name = %obj.name(), "validate delete");
        Ok(Warnings::new())
    }
}

impl CustomDefaulterValidator for PowerVSMachineWebhook {
    fn kind(&self) -> &'static str {
        "IBMPowerVSMachine"
    }
}

/// Run every PowerVS policy on the machine spec.
pub fn validate_powervs_machine(machine: &IBMPowerVSMachine) -> Result<Warnings> {
    powervs::validate_spec(&machine.spec, &FieldPath::new("spec"))
        .into_result(&IBMPowerVSMachine::kind(&()), &machine.name_any())?;
    Ok(Warnings::new())
}
