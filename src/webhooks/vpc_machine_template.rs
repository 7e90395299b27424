//! Admission webhooks for IBMVPCMachineTemplate.

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
use crate::crd::IBMVPCMachineTemplate;

/// Defaulting and validating webhook for IBMVPCMachineTemplate.
#[derive(Debug, Clone, Copy)]
pub struct VPCMachineTemplateWebhook;

impl CustomDefaulter for VPCMachineTemplateWebhook {
    fn default(&self, ctx: &AdmissionContext, obj: &mut MachineObject) -> Result<()> {
        let template = IBMVPCMachineTemplate::narrow_mut(obj)?;
        info!(parent: &ctx.span, name = %template.name_any(), "default");
        default_vpc_machine_spec(&mut template.spec.template.spec);
        Ok(())
    }
}

impl CustomValidator for VPCMachineTemplateWebhook {
    fn validate_create(&self, ctx: &AdmissionContext, obj: &MachineObject) -> Result<Warnings> {
        let template = IBMVPCMachineTemplate::narrow(obj)?;
        info!(parent: &ctx.span, name = %template.name_any(), "validate create");
        validate_vpc_machine_template(template)
    }

    fn validate_update(
        &self,
        ctx: &AdmissionContext,
        old: &MachineObject,
        new: &MachineObject,
    ) -> Result<Warnings> {
        IBMVPCMachineTemplate::narrow(old)?;
        let template = IBMVPCMachineTemplate::narrow(new)?;
        info!(parent: &ctx.span, name = %template.name_any(), "validate update");
        validate_vpc_machine_template(template)
    }

    fn validate_delete(&self, ctx: &AdmissionContext, obj: &MachineObject) -> Result<Warnings> {
        info!(parent: &ctx.span, name = %obj.name(), "validate delete");
        Ok(Warnings::new())
    }
}

impl CustomDefaulterValidator for VPCMachineTemplateWebhook {
    fn kind(&self) -> &'static str {
        "IBMVPCMachineTemplate"
    }
}

/// Validate the boot volume of the template's machine spec.
pub fn validate_vpc_machine_template(template: &IBMVPCMachineTemplate) -> Result<Warnings> {
    let path = FieldPath::new("spec").child("template").child("spec");
    boot_volume::validate(&template.spec.template.spec, &path)
        .into_result(&IBMVPCMachineTemplate::kind(&()), &template.name_any())?;
    Ok(Warnings::new())
}
