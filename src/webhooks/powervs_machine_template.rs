//! Admission webhooks for IBMPowerVSMachineTemplate.

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
use crate::crd::IBMPowerVSMachineTemplate;

/// Defaulting and validating webhook for IBMPowerVSMachineTemplate.
#[derive(Debug, Clone, Copy)]
pub struct PowerVSMachineTemplateWebhook;

impl CustomDefaulter for PowerVSMachineTemplateWebhook {
    fn default(&self, ctx: &AdmissionContext, obj: &mut MachineObject) -> Result<()> {
        let template = IBMPowerVSMachineTemplate::narrow_mut(obj)?;
        info!(parent: &ctx.span, name = %template.name_any(), "default");
        default_powervs_machine_spec(&mut template.spec.template.spec);
        Ok(())
    }
}

impl CustomValidator for PowerVSMachineTemplateWebhook {
    fn validate_create(&self, ctx: &AdmissionContext, obj: &MachineObject) -> Result<Warnings> {
        let template = IBMPowerVSMachineTemplate::narrow(obj)?;
        info!(parent: &ctx.span, name = %template.name_any(), "validate create");
        validate_powervs_machine_template(template)
    }

    fn validate_update(
        &self,
        ctx: &AdmissionContext,
        old: &MachineObject,
        new: &MachineObject,
    ) -> Result<Warnings> {
        IBMPowerVSMachineTemplate::narrow(old)?;
        let template = IBMPowerVSMachineTemplate::narrow(new)?;
        info!(parent: &ctx.span, name = %template.name_any(), "validate update");
        validate_powervs_machine_template(template)
    }

    fn validate_delete(&self, ctx: &AdmissionContext, obj: &MachineObject) -> Result<Warnings> {
        info!(parent: &ctx.span, name = %obj.name(), "validate delete");
        Ok(Warnings::new())
    }
}

impl CustomDefaulterValidator for PowerVSMachineTemplateWebhook {
    fn kind(&self) -> &'static str {
        "IBMPowerVSMachineTemplate"
    }
}

/// Run every PowerVS policy on the template's machine spec.
pub fn validate_powervs_machine_template(template: &IBMPowerVSMachineTemplate) -> Result<Warnings> {
    let path = FieldPath::new("spec").child("template").child("spec");
    powervs::validate_spec(&template.spec.template.spec, &path)
        .into_result(&IBMPowerVSMachineTemplate::kind(&()), &template.name_any())?;
    Ok(Warnings::new())
}
