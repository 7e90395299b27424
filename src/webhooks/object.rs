//! Typed view of the object carried by an admission request.
//!
//! The API server hands every webhook a loosely typed object. It is decoded
//! once into [`MachineObject`], a closed set of the kinds served here, and each
//! webhook then narrows it to the one concrete kind it handles.

use kube::core::{DynamicObject, GroupVersionKind};
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{AdmissionError, Result};
use crate::crd::{
    GROUP, IBMPowerVSMachine, IBMPowerVSMachineTemplate, IBMVPCMachine, IBMVPCMachineTemplate,
};

/// Any machine resource served by these webhooks.
#[derive(Debug, Clone, PartialEq)]
pub enum MachineObject {
    PowerVSMachine(IBMPowerVSMachine),
    PowerVSMachineTemplate(IBMPowerVSMachineTemplate),
    VPCMachine(IBMVPCMachine),
    VPCMachineTemplate(IBMVPCMachineTemplate),
}

impl MachineObject {
    /// Decode an admission object according to the kind declared by the request.
    pub fn decode(gvk: &GroupVersionKind, obj: &DynamicObject) -> Result<Self> {
        if gvk.group != GROUP {
            return Err(AdmissionError::TypeMismatch {
                expected: format!("resource in group {GROUP}"),
                actual: format!("{}.{}", gvk.kind, gvk.group),
            });
        }

        let value = serde_json::to_value(obj).map_err(|source| AdmissionError::Decode {
            kind: gvk.kind.clone(),
            source,
        })?;

        match gvk.kind.as_str() {
            "IBMPowerVSMachine" => parse(&gvk.kind, value).map(Self::PowerVSMachine),
            "IBMPowerVSMachineTemplate" => {
                parse(&gvk.kind, value).map(Self::PowerVSMachineTemplate)
            }
            "IBMVPCMachine" => parse(&gvk.kind, value).map(Self::VPCMachine),
            "IBMVPCMachineTemplate" => parse(&gvk.kind, value).map(Self::VPCMachineTemplate),
            other => Err(AdmissionError::TypeMismatch {
                expected: "supported machine kind".to_string(),
                actual: format!("{other}.{GROUP}"),
            }),
        }
    }

    /// Kind of the wrapped object.
    pub fn kind(&self) -> &'static str {
        match self {
            MachineObject::PowerVSMachine(_) => "IBMPowerVSMachine",
            MachineObject::PowerVSMachineTemplate(_) => "IBMPowerVSMachineTemplate",
            MachineObject::VPCMachine(_) => "IBMVPCMachine",
            MachineObject::VPCMachineTemplate(_) => "IBMVPCMachineTemplate",
        }
    }

    /// Name of the wrapped object (generateName when the name is not set yet).
    pub fn name(&self) -> String {
        match self {
            MachineObject::PowerVSMachine(m) => m.name_any(),
            MachineObject::PowerVSMachineTemplate(m) => m.name_any(),
            MachineObject::VPCMachine(m) => m.name_any(),
            MachineObject::VPCMachineTemplate(m) => m.name_any(),
        }
    }

    /// Serialize the wrapped object back to JSON.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            MachineObject::PowerVSMachine(m) => serde_json::to_value(m),
            MachineObject::PowerVSMachineTemplate(m) => serde_json::to_value(m),
            MachineObject::VPCMachine(m) => serde_json::to_value(m),
            MachineObject::VPCMachineTemplate(m) => serde_json::to_value(m),
        }
    }
}

fn parse<K: DeserializeOwned>(kind: &str, value: Value) -> Result<K> {
    serde_json::from_value(value).map_err(|source| AdmissionError::Decode {
        kind: kind.to_string(),
        source,
    })
}

/// A concrete kind that can be narrowed out of a [`MachineObject`].
pub trait MachineKind: Resource<DynamicType = ()> + Sized {
    /// Borrow the concrete object, or fail with `TypeMismatch`.
    fn narrow(obj: &MachineObject) -> Result<&Self>;

    /// Mutably borrow the concrete object, or fail with `TypeMismatch`.
    fn narrow_mut(obj: &mut MachineObject) -> Result<&mut Self>;
}

fn mismatch<K: Resource<DynamicType = ()>>(obj: &MachineObject) -> AdmissionError {
    AdmissionError::TypeMismatch {
        expected: K::kind(&()).to_string(),
        actual: obj.kind().to_string(),
    }
}

macro_rules! machine_kind {
    ($ty:ty, $variant:ident) => {
        impl MachineKind for $ty {
            fn narrow(obj: &MachineObject) -> Result<&Self> {
                match obj {
                    MachineObject::$variant(inner) => Ok(inner),
                    other => Err(mismatch::<Self>(other)),
                }
            }

            fn narrow_mut(obj: &mut MachineObject) -> Result<&mut Self> {
                match obj {
                    MachineObject::$variant(inner) => Ok(inner),
                    other => Err(mismatch::<Self>(other)),
                }
            }
        }

        impl From<$ty> for MachineObject {
            fn from(obj: $ty) -> Self {
                MachineObject::$variant(obj)
            }
        }
    };
}

machine_kind!(IBMPowerVSMachine, PowerVSMachine);
machine_kind!(IBMPowerVSMachineTemplate, PowerVSMachineTemplate);
machine_kind!(IBMVPCMachine, VPCMachine);
machine_kind!(IBMVPCMachineTemplate, VPCMachineTemplate);
