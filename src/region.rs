//! PowerVS to VPC region mapping.
//!
//! A PowerVS workspace lives in a zone such as `dal12` or `eu-de-1`. Linking
//! it to a VPC goes through a transit gateway, which has to be placed in a
//! VPC region and needs global routing when the two sides are in different
//! geographies. Everything here is a pure lookup over a static table.

use thiserror::Error;

/// Errors raised while resolving a transit gateway location.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No PowerVS zone was supplied.
    #[error("powervs zone is not set")]
    MissingInput,

    /// The PowerVS region has no associated VPC region.
    #[error("failed to fetch vpc region associated with powervs region '{region}'")]
    MappingNotFound {
        /// PowerVS region derived from the zone.
        region: String,
    },
}

/// A PowerVS region and the VPC region it pairs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerVSRegion {
    /// PowerVS region name (e.g. `dal`).
    pub name: &'static str,
    /// Paired VPC region, if the geography offers VPC.
    pub vpc_region: Option<&'static str>,
    /// Zones inside the region.
    pub zones: &'static [&'static str],
}

/// Known PowerVS regions.
pub const POWERVS_REGIONS: &[PowerVSRegion] = &[
    PowerVSRegion {
        name: "che",
        vpc_region: None,
        zones: &["che01"],
    },
    PowerVSRegion {
        name: "dal",
        vpc_region: Some("us-south"),
        zones: &["dal10", "dal12"],
    },
    PowerVSRegion {
        name: "eu-de",
        vpc_region: Some("eu-de"),
        zones: &["eu-de-1", "eu-de-2"],
    },
    PowerVSRegion {
        name: "lon",
        vpc_region: Some("eu-gb"),
        zones: &["lon04", "lon06"],
    },
    PowerVSRegion {
        name: "mad",
        vpc_region: Some("eu-es"),
        zones: &["mad02", "mad04"],
    },
    PowerVSRegion {
        name: "mon",
        vpc_region: Some("ca-tor"),
        zones: &["mon01"],
    },
    PowerVSRegion {
        name: "osa",
        vpc_region: Some("jp-osa"),
        zones: &["osa21"],
    },
    PowerVSRegion {
        name: "sao",
        vpc_region: Some("br-sao"),
        zones: &["sao01", "sao04"],
    },
    PowerVSRegion {
        name: "syd",
        vpc_region: Some("au-syd"),
        zones: &["syd04", "syd05"],
    },
    PowerVSRegion {
        name: "tok",
        vpc_region: Some("jp-tok"),
        zones: &["tok04"],
    },
    PowerVSRegion {
        name: "tor",
        vpc_region: Some("ca-tor"),
        zones: &["tor01"],
    },
    PowerVSRegion {
        name: "us-east",
        vpc_region: Some("us-east"),
        zones: &["us-east"],
    },
    PowerVSRegion {
        name: "us-south",
        vpc_region: Some("us-south"),
        zones: &["us-south"],
    },
    PowerVSRegion {
        name: "wdc",
        vpc_region: Some("us-east"),
        zones: &["wdc06", "wdc07"],
    },
];

/// Where to create a transit gateway and whether it needs global routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitGatewayLocation {
    /// VPC region hosting the transit gateway.
    pub location: String,
    /// True when PowerVS and VPC sit in different geographies.
    pub global_routing: bool,
}

/// Look up a PowerVS region by name.
pub fn find_region(name: &str) -> Option<&'static PowerVSRegion> {
    POWERVS_REGIONS.iter().find(|r| r.name == name)
}

/// Derive the PowerVS region from a zone.
///
/// Datacenter zones drop their numeric suffix (`dal12` -> `dal`); hyphenated
/// zones drop a trailing `-<n>` (`eu-de-1` -> `eu-de`). Anything else is
/// already a region name.
pub fn region_from_zone(zone: &str) -> &str {
    if zone.contains('-') {
        match zone.rsplit_once('-') {
            Some((region, suffix))
                if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) =>
            {
                region
            }
            _ => zone,
        }
    } else {
        zone.trim_end_matches(|c: char| c.is_ascii_digit())
    }
}

/// VPC region paired with a PowerVS region.
pub fn vpc_region_for_powervs_region(region: &str) -> Result<&'static str, ResolutionError> {
    find_region(region)
        .and_then(|r| r.vpc_region)
        .ok_or_else(|| ResolutionError::MappingNotFound {
            region: region.to_string(),
        })
}

/// Whether a transit gateway between the PowerVS region and the VPC region
/// needs global routing. Unknown PowerVS regions always do.
pub fn is_global_routing_required(powervs_region: &str, vpc_region: &str) -> bool {
    match find_region(powervs_region).and_then(|r| r.vpc_region) {
        Some(paired) => paired != vpc_region,
        None => true,
    }
}

/// Resolve the transit gateway location and routing mode.
///
/// With an explicit VPC region the gateway goes there and routing follows the
/// geography check. Without one the location is derived from the PowerVS
/// zone, and routing stays local since both sides then share a geography.
pub fn transit_gateway_location_and_routing(
    powervs_zone: Option<&str>,
    vpc_region: Option<&str>,
) -> Result<TransitGatewayLocation, ResolutionError> {
    let zone = powervs_zone.ok_or(ResolutionError::MissingInput)?;
    let powervs_region = region_from_zone(zone);

    if let Some(vpc_region) = vpc_region {
        return Ok(TransitGatewayLocation {
            location: vpc_region.to_string(),
            global_routing: is_global_routing_required(powervs_region, vpc_region),
        });
    }

    let location = vpc_region_for_powervs_region(powervs_region)?;
    Ok(TransitGatewayLocation {
        location: location.to_string(),
        global_routing: false,
    })
}
