//! Fleet lookup rules: reference parsing, catalog filtering, query building,
//! and naming rules for new fleets.
//!
//! Pure functions only; the resolver service drives I/O around them.

use fleetjoin_common::{DeviceTypeManifest, Fleet};

use crate::domain::error::{ConfigError, ProvisionError};

const MIN_FLEET_NAME_LEN: usize = 4;
const MAX_FLEET_NAME_LEN: usize = 100;

/// How the user referred to a fleet on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetRef {
    /// `owner/name`: matches at most one fleet by slug.
    Slug {
        /// Lower-cased full slug.
        slug: String,
        /// Name part, offered as the default if the fleet must be created.
        name: String,
    },
    /// A bare display name; may match several fleets across owners.
    Name(String),
}

impl FleetRef {
    /// Parse a `--fleet` argument.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split('/');
        match (parts.next(), parts.next()) {
            (Some(_), Some(name)) => Self::Slug {
                slug: raw.to_lowercase(),
                name: name.to_owned(),
            },
            _ => Self::Name(raw.to_owned()),
        }
    }

    /// Name to suggest when offering to create the fleet.
    #[must_use]
    pub fn suggested_name(&self) -> &str {
        match self {
            Self::Slug { name, .. } | Self::Name(name) => name,
        }
    }

    /// Backend filter selecting candidate fleets for this reference.
    #[must_use]
    pub fn filter(&self) -> FleetFilter {
        match self {
            Self::Slug { slug, .. } => FleetFilter::Slug(slug.clone()),
            Self::Name(name) => FleetFilter::Name(name.clone()),
        }
    }
}

/// Queries the resolver issues against the fleet catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetFilter {
    /// Fleets whose device type is one of these slugs.
    DeviceTypeIn(Vec<String>),
    /// Exact slug match.
    Slug(String),
    /// Exact display-name match.
    Name(String),
    /// Display-name match among fleets owned by `owner` or not namespaced at all.
    NameOwnedBy { name: String, owner: String },
}

impl FleetFilter {
    /// Render as an OData `$filter` expression.
    #[must_use]
    pub fn to_odata(&self) -> String {
        match self {
            Self::DeviceTypeIn(types) => {
                let list = types.iter().map(|t| quote(t)).collect::<Vec<_>>().join(",");
                format!("device_type in ({list})")
            }
            Self::Slug(slug) => format!("slug eq {}", quote(slug)),
            Self::Name(name) => format!("app_name eq {}", quote(name)),
            Self::NameOwnedBy { name, owner } => format!(
                "app_name eq {} and (startswith(slug,{}) or not(contains(slug,'/')))",
                quote(name),
                quote(&format!("{owner}/"))
            ),
        }
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Find the manifest for `device_type` in the catalog.
///
/// # Errors
///
/// Returns [`ProvisionError::UnknownDeviceType`] if the slug is not listed.
pub fn find_manifest<'a>(
    catalog: &'a [DeviceTypeManifest],
    device_type: &str,
) -> Result<&'a DeviceTypeManifest, ProvisionError> {
    catalog
        .iter()
        .find(|m| m.slug == device_type)
        .ok_or_else(|| ProvisionError::UnknownDeviceType(device_type.to_owned()))
}

/// Slugs of every device type sharing `arch`, in catalog order.
#[must_use]
pub fn compatible_device_types(catalog: &[DeviceTypeManifest], arch: &str) -> Vec<String> {
    catalog
        .iter()
        .filter(|m| m.arch == arch)
        .map(|m| m.slug.clone())
        .collect()
}

/// Keep only fleets whose device type is in `compatible`.
#[must_use]
pub fn filter_compatible<'a>(fleets: &'a [Fleet], compatible: &[String]) -> Vec<&'a Fleet> {
    fleets
        .iter()
        .filter(|f| compatible.contains(&f.device_type))
        .collect()
}

/// Labels shown when the user has to pick a fleet.
#[must_use]
pub fn selection_labels(fleets: &[Fleet]) -> Vec<String> {
    fleets.iter().map(|f| f.slug.clone()).collect()
}

/// Check a proposed fleet name against the naming rules.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidFleetName`] describing the first rule broken.
pub fn validate_fleet_name(name: &str) -> Result<(), ConfigError> {
    let invalid = |reason| {
        Err(ConfigError::InvalidFleetName {
            name: name.to_owned(),
            reason,
        })
    };
    if name.trim().is_empty() {
        return invalid("must not be blank");
    }
    let len = name.chars().count();
    if len < MIN_FLEET_NAME_LEN {
        return invalid("must be at least 4 characters long");
    }
    if len > MAX_FLEET_NAME_LEN {
        return invalid("must be at most 100 characters long");
    }
    if name.contains('/') {
        return invalid("must not contain '/'");
    }
    Ok(())
}
