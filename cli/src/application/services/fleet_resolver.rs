//! Application service: find (or create) the fleet a device should join.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//!
//! Resolution order:
//! 1. look up the device type in the catalog and collect every device type
//!    sharing its architecture;
//! 2. without a fleet name, offer the compatible fleets (or creation when
//!    there are none);
//! 3. with `owner/name`, match the slug exactly; with a bare name, match the
//!    display name; then narrow to compatible fleets. A single survivor is
//!    taken, several go back to the user, none is an error.
//!
//! The resolved fleet always ends up carrying the device's own type: the
//! physical device wins over the fleet record, and the record is updated.

use anyhow::{Context, Result};
use fleetjoin_common::Fleet;

use crate::application::ports::{FleetBackend, Interaction, ProgressReporter};
use crate::domain::error::ProvisionError;
use crate::domain::fleet::{
    FleetFilter, FleetRef, compatible_device_types, filter_compatible, find_manifest,
    selection_labels, validate_fleet_name,
};

/// Resolve the fleet for a device of type `device_type`.
///
/// # Errors
///
/// Returns [`ProvisionError::UnknownDeviceType`], [`ProvisionError::NoCompatibleFleet`],
/// [`ProvisionError::CreationDeclined`], a backend error, or a prompt error.
pub async fn resolve(
    backend: &impl FleetBackend,
    ui: &impl Interaction,
    reporter: &impl ProgressReporter,
    device_type: &str,
    fleet: Option<&str>,
) -> Result<Fleet> {
    let catalog = backend.device_types().await?;
    let manifest = find_manifest(&catalog, device_type)?;
    let compatible = compatible_device_types(&catalog, &manifest.arch);
    tracing::debug!(device_type, arch = %manifest.arch, ?compatible, "compatible device types");

    let mut resolved = match fleet.map(FleetRef::parse) {
        None => pick_compatible(backend, ui, reporter, device_type, &compatible).await?,
        Some(fleet_ref) => {
            pick_named(backend, ui, reporter, device_type, &compatible, &fleet_ref).await?
        }
    };

    resolved.architecture = Some(manifest.arch.clone());
    if resolved.device_type != device_type {
        tracing::warn!(
            fleet = %resolved.slug,
            recorded = %resolved.device_type,
            device_type,
            "overwriting fleet device type with the probed device type"
        );
        let other_arch = if compatible.contains(&resolved.device_type) {
            ""
        } else {
            " (a different architecture)"
        };
        reporter.warn(&format!(
            "fleet '{}' is recorded as '{}'{other_arch}; switching it to '{device_type}'",
            resolved.slug, resolved.device_type
        ));
        backend
            .update_fleet_device_type(resolved.id, device_type)
            .await
            .with_context(|| format!("updating device type of fleet '{}'", resolved.slug))?;
        device_type.clone_into(&mut resolved.device_type);
    }
    Ok(resolved)
}

async fn pick_compatible(
    backend: &impl FleetBackend,
    ui: &impl Interaction,
    reporter: &impl ProgressReporter,
    device_type: &str,
    compatible: &[String],
) -> Result<Fleet> {
    let fleets = backend
        .fleets(&FleetFilter::DeviceTypeIn(compatible.to_vec()))
        .await?;

    if fleets.is_empty() {
        let create = ui.confirm(
            "You have no fleets this device can join.\nWould you like to create one now?",
            true,
        )?;
        if !create {
            return Err(ProvisionError::CreationDeclined.into());
        }
        return create_fleet(backend, ui, reporter, device_type, None).await;
    }

    select_fleet(ui, fleets)
}

async fn pick_named(
    backend: &impl FleetBackend,
    ui: &impl Interaction,
    reporter: &impl ProgressReporter,
    device_type: &str,
    compatible: &[String],
    fleet_ref: &FleetRef,
) -> Result<Fleet> {
    let candidates = backend.fleets(&fleet_ref.filter()).await?;

    if candidates.is_empty() {
        let create = ui.confirm(
            &format!(
                "No fleet found with name \"{}\".\nWould you like to create it now?",
                fleet_ref.suggested_name()
            ),
            true,
        )?;
        if !create {
            return Err(ProvisionError::CreationDeclined.into());
        }
        return create_fleet(
            backend,
            ui,
            reporter,
            device_type,
            Some(fleet_ref.suggested_name()),
        )
        .await;
    }

    // Ambiguity is settled by the user among all candidates, not only the
    // compatible ones.
    let mut valid: Vec<Fleet> = filter_compatible(&candidates, compatible)
        .into_iter()
        .cloned()
        .collect();
    match valid.len() {
        0 => Err(ProvisionError::NoCompatibleFleet.into()),
        1 => Ok(valid.swap_remove(0)),
        _ => select_fleet(ui, candidates),
    }
}

fn select_fleet(ui: &impl Interaction, mut fleets: Vec<Fleet>) -> Result<Fleet> {
    let index = ui.select_one("Select fleet", &selection_labels(&fleets))?;
    anyhow::ensure!(index < fleets.len(), "fleet selection {index} is out of range");
    Ok(fleets.swap_remove(index))
}

/// Create a fleet for `device_type`, asking for a name until a free one is given.
///
/// A name is taken if the current user already owns a fleet with it, or an
/// un-namespaced fleet carries it.
///
/// # Errors
///
/// Returns [`ProvisionError::NotAuthenticated`] without an identity, or the
/// prompt error if the user cancels.
pub async fn create_fleet(
    backend: &impl FleetBackend,
    ui: &impl Interaction,
    reporter: &impl ProgressReporter,
    device_type: &str,
    suggested: Option<&str>,
) -> Result<Fleet> {
    let owner = backend
        .whoami()
        .await?
        .ok_or(ProvisionError::NotAuthenticated)?
        .to_lowercase();

    let validate = |name: &str| validate_fleet_name(name).map_err(|e| e.to_string());
    loop {
        let name = ui.ask_text("Enter a name for your new fleet:", suggested, &validate)?;
        let taken = backend
            .fleets(&FleetFilter::NameOwnedBy {
                name: name.clone(),
                owner: owner.clone(),
            })
            .await?;
        if taken.is_empty() {
            tracing::debug!(name, device_type, "creating fleet");
            return backend.create_fleet(&name, device_type).await;
        }
        reporter.warn(&ProvisionError::NameConflict(name).to_string());
    }
}
