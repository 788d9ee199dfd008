//! Application service: pick the device to work on.

use std::io::Write;

use anyhow::{Context, Result};

use crate::application::ports::DeviceScanner;
use crate::domain::device::parse_selected_device;
use crate::domain::error::ProvisionError;
use crate::domain::stream::{LineAction, LineFilter};

/// Return `explicit` unchanged, or run the local scan and return the device
/// the user selected there.
///
/// Scan output is copied to `passthrough` line by line, except for the
/// `==> Selected device:` sentinel, which is consumed. Reachability of an
/// explicit address is not checked here.
///
/// # Errors
///
/// Returns [`ProvisionError::NoDeviceSelected`] if the scan ends without a
/// selection, or the scanner's own error if it could not run.
pub async fn discover(
    scanner: &impl DeviceScanner,
    explicit: Option<&str>,
    passthrough: &mut impl Write,
) -> Result<String> {
    if let Some(address) = explicit {
        return Ok(address.to_owned());
    }

    let mut selected: Option<String> = None;
    let mut write_error: Option<std::io::Error> = None;
    {
        let mut filter = LineFilter::new(|line: &str| match parse_selected_device(line) {
            Some(address) => {
                selected = Some(address);
                LineAction::Suppress
            }
            None => LineAction::Forward,
        });

        scanner
            .scan(&mut |chunk| {
                let forward = filter.push(chunk);
                if let Err(e) = passthrough.write_all(&forward)
                    && write_error.is_none()
                {
                    write_error = Some(e);
                }
            })
            .await
            .context("scanning for local devices")?;

        let rest = filter.finish();
        passthrough.write_all(&rest)?;
    }
    if let Some(e) = write_error {
        return Err(e).context("forwarding scan output");
    }
    passthrough.flush()?;

    selected.ok_or_else(|| ProvisionError::NoDeviceSelected.into())
}
