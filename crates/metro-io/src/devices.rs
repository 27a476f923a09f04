//! Output device discovery via cpal.

use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};

/// Device name from its cpal description.
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Output device information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDevice {
    /// Name as the host reports it.
    pub name: String,
    /// Rate the device prefers, in Hz.
    pub default_sample_rate: u32,
    /// Default channel count.
    pub channels: u16,
    /// Whether this is the host's default output.
    pub is_default: bool,
}

fn describe(device: &Device, default_name: Option<&str>) -> Option<OutputDevice> {
    let name = device_name(device).ok()?;
    let (default_sample_rate, channels) = device
        .default_output_config()
        .map(|c| (c.sample_rate(), c.channels()))
        .unwrap_or((metro_core::SAMPLE_RATE, 2));
    Some(OutputDevice {
        is_default: default_name == Some(name.as_str()),
        name,
        default_sample_rate,
        channels,
    })
}

/// List every output device on the default host.
pub fn list_output_devices() -> Result<Vec<OutputDevice>> {
    let host = cpal::default_host();
    let default_name = host
        .default_output_device()
        .and_then(|d| device_name(&d).ok());
    let outputs = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;

    let devices: Vec<_> = outputs
        .filter_map(|d| describe(&d, default_name.as_deref()))
        .collect();
    tracing::debug!(count = devices.len(), host = host.id().name(), "listed output devices");
    Ok(devices)
}

/// The host's default output device, if there is one.
pub fn default_output_device() -> Option<OutputDevice> {
    let host = cpal::default_host();
    let device = host.default_output_device()?;
    let name = device_name(&device).ok()?;
    describe(&device, Some(name.as_str()))
}

/// Find an output device by case-insensitive substring, or the default.
pub(crate) fn find_output_device(host: &Host, name: Option<&str>) -> Result<Device> {
    match name {
        Some(search) => {
            let search_lower = search.to_lowercase();
            let devices = host
                .output_devices()
                .map_err(|e| Error::Stream(e.to_string()))?;

            for device in devices {
                if let Ok(dev_name) = device_name(&device)
                    && dev_name.to_lowercase().contains(search_lower.as_str())
                {
                    return Ok(device);
                }
            }
            Err(Error::DeviceNotFound(format!(
                "no output device matching '{}'",
                search
            )))
        }
        None => host.default_output_device().ok_or_else(|| {
            Error::AudioDeviceUnavailable(format!(
                "host '{}' has no default output",
                host.id().name()
            ))
        }),
    }
}
