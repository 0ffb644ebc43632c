use candle_core::Device;
use tracing::{debug, info, warn};

use super::error::EmbeddingError;

/// Picks the first usable accelerator compiled in (Metal, then CUDA), else CPU.
pub fn select_device() -> Result<Device, EmbeddingError> {
    let mut failures: Vec<String> = Vec::new();

    for (name, attempt) in accelerators() {
        match attempt() {
            Ok(device) => {
                info!(backend = name, "Using GPU acceleration for reranker");
                return Ok(device);
            }
            Err(e) => {
                warn!(backend = name, error = %e, "Accelerator unavailable");
                failures.push(format!("{name}: {e}"));
            }
        }
    }

    if failures.is_empty() {
        debug!("No GPU backend compiled, using CPU");
    } else {
        warn!(reason = %failures.join("; "), "Falling back to CPU device");
    }
    Ok(Device::Cpu)
}

type DeviceProbe = fn() -> candle_core::Result<Device>;

fn accelerators() -> Vec<(&'static str, DeviceProbe)> {
    #[allow(unused_mut)]
    let mut probes: Vec<(&'static str, DeviceProbe)> = Vec::new();
    #[cfg(feature = "metal")]
    probes.push(("metal", || Device::new_metal(0)));
    #[cfg(feature = "cuda")]
    probes.push(("cuda", || Device::new_cuda(0)));
    probes
}
