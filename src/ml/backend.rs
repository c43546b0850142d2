// Backend used by the CLI. The library itself is generic over
// any burn Backend; tests pin NdArray.

#[cfg(not(feature = "wgpu"))]
pub type CliBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type CliBackend = burn::backend::Wgpu;

pub type CliDevice = <CliBackend as burn::tensor::backend::Backend>::Device;

pub fn cli_device() -> CliDevice {
    let device = CliDevice::default();
    tracing::debug!("Using device: {:?}", device);
    device
}
