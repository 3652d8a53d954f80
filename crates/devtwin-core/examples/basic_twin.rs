//! Basic walk through a device twin's lifecycle

use devtwin_core::{patch_from_value, NewDevice, Runtime, TwinError};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = Runtime::default();

    println!("=== Device Twin Basic Example ===\n");

    // Register a thermostat; its twin starts at version 1
    let input = NewDevice::new("Living room", "thermostat", "ground floor");
    let (device, twin) = runtime.create_device(input)?;
    println!("Created device: {} (twin {})", device.id, twin.etag);

    // Unconditioned write
    let patch = patch_from_value(json!({"heating": {"setpoint": 21}}))?;
    let updated = runtime.patch_twin(&device.id, patch, None)?;
    println!(
        "\nPatched heating -> version {}, tag {}",
        updated.version(),
        updated.etag
    );

    // Conditioned write using the tag we just saw
    let tag = updated.etag.to_string();
    let patch = patch_from_value(json!({"mode": "auto"}))?;
    let updated = runtime.patch_twin(&device.id, patch, Some(&tag))?;
    println!(
        "Patched mode    -> version {}, tag {}",
        updated.version(),
        updated.etag
    );

    // Replaying the stale tag is refused
    let patch = patch_from_value(json!({"mode": "off"}))?;
    match runtime.patch_twin(&device.id, patch, Some(&tag)) {
        Err(TwinError::VersionConflict { current, .. }) => {
            println!("Stale tag {tag} rejected, current is {current}");
        }
        other => println!("Unexpected result: {other:?}"),
    }

    // Command sugar
    let ack = runtime.set_heating_setpoint(&device.id, 22.5)?;
    println!(
        "\nSetpoint command accepted at version {} (status: {})",
        ack.twin_version,
        ack.status_ref.location()
    );

    let current = runtime.get_twin(&device.id)?;
    let desired = serde_json::to_string_pretty(&current.twin.desired)?;
    println!("\nDesired state: {desired}");

    Ok(())
}
