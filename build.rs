//! Build script for compiling the MAVSDK service definitions

const PROTOS: &[&str] = &[
    "proto/action/action.proto",
    "proto/calibration/calibration.proto",
    "proto/camera/camera.proto",
    "proto/core/core.proto",
    "proto/mission/mission.proto",
    "proto/param/param.proto",
    "proto/shell/shell.proto",
    "proto/telemetry/telemetry.proto",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Fall back to the bundled protoc when none is configured.
    if std::env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()
            .map_err(|e| format!("no bundled protoc for this host: {e}"))?;
        // SAFETY: build scripts run single-threaded.
        unsafe { std::env::set_var("PROTOC", protoc) };
    }

    // Client stubs only; the backend is a separate process.
    tonic_prost_build::configure()
        .build_server(false)
        .compile_protos(PROTOS, &["proto/"])?;

    for proto in PROTOS {
        println!("cargo:rerun-if-changed={proto}");
    }

    Ok(())
}
