fn main() -> Result<(), Box<dyn std::error::Error>> {
    // protoc is not installed system-wide in this environment; point the
    // build at the vendored binary so the proto compilation can run.
    if std::env::var_os("PROTOC").is_none() {
        if let Ok(protoc) = protoc_bin_vendored::protoc_bin_path() {
            std::env::set_var("PROTOC", protoc);
        }
    }

    tonic_build::configure()
        .build_server(true) // server traits are only implemented by the mock services in tests/
        .build_client(true)
        .compile_protos(
            &[
                "proto/engram/v1/storage.proto",
                "proto/engram/v1/state.proto",
            ],
            &["proto"], // Include path
        )?;

    Ok(())
}
