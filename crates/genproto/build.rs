use std::{fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = "src/gen";

    fs::create_dir_all(out_dir)?;

    let mut config = tonic_prost_build::Config::new();
    if std::env::var_os("PROTOC").is_none() {
        config.protoc_executable(protoc_bin_vendored::protoc_bin_path()?);
    }

    let well_known = protoc_bin_vendored::include_path()?;

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .out_dir(out_dir)
        .compile_with_config(
            config,
            &[
                PathBuf::from("../../proto/payment/payment.proto"),
                PathBuf::from("../../proto/order/order.proto"),
            ],
            &[PathBuf::from("../../proto"), well_known],
        )?;

    println!("cargo:rerun-if-changed=../../proto");

    Ok(())
}
