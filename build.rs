fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=protos/counter.proto");
    println!("cargo:rerun-if-env-changed=COUNTER_REGEN_PROTOS");

    // the generated stubs are checked in under src/protos,
    // regenerating them needs protoc on the PATH
    if std::env::var_os("COUNTER_REGEN_PROTOS").is_none() {
        return Ok(());
    }

    tonic_build::configure()
        .out_dir("src/protos")
        .compile(&["protos/counter.proto"], &["protos"])?;

    Ok(())
}
