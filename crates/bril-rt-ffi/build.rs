use std::env;
use std::fs;
use std::path::PathBuf;

const HEADER: &str = "rt.h";

fn main() {
    println!("cargo:rerun-if-changed=cbindgen.toml");
    println!("cargo:rerun-if-changed=src");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR unset"));
    let include_dir = crate_dir.join("include");
    fs::create_dir_all(&include_dir).expect("failed to create include/ directory");

    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml"))
        .expect("failed to read cbindgen.toml");

    let bindings = cbindgen::generate_with_config(&crate_dir, config)
        .expect("cbindgen failed to generate rt.h");
    bindings.write_to_file(include_dir.join(HEADER));
}
