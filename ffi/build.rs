use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let crate_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap());
    let include_dir = crate_dir.join("include");
    let config = cbindgen::Config::from_root_or_default(&crate_dir);
    match cbindgen::generate_with_config(&crate_dir, config) {
        Ok(bindings) => {
            if std::fs::create_dir_all(&include_dir).is_ok() {
                bindings.write_to_file(include_dir.join("reminder_ffi.h"));
            }
        }
        Err(err) => println!("cargo:warning=failed to generate C header: {err}"),
    }
}
