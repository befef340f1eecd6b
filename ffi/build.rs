//! Generates `include/common_api.h` from the `extern "C"` surface.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let crate_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };

    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("COMMON_API_H")
        .generate();

    // Best-effort: header generation failures only warn.
    match bindings {
        Ok(bindings) => {
            bindings.write_to_file(crate_dir.join("include").join("common_api.h"));
        }
        Err(e) => println!("cargo:warning=cbindgen skipped: {e}"),
    }
}
