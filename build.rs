use std::env;
use std::path::PathBuf;

fn main() {
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=tessdata/");

    if target_os == "windows" {
        println!("cargo:rustc-link-search=native=C:/Program Files/Tesseract-OCR");
    }

    let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") else {
        return;
    };

    let tessdata_src = PathBuf::from(manifest_dir).join("tessdata");
    if tessdata_src.exists() {
        println!("cargo:warning=Found tessdata directory for bundling");
        println!(
            "cargo:rustc-env=BUNDLED_TESSDATA_DIR={}",
            tessdata_src.display()
        );
    } else {
        println!("cargo:warning=No tessdata directory found. Tesseract will use system data.");
    }
}
