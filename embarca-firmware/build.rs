//! Build script for embarca-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Checks that the CYW43 firmware blobs are present

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Blobs pulled in with `include_bytes!` by the Wi-Fi bring-up
const CYW43_BLOBS: &[&str] = &["43439A0.bin", "43439A0_clm.bin"];

fn main() {
    setup_linker();
    check_cyw43_blobs();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Fail early with a readable message instead of an `include_bytes!` error
fn check_cyw43_blobs() {
    let dir = Path::new("cyw43-firmware");
    println!("cargo:rerun-if-changed=cyw43-firmware");

    let missing: Vec<&str> = CYW43_BLOBS
        .iter()
        .copied()
        .filter(|name| !dir.join(name).exists())
        .collect();

    if !missing.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: CYW43 firmware blobs not found                           ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ║                                                                  ║\n\
            ║  Copy them from embassy's cyw43-firmware directory into          ║\n\
            ║  embarca-firmware/cyw43-firmware/ and rebuild.                   ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            missing
                .iter()
                .map(|name| format!("║  • missing {:<55} ║", name))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}
