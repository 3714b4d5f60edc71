use chrono::Utc;

fn main() {
    // Timestamp build version, reported at boot over serial
    let version = Utc::now().format("%Y.%m.%d-%H%M%S").to_string();
    println!("cargo:rustc-env=BUILD_VERSION={version}");
    println!("cargo:rerun-if-changed=build.rs");
}
