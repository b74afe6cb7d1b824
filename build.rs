fn main() {
    // Stamped into `cellbox --version`; only refreshed when this script changes
    println!("cargo:rerun-if-changed=build.rs");
    let date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=BUILD_DATE={}", date);
}
