// Build script for flutter_rust_bridge code generation
//
// Dart bindings are produced by the CLI tool rather than from here:
//   flutter_rust_bridge_codegen generate
//
// The generated Dart file is lib/bridge/api.dart in the Flutter project.

fn main() {
    // Regenerate bindings whenever the FFI surface changes
    println!("cargo:rerun-if-changed=src/api.rs");
}
