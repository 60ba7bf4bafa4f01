// Campus Guide Native Bridge
// Exposes native configuration values to the Flutter shell over method channels

// Module declarations
pub mod api;
pub mod bridge;
pub mod channel;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod provider;

// Re-exports for convenience
pub use api::*;

/// JNI_OnLoad is called when the native library is loaded by Android
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn JNI_OnLoad(
    _vm: jni::JavaVM,
    _reserved: *mut std::ffi::c_void,
) -> jni::sys::jint {
    logging::init_logging(tracing::Level::INFO);
    tracing::info!("JNI_OnLoad called - campus guide bridge loaded");

    // Return JNI version
    jni::sys::JNI_VERSION_1_6
}

/// Called from `MainActivity.configureFlutterEngine` with the application
/// context so PackageManager lookups work from any thread.
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn Java_com_example_concordia_1campus_1guide_MainActivity_nativeInit<'local>(
    mut env: jni::JNIEnv<'local>,
    _activity: jni::objects::JObject<'local>,
    context: jni::objects::JObject<'local>,
) {
    if let Err(err) = metadata::register_android_context(&mut env, &context) {
        tracing::error!("Failed to register Android context: {}", err);
    }
}
