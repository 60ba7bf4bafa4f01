// Android PackageManager metadata source
//
// Reads `<meta-data>` entries from the installed package's ApplicationInfo
// through JNI. The Activity must call `nativeInit(context)` before the first
// lookup; that export is the only supported registration path. A context that
// some other library placed in ndk-context is not picked up on its own, and
// lookups report `RegistryUnavailable` until `nativeInit` has run.

use std::ffi::c_void;
use std::sync::atomic::{AtomicBool, Ordering};

use jni::objects::{JObject, JString, JValue};
use jni::JNIEnv;
use tracing::{debug, info, warn};

use crate::error::LookupError;

use super::MetadataSource;

/// `PackageManager.GET_META_DATA`
const GET_META_DATA: i32 = 0x0000_0080;

/// Local references created by one `read_meta_string` call.
const LOCAL_REFS_PER_LOOKUP: i32 = 6;

/// Capacity of the local frame wrapped around each lookup.
const LOCAL_FRAME_CAPACITY: i32 = 16;

static CONTEXT_REGISTERED: AtomicBool = AtomicBool::new(false);

/// Register the application context with ndk-context.
///
/// Called from `MainActivity.nativeInit`. Subsequent calls are ignored.
///
/// ndk-context asserts that it is initialized at most once per process. If
/// another library already initialized it, that assert fires here. It is
/// caught so it cannot unwind out of the `extern "system"` export, which would
/// abort the process. A warning is logged and lookups go through whatever
/// context ndk-context holds afterwards.
pub fn register_android_context(env: &mut JNIEnv, context: &JObject) -> jni::errors::Result<()> {
    if CONTEXT_REGISTERED.load(Ordering::SeqCst) {
        debug!("Android context already registered");
        return Ok(());
    }

    let vm = env.get_java_vm()?;
    let global = env.new_global_ref(context)?;
    let context_ptr = global.as_obj().as_raw();

    if CONTEXT_REGISTERED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Ok(());
    }

    // ndk-context may hold this pointer even when its assert fires, so the
    // global reference is leaked in both cases.
    std::mem::forget(global);

    if initialize_ndk_context(vm.get_java_vm_pointer().cast(), context_ptr.cast()) {
        info!("Android context registered for metadata lookups");
    } else {
        warn!("ndk-context was already initialized by another library");
    }
    Ok(())
}

/// Returns `false` when ndk-context had already been initialized.
fn initialize_ndk_context(vm: *mut c_void, context: *mut c_void) -> bool {
    std::panic::catch_unwind(|| {
        // SAFETY: ndk-context only stores the pointers. Callers pass a live
        // JavaVM and a context pinned by a leaked global reference.
        unsafe { ndk_context::initialize_android_context(vm, context) }
    })
    .is_ok()
}

/// Metadata source backed by the live Android package registry.
#[derive(Debug, Default)]
pub struct AndroidPackageMetadata {
    _unit: (),
}

impl AndroidPackageMetadata {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataSource for AndroidPackageMetadata {
    fn get_string(&self, key: &str) -> Result<Option<String>, LookupError> {
        if !CONTEXT_REGISTERED.load(Ordering::SeqCst) {
            return Err(LookupError::RegistryUnavailable {
                reason: "Android context not registered".to_string(),
            });
        }

        let ctx = ndk_context::android_context();
        if ctx.context().is_null() {
            return Err(LookupError::RegistryUnavailable {
                reason: "Android context is null".to_string(),
            });
        }

        // SAFETY: `ctx.vm()` is the JavaVM pointer registered above and stays
        // valid for the lifetime of the process.
        let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }.map_err(jni_err)?;
        let mut env = vm.attach_current_thread().map_err(jni_err)?;

        // SAFETY: the registered context is a global reference leaked in
        // `register_android_context`.
        let context = unsafe { JObject::from_raw(ctx.context().cast()) };

        // The Flutter UI thread stays attached for the life of the process, so
        // its JNI frame never pops. Local references must be freed per lookup
        // or the local reference table overflows.
        env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| {
            let result = read_meta_string(env, &context, key);
            if result.is_err() {
                // A pending Java exception would poison the next JNI call on this thread.
                let _ = env.exception_clear();
            }
            result
        })
        .map_err(jni_err)
    }
}

fn read_meta_string(
    env: &mut JNIEnv,
    context: &JObject,
    key: &str,
) -> jni::errors::Result<Option<String>> {
    let package_name = env
        .call_method(context, "getPackageName", "()Ljava/lang/String;", &[])?
        .l()?;
    let package_manager = env
        .call_method(
            context,
            "getPackageManager",
            "()Landroid/content/pm/PackageManager;",
            &[],
        )?
        .l()?;
    let app_info = env
        .call_method(
            &package_manager,
            "getApplicationInfo",
            "(Ljava/lang/String;I)Landroid/content/pm/ApplicationInfo;",
            &[JValue::Object(&package_name), JValue::Int(GET_META_DATA)],
        )?
        .l()?;

    let bundle = env
        .get_field(&app_info, "metaData", "Landroid/os/Bundle;")?
        .l()?;
    if bundle.is_null() {
        return Ok(None);
    }

    let jkey = env.new_string(key)?;
    let value = env
        .call_method(
            &bundle,
            "getString",
            "(Ljava/lang/String;)Ljava/lang/String;",
            &[JValue::Object(&jkey)],
        )?
        .l()?;
    if value.is_null() {
        return Ok(None);
    }

    let value = JString::from(value);
    let value: String = env.get_string(&value)?.into();
    Ok(Some(value))
}

fn jni_err(err: jni::errors::Error) -> LookupError {
    LookupError::RegistryUnavailable {
        reason: format!("JNI call failed: {}", err),
    }
}
