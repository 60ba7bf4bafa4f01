// Logging setup
//
// Android routes tracing events to logcat under the `CampusGuide` tag;
// every other target prints through the tracing-subscriber fmt layer.
// `log` records from dependencies are captured by the subscriber's log bridge.

use once_cell::sync::OnceCell;
use tracing::Level;

static LOGGING: OnceCell<bool> = OnceCell::new();

/// Logcat tag used on Android.
pub const ANDROID_LOG_TAG: &str = "CampusGuide";

/// Install the global subscriber once.
///
/// Returns `true` if this crate's subscriber is active. Later calls are
/// no-ops and return the outcome of the first call; a subscriber installed
/// by the host application makes this return `false`.
pub fn init_logging(level: Level) -> bool {
    *LOGGING.get_or_init(|| match install(level) {
        Ok(()) => true,
        Err(err) => {
            eprintln!("campus_guide_bridge: logging not installed: {}", err);
            false
        }
    })
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "android")] {
        fn install(level: Level) -> Result<(), String> {
            use tracing_subscriber::filter::LevelFilter;
            use tracing_subscriber::layer::SubscriberExt;
            use tracing_subscriber::util::SubscriberInitExt;

            let logcat = tracing_android::layer(ANDROID_LOG_TAG).map_err(|e| e.to_string())?;
            tracing_subscriber::registry()
                .with(LevelFilter::from_level(level))
                .with(logcat)
                .try_init()
                .map_err(|e| e.to_string())
        }
    } else {
        fn install(level: Level) -> Result<(), String> {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| e.to_string())
        }
    }
}
