//! Logger setup.
//!
//! The library only talks to the `log` facade. Browser builds route it to the
//! devtools console and install a panic hook so a crash prints a readable
//! message instead of `unreachable executed`. Other builds leave logger choice
//! to the host binary.

/// Install the console logger and panic hook (browser builds only).
///
/// Safe to call more than once; later calls keep the first logger.
pub fn init() {
    #[cfg(feature = "hydrate")]
    {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Debug) {
            log::debug!("console logger already installed: {err}");
        }
    }
}
