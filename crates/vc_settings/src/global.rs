//! The process-wide registry.
//!
//! The registry is created on first use, either by [`global`] (an empty,
//! in-memory registry) or by [`install_global`]. In both cases every
//! `global_setting!` registration is then declared, in name order.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::settings::Settings;

static GLOBAL: OnceLock<Mutex<Settings>> = OnceLock::new();

/// Locks the process-wide registry, creating it on first use.
///
/// # Examples
///
/// ```
/// vc_settings::global().declare::<u64>("doc.frame-limit").unwrap();
/// *vc_settings::global().access::<u64>().unwrap() = 60;
/// assert_eq!(vc_settings::global().get::<u64>().unwrap(), &60);
/// ```
pub fn global() -> MutexGuard<'static, Settings> {
    GLOBAL
        .get_or_init(|| Mutex::new(bootstrap(Settings::new())))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Installs `settings` as the process-wide registry.
///
/// Must run before the first [`global`] call; otherwise the registry is
/// already initialized and `settings` is handed back.
pub fn install_global(settings: Settings) -> Result<(), Settings> {
    let mut pending = Some(settings);
    GLOBAL.get_or_init(|| {
        let settings = pending.take().unwrap_or_default();
        Mutex::new(bootstrap(settings))
    });
    match pending {
        Some(settings) => Err(settings),
        None => Ok(()),
    }
}

#[cfg(feature = "auto_register")]
fn bootstrap(mut settings: Settings) -> Settings {
    auto_register::declare_all(&mut settings);
    settings
}

#[cfg(not(feature = "auto_register"))]
#[inline(always)]
fn bootstrap(settings: Settings) -> Settings {
    settings
}

#[cfg(feature = "auto_register")]
pub(crate) mod auto_register {
    use crate::entry::Setting;
    use crate::error::SettingsError;
    use crate::settings::Settings;

    /// A setting declared into the global registry on first use.
    ///
    /// Submitted by `global_setting!`.
    pub struct GlobalSetting {
        name: &'static str,
        declare: fn(&mut Settings, &'static str) -> Result<(), SettingsError>,
    }

    impl GlobalSetting {
        #[doc(hidden)]
        pub const fn new<T: Setting>(name: &'static str) -> Self {
            Self {
                name,
                declare: declare_one::<T>,
            }
        }

        #[inline]
        pub fn name(&self) -> &'static str {
            self.name
        }
    }

    fn declare_one<T: Setting>(
        settings: &mut Settings,
        name: &'static str,
    ) -> Result<(), SettingsError> {
        settings.declare::<T>(name)
    }

    inventory::collect!(GlobalSetting);

    pub(crate) fn declare_all(settings: &mut Settings) {
        let mut registrations: Vec<&GlobalSetting> =
            inventory::iter::<GlobalSetting>.into_iter().collect();
        registrations.sort_by_key(|registration| registration.name);

        for registration in registrations {
            if let Err(error) = (registration.declare)(settings, registration.name) {
                log::error!("cannot declare global setting `{}`: {error}", registration.name);
            }
        }
    }
}

/// Declares `$ty` as `$name` in the process-wide registry.
///
/// The declaration happens when the registry is created, see [`global`].
///
/// ```
/// use vc_assembler::Assemble;
///
/// #[derive(Debug, Default, Clone, PartialEq, Assemble)]
/// struct Window {
///     width: u32,
///     height: u32,
/// }
///
/// vc_settings::global_setting!(Window, "doc.window");
///
/// let settings = vc_settings::global();
/// assert_eq!(settings.name_of::<Window>(), Some("doc.window"));
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! global_setting {
    ($ty:ty, $name:expr) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::GlobalSetting::new::<$ty>($name)
        }
    };
}
