//! Machine-wide configuration store access.
//!
//! On Windows the vendor records its installations in the registry under
//! `HKEY_LOCAL_MACHINE`. Other hosts have no such store and every lookup
//! comes back empty, so the store-based strategy simply never finds anything.

/// Hierarchical, read-only key/value store.
pub trait ConfigStore {
    /// Read the string value `value_name` under the key at `path`.
    ///
    /// Missing keys, missing values and values of the wrong type are all
    /// reported as `None`.
    fn read(&self, path: &str, value_name: &str) -> Option<String>;
}

impl<S: ConfigStore + ?Sized> ConfigStore for &S {
    fn read(&self, path: &str, value_name: &str) -> Option<String> {
        (**self).read(path, value_name)
    }
}

/// The host's machine-wide store (`HKEY_LOCAL_MACHINE` on Windows).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemStore;

#[cfg(windows)]
impl ConfigStore for SystemStore {
    fn read(&self, path: &str, value_name: &str) -> Option<String> {
        use winreg::enums::HKEY_LOCAL_MACHINE;
        use winreg::RegKey;

        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        match hklm
            .open_subkey(path)
            .and_then(|key| key.get_value::<String, _>(value_name))
        {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Registry value {}\\{} not readable: {}", path, value_name, e);
                None
            }
        }
    }
}

#[cfg(not(windows))]
impl ConfigStore for SystemStore {
    fn read(&self, _path: &str, _value_name: &str) -> Option<String> {
        None
    }
}
