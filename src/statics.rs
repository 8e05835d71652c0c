// Central place for defaults and user-facing strings.
// Keep these out of the store/session code to reduce duplication and make tweaks safer.

// Add-in identity and visibility scope used when none is configured.
pub const DEFAULT_ADD_IN_ID: &str = "a8sQ4W7bK5Uy6HOnUTAHlJw";
pub const DEFAULT_GROUP_ID: &str = "GroupCompanyId";

// Upper bound on devices fetched for the selector.
pub const DEFAULT_DEVICE_RESULTS_LIMIT: usize = 500;

// How long an error stays on screen after the most recent failure.
pub const DEFAULT_ERROR_VISIBLE_MS: u64 = 5_000;

// English strings (EN_ prefix to make future localization easier)
pub const EN_ERR_LOAD: &str = "Failed to load properties";
pub const EN_ERR_SAVE: &str = "Failed to save properties";
pub const EN_ERR_DEVICES: &str = "Failed to list devices";
