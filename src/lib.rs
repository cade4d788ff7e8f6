// Library target shared by the binary, integration tests and benchmarks.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod calculator;
pub mod config;
pub mod event;
pub mod history;
pub mod logging;
pub mod oracle;
pub mod ui;

/// Locales bundled into the binary.
pub fn available_locales() -> Vec<&'static str> {
    rust_i18n::available_locales!()
}

/// Switch the UI language. `locale` should come from [`available_locales`].
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}
