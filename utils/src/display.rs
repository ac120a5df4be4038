//! Display helpers for terminal output.

/// Shorten an address to `ABCDEF...WXYZ` for display.
///
/// Strings of ten characters or fewer are returned unchanged.
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Micro-units per whole unit of the native currency.
pub const MICRO_UNITS: u64 = 1_000_000;

/// Render a micro-unit balance as whole units with two decimals, rounding
/// half up: `2_505_000` is `"2.51"`.
pub fn format_micro_units(micro: u64) -> String {
    let hundredths = micro / (MICRO_UNITS / 100) + u64::from(micro % (MICRO_UNITS / 100) >= 5_000);
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}
