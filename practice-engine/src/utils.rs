use chrono::{DateTime, Utc};

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    //
    // For more details see
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Milliseconds from `from` until `to`, never negative. JS timers want an f64.
pub(crate) fn ms_until(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds().max(0) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_ms_until() {
        let now = DateTime::<Utc>::UNIX_EPOCH;
        assert_eq!(ms_until(now, now + Duration::milliseconds(250)), 250.0);
        assert_eq!(ms_until(now + Duration::seconds(1), now), 0.0);
    }
}
