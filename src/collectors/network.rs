//! Connection hints and storage/device availability collectors.

use crate::env::Environment;
use crate::signal::{format_number, SignalValue};

pub const NETWORK_NOT_AVAILABLE: &str = "Not available";
pub const MEDIA_DEVICES_UNAVAILABLE: &str = "Unavailable";

/// Experimental connection-information API, folded into one display string.
pub fn connection_signal(env: &dyn Environment) -> SignalValue {
    match env.connection() {
        Some(c) => SignalValue::str(format!(
            "{} ({} Mbps) - RTT: {} ms - Save Data: {}",
            c.effective_type,
            format_number(c.downlink),
            format_number(c.rtt),
            c.save_data
        )),
        None => SignalValue::str(NETWORK_NOT_AVAILABLE),
    }
}

pub fn cookies_enabled(env: &dyn Environment) -> SignalValue {
    SignalValue::Bool(env.cookies_enabled().unwrap_or(false))
}

pub fn local_storage_available(env: &dyn Environment) -> SignalValue {
    SignalValue::Bool(env.local_storage_writable())
}

/// Device count, with zero folded into the unavailable sentinel: an empty
/// enumeration is indistinguishable from a denied one in the signal.
pub async fn media_devices_signal(env: &dyn Environment) -> SignalValue {
    match env.media_device_count().await {
        Some(count) if count > 0 => SignalValue::Num(count as f64),
        _ => SignalValue::str(MEDIA_DEVICES_UNAVAILABLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ConnectionInfo, FakeEnv};
    use futures::executor::block_on;

    #[test]
    fn connection_string_has_the_fixed_shape() {
        let mut env = FakeEnv::default();
        env.connection = Some(ConnectionInfo {
            effective_type: "4g".to_string(),
            downlink: 10.0,
            rtt: 50.0,
            save_data: false,
        });
        assert_eq!(
            connection_signal(&env),
            SignalValue::str("4g (10 Mbps) - RTT: 50 ms - Save Data: false")
        );
    }

    #[test]
    fn absent_connection_api_reports_not_available() {
        let mut env = FakeEnv::default();
        env.connection = None;
        assert_eq!(
            connection_signal(&env),
            SignalValue::str(NETWORK_NOT_AVAILABLE)
        );
    }

    #[test]
    fn media_devices_fall_back_to_unavailable() {
        let mut env = FakeEnv::default();
        env.media_device_count = None;
        assert_eq!(
            block_on(media_devices_signal(&env)),
            SignalValue::str(MEDIA_DEVICES_UNAVAILABLE)
        );
        env.media_device_count = Some(4);
        assert_eq!(block_on(media_devices_signal(&env)), SignalValue::Num(4.0));
    }

    #[test]
    fn zero_devices_count_as_unavailable() {
        let mut env = FakeEnv::default();
        env.media_device_count = Some(0);
        assert_eq!(
            block_on(media_devices_signal(&env)),
            SignalValue::str(MEDIA_DEVICES_UNAVAILABLE)
        );
    }
}
