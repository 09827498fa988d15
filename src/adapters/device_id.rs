//! Broker client identity derived from the factory MAC address.
//!
//! The client id is `roomlight-xxyyzz` (last three MAC bytes, lowercase
//! hex). It is stable across reboots, so the broker treats a reconnect as
//! the same session owner and replaces the previous connection.

use core::fmt::Write;

pub type ClientId = heapless::String<24>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: the buffer is exactly the 6 bytes the call writes.
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: a fixed, locally administered MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0x02, 0x00, 0x00, 0x5A, 0x1A, 0x01]
}

pub fn client_id(prefix: &str, mac: &MacAddress) -> ClientId {
    let mut id = ClientId::new();
    let _ = write!(id, "{}-{:02x}{:02x}{:02x}", prefix, mac[3], mac[4], mac[5]);
    id
}
