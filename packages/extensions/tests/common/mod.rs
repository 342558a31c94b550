//! Shared fixtures for the integration tests

use parking_lot::Mutex;
use recorder_extensions::extensions::aws_wifi::{NetworkParams, WifiApi, WifiReturnCode};
use recorder_extensions::interception::Interceptable;

/// Deterministic driver: results depend only on the arguments and the
/// power state, and every call is logged so side effects can be compared.
#[derive(Default)]
pub struct FakeDriver {
    powered: Mutex<bool>,
    log: Mutex<Vec<String>>,
}

impl FakeDriver {
    pub fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    fn note(&self, entry: String) {
        self.log.lock().push(entry);
    }
}

impl Interceptable for FakeDriver {}

impl WifiApi for FakeDriver {
    fn on(&self) -> WifiReturnCode {
        let mut powered = self.powered.lock();
        let ret = if *powered {
            WifiReturnCode::Failure
        } else {
            WifiReturnCode::Success
        };
        *powered = true;
        drop(powered);
        self.note(format!("on -> {:?}", ret));
        ret
    }

    fn off(&self) -> WifiReturnCode {
        *self.powered.lock() = false;
        self.note("off".to_string());
        WifiReturnCode::Success
    }

    fn connect_ap(&self, params: &NetworkParams) -> WifiReturnCode {
        let ret = if !*self.powered.lock() {
            WifiReturnCode::Failure
        } else if params.ssid.is_empty() {
            WifiReturnCode::NotSupported
        } else if params.ssid.len() % 2 == 0 {
            WifiReturnCode::Success
        } else {
            WifiReturnCode::Timeout
        };
        self.note(format!("connect {} {:?} -> {:?}", params.ssid, params.security, ret));
        ret
    }
}
