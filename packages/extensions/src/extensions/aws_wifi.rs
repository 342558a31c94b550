// packages/extensions/src/extensions/aws_wifi.rs
//! Trace extension for the Wi-Fi driver API
//!
//! Traces `on`, `off` and `connect_ap`. The viewer-side schema is
//! `aws_wifi-v1.0.0.xml`; it assumes a return code of 0 means OK and any
//! other value a timeout or error.
//!
//! ```
//! use recorder_extensions::extensions::aws_wifi::{self, NetworkParams, WifiApi, WifiReturnCode, WifiSecurity};
//! use recorder_extensions::interception::Interceptable;
//! use recorder_extensions::sink::RingRecorder;
//!
//! struct Radio;
//! impl Interceptable for Radio {}
//! impl WifiApi for Radio {
//!     fn on(&self) -> WifiReturnCode { WifiReturnCode::Success }
//!     fn off(&self) -> WifiReturnCode { WifiReturnCode::Success }
//!     fn connect_ap(&self, _: &NetworkParams) -> WifiReturnCode { WifiReturnCode::Timeout }
//! }
//!
//! fn join<W: WifiApi>(wifi: &W) -> WifiReturnCode {
//!     wifi.on();
//!     wifi.connect_ap(&NetworkParams::new("home-ap", WifiSecurity::Wpa2))
//! }
//!
//! let recorder = RingRecorder::with_capacity(16);
//! let wifi = aws_wifi::instrument(Radio, &recorder);
//! assert_eq!(join(&wifi), WifiReturnCode::Timeout);
//! assert_eq!(recorder.drain().len(), 2);
//! ```

use crate::extension::descriptor::{EventCode, ExtensionDescriptor};
use crate::extensions::AWS_WIFI;
use crate::interception::interceptor::TraceValue;
use crate::interception::redirect::{Interceptable, Traced};
use crate::sink::EventSink;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Wrapped `on`
pub const EVENTCODE_WIFI_ON: EventCode = AWS_WIFI.code_at(0);

/// Wrapped `off`
pub const EVENTCODE_WIFI_OFF: EventCode = AWS_WIFI.code_at(1);

/// Wrapped `connect_ap`
pub const EVENTCODE_WIFI_CONNECT_AP: EventCode = AWS_WIFI.code_at(2);

/// Descriptor of this extension
pub const fn descriptor() -> ExtensionDescriptor {
    AWS_WIFI
}

/// Driver status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum WifiReturnCode {
    Success = 0,
    Failure = 1,
    Timeout = 2,
    NotSupported = 3,
}

impl WifiReturnCode {
    pub fn is_success(self) -> bool {
        self == WifiReturnCode::Success
    }

    /// Inverse of the recorded field, for reading traces back
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Success),
            1 => Some(Self::Failure),
            2 => Some(Self::Timeout),
            3 => Some(Self::NotSupported),
            _ => None,
        }
    }
}

impl TraceValue for WifiReturnCode {
    #[inline]
    fn trace_value(&self) -> u32 {
        *self as u32
    }
}

/// Network security modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum WifiSecurity {
    Open = 0,
    Wep = 1,
    Wpa = 2,
    Wpa2 = 3,
    Wpa2Enterprise = 4,
    NotSupported = 5,
}

impl WifiSecurity {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Open),
            1 => Some(Self::Wep),
            2 => Some(Self::Wpa),
            3 => Some(Self::Wpa2),
            4 => Some(Self::Wpa2Enterprise),
            5 => Some(Self::NotSupported),
            _ => None,
        }
    }
}

impl TraceValue for WifiSecurity {
    #[inline]
    fn trace_value(&self) -> u32 {
        *self as u32
    }
}

/// Parameters of an access point connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub ssid: String,
    pub password: String,
    pub security: WifiSecurity,
    pub channel: i8,
}

impl NetworkParams {
    pub fn new(ssid: impl Into<String>, security: WifiSecurity) -> Self {
        Self {
            ssid: ssid.into(),
            password: String::new(),
            security,
            channel: 0,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_channel(mut self, channel: i8) -> Self {
        self.channel = channel;
        self
    }
}

/// The traced subset of the Wi-Fi driver API
pub trait WifiApi: Interceptable {
    /// Turn the radio on
    fn on(&self) -> WifiReturnCode;

    /// Turn the radio off
    fn off(&self) -> WifiReturnCode;

    /// Connect to an access point
    fn connect_ap(&self, params: &NetworkParams) -> WifiReturnCode;
}

impl<W: WifiApi + ?Sized> WifiApi for &W {
    fn on(&self) -> WifiReturnCode {
        (**self).on()
    }

    fn off(&self) -> WifiReturnCode {
        (**self).off()
    }

    fn connect_ap(&self, params: &NetworkParams) -> WifiReturnCode {
        (**self).connect_ap(params)
    }
}

impl<W: WifiApi + ?Sized> WifiApi for Arc<W> {
    fn on(&self) -> WifiReturnCode {
        (**self).on()
    }

    fn off(&self) -> WifiReturnCode {
        (**self).off()
    }

    fn connect_ap(&self, params: &NetworkParams) -> WifiReturnCode {
        (**self).connect_ap(params)
    }
}

// Trace wrappers
impl<A: WifiApi, S: EventSink> WifiApi for Traced<A, S> {
    fn on(&self) -> WifiReturnCode {
        self.call(EVENTCODE_WIFI_ON, |wifi| wifi.on())
    }

    fn off(&self) -> WifiReturnCode {
        self.call(EVENTCODE_WIFI_OFF, |wifi| wifi.off())
    }

    fn connect_ap(&self, params: &NetworkParams) -> WifiReturnCode {
        self.call_with_string(
            EVENTCODE_WIFI_CONNECT_AP,
            &params.ssid,
            &[params.security.trace_value()],
            |wifi| wifi.connect_ap(params),
        )
    }
}

/// Redirect a driver's calls through the trace wrappers
pub fn instrument<A: WifiApi, S: EventSink>(driver: A, sink: S) -> Traced<A, S> {
    Traced::redirect(driver, sink)
}
