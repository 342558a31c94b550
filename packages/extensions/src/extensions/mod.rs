// packages/extensions/src/extensions/mod.rs
//! Extensions shipped with the kit
//!
//! All of them are listed in [`EXTENSIONS`], which assigns their event-code
//! ranges. Append new extensions at the end so existing codes never move,
//! and bump an extension's version whenever its events change.

pub mod aws_wifi;

crate::extension_table! {
    pub const EXTENSIONS = [
        AWS_WIFI = ("aws_wifi", 1, 0, 0, 3),
    ];
}
