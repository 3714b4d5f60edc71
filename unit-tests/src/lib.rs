//! Host-side tests for the hardware-independent firmware core.
#![cfg(test)]

mod support;

mod api;
mod credentials;
mod dhcp;
mod dns;
mod dto;
mod identity;
mod kvblock;
mod provisioning;
mod sntp;
mod timesync;
