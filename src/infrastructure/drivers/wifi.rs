//! Production [`Platform`] adapter over the ESP32 radio stack.
//!
//! The radio is initialized once; the boot sequence then either brings up the
//! setup access point (static 10.100.1.1/24, DHCP + DNS capture tasks) or
//! joins a stored network as a client with a bounded timeout.

use core::cell::Cell;
use core::fmt::Write as _;
use core::str::FromStr;

use bin_monitor_core::error::PlatformError;
use bin_monitor_core::ports::Platform;
use embassy_executor::Spawner;
use embassy_net::{
    DhcpConfig,
    Ipv4Cidr,
    Runner,
    Stack,
    StackResources,
    StaticConfigV4,
};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Timer, with_timeout};
use esp_hal::peripherals::WIFI;
#[cfg(feature = "log")]
use esp_println::println;
use esp_radio::wifi::{
    AccessPointConfig,
    AuthMethod,
    ClientConfig,
    Config,
    ModeConfig,
    WifiController,
    WifiDevice,
};
use heapless::String;
use static_cell::make_static;

use super::random::get_seed;
use crate::config;
use crate::infrastructure::tasks::{dhcp_server_task, dns_capture_task};

const MAX_CONNECTIONS: usize = 6;

/// Bound for AP bring-up; the radio either forms the network quickly or not
/// at all
const AP_START_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle to the stack of whichever network mode the boot sequence formed.
/// Written once by the platform adapter, read by the SNTP client and the
/// entry point.
static ACTIVE_STACK: Mutex<CriticalSectionRawMutex, Cell<Option<Stack<'static>>>> =
    Mutex::new(Cell::new(None));

pub fn active_stack() -> Option<Stack<'static>> {
    ACTIVE_STACK.lock(Cell::get)
}

fn set_active_stack(stack: Stack<'static>) {
    ACTIVE_STACK.lock(|cell| cell.set(Some(stack)));
}

pub struct EspPlatform {
    spawner: Spawner,
    unique_id: u64,
    controller: Option<WifiController<'static>>,
    ap_device: Option<WifiDevice<'static>>,
    sta_device: Option<WifiDevice<'static>>,
    stack: Option<Stack<'static>>,
}

impl EspPlatform {
    /// Initialize the radio once and keep both interface devices until the
    /// boot sequence decides which mode to form.
    pub fn new(spawner: Spawner, wifi_device: WIFI<'static>) -> Self {
        let esp_radio_ctrl = &*make_static!(esp_radio::init().unwrap());
        let (controller, interfaces) =
            esp_radio::wifi::new(esp_radio_ctrl, wifi_device, Config::default())
                .unwrap();

        let mac = esp_hal::efuse::Efuse::mac_address();
        let mut id_bytes = [0u8; 8];
        id_bytes[..6].copy_from_slice(&mac);

        Self {
            spawner,
            unique_id: u64::from_le_bytes(id_bytes),
            controller: Some(controller),
            ap_device: Some(interfaces.ap),
            sta_device: Some(interfaces.sta),
            stack: None,
        }
    }
}

impl Platform for EspPlatform {
    fn unique_id(&self) -> u64 {
        self.unique_id
    }

    async fn start_access_point(
        &mut self,
        ssid: &str,
        password: &str,
    ) -> Result<(), PlatformError> {
        let controller = self.controller.as_mut().ok_or(PlatformError::Hardware)?;

        let ap_config = AccessPointConfig::default()
            .with_ssid(ssid.into())
            .with_password(password.into())
            .with_auth_method(AuthMethod::Wpa2Personal);
        controller
            .set_config(&ModeConfig::AccessPoint(ap_config))
            .map_err(|_| PlatformError::Hardware)?;
        controller
            .start_async()
            .await
            .map_err(|_| PlatformError::Hardware)?;

        #[cfg(feature = "log")]
        println!("wifi: AP '{}' started", ssid);

        let device = self.ap_device.take().ok_or(PlatformError::Hardware)?;
        let static_config = StaticConfigV4 {
            address: Ipv4Cidr::new(config::AP_ADDRESS, config::AP_PREFIX_LEN),
            gateway: Some(config::AP_ADDRESS),
            dns_servers: heapless::Vec::default(),
        };
        let net_config = embassy_net::Config::ipv4_static(static_config);

        let resources = make_static!(StackResources::<MAX_CONNECTIONS>::new());
        let (stack, runner) =
            embassy_net::new(device, net_config, resources, get_seed());

        self.spawner.spawn(ap_runner_task(runner)).ok();

        with_timeout(AP_START_TIMEOUT, wait_for_link(stack))
            .await
            .map_err(|_| PlatformError::Hardware)?;
        // Give the link some extra settle time before serving clients
        Timer::after(Duration::from_millis(100)).await;

        // Every client lookup on the setup subnet must land on the portal
        self.spawner
            .spawn(dhcp_server_task(stack, config::AP_ADDRESS))
            .ok();
        self.spawner
            .spawn(dns_capture_task(stack, config::AP_ADDRESS))
            .ok();

        self.stack = Some(stack);
        set_active_stack(stack);
        Ok(())
    }

    async fn join_network(
        &mut self,
        ssid: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<(), PlatformError> {
        let joined = with_timeout(timeout, async {
            let controller =
                self.controller.as_mut().ok_or(PlatformError::Hardware)?;

            let client_config = if password.is_empty() {
                ClientConfig::default()
                    .with_ssid(ssid.into())
                    .with_auth_method(AuthMethod::None)
            } else {
                ClientConfig::default()
                    .with_ssid(ssid.into())
                    .with_password(password.into())
            };
            controller
                .set_config(&ModeConfig::Client(client_config))
                .map_err(|_| PlatformError::Hardware)?;
            controller
                .start_async()
                .await
                .map_err(|_| PlatformError::Hardware)?;
            controller
                .connect_async()
                .await
                .map_err(|_| PlatformError::Hardware)?;

            let device = self.sta_device.take().ok_or(PlatformError::Hardware)?;
            let mut dhcp_config = DhcpConfig::default();
            dhcp_config.hostname =
                Some(String::from_str(config::HOSTNAME).unwrap_or_default());
            let net_config = embassy_net::Config::dhcpv4(dhcp_config);

            let resources = make_static!(StackResources::<MAX_CONNECTIONS>::new());
            let (stack, runner) =
                embassy_net::new(device, net_config, resources, get_seed());

            self.spawner.spawn(sta_runner_task(runner)).ok();

            wait_for_link(stack).await;
            wait_for_ip(stack).await;

            self.stack = Some(stack);
            set_active_stack(stack);
            Ok(())
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(_) => Err(PlatformError::Timeout),
        }
    }

    fn local_address(&self) -> Option<String<16>> {
        let config = self.stack.and_then(|stack| stack.config_v4())?;
        let mut address = String::new();
        write!(address, "{}", config.address.address()).ok()?;
        Some(address)
    }
}

/// Background task for running the AP-mode network stack
#[embassy_executor::task]
async fn ap_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

/// Background task for running the client-mode network stack
#[embassy_executor::task]
async fn sta_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

/// Wait for the network link to become active
async fn wait_for_link(stack: Stack<'_>) {
    loop {
        if stack.is_link_up() {
            break;
        }
        Timer::after(Duration::from_millis(100)).await;
    }
}

/// Wait for the network stack to obtain an IPv4 address via DHCP
async fn wait_for_ip(stack: Stack<'_>) -> StaticConfigV4 {
    loop {
        if let Some(config) = stack.config_v4() {
            return config;
        }
        Timer::after(Duration::from_millis(100)).await;
    }
}
