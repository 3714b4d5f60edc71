//! Configuration API server task.
//!
//! Serves the same controller in both network modes: over the setup access
//! point during provisioning and over the joined network afterwards.

use embassy_net::Stack;
#[cfg(feature = "log")]
use esp_println::println;

use crate::config;
use crate::controllers::ConfigHttpController;
use crate::core::net::http::HttpServer;

const RX_BUFFER_SIZE: usize = 2048;
const TX_BUFFER_SIZE: usize = 2048;

#[embassy_executor::task]
pub async fn http_server_task(stack: Stack<'static>, controller: ConfigHttpController) {
    #[cfg(feature = "log")]
    println!("http_server: listening on port {}", config::HTTP_PORT);

    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];

    let server = HttpServer::new(&controller);
    if let Err(_error) = server
        .listen_and_serve(stack, config::HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await
    {
        #[cfg(feature = "log")]
        println!("http_server: stopped: {:?}", _error);
    }
}
