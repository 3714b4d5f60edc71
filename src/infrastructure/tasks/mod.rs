mod dhcp_server;
mod dns_capture;
mod http_server;

pub use dhcp_server::dhcp_server_task;
pub use dns_capture::dns_capture_task;
pub use http_server::http_server_task;
