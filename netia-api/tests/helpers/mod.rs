//! Shared helpers for driving a client against a mock device

#![allow(dead_code)]

use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use mockito::{Matcher, Mock, Server};
use netia_api::{ClientConfig, NetiaClient};

/// Client pointed at the mock server, with short timeouts and logos served
/// from the same server under `/logo/`
pub fn client_for(server: &Server) -> NetiaClient {
    let address = server.host_with_port();
    let (host, port) = address
        .rsplit_once(':')
        .expect("mock server address has a port");

    let mut config = ClientConfig::new(host, port.parse().expect("numeric port"));
    config.request_timeout = Duration::from_secs(2);
    config.logo_timeout = Duration::from_secs(2);
    config.logo_base_url = format!("{}/logo/", server.url());
    NetiaClient::new(config)
}

/// Client pointed at a port nothing listens on
pub fn unreachable_client() -> NetiaClient {
    let mut config = ClientConfig::new("127.0.0.1", 1);
    config.request_timeout = Duration::from_secs(1);
    NetiaClient::new(config)
}

/// Client pointed at a device that accepts connections and never answers
pub fn silent_client() -> NetiaClient {
    let mut config = ClientConfig::new("127.0.0.1", silent_port());
    config.request_timeout = Duration::from_secs(1);
    NetiaClient::new(config)
}

/// Port of a listener that holds every connection open without replying
pub fn silent_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let port = listener.local_addr().expect("local address").port();
    thread::spawn(move || {
        let _held: Vec<_> = listener.incoming().flatten().collect();
    });
    port
}

/// Mock a JSON GET endpoint, ignoring the query string
pub fn mock_json(server: &mut Server, path: &str, body: &str) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}
