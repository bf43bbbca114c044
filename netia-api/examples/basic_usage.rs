//! Basic usage of the Netia client
//!
//! Reads everything the device will tell us without changing its state.
//!
//! Run with: cargo run -p netia-api --example basic_usage -- 192.168.1.50

use netia_api::{ClientConfig, NetiaClient, StandbyStatus, DEFAULT_PORT};

fn main() -> Result<(), netia_api::ApiError> {
    let host = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "192.168.1.50".to_string());

    println!("Netia Player at {}", host);
    println!("=======================");

    let client = NetiaClient::new(ClientConfig::new(host, DEFAULT_PORT));

    // fetch_* surfaces the error, the plain accessors fold it into None
    match client.fetch_standby_status() {
        Ok(StandbyStatus::Active) => println!("Device is on"),
        Ok(StandbyStatus::Standby) => {
            println!("Device is in standby");
            return Ok(());
        }
        Err(e) => {
            println!("Device did not answer: {}", e);
            return Ok(());
        }
    }

    if let Some(volume) = client.volume_info() {
        println!("Volume: {}%{}", volume.level, if volume.muted { " (muted)" } else { "" });
    }

    let apps = client.fetch_app_state()?;
    println!("\nCurrent app: {} ({})", apps.current.name, apps.current.id);
    for app in &apps.apps {
        println!("   {} - {}", app.id, app.name);
    }

    if let Some(channel) = client.channel_info() {
        println!(
            "\nChannel {} {}",
            channel.channel_number.map(|n| n.to_string()).unwrap_or_default(),
            channel.channel_name.as_deref().unwrap_or("?")
        );
        if let Some(program) = client.channel_details(&channel.id) {
            println!("   Now: {}", program.program_name.as_deref().unwrap_or("?"));
        }
    }

    println!("\n{} channels, {} remote keys", client.channel_list().len(), client.available_keys().len());
    Ok(())
}
