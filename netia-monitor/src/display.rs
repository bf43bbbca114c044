//! Human-readable rendering of player snapshots

use netia_player::{DeviceSnapshot, PlayerState};

/// One-line summary of a snapshot
pub fn summarize(snapshot: &DeviceSnapshot) -> String {
    let mut line = format!("[{}]", snapshot.power_state().label());

    match snapshot.state {
        PlayerState::Standby => {}
        PlayerState::AppOpened => {
            if let Some(app) = &snapshot.app_name {
                line.push_str(&format!(" {}", app));
            }
        }
        _ => {
            if let Some(number) = snapshot.channel_number {
                line.push_str(&format!(" {}", number));
            }
            if let Some(channel) = &snapshot.channel_name {
                line.push_str(&format!(" {}", channel));
            }
            match &snapshot.program_name {
                Some(program) => line.push_str(&format!(" - {}", program)),
                None if snapshot.state == PlayerState::TvNoInfo => line.push_str(" - no info"),
                None => {}
            }
            if let Some(episode) = &snapshot.episode_info {
                line.push_str(&format!(" ({})", episode));
            }
        }
    }

    if let Some(volume) = snapshot.volume_percent {
        let muted = if snapshot.muted == Some(true) { ", muted" } else { "" };
        line.push_str(&format!(" | vol {}%{}", volume, muted));
    }
    if let Some(source) = &snapshot.current_source {
        line.push_str(&format!(" | source {}", source));
    }

    line
}

/// Multi-line listing of every known field
pub fn details(snapshot: &DeviceSnapshot) -> String {
    let mut out = Vec::new();
    let mut field = |name: &str, value: Option<String>| {
        if let Some(value) = value {
            out.push(format!("  {:<14} {}", name, value));
        }
    };

    field("state", Some(format!("{:?}", snapshot.state)));
    field("channel", snapshot.channel_number.map(|n| n.to_string()));
    field("channel name", snapshot.channel_name.clone());
    field("program", snapshot.program_name.clone());
    field("category", snapshot.program_category.clone());
    field("episode", snapshot.episode_info.clone());
    field("sound mode", snapshot.sound_mode.clone());
    field("duration", snapshot.duration_seconds.map(|d| format!("{}s", d)));
    field("image", snapshot.image_url.clone());
    field("volume", snapshot.volume_percent.map(|v| format!("{}%", v)));
    field("muted", snapshot.muted.map(|m| m.to_string()));
    field("source", snapshot.current_source.clone());
    if !snapshot.source_list.is_empty() {
        field("sources", Some(snapshot.source_list.join(", ")));
    }
    field("app", snapshot.app_id.clone());

    out.join("\n")
}
