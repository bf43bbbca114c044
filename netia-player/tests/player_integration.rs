//! End-to-end tests for the player state machine
//!
//! Each test stands up a mockito server that plays the set-top box and
//! drives [`NetiaPlayer`] through one or more refresh cycles.

use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use mockito::{Matcher, Mock, Server};
use netia_player::{
    DeviceSnapshot, NetiaPlayer, PlayerConfig, PlayerState, PowerState, NO_INFO_LABEL,
    WAITING_LABEL,
};
use rstest::rstest;

const ACTIVE: &str = r#"{"standby": false}"#;
const STANDBY: &str = r#"{"standby": true}"#;
const TV_CURRENT: &str = r#"[{"id": "tv", "name": "TV", "current": true}, {"id": "netflix", "name": "Netflix"}]"#;
const NETFLIX_CURRENT: &str = r#"[{"id": "tv", "name": "TV"}, {"id": "netflix", "name": "Netflix", "current": true}]"#;
const CHANNEL_5: &str = r#"{"id": "5", "zap": 5, "name": "Channel5"}"#;
const NEWS: &str = r#"[{"channelZap": 5, "channelName": "Channel5", "name": "News", "subcategory": "news",
    "duration": 1800, "startTime": 1000, "endTime": 2800}]"#;

fn config_for(server: &Server) -> PlayerConfig {
    let address = server.host_with_port();
    let (host, port) = address
        .rsplit_once(':')
        .expect("mock server address has a port");

    let mut config = PlayerConfig::new(host)
        .with_port(port.parse().expect("numeric port"))
        .with_request_timeout(Duration::from_secs(2))
        .with_logo_base_url(format!("{}/logo/", server.url()));
    config.logo_timeout_secs = 2;
    config
}

fn player_for(server: &Server) -> NetiaPlayer {
    NetiaPlayer::new(config_for(server)).expect("valid config")
}

fn mock_json(server: &mut Server, path: &str, body: &str) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}

fn mock_key(server: &mut Server, key: &str) -> Mock {
    server
        .mock("POST", "/RemoteControl/KeyHandling/sendKey")
        .match_query(Matcher::UrlEncoded("key".into(), key.into()))
        .with_status(200)
        .create()
}

/// Mocks for a device showing channel 5 with "News" on air
fn mock_tv_playing(server: &mut Server) -> Vec<Mock> {
    vec![
        mock_json(server, "/Main/State/get", ACTIVE),
        mock_json(server, "/RemoteControl/Volume/get", r#"{"volume": 30, "muted": false}"#),
        mock_json(server, "/Applications/State/get", TV_CURRENT),
        mock_json(server, "/Live/Channels/getCurrent", CHANNEL_5),
        mock_json(server, "/EPG/Programs/getRange", NEWS),
    ]
}

#[rstest]
#[case(STANDBY)]
#[case(r#"{}"#)]
#[case(r#"{"standby": "no"}"#)]
fn test_standby_device(#[case] body: &str) {
    let mut server = Server::new();
    let _state = mock_json(&mut server, "/Main/State/get", body);

    let mut player = player_for(&server);
    assert_eq!(player.refresh(), &DeviceSnapshot::standby());
    assert_eq!(player.power_state(), PowerState::Off);
}

#[test]
fn test_unreachable_device_is_standby() {
    let config = PlayerConfig::new("127.0.0.1")
        .with_port(1)
        .with_request_timeout(Duration::from_secs(1));
    let mut player = NetiaPlayer::new(config).unwrap();

    let snapshot = player.refresh().clone();
    assert_eq!(snapshot, DeviceSnapshot::standby());
    assert!(!snapshot.has_program_fields());
    assert!(!snapshot.has_app_fields());
}

#[test]
fn test_silent_device_is_standby() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let port = listener.local_addr().expect("local address").port();
    thread::spawn(move || {
        let _held: Vec<_> = listener.incoming().flatten().collect();
    });

    let config = PlayerConfig::new("127.0.0.1")
        .with_port(port)
        .with_request_timeout(Duration::from_secs(1));
    let mut player = NetiaPlayer::new(config).unwrap();

    assert_eq!(player.refresh(), &DeviceSnapshot::standby());
    assert_eq!(player.power_state(), PowerState::Off);
}

#[test]
fn test_tv_playing() {
    let mut server = Server::new();
    let _mocks = mock_tv_playing(&mut server);

    let mut player = player_for(&server);
    let snapshot = player.refresh().clone();

    assert_eq!(snapshot.state, PlayerState::TvPlaying);
    assert_eq!(snapshot.channel_number, Some(5));
    assert_eq!(snapshot.channel_name.as_deref(), Some("Channel5"));
    assert_eq!(snapshot.program_name.as_deref(), Some("News"));
    assert_eq!(snapshot.program_category.as_deref(), Some("news"));
    assert_eq!(snapshot.duration_seconds, Some(1800));
    assert_eq!(
        snapshot.image_url,
        Some(format!("{}/EPG/Programs/getImage?channelId=5", server.url()))
    );
    assert!(!snapshot.has_app_fields());

    assert_eq!(player.power_state(), PowerState::Playing);
    assert_eq!(player.volume_level(), Some(0.3));
    assert_eq!(player.is_volume_muted(), Some(false));
    assert_eq!(player.media_title(), Some("Channel5"));
    assert_eq!(player.media_series_title(), Some("News"));
    assert_eq!(player.media_channel(), Some(5));
    assert_eq!(player.media_position_at(1600), Some(600));
}

#[test]
fn test_refresh_is_idempotent() {
    let mut server = Server::new();
    let _mocks = mock_tv_playing(&mut server);

    let mut player = player_for(&server);
    let first = player.refresh().clone();
    let second = player.refresh().clone();
    assert_eq!(first, second);
}

#[test]
fn test_volume_failure_keeps_tv_state() {
    let mut server = Server::new();
    let _state = mock_json(&mut server, "/Main/State/get", ACTIVE);
    let _volume = mock_json(&mut server, "/RemoteControl/Volume/get", r#"{"error": true}"#);
    let _apps = mock_json(&mut server, "/Applications/State/get", TV_CURRENT);
    let _channel = mock_json(&mut server, "/Live/Channels/getCurrent", CHANNEL_5);
    let _epg = mock_json(&mut server, "/EPG/Programs/getRange", NEWS);

    let mut player = player_for(&server);
    player.refresh();

    assert_eq!(player.state(), PlayerState::TvPlaying);
    assert_eq!(player.volume_level(), None);
    assert_eq!(player.is_volume_muted(), None);
}

#[test]
fn test_channel_unavailable_is_tv_no_info() {
    let mut server = Server::new();
    let _state = mock_json(&mut server, "/Main/State/get", ACTIVE);
    let _apps = mock_json(&mut server, "/Applications/State/get", TV_CURRENT);
    let _channel = server
        .mock("GET", "/Live/Channels/getCurrent")
        .with_status(503)
        .create();

    let mut player = player_for(&server);
    let snapshot = player.refresh().clone();

    assert_eq!(snapshot.state, PlayerState::TvNoInfo);
    assert_eq!(snapshot.channel_name, None);
    assert!(!snapshot.has_program_fields());
    assert_eq!(player.power_state(), PowerState::On);
    assert_eq!(player.media_series_title(), Some(NO_INFO_LABEL));
}

#[test]
fn test_missing_epg_keeps_channel() {
    let mut server = Server::new();
    let _state = mock_json(&mut server, "/Main/State/get", ACTIVE);
    let _apps = mock_json(&mut server, "/Applications/State/get", TV_CURRENT);
    let _channel = mock_json(&mut server, "/Live/Channels/getCurrent", CHANNEL_5);
    let _epg = mock_json(&mut server, "/EPG/Programs/getRange", "[]");

    let mut player = player_for(&server);
    let snapshot = player.refresh().clone();

    assert_eq!(snapshot.state, PlayerState::TvNoInfo);
    assert_eq!(snapshot.channel_name.as_deref(), Some("Channel5"));
    assert!(!snapshot.has_program_fields());
    assert_eq!(player.media_position_at(2000), None);
}

#[test]
fn test_app_list_failure_is_standby() {
    let mut server = Server::new();
    let _state = mock_json(&mut server, "/Main/State/get", ACTIVE);
    let _apps = server
        .mock("GET", "/Applications/State/get")
        .with_status(500)
        .create();

    let mut player = player_for(&server);
    assert_eq!(player.refresh(), &DeviceSnapshot::standby());
}

#[test]
fn test_app_opened() {
    let mut server = Server::new();
    let _state = mock_json(&mut server, "/Main/State/get", ACTIVE);
    let _apps = mock_json(&mut server, "/Applications/State/get", NETFLIX_CURRENT);
    let _logo = server
        .mock("POST", "/logo/netflix_290x172px.png")
        .with_status(200)
        .create();

    let mut player = player_for(&server);
    let snapshot = player.refresh().clone();

    assert_eq!(snapshot.state, PlayerState::AppOpened);
    assert_eq!(snapshot.app_id.as_deref(), Some("netflix"));
    assert_eq!(snapshot.channel_name.as_deref(), Some("Netflix"));
    assert_eq!(
        snapshot.image_url,
        Some(format!("{}/logo/netflix_290x172px.png", server.url()))
    );
    assert!(!snapshot.has_program_fields());
    assert_eq!(player.power_state(), PowerState::AppOpened);
}

#[test]
fn test_switching_to_app_clears_program() {
    let mut server = Server::new();
    let _state = mock_json(&mut server, "/Main/State/get", ACTIVE);
    let tv = mock_json(&mut server, "/Applications/State/get", TV_CURRENT);
    let _channel = mock_json(&mut server, "/Live/Channels/getCurrent", CHANNEL_5);
    let _epg = mock_json(&mut server, "/EPG/Programs/getRange", NEWS);

    let mut player = player_for(&server);
    assert_eq!(player.refresh().state, PlayerState::TvPlaying);

    tv.remove();
    let _netflix = mock_json(&mut server, "/Applications/State/get", NETFLIX_CURRENT);

    let snapshot = player.refresh().clone();
    assert_eq!(snapshot.state, PlayerState::AppOpened);
    assert_eq!(snapshot.program_name, None);
    assert_eq!(snapshot.channel_number, None);
    assert_eq!(snapshot.duration_seconds, None);
}

#[test]
fn test_sources_with_app_support() {
    let mut server = Server::new();
    let _state = mock_json(&mut server, "/Main/State/get", ACTIVE);
    let _apps = mock_json(&mut server, "/Applications/State/get", NETFLIX_CURRENT);

    let config = config_for(&server).with_apps(["tv", "netflix"]);
    let mut player = NetiaPlayer::new(config).unwrap();
    player.refresh();

    assert_eq!(player.source(), Some("Netflix"));
    assert_eq!(player.source_list(), ["TV", "Netflix"]);
    assert_eq!(player.application_list().len(), 2);
}

#[test]
fn test_sources_without_app_support() {
    let mut server = Server::new();
    let _state = mock_json(&mut server, "/Main/State/get", ACTIVE);
    let _apps = mock_json(&mut server, "/Applications/State/get", NETFLIX_CURRENT);

    let mut player = player_for(&server);
    player.refresh();

    assert_eq!(player.source(), None);
    assert!(player.source_list().is_empty());
}

#[test]
fn test_select_source_opens_app() {
    let mut server = Server::new();
    let _state = mock_json(&mut server, "/Main/State/get", ACTIVE);
    let _apps = mock_json(&mut server, "/Applications/State/get", NETFLIX_CURRENT);
    let open_tv = server
        .mock("POST", "/Applications/Lifecycle/open")
        .match_query(Matcher::UrlEncoded("appId".into(), "tv".into()))
        .with_status(200)
        .create();
    let open_netflix = server
        .mock("POST", "/Applications/Lifecycle/open")
        .match_query(Matcher::UrlEncoded("appId".into(), "netflix".into()))
        .with_status(200)
        .create();

    let mut player = NetiaPlayer::new(config_for(&server).with_apps(["tv", "netflix"])).unwrap();
    player.refresh();

    assert!(player.select_source("Netflix"));
    assert!(player.select_source("TV"));
    assert!(!player.select_source("Disney+"));

    open_tv.assert();
    open_netflix.assert();
}

#[test]
fn test_turn_on_waits_for_device() {
    let mut server = Server::new();
    let on_off = mock_key(&mut server, "on_off");
    let _state = mock_json(&mut server, "/Main/State/get", STANDBY);

    let mut player = player_for(&server);
    player.turn_on();
    on_off.assert();

    assert_eq!(player.state(), PlayerState::TransitionToActive);
    assert_eq!(player.power_state(), PowerState::On);
    assert_eq!(player.snapshot().program_name.as_deref(), Some(WAITING_LABEL));
    assert!(!player.snapshot().has_program_fields());

    // Still booting: standby answers do not cancel the transition
    assert_eq!(player.refresh().state, PlayerState::TransitionToActive);
}

#[test]
fn test_turn_on_keeps_audio_and_sources() {
    let mut server = Server::new();
    let _on_off = mock_key(&mut server, "on_off");
    let _mocks = mock_tv_playing(&mut server);

    let mut player = NetiaPlayer::new(config_for(&server).with_apps(["tv", "netflix"])).unwrap();
    player.refresh();
    player.turn_on();

    let snapshot = player.snapshot();
    assert_eq!(snapshot.state, PlayerState::TransitionToActive);
    assert_eq!(snapshot.program_name.as_deref(), Some(WAITING_LABEL));
    assert_eq!(snapshot.channel_name, None);
    assert_eq!(snapshot.channel_number, None);
    assert_eq!(snapshot.duration_seconds, None);
    assert_eq!(snapshot.volume_percent, Some(30));
    assert_eq!(snapshot.muted, Some(false));
    assert_eq!(player.source(), Some("TV"));
    assert_eq!(player.source_list(), ["TV", "Netflix"]);
}

#[test]
fn test_turn_on_gives_up_after_grace() {
    let mut server = Server::new();
    let _on_off = mock_key(&mut server, "on_off");
    let _state = mock_json(&mut server, "/Main/State/get", STANDBY);

    let config = config_for(&server).with_startup_grace(Duration::ZERO);
    let mut player = NetiaPlayer::new(config).unwrap();
    player.turn_on();

    assert_eq!(player.refresh(), &DeviceSnapshot::standby());
}

#[test]
fn test_turn_on_then_playing() {
    let mut server = Server::new();
    let _on_off = mock_key(&mut server, "on_off");
    let _mocks = mock_tv_playing(&mut server);

    let mut player = player_for(&server);
    player.turn_on();
    assert_eq!(player.refresh().state, PlayerState::TvPlaying);
}

#[rstest]
#[case::turn_off(false)]
#[case::pause(true)]
fn test_power_off_is_immediate(#[case] via_pause: bool) {
    let mut server = Server::new();
    let on_off = mock_key(&mut server, "on_off");
    let _mocks = mock_tv_playing(&mut server);

    let mut player = player_for(&server);
    player.refresh();

    if via_pause {
        player.media_pause();
    } else {
        player.turn_off();
    }

    on_off.assert();
    assert_eq!(player.snapshot(), &DeviceSnapshot::standby());
}

#[test]
fn test_forwarded_commands() {
    let mut server = Server::new();
    let keys: Vec<Mock> = ["volume_up", "volume_down", "mute", "play", "stop", "channel_up", "channel_down"]
        .iter()
        .map(|key| mock_key(&mut server, key))
        .collect();

    let player = player_for(&server);
    player.volume_up();
    player.volume_down();
    player.mute_volume();
    player.media_play();
    player.media_stop();
    player.media_next_track();
    player.media_previous_track();

    for key in keys {
        key.assert();
    }
    assert_eq!(player.state(), PlayerState::Standby);
}

#[test]
fn test_play_media_sends_key() {
    let mut server = Server::new();
    let digit = mock_key(&mut server, "7");

    let player = player_for(&server);
    assert!(player.play_media("7"));
    assert!(!player.play_media("pause"));
    digit.assert();
}
