use model::RoomCode;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

/// Link that drops a player straight into the entry form of a quiz.
pub fn share_link(base: &str, code: &RoomCode) -> String {
    let code = utf8_percent_encode(code.as_str(), NON_ALPHANUMERIC);
    format!("{base}?room={code}")
}

/// Recovers the room code from the query string of a shared link.
pub fn room_from_link(link: &str) -> Option<RoomCode> {
    let (_, query) = link.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find_map(|(key, value)| (key == "room").then_some(value))
        .map(|value| RoomCode::new(&percent_decode_str(value).decode_utf8_lossy()))
        .filter(|code| !code.is_empty())
}
