//! JSON frames exchanged with the browser over the editor WebSocket.

use serde::{Deserialize, Serialize};

use super::EditorView;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    SearchPermissions { value: String },
    SearchUsers { value: String },
    PagePermissions { page: u32 },
    PageUsers { page: u32 },
    TogglePermission { id: i64 },
    ToggleUser { id: i64 },
    DismissError,
    Reload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    State { view: EditorView },
    Error { message: String },
}

impl Inbound {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Outbound {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("Failed to encode editor frame: {e}");
            r#"{"type":"error","message":"internal error"}"#.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_client_frames() {
        assert_eq!(
            Inbound::parse(r#"{"type":"toggle_permission","id":7}"#).expect("parse"),
            Inbound::TogglePermission { id: 7 }
        );
        assert_eq!(
            Inbound::parse(r#"{"type":"search_users","value":""}"#).expect("parse"),
            Inbound::SearchUsers { value: String::new() }
        );
        assert_eq!(Inbound::parse(r#"{"type":"reload"}"#).expect("parse"), Inbound::Reload);
        assert!(Inbound::parse(r#"{"type":"drop_tables"}"#).is_err());
    }

    #[test]
    fn error_frame_shape() {
        let json = Outbound::Error { message: "falhou".into() }.to_json();
        assert_eq!(json, r#"{"type":"error","message":"falhou"}"#);
    }
}
