// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire messages exchanged with the AI service.
//!
//! Each message is one JSON object on its own line. A request carries the
//! game packet (`turnLimit`, `timeLimit`, `turn`, `state`) plus a request id
//! that the service echoes back with its `action`.

use abalone_core::{AiAction, AiRequest};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BridgeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub request_id: Uuid,
    #[serde(flatten)]
    pub packet: AiRequest,
}

impl MoveRequest {
    pub fn new(packet: AiRequest) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            packet,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub request_id: Uuid,
    pub action: AiAction,
}

/// Serialize a message as a single newline-terminated line
pub fn encode_line<T: Serialize>(message: &T) -> Result<String, BridgeError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

/// Parse one received line
pub fn decode_line<T: DeserializeOwned>(line: &str) -> Result<T, BridgeError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(BridgeError::Protocol("empty line".to_string()));
    }
    Ok(serde_json::from_str(line)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_core::{BoardState, Direction, Limits};

    #[test]
    fn request_packet_is_flat_camel_case() {
        let request = MoveRequest::new(AiRequest::new(BoardState::default(), 1, &Limits::default()));
        let line = encode_line(&request).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["turnLimit"], 80);
        assert_eq!(json["timeLimit"], 10);
        assert_eq!(json["turn"], 1);
        assert_eq!(json["state"]["A1"], 2);
        assert_eq!(json["requestId"], request.request_id.to_string());
    }

    #[test]
    fn response_decodes_action() {
        let id = Uuid::new_v4();
        let line = format!(
            r#"{{"requestId":"{}","action":{{"turn":1,"marbles":["C3","C4"],"direction":1,"time":2.5,"state":{{"C3":2,"C4":2}}}}}}"#,
            id
        );
        let response: MoveResponse = decode_line(&line).unwrap();
        assert_eq!(response.request_id, id);
        assert_eq!(response.action.direction, Direction::NorthEast);
        assert_eq!(response.action.marbles.len(), 2);
        assert_eq!(response.action.time, 2.5);
    }

    #[test]
    fn garbage_is_a_protocol_error() {
        assert!(matches!(
            decode_line::<MoveResponse>("not json"),
            Err(BridgeError::Protocol(_))
        ));
        assert!(matches!(decode_line::<MoveResponse>("  \n"), Err(BridgeError::Protocol(_))));
    }
}
