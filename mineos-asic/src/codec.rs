//! cgminer-style RPC codec.
//!
//! The miner API answers a `{"command": ..., "parameter": ...}` request with
//! a JSON object holding a `STATUS` array plus one array of rows per result
//! section (`SUMMARY`, `DEVS`, `POOLS`, ...). Commands joined with `+` are
//! answered with one such object per command, keyed by the command name.
//! Both shapes decode into the same tabular [`RpcResponse`].

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt};

use crate::error::{Result, RigError};

/// One row of a result section
pub type Row = Map<String, Value>;

/// RPC request as sent to the miner API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub command: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parameter: String,
}

impl RpcRequest {
    pub fn new(command: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            parameter: parameter.into(),
        }
    }

    /// Individual commands of a `+` joined multi-command
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.command.split('+')
    }

    pub fn is_multi(&self) -> bool {
        self.command.contains('+')
    }
}

impl fmt::Display for RpcRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parameter.is_empty() {
            f.write_str(&self.command)
        } else {
            write!(f, "{}|{}", self.command, self.parameter)
        }
    }
}

/// Status letter of a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    #[serde(rename = "S")]
    Success,
    #[serde(rename = "I")]
    Info,
    #[serde(rename = "W")]
    Warning,
    #[serde(rename = "E")]
    Error,
    #[serde(rename = "F")]
    Fatal,
}

impl StatusCode {
    pub fn is_ok(&self) -> bool {
        matches!(self, StatusCode::Success | StatusCode::Info | StatusCode::Warning)
    }
}

/// Entry of the `STATUS` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcStatus {
    #[serde(rename = "STATUS")]
    pub status: StatusCode,
    #[serde(rename = "When", default)]
    pub when: Option<u64>,
    #[serde(rename = "Code", default)]
    pub code: Option<i64>,
    #[serde(rename = "Msg", default)]
    pub msg: String,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

/// Decoded reply: status entries plus named sections of key/value rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RpcResponse {
    pub status: Vec<RpcStatus>,
    pub sections: BTreeMap<String, Vec<Row>>,
}

impl RpcResponse {
    /// Fail with a protocol error unless every status entry is acceptable
    pub fn ensure_success(&self, command: &str) -> Result<()> {
        if self.status.is_empty() {
            return Err(RigError::protocol(format!(
                "reply to '{}' has no STATUS",
                command
            )));
        }

        match self.status.iter().find(|s| !s.status.is_ok()) {
            Some(failed) => Err(RigError::protocol(format!(
                "'{}' rejected with {:?} (code {}): {}",
                command,
                failed.status,
                failed.code.unwrap_or_default(),
                failed.msg
            ))),
            None => Ok(()),
        }
    }

    pub fn section(&self, name: &str) -> Option<&[Row]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    /// Deserialize every row of a required section
    pub fn rows<T: DeserializeOwned>(&self, command: &str, name: &str) -> Result<Vec<T>> {
        let rows = self
            .section(name)
            .ok_or_else(|| RigError::malformed(command, format!("missing {} section", name)))?;
        rows.iter()
            .enumerate()
            .map(|(i, row)| parse_row(command, name, i, row))
            .collect()
    }

    /// Deserialize the first row of a required section
    pub fn first<T: DeserializeOwned>(&self, command: &str, name: &str) -> Result<T> {
        self.optional_first(command, name)?
            .ok_or_else(|| RigError::malformed(command, format!("{} section is empty", name)))
    }

    /// Deserialize the first row of a section that firmware may omit
    pub fn optional_first<T: DeserializeOwned>(
        &self,
        command: &str,
        name: &str,
    ) -> Result<Option<T>> {
        match self.section(name).and_then(|rows| rows.first()) {
            Some(row) => parse_row(command, name, 0, row).map(Some),
            None => Ok(None),
        }
    }
}

/// Deserialize one row into a vendor-native struct
pub fn parse_row<T: DeserializeOwned>(command: &str, section: &str, index: usize, row: &Row) -> Result<T> {
    serde_json::from_value(Value::Object(row.clone()))
        .map_err(|e| RigError::malformed(command, format!("{}[{}]: {}", section, index, e)))
}

/// Wire encoding of RPC requests and replies
pub trait RpcCodec: Send + Sync + fmt::Debug {
    fn encode(&self, request: &RpcRequest) -> Result<Vec<u8>>;
    fn decode(&self, raw: &[u8]) -> Result<RpcResponse>;
}

/// JSON flavour of the cgminer API
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    fn decode_single(reply: &Map<String, Value>) -> Result<RpcResponse> {
        let status = reply
            .get("STATUS")
            .ok_or_else(|| RigError::protocol("reply has no STATUS"))?;
        let status: Vec<RpcStatus> = serde_json::from_value(status.clone())
            .map_err(|e| RigError::protocol(format!("invalid STATUS: {}", e)))?;

        let mut sections = BTreeMap::new();
        for (name, value) in reply {
            if name == "STATUS" || name == "id" {
                continue;
            }
            if let Value::Array(items) = value {
                let rows = items
                    .iter()
                    .map(|item| match item {
                        Value::Object(row) => Ok(row.clone()),
                        other => Err(RigError::protocol(format!(
                            "{} row is not an object: {}",
                            name, other
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                sections.insert(name.clone(), rows);
            }
        }

        Ok(RpcResponse { status, sections })
    }
}

impl RpcCodec for JsonCodec {
    fn encode(&self, request: &RpcRequest) -> Result<Vec<u8>> {
        serde_json::to_vec(request)
            .map_err(|e| RigError::protocol(format!("cannot encode '{}': {}", request, e)))
    }

    fn decode(&self, raw: &[u8]) -> Result<RpcResponse> {
        let raw = trim_reply(raw);
        if raw.is_empty() {
            return Err(RigError::protocol("empty reply"));
        }

        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| RigError::protocol(format!("invalid JSON reply: {}", e)))?;
        let reply = value
            .as_object()
            .ok_or_else(|| RigError::protocol("reply is not a JSON object"))?;

        if reply.contains_key("STATUS") {
            return Self::decode_single(reply);
        }

        // Multi-command reply: {"summary": [{STATUS.., SUMMARY..}], "devs": [...]}
        let mut merged = RpcResponse::default();
        for (command, part) in reply {
            // Joined replies carry a top-level "id" next to the command arrays
            if !part.is_array() {
                continue;
            }
            let single = part
                .as_array()
                .and_then(|items| items.first())
                .and_then(Value::as_object)
                .ok_or_else(|| {
                    RigError::protocol(format!("reply for '{}' is not a result array", command))
                })?;
            let decoded = Self::decode_single(single)?;
            merged.status.extend(decoded.status);
            for (name, rows) in decoded.sections {
                merged.sections.entry(name).or_default().extend(rows);
            }
        }

        if merged.status.is_empty() {
            return Err(RigError::protocol("reply has no STATUS"));
        }
        Ok(merged)
    }
}

/// cgminer terminates replies with a NUL byte
fn trim_reply(raw: &[u8]) -> &[u8] {
    let end = raw
        .iter()
        .rposition(|b| *b != 0 && !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    let start = raw[..end]
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(end);
    &raw[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Summary {
        #[serde(rename = "MHS 5s")]
        mhs_5s: f64,
        #[serde(rename = "Accepted")]
        accepted: u64,
    }

    #[test]
    fn test_encode_request() {
        let bytes = JsonCodec.encode(&RpcRequest::new("summary", "")).unwrap();
        assert_eq!(bytes, br#"{"command":"summary"}"#);

        let bytes = JsonCodec.encode(&RpcRequest::new("switchpool", "1")).unwrap();
        assert_eq!(bytes, br#"{"command":"switchpool","parameter":"1"}"#);
    }

    #[test]
    fn test_request_commands() {
        let req = RpcRequest::new("summary+devs+pools", "");
        assert!(req.is_multi());
        assert_eq!(req.commands().collect::<Vec<_>>(), vec!["summary", "devs", "pools"]);
    }

    #[test]
    fn test_decode_single_reply() {
        let raw = b"{\"STATUS\":[{\"STATUS\":\"S\",\"When\":1520000000,\"Code\":11,\"Msg\":\"Summary\",\"Description\":\"sgminer 5.6.2-b\"}],\"SUMMARY\":[{\"MHS 5s\":1234.5,\"Accepted\":10}],\"id\":1}\0";
        let resp = JsonCodec.decode(raw).unwrap();
        resp.ensure_success("summary").unwrap();
        assert_eq!(resp.status[0].code, Some(11));

        let summary: Summary = resp.first("summary", "SUMMARY").unwrap();
        assert_eq!(summary, Summary { mhs_5s: 1234.5, accepted: 10 });
    }

    #[test]
    fn test_decode_multi_reply_merges_sections() {
        let raw = br#"{
            "summary": [{"STATUS":[{"STATUS":"S","Msg":"Summary"}],"SUMMARY":[{"MHS 5s":1.0,"Accepted":1}],"id":1}],
            "devs": [{"STATUS":[{"STATUS":"S","Msg":"1 ASC(s)"}],"DEVS":[{"ASC":0},{"ASC":1}],"id":1}]
        }"#;
        let resp = JsonCodec.decode(raw).unwrap();
        assert_eq!(resp.status.len(), 2);
        assert_eq!(resp.section("DEVS").unwrap().len(), 2);
        assert!(resp.section("SUMMARY").is_some());
    }

    #[test]
    fn test_decode_multi_reply_skips_top_level_id() {
        let mut raw = br#"{
            "summary": [{"STATUS":[{"STATUS":"S","Msg":"Summary"}],"SUMMARY":[{"Accepted":1}],"id":1}],
            "pools": [{"STATUS":[{"STATUS":"S","Msg":"1 Pool(s)"}],"POOLS":[{"POOL":0}],"id":1}],
            "id": 1
        }"#
        .to_vec();
        raw.push(0);
        let resp = JsonCodec.decode(&raw).unwrap();
        assert_eq!(resp.status.len(), 2);
        assert_eq!(resp.section("SUMMARY").unwrap().len(), 1);
        assert_eq!(resp.section("POOLS").unwrap().len(), 1);
        assert!(resp.section("id").is_none());

        let raw = br#"{"summary":{"STATUS":[]},"id":1}"#;
        assert!(matches!(JsonCodec.decode(raw), Err(RigError::Protocol(_))));
    }

    #[test]
    fn test_error_status_is_protocol_error() {
        let raw = br#"{"STATUS":[{"STATUS":"E","Code":14,"Msg":"Invalid command"}],"id":1}"#;
        let resp = JsonCodec.decode(raw).unwrap();
        let err = resp.ensure_success("bogus").unwrap_err();
        assert!(matches!(err, RigError::Protocol(_)));
        assert!(err.to_string().contains("Invalid command"));
    }

    #[test]
    fn test_missing_status_is_protocol_error() {
        assert!(matches!(
            JsonCodec.decode(br#"{"SUMMARY":{"x":1}}"#),
            Err(RigError::Protocol(_))
        ));
        assert!(matches!(JsonCodec.decode(b"\0"), Err(RigError::Protocol(_))));
        assert!(matches!(JsonCodec.decode(b"not json"), Err(RigError::Protocol(_))));
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let raw = br#"{"STATUS":[{"STATUS":"S"}],"SUMMARY":[{"MHS 5s":1.0}]}"#;
        let resp = JsonCodec.decode(raw).unwrap();
        let err = resp.first::<Summary>("summary", "SUMMARY").unwrap_err();
        assert!(matches!(err, RigError::MalformedResponse { .. }));

        let err = resp.rows::<Summary>("summary", "DEVS").unwrap_err();
        assert!(err.to_string().contains("missing DEVS section"));
    }

    #[test]
    fn test_trim_reply() {
        assert_eq!(trim_reply(b"  {}\n\0"), b"{}");
        assert_eq!(trim_reply(b"\0\0"), b"");
    }
}
