//! Length-prefixed frame codec for the binary log RPC.
//!
//! Each frame is a four-byte big-endian length followed by a bincode
//! body. Frames above [`MAX_FRAME_LEN`] are refused on both sides, so a
//! corrupt length prefix cannot trigger an unbounded allocation.

use std::io;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::payload::LogPayload;

/// Method selector understood by the log RPC server.
pub const LOG_INFO_METHOD: &str = "RPCServer.LogInfo";

/// Upper bound on a single frame body, in bytes.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// One RPC call: a method selector plus the log entry travelling with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Which server routine to invoke.
    pub method: String,
    /// The log entry to persist.
    pub payload: LogPayload,
}

/// Outcome of an RPC call as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RpcResponse {
    /// The call succeeded; carries the server's result string.
    Ok(String),
    /// The call failed; carries the server's error description.
    Err(String),
}

impl RpcResponse {
    /// Converts the wire form back into a `Result`.
    pub fn into_result(self) -> Result<String, String> {
        match self {
            RpcResponse::Ok(message) => Ok(message),
            RpcResponse::Err(message) => Err(message),
        }
    }
}

/// Writes `value` as one length-prefixed frame.
pub async fn write_frame<W, T>(writer: &mut W, value: &T) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let body =
        bincode::serialize(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if body.len() > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "frame of {} bytes exceeds the {} byte limit",
                body.len(),
                MAX_FRAME_LEN
            ),
        ));
    }
    writer.write_all(&(body.len() as u32).to_be_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await
}

/// Reads one length-prefixed frame and decodes it.
pub async fn read_frame<R, T>(reader: &mut R) -> io::Result<T>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut prefix = [0u8; 4];
    reader.read_exact(&mut prefix).await?;
    let len = u32::from_be_bytes(prefix) as usize;
    if len > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame of {} bytes exceeds the {} byte limit", len, MAX_FRAME_LEN),
        ));
    }
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    bincode::deserialize(&body).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
