//! Backend contract for the Beam launcher front-end.
//!
//! The front end talks to its backend collaborator over a fixed JSON-RPC 2.0
//! request/response surface on a Unix socket. This crate provides that
//! contract: the shared data types, the message and framing layers, and an
//! async client whose responses may complete in any order.
//!
//! # Modules
//!
//! - [`types`]: wire data types (`SearchResult`, `ContextAction`, ...)
//! - [`protocol`]: JSON-RPC 2.0 message types and the method table
//! - [`transport`]: length-prefixed codec for message framing
//! - [`client`]: async backend client
//!
//! # Example
//!
//! ```no_run
//! use beam_rpc::LauncherClient;
//!
//! # async fn example() -> Result<(), beam_rpc::ClientError> {
//! let (client, mut pushes) = LauncherClient::connect().await?;
//! let results = client.search("firefox").await?;
//! println!("{} results", results.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod protocol;
pub mod transport;
pub mod types;

pub use client::{ClientError, LauncherClient, socket_path};
pub use protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION, METHOD_NOT_FOUND, Message,
    Notification, PARSE_ERROR, Request, RequestId, Response, RpcError, methods,
};
pub use transport::{CodecError, WireCodec};
pub use types::{ContextAction, IndexState, IndexStatus, ResponseTag, SearchResult};
