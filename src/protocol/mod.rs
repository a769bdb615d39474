//! Realtime protocol frames and the inbound dispatcher
//!
//! The data channel carries JSON text frames in both directions. Inbound
//! frames are tagged records decoded into [`ServerEvent`]; outbound frames
//! are built from [`ClientEvent`]. Unknown inbound types are dropped so the
//! wire format can grow without breaking older sessions.

mod dispatcher;
mod events;

pub use dispatcher::decode_frame;
pub use events::{ClientEvent, InputContent, InputMessage, ServerEvent};
