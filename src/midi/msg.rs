use super::{Cable, Channel, Error, MsgType, Tag};
use crate::bytes;

/// A decoded channel voice message, as delivered by the transport.
///
/// Data bytes are always in [0, 127]. Messages with a single data byte
/// (Program Change, Channel Pressure) have `data2` set to 0.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChannelMessage {
    pub msg_type: MsgType,
    pub data1: u8,
    pub data2: u8,
    pub channel: Channel,
    pub cable: Cable,
}

impl ChannelMessage {
    pub fn new(msg_type: MsgType, channel: Channel, data1: u8, data2: u8) -> Self {
        Self {
            msg_type,
            data1: data1 & 0x7f,
            data2: data2 & 0x7f,
            channel,
            cable: Cable::default(),
        }
    }

    #[must_use]
    pub fn with_cable(mut self, cable: Cable) -> Self {
        self.cable = cable;
        self
    }

    /// Parses the raw bytes of a channel message received on `cable`.
    ///
    /// System messages, running status and truncated messages are rejected.
    pub fn parse(buf: &[u8], cable: Cable) -> Result<Self, Error> {
        let invalid = || Error::InvalidChannelMsg(bytes::Displayable::from(buf).to_owned());

        let (&status, data) = buf.split_first().ok_or_else(invalid)?;
        if status < 0x80 {
            return Err(invalid());
        }

        let msg_type = MsgType::from_tag(Tag::from(status)).ok_or_else(invalid)?;
        if data.len() != msg_type.data_len() || data.iter().any(|&byte| byte > 0x7f) {
            return Err(invalid());
        }

        Ok(Self {
            msg_type,
            data1: data[0],
            data2: data.get(1).copied().unwrap_or(0),
            channel: Channel::from(status),
            cable,
        })
    }

    /// Encodes the message back to its wire representation.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(3);
        buf.push(self.msg_type.tag() | self.channel);
        buf.push(self.data1);
        if self.msg_type.data_len() == 2 {
            buf.push(self.data2);
        }

        buf
    }
}
