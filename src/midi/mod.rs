mod error;
pub use error::Error;

mod io;

pub mod msg;
pub use msg::ChannelMessage;

pub mod port;
pub use port::PortsIn;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tag(u8);

impl Tag {
    pub const NOTE_OFF: Tag = Tag::from(0x80);
    pub const NOTE_ON: Tag = Tag::from(0x90);
    pub const KEY_PRESSURE: Tag = Tag::from(0xa0);
    pub const CONTROL_CHANGE: Tag = Tag::from(0xb0);
    pub const PROGRAM_CHANGE: Tag = Tag::from(0xc0);
    pub const CHANNEL_PRESSURE: Tag = Tag::from(0xd0);
    pub const PITCH_BEND: Tag = Tag::from(0xe0);

    pub const fn from(byte: u8) -> Self {
        Self(byte & 0xf0)
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        tag.0
    }
}

/// A MIDI channel, zero-based on the wire.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Channel(u8);

impl Channel {
    pub const fn from(byte: u8) -> Self {
        Self(byte & 0x0f)
    }

    /// Returns the channel number as shown to users [1, 16].
    pub const fn number(self) -> u8 {
        self.0 + 1
    }
}

impl From<Channel> for u8 {
    fn from(chan: Channel) -> u8 {
        chan.0
    }
}

impl std::ops::BitOr<Channel> for Tag {
    type Output = u8;

    fn bitor(self, chan: Channel) -> Self::Output {
        self.0 | chan.0
    }
}

/// A virtual cable, i.e. one of up to 16 ports multiplexed on a transport.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Cable(u8);

impl Cable {
    pub const fn from(byte: u8) -> Self {
        Self(byte & 0x0f)
    }

    /// Returns the cable number as shown to users [1, 16].
    pub const fn number(self) -> u8 {
        self.0 + 1
    }
}

impl From<Cable> for u8 {
    fn from(cable: Cable) -> u8 {
        cable.0
    }
}

/// Kinds of channel voice messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MsgType {
    NoteOff,
    NoteOn,
    KeyPressure,
    ControlChange,
    ProgramChange,
    ChannelPressure,
    PitchBend,
}

impl MsgType {
    pub fn from_tag(tag: Tag) -> Option<Self> {
        use MsgType::*;

        let msg_type = match tag {
            Tag::NOTE_OFF => NoteOff,
            Tag::NOTE_ON => NoteOn,
            Tag::KEY_PRESSURE => KeyPressure,
            Tag::CONTROL_CHANGE => ControlChange,
            Tag::PROGRAM_CHANGE => ProgramChange,
            Tag::CHANNEL_PRESSURE => ChannelPressure,
            Tag::PITCH_BEND => PitchBend,
            _ => return None,
        };

        Some(msg_type)
    }

    pub fn tag(self) -> Tag {
        use MsgType::*;

        match self {
            NoteOff => Tag::NOTE_OFF,
            NoteOn => Tag::NOTE_ON,
            KeyPressure => Tag::KEY_PRESSURE,
            ControlChange => Tag::CONTROL_CHANGE,
            ProgramChange => Tag::PROGRAM_CHANGE,
            ChannelPressure => Tag::CHANNEL_PRESSURE,
            PitchBend => Tag::PITCH_BEND,
        }
    }

    /// Number of data bytes following the status byte.
    pub fn data_len(self) -> usize {
        match self {
            MsgType::ProgramChange | MsgType::ChannelPressure => 1,
            _ => 2,
        }
    }

    /// Whether `data1` carries an address (note or controller number).
    pub fn has_address(self) -> bool {
        use MsgType::*;
        matches!(self, NoteOff | NoteOn | KeyPressure | ControlChange)
    }
}
