use super::{BankType, Error};
use crate::midi::{Cable, Channel, ChannelMessage};

/// A MIDI channel and cable pair.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ChannelCable {
    channel: Channel,
    cable: Cable,
}

impl ChannelCable {
    pub const fn new(channel: Channel, cable: Cable) -> Self {
        Self { channel, cable }
    }

    /// Builds a pair from user facing numbers: channel [1, 16], cable [1, 16].
    pub fn try_new(channel_nb: u8, cable_nb: u8) -> Result<Self, Error> {
        if !(1..=16).contains(&channel_nb) {
            return Err(Error::InvalidChannel(channel_nb));
        }
        if !(1..=16).contains(&cable_nb) {
            return Err(Error::InvalidCable(cable_nb));
        }

        Ok(Self::new(
            Channel::from(channel_nb - 1),
            Cable::from(cable_nb - 1),
        ))
    }

    pub fn channel(self) -> Channel {
        self.channel
    }

    pub fn cable(self) -> Cable {
        self.cable
    }
}

/// Identifies one addressable control: number [0, 127], channel & cable.
///
/// [`Address::INVALID`] never matches anything, itself included.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Address {
    number: u8,
    channel_cable: ChannelCable,
    valid: bool,
}

impl Address {
    pub const INVALID: Address = Address {
        number: 0,
        channel_cable: ChannelCable::new(Channel::from(0), Cable::from(0)),
        valid: false,
    };

    /// Builds an `Address`, or [`Address::INVALID`] if `number` exceeds 127.
    pub const fn new(number: u8, channel_cable: ChannelCable) -> Self {
        if number > 0x7f {
            return Self::INVALID;
        }

        Self {
            number,
            channel_cable,
            valid: true,
        }
    }

    pub fn try_new(number: u8, channel_cable: ChannelCable) -> Result<Self, Error> {
        let address = Self::new(number, channel_cable);
        if !address.is_valid() {
            return Err(Error::InvalidAddress(number));
        }

        Ok(address)
    }

    pub fn is_valid(self) -> bool {
        self.valid
    }

    pub fn number(self) -> u8 {
        self.number
    }

    pub fn channel(self) -> Channel {
        self.channel_cable.channel
    }

    pub fn cable(self) -> Cable {
        self.channel_cable.cable
    }

    pub fn channel_cable(self) -> ChannelCable {
        self.channel_cable
    }

    /// Returns the raw field which changes from one bank setting to the next.
    pub fn field(self, bank_type: BankType) -> u8 {
        match bank_type {
            BankType::ChangeAddress => self.number,
            BankType::ChangeChannel => self.channel().into(),
            BankType::ChangeCable => self.cable().into(),
        }
    }

    /// Checks that all fields but the one selected by `bank_type` are equal.
    pub fn same_except(self, other: Address, bank_type: BankType) -> bool {
        match bank_type {
            BankType::ChangeAddress => self.channel_cable == other.channel_cable,
            BankType::ChangeChannel => {
                self.number == other.number && self.cable() == other.cable()
            }
            BankType::ChangeCable => {
                self.number == other.number && self.channel() == other.channel()
            }
        }
    }

    /// Checks whether both addresses are valid and identical.
    pub fn match_single(target: Address, base: Address) -> bool {
        target.valid && base.valid && target == base
    }

    /// Checks whether `target` is in `[base, base + length)` on the same
    /// channel and cable.
    pub fn match_in_range(target: Address, base: Address, length: u8) -> bool {
        target.valid
            && base.valid
            && target.channel_cable == base.channel_cable
            && base.number <= target.number
            && target.number - base.number < length
    }
}

/// Addressing of incoming channel messages.
impl ChannelMessage {
    pub fn channel_cable(&self) -> ChannelCable {
        ChannelCable::new(self.channel, self.cable)
    }

    /// Returns the address of a note or controller message,
    /// [`Address::INVALID`] for other messages.
    pub fn address(&self) -> Address {
        if !self.msg_type.has_address() {
            return Address::INVALID;
        }

        Address::new(self.data1, self.channel_cable())
    }
}
