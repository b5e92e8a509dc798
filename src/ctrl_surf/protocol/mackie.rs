//! Mackie Control Universal VU meters.
//!
//! VU meters are updated using Channel Pressure messages. Each device
//! (cable) has eight VU meters for the eight tracks. Only channel 1 is used
//! by Mackie devices.
//!
//! | Status      | Data 1      |
//! |:-----------:|:-----------:|
//! | `1101 cccc` | `0hhh llll` |
//!
//! - `cccc` is the channel [0, 15]
//! - `hhh` is the track index [0, 7]
//! - `llll` is the level of the VU meter
//!
//! Level `0x0` is 0% and `0xC` is 100%. `0xD` has no meaning. `0xE` sets
//! the overload indicator and `0xF` clears it.

use crate::{
    ctrl_surf::{
        bank_index,
        matcher::{BankMatch, BankableMatcher, Matcher, ValueMatch},
        Address, BankConfig,
    },
    midi::{self, ChannelMessage},
};

pub mod vu {
    use crate::midi::Tag;
    pub const TAG: Tag = Tag::CHANNEL_PRESSURE;

    pub const TRACK_COUNT: u8 = 8;

    pub const MAX_LEVEL: u8 = 0x0c;
    pub const NO_MEANING: u8 = 0x0d;
    pub const SET_OVERLOAD: u8 = 0x0e;
    pub const CLEAR_OVERLOAD: u8 = 0x0f;
}

/// VU decay times in milliseconds.
pub mod decay {
    /// Don't decay automatically, hold the latest value until a new one
    /// is received.
    pub const HOLD: u32 = 0;
    /// The protocol uses 300 ms per division and two steps per division.
    pub const DEFAULT: u32 = 150;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Changed {
    Nothing,
    Value,
    Overload,
}

/// Value & overload indicator of a VU meter.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct VuState {
    value: u8,
    overload: bool,
}

impl VuState {
    /// The level [0, 12].
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn overload(&self) -> bool {
        self.overload
    }

    /// Updates the value or overload status with the 4-bit level data.
    pub fn update(&mut self, data: u8) -> Changed {
        match data & 0x0f {
            vu::CLEAR_OVERLOAD => {
                let changed = if self.overload {
                    Changed::Overload
                } else {
                    Changed::Nothing
                };
                self.overload = false;

                changed
            }
            vu::SET_OVERLOAD => {
                let changed = if !self.overload {
                    Changed::Overload
                } else {
                    Changed::Nothing
                };
                self.overload = true;

                changed
            }
            vu::NO_MEANING => Changed::Nothing,
            level => {
                let changed = if self.value != level {
                    Changed::Value
                } else {
                    Changed::Nothing
                };
                self.value = level;

                changed
            }
        }
    }

    /// Decays the value by one step unless it is already 0.
    ///
    /// Returns `true` if the value changed.
    pub fn decay(&mut self) -> bool {
        if self.value == 0 {
            return false;
        }

        self.value -= 1;

        true
    }
}

/// Returns the address of a VU message: the track as number,
/// along with the message channel and cable.
fn vu_address(msg: &ChannelMessage) -> Address {
    Address::new(msg.data1 >> 4, msg.channel_cable())
}

/// Matcher for the VU meter of one track.
#[derive(Clone, Copy, Debug)]
pub struct VuMatcher {
    pub address: Address,
}

impl VuMatcher {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl Matcher for VuMatcher {
    type Output = ValueMatch;

    fn try_match(&self, msg: &ChannelMessage) -> Option<ValueMatch> {
        if !Address::match_single(vu_address(msg), self.address) {
            return None;
        }

        Some(ValueMatch {
            value: msg.data1 & 0x0f,
        })
    }
}

/// Matcher for the VU meter of one track over multiple banks.
#[derive(Clone, Debug)]
pub struct BankableVuMatcher<const N: usize> {
    pub config: BankConfig<N>,
    pub address: Address,
}

impl<const N: usize> BankableVuMatcher<N> {
    pub fn new(config: BankConfig<N>, address: Address) -> Self {
        Self { config, address }
    }
}

impl<const N: usize> Matcher for BankableVuMatcher<N> {
    type Output = BankMatch;

    fn try_match(&self, msg: &ChannelMessage) -> Option<BankMatch> {
        let target = vu_address(msg);
        if !bank_index::is_bank_member(target, self.address, &self.config) {
            return None;
        }

        Some(BankMatch {
            value: msg.data1 & 0x0f,
            bank_index: bank_index::bank_index(target, self.address, &self.config),
        })
    }
}

impl<const N: usize> BankableMatcher<N> for BankableVuMatcher<N> {
    fn config(&self) -> &BankConfig<N> {
        &self.config
    }
}

/// Builds a VU message for `track` [0, 7] on `chan`.
pub fn vu_msg(chan: midi::Channel, track: u8, level: u8) -> ChannelMessage {
    ChannelMessage::new(
        midi::MsgType::ChannelPressure,
        chan,
        ((track & 0x07) << 4) | (level & 0x0f),
        0,
    )
}
