//! Matchers for incoming channel messages.
//!
//! A matcher either rejects a message (`None`) or decodes the value and,
//! for range and bankable matchers, the position of the message's address.

use super::{bank_index, Address, Bank, BankConfig, BankType, ChannelCable};
use crate::midi::{ChannelMessage, MsgType};

pub trait Matcher {
    type Output;

    fn try_match(&self, msg: &ChannelMessage) -> Option<Self::Output>;
}

/// Common interface of matchers addressing multiple banks.
pub trait BankableMatcher<const N: usize>: Matcher {
    fn config(&self) -> &BankConfig<N>;

    fn bank(&self) -> &Bank<N> {
        self.config().bank()
    }

    fn bank_type(&self) -> BankType {
        self.config().bank_type()
    }

    fn bank_size(&self) -> usize {
        N
    }

    /// Current bank selection, see [`Bank::selection`].
    fn selection(&self) -> u8 {
        self.config().selection()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ValueMatch {
    pub value: u8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RangeMatch {
    pub value: u8,
    pub index: u8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BankMatch {
    pub value: u8,
    pub bank_index: u8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BankRangeMatch {
    pub value: u8,
    pub bank_index: u8,
    pub range_index: u8,
}

/// Note Off is treated as Note On with a zero velocity.
fn two_byte_value(msg: &ChannelMessage) -> u8 {
    match msg.msg_type {
        MsgType::NoteOff => 0,
        _ => msg.data2,
    }
}

/// Matcher for messages with 1 data byte, such as Channel Pressure
/// and Program Change.
#[derive(Clone, Copy, Debug)]
pub struct OneByteMatcher {
    pub channel_cable: ChannelCable,
}

impl OneByteMatcher {
    pub fn new(channel_cable: ChannelCable) -> Self {
        Self { channel_cable }
    }
}

impl Matcher for OneByteMatcher {
    type Output = ValueMatch;

    fn try_match(&self, msg: &ChannelMessage) -> Option<ValueMatch> {
        (msg.channel_cable() == self.channel_cable).then(|| ValueMatch { value: msg.data1 })
    }
}

/// Matcher for messages with 2 data bytes, such as Note On/Off,
/// Control Change, Key Pressure. Matches a single address.
#[derive(Clone, Copy, Debug)]
pub struct TwoByteMatcher {
    pub address: Address,
}

impl TwoByteMatcher {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl Matcher for TwoByteMatcher {
    type Output = ValueMatch;

    fn try_match(&self, msg: &ChannelMessage) -> Option<ValueMatch> {
        if !Address::match_single(msg.address(), self.address) {
            return None;
        }

        Some(ValueMatch {
            value: two_byte_value(msg),
        })
    }
}

/// Matcher for messages with 2 data bytes. Matches a range of addresses
/// on a single channel and cable.
#[derive(Clone, Copy, Debug)]
pub struct TwoByteRangeMatcher {
    pub address: Address,
    pub length: u8,
}

impl TwoByteRangeMatcher {
    pub fn new(address: Address, length: u8) -> Self {
        Self { address, length }
    }
}

impl Matcher for TwoByteRangeMatcher {
    type Output = RangeMatch;

    fn try_match(&self, msg: &ChannelMessage) -> Option<RangeMatch> {
        let target = msg.address();
        if !Address::match_in_range(target, self.address, self.length) {
            return None;
        }

        Some(RangeMatch {
            value: two_byte_value(msg),
            index: target.number() - self.address.number(),
        })
    }
}

/// Matcher for messages with 2 data bytes. Matches a single address
/// over multiple banks.
#[derive(Clone, Debug)]
pub struct BankableTwoByteMatcher<const N: usize> {
    pub config: BankConfig<N>,
    pub address: Address,
}

impl<const N: usize> BankableTwoByteMatcher<N> {
    pub fn new(config: BankConfig<N>, address: Address) -> Self {
        Self { config, address }
    }
}

impl<const N: usize> Matcher for BankableTwoByteMatcher<N> {
    type Output = BankMatch;

    fn try_match(&self, msg: &ChannelMessage) -> Option<BankMatch> {
        let target = msg.address();
        if !bank_index::is_bank_member(target, self.address, &self.config) {
            return None;
        }

        Some(BankMatch {
            value: two_byte_value(msg),
            bank_index: bank_index::bank_index(target, self.address, &self.config),
        })
    }
}

impl<const N: usize> BankableMatcher<N> for BankableTwoByteMatcher<N> {
    fn config(&self) -> &BankConfig<N> {
        &self.config
    }
}

/// Matcher for messages with 2 data bytes. Matches a range of addresses
/// over multiple banks.
#[derive(Clone, Debug)]
pub struct BankableTwoByteRangeMatcher<const N: usize> {
    pub config: BankConfig<N>,
    pub address: Address,
    pub length: u8,
}

impl<const N: usize> BankableTwoByteRangeMatcher<N> {
    pub fn new(config: BankConfig<N>, address: Address, length: u8) -> Self {
        Self {
            config,
            address,
            length,
        }
    }
}

impl<const N: usize> Matcher for BankableTwoByteRangeMatcher<N> {
    type Output = BankRangeMatch;

    fn try_match(&self, msg: &ChannelMessage) -> Option<BankRangeMatch> {
        let target = msg.address();
        if !bank_index::is_bank_member_in_range(target, self.address, self.length, &self.config)
        {
            return None;
        }

        Some(BankRangeMatch {
            value: two_byte_value(msg),
            bank_index: bank_index::bank_index(target, self.address, &self.config),
            range_index: bank_index::range_index(target, self.address, &self.config),
        })
    }
}

impl<const N: usize> BankableMatcher<N> for BankableTwoByteRangeMatcher<N> {
    fn config(&self) -> &BankConfig<N> {
        &self.config
    }
}
