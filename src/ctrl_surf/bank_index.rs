//! Bank membership and bank index of addresses relative to a base address.
//!
//! Consider a bank with 4 tracks per bank (T), 2 bank settings (N)
//! and a base address of 3:
//!
//! ```text
//! 0   1   2   3   4   5   6   7   8   9  10  11  12  ...
//! .   .   .   x   .   .   .   x   .   .   .   .   .  ...
//! ```
//!
//! - Addresses before the base address don't match (0, 1, 2).
//! - Addresses at or beyond base + N x T don't match (11, 12, ...).
//! - Addresses at a distance from the base which is not a multiple of T
//!   don't match (4, 5, 6, 8, 9, 10).
//!
//! Differences are computed with wrapping `u8` arithmetic: an address before
//! the base wraps to a difference beyond the bank span, which
//! [`Bank::try_new`](super::Bank::try_new) keeps at most 128.

use super::{Address, Bank, BankConfig, BankType};

/// Returns the bank setting `target` belongs to.
///
/// Only meaningful if [`is_bank_member`] or [`is_bank_member_in_range`]
/// returned `true` for the same addresses.
pub fn bank_index<const N: usize>(target: Address, base: Address, config: &BankConfig<N>) -> u8 {
    let bank_type = config.bank_type();
    let diff = target.field(bank_type).wrapping_sub(base.field(bank_type));

    diff / config.bank().tracks_per_bank()
}

/// Returns the index of `target` in the range starting at `base`.
///
/// When the address changes across bank settings, the difference also
/// encodes the bank, which is stripped out.
pub fn range_index<const N: usize>(target: Address, base: Address, config: &BankConfig<N>) -> u8 {
    let diff = target.number().wrapping_sub(base.number());
    match config.bank_type() {
        BankType::ChangeAddress => diff % config.bank().tracks_per_bank(),
        BankType::ChangeChannel | BankType::ChangeCable => diff,
    }
}

/// Checks whether `target` is one of the addresses `base` maps to
/// across bank settings.
pub fn is_bank_member<const N: usize>(
    target: Address,
    base: Address,
    config: &BankConfig<N>,
) -> bool {
    if !target.is_valid() || !base.is_valid() {
        return false;
    }

    let bank_type = config.bank_type();
    target.same_except(base, bank_type)
        && match_bankable(target.field(bank_type), base.field(bank_type), config.bank())
}

/// Checks whether `target` is part of the `length` addresses range starting
/// at `base`, for any bank setting.
pub fn is_bank_member_in_range<const N: usize>(
    target: Address,
    base: Address,
    length: u8,
    config: &BankConfig<N>,
) -> bool {
    if !target.is_valid() || !base.is_valid() {
        return false;
    }

    let bank = config.bank();
    match config.bank_type() {
        BankType::ChangeAddress => {
            target.channel_cable() == base.channel_cable()
                && match_bankable_in_range(target.number(), base.number(), length, bank)
        }
        BankType::ChangeChannel => {
            in_range(target.number(), base.number(), length)
                && target.cable() == base.cable()
                && match_bankable(target.channel().into(), base.channel().into(), bank)
        }
        BankType::ChangeCable => {
            in_range(target.number(), base.number(), length)
                && target.channel() == base.channel()
                && match_bankable(target.cable().into(), base.cable().into(), bank)
        }
    }
}

fn match_bankable<const N: usize>(to_match: u8, base: u8, bank: &Bank<N>) -> bool {
    let diff = to_match.wrapping_sub(base);
    usize::from(diff) < bank.span() && diff % bank.tracks_per_bank() == 0
}

fn match_bankable_in_range<const N: usize>(
    to_match: u8,
    base: u8,
    length: u8,
    bank: &Bank<N>,
) -> bool {
    let diff = to_match.wrapping_sub(base);
    usize::from(diff) < bank.span() && diff % bank.tracks_per_bank() < length
}

fn in_range(to_match: u8, base: u8, length: u8) -> bool {
    base <= to_match && to_match - base < length
}
