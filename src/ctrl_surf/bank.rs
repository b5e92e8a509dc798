use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

use super::Error;

/// Which field of an [`Address`](super::Address) changes across bank settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BankType {
    ChangeAddress,
    ChangeChannel,
    ChangeCable,
}

/// A bank with `N` settings, each spanning `tracks_per_bank` address units.
///
/// The selection is owned by whatever bank-selection logic drives it.
/// Input elements only read it.
#[derive(Debug)]
pub struct Bank<const N: usize> {
    tracks_per_bank: u8,
    selection: AtomicU8,
}

impl<const N: usize> Bank<N> {
    pub const SIZE: usize = N;

    /// Builds a `Bank` with the first setting selected.
    ///
    /// `N x tracks_per_bank` must not exceed 128 so that an address located
    /// before the base address wraps beyond the bank span.
    pub fn try_new(tracks_per_bank: u8) -> Result<Self, Error> {
        if N == 0 {
            return Err(Error::NoBankSettings);
        }
        if tracks_per_bank == 0 {
            return Err(Error::NoTracksPerBank);
        }
        if N * usize::from(tracks_per_bank) > 128 {
            return Err(Error::BankTooLarge {
                banks: N,
                tracks_per_bank,
            });
        }

        Ok(Self {
            tracks_per_bank,
            selection: AtomicU8::new(0),
        })
    }

    pub fn tracks_per_bank(&self) -> u8 {
        self.tracks_per_bank
    }

    /// Number of address units covered by all the bank settings.
    pub fn span(&self) -> usize {
        N * usize::from(self.tracks_per_bank)
    }

    /// Returns the current selection, always < `N`.
    pub fn selection(&self) -> u8 {
        self.selection.load(Ordering::Relaxed)
    }

    pub fn select(&self, selection: u8) -> Result<(), Error> {
        if usize::from(selection) >= N {
            return Err(Error::InvalidSelection {
                selection,
                banks: N,
            });
        }

        let prev = self.selection.swap(selection, Ordering::Relaxed);
        if prev != selection {
            log::debug!("Bank selection {prev} -> {selection}");
        }

        Ok(())
    }
}

/// A shared [`Bank`] and the way it changes addresses.
#[derive(Clone, Debug)]
pub struct BankConfig<const N: usize> {
    bank: Arc<Bank<N>>,
    bank_type: BankType,
}

impl<const N: usize> BankConfig<N> {
    pub fn new(bank: Arc<Bank<N>>, bank_type: BankType) -> Self {
        Self { bank, bank_type }
    }

    pub fn bank(&self) -> &Bank<N> {
        &self.bank
    }

    pub fn bank_type(&self) -> BankType {
        self.bank_type
    }

    pub fn selection(&self) -> u8 {
        self.bank.selection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_validation() {
        assert!(matches!(Bank::<0>::try_new(4), Err(Error::NoBankSettings)));
        assert!(matches!(Bank::<2>::try_new(0), Err(Error::NoTracksPerBank)));
        assert!(matches!(
            Bank::<16>::try_new(9),
            Err(Error::BankTooLarge { .. })
        ));

        let bank = Bank::<16>::try_new(8).unwrap();
        assert_eq!(bank.span(), 128);
        assert_eq!(Bank::<16>::SIZE, 16);
    }

    #[test]
    fn selection() {
        let bank = Arc::new(Bank::<4>::try_new(8).unwrap());
        let config = BankConfig::new(bank.clone(), BankType::ChangeAddress);
        assert_eq!(config.selection(), 0);

        bank.select(3).unwrap();
        assert_eq!(config.selection(), 3);

        assert!(matches!(
            bank.select(4),
            Err(Error::InvalidSelection {
                selection: 4,
                banks: 4
            })
        ));
        assert_eq!(config.selection(), 3);
    }
}
