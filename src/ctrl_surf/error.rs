#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid track {}, expected [1, 8]", .0)]
    InvalidTrack(u8),

    #[error("Invalid channel {}, expected [1, 16]", .0)]
    InvalidChannel(u8),

    #[error("Invalid cable {}, expected [1, 16]", .0)]
    InvalidCable(u8),

    #[error("Invalid address {}, expected [0, 127]", .0)]
    InvalidAddress(u8),

    #[error("A bank needs at least one bank setting")]
    NoBankSettings,

    #[error("A bank needs at least one track per bank")]
    NoTracksPerBank,

    #[error("Bank spans {banks} x {tracks_per_bank} addresses, max is 128")]
    BankTooLarge { banks: usize, tracks_per_bank: u8 },

    #[error("Bank selection {selection} out of range for {banks} banks")]
    InvalidSelection { selection: u8, banks: usize },
}
