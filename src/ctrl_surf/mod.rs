pub mod address;
pub use address::{Address, ChannelCable};

pub mod bank;
pub use bank::{Bank, BankConfig, BankType};

pub mod bank_index;

pub mod element;
pub use element::{BankableVu, InputElement, Vu, VuConfig};

pub mod error;
pub use error::Error;

pub mod matcher;
pub use matcher::{BankableMatcher, Matcher};

pub mod protocol;
pub use protocol::mackie::{decay, Changed, VuState};

pub mod timer;
pub use timer::{Clock, IntervalTimer, Timer};
