use super::InputElement;
use crate::{
    ctrl_surf::{
        matcher::{BankMatch, BankableMatcher, Matcher},
        protocol::mackie::{decay, vu, BankableVuMatcher, Changed, VuMatcher, VuState},
        timer::{Clock, IntervalTimer, Timer},
        Address, BankConfig, ChannelCable, Error,
    },
    midi::{ChannelMessage, MsgType},
};

/// Construction parameters of a VU meter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VuConfig {
    /// Zero-based track index.
    track: u8,
    channel_cable: ChannelCable,
    decay: u32,
}

impl Default for VuConfig {
    fn default() -> Self {
        Self {
            track: 0,
            channel_cable: ChannelCable::default(),
            decay: decay::DEFAULT,
        }
    }
}

impl VuConfig {
    /// Builds a `VuConfig`.
    ///
    /// - `track`: the track of the VU meter [1, 8].
    /// - `decay`: time in ms it takes for the value to decay one step.
    ///   Use [`decay::HOLD`] for software which doesn't expect
    ///   the meter to decay automatically.
    pub fn try_new(track: u8, channel_cable: ChannelCable, decay: u32) -> Result<Self, Error> {
        if !(1..=vu::TRACK_COUNT).contains(&track) {
            return Err(Error::InvalidTrack(track));
        }

        Ok(Self {
            track: track - 1,
            channel_cable,
            decay,
        })
    }

    /// Config for `track` [1, 8] on channel 1, cable 1, with the default decay.
    pub fn for_track(track: u8) -> Result<Self, Error> {
        Self::try_new(track, ChannelCable::default(), decay::DEFAULT)
    }

    #[must_use]
    pub fn with_decay(mut self, decay: u32) -> Self {
        self.decay = decay;
        self
    }

    #[must_use]
    pub fn with_channel_cable(mut self, channel_cable: ChannelCable) -> Self {
        self.channel_cable = channel_cable;
        self
    }

    /// The track [1, 8].
    pub fn track(&self) -> u8 {
        self.track + 1
    }

    pub fn channel_cable(&self) -> ChannelCable {
        self.channel_cable
    }

    pub fn decay(&self) -> u32 {
        self.decay
    }

    pub fn address(&self) -> Address {
        Address::new(self.track, self.channel_cable)
    }
}

fn normalize(position: u8) -> f32 {
    f32::from(position) / f32::from(vu::MAX_LEVEL)
}

/// A Mackie Control Universal VU meter.
#[derive(Debug)]
pub struct Vu<T: IntervalTimer = Timer> {
    matcher: VuMatcher,
    state: VuState,
    dirty: bool,
    decay_timer: T,
}

impl Vu {
    pub fn new(config: VuConfig) -> Self {
        Self::with_timer(config, Timer::new(config.decay()))
    }
}

impl<C: Clock> Vu<Timer<C>> {
    pub fn with_clock(config: VuConfig, clock: C) -> Self {
        Self::with_timer(config, Timer::with_clock(config.decay(), clock))
    }
}

impl<T: IntervalTimer> Vu<T> {
    /// Builds a `Vu` decaying on `decay_timer`'s interval
    /// instead of `config.decay()`.
    pub fn with_timer(config: VuConfig, decay_timer: T) -> Self {
        Self {
            matcher: VuMatcher::new(config.address()),
            state: VuState::default(),
            dirty: true,
            decay_timer,
        }
    }

    /// The most recent position [0, 12].
    pub fn position(&self) -> u8 {
        self.state.value()
    }

    /// Same as [`Vu::position`].
    pub fn value(&self) -> u8 {
        self.position()
    }

    pub fn overload(&self) -> bool {
        self.state.overload()
    }

    /// The most recent position in [0, 1].
    pub fn normalized_position(&self) -> f32 {
        normalize(self.position())
    }

    fn handle_match(&mut self, data: u8) {
        match self.state.update(data) {
            Changed::Nothing => return,
            Changed::Value => {
                // Decay one interval after the latest value.
                self.decay_timer.begin_next_period();
            }
            Changed::Overload => {
                log::trace!(
                    "VU track {} overload {}",
                    self.matcher.address.number() + 1,
                    self.state.overload(),
                );
            }
        }

        self.dirty = true;
    }
}

impl<T: IntervalTimer> InputElement for Vu<T> {
    fn handle(&mut self, msg: &ChannelMessage) -> bool {
        if msg.msg_type != MsgType::ChannelPressure {
            return false;
        }

        match self.matcher.try_match(msg) {
            Some(found) => {
                self.handle_match(found.value);
                true
            }
            None => false,
        }
    }

    fn update(&mut self) {
        if self.decay_timer.interval() != decay::HOLD && self.decay_timer.fire() {
            self.dirty |= self.state.decay();
        }
    }

    fn reset(&mut self) {
        log::debug!("Resetting VU track {}", self.matcher.address.number() + 1);

        self.state = VuState::default();
        self.dirty = true;
    }

    fn dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

/// A Mackie Control Universal VU meter with `N` banks.
///
/// Every bank keeps its own state and decays, but only the active bank
/// marks the element dirty and restarts the decay timer.
#[derive(Debug)]
pub struct BankableVu<const N: usize, T: IntervalTimer = Timer> {
    matcher: BankableVuMatcher<N>,
    states: [VuState; N],
    dirty: bool,
    decay_timer: T,
}

impl<const N: usize> BankableVu<N> {
    pub fn new(bank_config: BankConfig<N>, config: VuConfig) -> Self {
        Self::with_timer(bank_config, config, Timer::new(config.decay()))
    }
}

impl<const N: usize, C: Clock> BankableVu<N, Timer<C>> {
    pub fn with_clock(bank_config: BankConfig<N>, config: VuConfig, clock: C) -> Self {
        Self::with_timer(
            bank_config,
            config,
            Timer::with_clock(config.decay(), clock),
        )
    }
}

impl<const N: usize, T: IntervalTimer> BankableVu<N, T> {
    /// Builds a `BankableVu` decaying on `decay_timer`'s interval
    /// instead of `config.decay()`.
    pub fn with_timer(bank_config: BankConfig<N>, config: VuConfig, decay_timer: T) -> Self {
        Self {
            matcher: BankableVuMatcher::new(bank_config, config.address()),
            states: [VuState::default(); N],
            dirty: true,
            decay_timer,
        }
    }

    pub fn active_bank(&self) -> usize {
        usize::from(self.matcher.selection())
    }

    pub fn bank_size(&self) -> usize {
        N
    }

    /// The most recent position [0, 12] for the active bank.
    pub fn position(&self) -> u8 {
        self.states[self.active_bank()].value()
    }

    /// Same as [`BankableVu::position`].
    pub fn value(&self) -> u8 {
        self.position()
    }

    /// The overload indicator for the active bank.
    pub fn overload(&self) -> bool {
        self.states[self.active_bank()].overload()
    }

    /// The most recent position in [0, 1] for the active bank.
    pub fn normalized_position(&self) -> f32 {
        normalize(self.position())
    }

    /// The most recent position for `bank`, `None` if `bank >= N`.
    pub fn bank_position(&self, bank: usize) -> Option<u8> {
        self.states.get(bank).map(VuState::value)
    }

    /// The overload indicator for `bank`, `None` if `bank >= N`.
    pub fn bank_overload(&self, bank: usize) -> Option<bool> {
        self.states.get(bank).map(VuState::overload)
    }

    fn handle_match(&mut self, found: BankMatch) {
        let bank_index = usize::from(found.bank_index);
        let active = self.active_bank();

        let state = match self.states.get_mut(bank_index) {
            Some(state) => state,
            None => return,
        };

        let changed = state.update(found.value);
        if changed == Changed::Nothing || bank_index != active {
            return;
        }

        if changed == Changed::Value {
            self.decay_timer.begin_next_period();
        }

        self.dirty = true;
    }
}

impl<const N: usize, T: IntervalTimer> InputElement for BankableVu<N, T> {
    fn handle(&mut self, msg: &ChannelMessage) -> bool {
        if msg.msg_type != MsgType::ChannelPressure {
            return false;
        }

        match self.matcher.try_match(msg) {
            Some(found) => {
                self.handle_match(found);
                true
            }
            None => false,
        }
    }

    fn update(&mut self) {
        if self.decay_timer.interval() == decay::HOLD || !self.decay_timer.fire() {
            return;
        }

        let active = self.active_bank();
        for (idx, state) in self.states.iter_mut().enumerate() {
            if state.decay() && idx == active {
                self.dirty = true;
            }
        }
    }

    fn reset(&mut self) {
        log::debug!(
            "Resetting bankable VU track {}",
            self.matcher.address.number() + 1
        );

        self.states = [VuState::default(); N];
        self.dirty = true;
    }

    fn dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ctrl_surf::{protocol::mackie::vu_msg, timer::ManualClock, Bank, BankType},
        midi::{Cable, Channel},
    };
    use std::sync::Arc;

    fn level(track: u8, level: u8) -> ChannelMessage {
        vu_msg(Channel::from(0), track, level)
    }

    fn vu(decay: u32) -> (ManualClock, Vu<Timer<ManualClock>>) {
        let clock = ManualClock::new();
        let config = VuConfig::for_track(1).unwrap().with_decay(decay);
        (clock.clone(), Vu::with_clock(config, clock))
    }

    fn bankable_vu() -> (
        ManualClock,
        Arc<Bank<2>>,
        BankableVu<2, Timer<ManualClock>>,
    ) {
        let clock = ManualClock::new();
        let bank = Arc::new(Bank::<2>::try_new(4).unwrap());
        let bank_config = BankConfig::new(bank.clone(), BankType::ChangeAddress);
        let vu = BankableVu::with_clock(bank_config, VuConfig::for_track(1).unwrap(), clock.clone());

        (clock, bank, vu)
    }

    #[test]
    fn config_bounds() {
        assert!(matches!(VuConfig::for_track(0), Err(Error::InvalidTrack(0))));
        assert!(matches!(VuConfig::for_track(9), Err(Error::InvalidTrack(9))));

        let config = VuConfig::for_track(8).unwrap();
        assert_eq!(config.track(), 8);
        assert_eq!(config.address().number(), 7);
        assert_eq!(config.decay(), decay::DEFAULT);
        assert_eq!(VuConfig::default(), VuConfig::for_track(1).unwrap());
    }

    #[test]
    fn round_trip() {
        let (_clock, mut vu) = vu(decay::DEFAULT);
        assert!(vu.dirty());
        vu.clear_dirty();

        assert!(vu.handle(&level(0, 0x05)));
        assert_eq!(vu.position(), 5);
        assert!(vu.dirty());
        vu.clear_dirty();

        assert!(vu.handle(&level(0, 0x0e)));
        assert!(vu.overload());
        assert!(vu.dirty());
        vu.clear_dirty();

        assert!(vu.handle(&level(0, 0x0f)));
        assert!(vu.dirty());
        assert_eq!(vu.position(), 5);
        assert_eq!(vu.value(), 5);
        assert!(!vu.overload());
    }

    #[test]
    fn unchanged_value_is_not_dirty() {
        let (_clock, mut vu) = vu(decay::DEFAULT);
        vu.handle(&level(0, 0x05));
        vu.clear_dirty();

        assert!(vu.handle(&level(0, 0x05)));
        assert!(vu.handle(&level(0, 0x0d)));
        assert!(vu.handle(&level(0, 0x0f)));
        assert!(!vu.dirty());
    }

    #[test]
    fn ignores_other_messages() {
        let (_clock, mut vu) = vu(decay::DEFAULT);
        vu.clear_dirty();

        assert!(!vu.handle(&level(1, 0x05)));
        assert!(!vu.handle(&vu_msg(Channel::from(1), 0, 0x05)));
        let note_on = ChannelMessage::new(MsgType::NoteOn, Channel::from(0), 0x05, 0x7f);
        assert!(!vu.handle(&note_on));

        assert_eq!(vu.position(), 0);
        assert!(!vu.dirty());
    }

    #[test]
    fn normalized_position() {
        let (_clock, mut vu) = vu(decay::HOLD);
        assert_eq!(vu.normalized_position(), 0.0);
        vu.handle(&level(0, 6));
        assert_eq!(vu.normalized_position(), 0.5);
        vu.handle(&level(0, 12));
        assert_eq!(vu.normalized_position(), 1.0);
    }

    #[test]
    fn decays_after_interval() {
        let (clock, mut vu) = vu(150);
        vu.handle(&level(0, 3));
        vu.clear_dirty();

        clock.advance(149);
        vu.update();
        assert_eq!(vu.position(), 3);
        assert!(!vu.dirty());

        clock.advance(1);
        vu.update();
        assert_eq!(vu.position(), 2);
        assert!(vu.dirty());

        for _ in 0..4 {
            clock.advance(150);
            vu.update();
        }
        assert_eq!(vu.position(), 0);

        vu.clear_dirty();
        clock.advance(150);
        vu.update();
        assert!(!vu.dirty());
    }

    #[test]
    fn new_value_restarts_decay() {
        let (clock, mut vu) = vu(150);
        vu.handle(&level(0, 5));

        clock.advance(100);
        vu.handle(&level(0, 6));

        clock.advance(100);
        vu.update();
        assert_eq!(vu.position(), 6);

        clock.advance(50);
        vu.update();
        assert_eq!(vu.position(), 5);
    }

    #[test]
    fn overload_doesnt_restart_decay() {
        let (clock, mut vu) = vu(150);
        vu.handle(&level(0, 5));

        clock.advance(100);
        vu.handle(&level(0, 0x0e));

        clock.advance(50);
        vu.update();
        assert_eq!(vu.position(), 4);
        assert!(vu.overload());
    }

    #[test]
    fn hold_never_decays() {
        let (clock, mut vu) = vu(decay::HOLD);
        vu.handle(&level(0, 12));
        vu.clear_dirty();

        for _ in 0..100 {
            clock.advance(1_000);
            vu.update();
        }

        assert_eq!(vu.position(), 12);
        assert!(!vu.dirty());
    }

    #[test]
    fn reset() {
        let (_clock, mut vu) = vu(decay::DEFAULT);
        vu.handle(&level(0, 9));
        vu.handle(&level(0, 0x0e));
        vu.clear_dirty();

        vu.reset();
        assert_eq!(vu.position(), 0);
        assert!(!vu.overload());
        assert!(vu.dirty());
    }

    #[test]
    fn bankable_dispatches_to_banks() {
        let (_clock, bank, mut vu) = bankable_vu();
        assert_eq!(vu.bank_size(), 2);

        assert!(vu.handle(&level(0, 3)));
        assert!(vu.handle(&level(4, 7)));
        assert!(!vu.handle(&level(1, 7)));

        assert_eq!(vu.bank_position(0), Some(3));
        assert_eq!(vu.bank_position(1), Some(7));
        assert_eq!(vu.bank_position(2), None);
        assert_eq!(vu.position(), 3);

        bank.select(1).unwrap();
        assert_eq!(vu.active_bank(), 1);
        assert_eq!(vu.position(), 7);
        assert_eq!(vu.value(), 7);
    }

    #[test]
    fn bankable_inactive_bank_isnt_dirty() {
        let (_clock, _bank, mut vu) = bankable_vu();
        vu.clear_dirty();

        assert!(vu.handle(&level(4, 7)));
        assert!(vu.handle(&level(4, 0x0e)));
        assert_eq!(vu.bank_position(1), Some(7));
        assert_eq!(vu.bank_overload(1), Some(true));
        assert!(!vu.overload());
        assert!(!vu.dirty());

        assert!(vu.handle(&level(0, 0x0e)));
        assert!(vu.overload());
        assert!(vu.dirty());
    }

    #[test]
    fn bankable_inactive_bank_doesnt_restart_decay() {
        let (clock, _bank, mut vu) = bankable_vu();
        vu.handle(&level(0, 5));

        clock.advance(100);
        vu.handle(&level(4, 7));
        vu.clear_dirty();

        clock.advance(50);
        vu.update();
        assert_eq!(vu.bank_position(0), Some(4));
        assert_eq!(vu.bank_position(1), Some(6));
        assert!(vu.dirty());
    }

    #[test]
    fn bankable_inactive_decay_isnt_dirty() {
        let (clock, _bank, mut vu) = bankable_vu();
        vu.handle(&level(4, 3));
        vu.clear_dirty();

        clock.advance(150);
        vu.update();
        assert_eq!(vu.bank_position(1), Some(2));
        assert_eq!(vu.position(), 0);
        assert!(!vu.dirty());
    }

    #[test]
    fn bankable_change_cable() {
        let bank = Arc::new(Bank::<2>::try_new(1).unwrap());
        let bank_config = BankConfig::new(bank.clone(), BankType::ChangeCable);
        let mut vu = BankableVu::with_clock(
            bank_config,
            VuConfig::for_track(2).unwrap(),
            ManualClock::new(),
        );

        let on = |chan: u8, cable: u8, level: u8| {
            vu_msg(Channel::from(chan), 1, level).with_cable(Cable::from(cable))
        };

        assert!(vu.handle(&on(0, 0, 4)));
        assert!(vu.handle(&on(0, 1, 9)));
        assert!(!vu.handle(&on(0, 2, 9)));
        assert!(!vu.handle(&on(1, 1, 9)));
        assert!(!vu.handle(&level(0, 9).with_cable(Cable::from(1))));

        assert_eq!(vu.bank_position(0), Some(4));
        assert_eq!(vu.bank_position(1), Some(9));
        assert_eq!(vu.position(), 4);

        bank.select(1).unwrap();
        assert_eq!(vu.position(), 9);
    }

    #[test]
    fn bankable_reset() {
        let (_clock, _bank, mut vu) = bankable_vu();
        vu.handle(&level(0, 3));
        vu.handle(&level(4, 0x0e));
        vu.clear_dirty();

        vu.reset();
        assert_eq!(vu.bank_position(0), Some(0));
        assert_eq!(vu.bank_overload(1), Some(false));
        assert!(vu.dirty());
    }
}
