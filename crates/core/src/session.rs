//! Draw session
//!
//! The context object the host creates when an event starts and drops at
//! teardown. It owns the roster, prizes, blacklist, winners, the frozen
//! wheel layout, the animator, the phase machine and the random source, and
//! mediates every write to win history and prize stock.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::WheelConfig;
use crate::draw::select_winner;
use crate::error::{Error, Result, SpinRefusal};
use crate::game::{GamePhase, GameStateMachine, LandingOutcome};
use crate::history::UndoHistory;
use crate::invariants::{assert_layout_invariants, assert_prize_invariants, assert_roster_invariants};
use crate::models::{
    Blacklist, DrawNumber, DrawSnapshot, EventState, Participant, Prize, WheelSegment, WinRecord,
    WonNumbers,
};
use crate::random::RandomSource;
use crate::segments::{pick_target_index, SegmentBuilder};
use crate::spin::{Landing, RotationState, SpinAnimator, SpinObserver};

/// Accepted spin request
#[derive(Debug, Clone, PartialEq)]
pub struct SpinTicket {
    pub winner: DrawNumber,
    pub target_index: usize,
    pub prize_id: String,
    pub duration: Duration,
}

/// Result of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUpdate {
    pub rotation: RotationState,
    /// Set on the frame the wheel stopped
    pub landing: Option<LandingOutcome>,
    /// Set on the frame the winner popup should open
    pub reveal: Option<DrawNumber>,
}

/// Forwards animator events and remembers the landing
struct LandingCapture<'a> {
    inner: &'a mut dyn SpinObserver,
    landing: Option<Landing>,
}

impl SpinObserver for LandingCapture<'_> {
    fn on_tick(&mut self) {
        self.inner.on_tick();
    }

    fn on_landed(&mut self, landing: &Landing) {
        self.landing = Some(landing.clone());
        self.inner.on_landed(landing);
    }
}

pub struct DrawSession {
    participants: Vec<Participant>,
    prizes: Vec<Prize>,
    blacklist: Blacklist,
    won: WonNumbers,
    win_history: Vec<WinRecord>,
    history: UndoHistory<DrawSnapshot>,
    selected_prize: Option<String>,
    builder: SegmentBuilder,
    segments: Vec<WheelSegment>,
    layout_dirty: bool,
    animator: SpinAnimator,
    game: GameStateMachine,
    rng: Box<dyn RandomSource>,
}

impl DrawSession {
    pub fn new(config: &WheelConfig, state: EventState, rng: Box<dyn RandomSource>) -> Self {
        let mut session = Self {
            participants: Vec::new(),
            prizes: Vec::new(),
            blacklist: Blacklist::new(),
            won: WonNumbers::new(),
            win_history: Vec::new(),
            history: UndoHistory::new(),
            selected_prize: None,
            builder: SegmentBuilder::new(config.palette.clone()),
            segments: Vec::new(),
            layout_dirty: false,
            animator: SpinAnimator::new(config.spin.clone()),
            game: GameStateMachine::new(config.reveal.delay()),
            rng,
        };
        session.load_state(state);
        session
    }

    fn load_state(&mut self, state: EventState) {
        assert_roster_invariants(&state.participants);
        self.participants = state.participants;
        self.prizes = state.prizes;
        self.blacklist = state.blacklist;
        self.won = state.won_numbers;
        self.win_history = state.win_history;
        self.history.clear();
        if let Some(id) = &self.selected_prize {
            if !self.prizes.iter().any(|p| &p.id == id) {
                self.selected_prize = None;
            }
        }
        self.rebuild_layout();
    }

    // ---- queries -------------------------------------------------------

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    pub fn won_numbers(&self) -> &WonNumbers {
        &self.won
    }

    /// Newest first
    pub fn win_history(&self) -> &[WinRecord] {
        &self.win_history
    }

    /// Current wheel layout. Stable for the whole duration of a spin.
    pub fn segments(&self) -> &[WheelSegment] {
        &self.segments
    }

    pub fn phase(&self) -> &GamePhase {
        self.game.phase()
    }

    pub fn is_spinning(&self) -> bool {
        self.animator.is_spinning()
    }

    /// Wedge the active spin aims at
    pub fn target_index(&self) -> Option<usize> {
        self.animator.target_index()
    }

    pub fn animator(&self) -> &SpinAnimator {
        &self.animator
    }

    /// Wedge under the pointer right now, for the live readout
    pub fn segment_at_pointer(&self) -> Option<&WheelSegment> {
        self.animator.segment_at_pointer(&self.segments)
    }

    pub fn selected_prize(&self) -> Option<&Prize> {
        let id = self.selected_prize.as_ref()?;
        self.prizes.iter().find(|p| &p.id == id)
    }

    pub fn participant_by_number(&self, number: DrawNumber) -> Option<&Participant> {
        self.participants.iter().find(|p| p.number == number)
    }

    /// Participant behind the number currently landed or revealed
    pub fn current_winner(&self) -> Option<&Participant> {
        match self.game.phase() {
            GamePhase::Landed { winner, .. } | GamePhase::Revealing { winner } => {
                self.participant_by_number(*winner)
            }
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.game.is_idle() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.game.is_idle() && self.history.can_redo()
    }

    /// Everything the host should persist
    pub fn export_state(&self) -> EventState {
        EventState {
            participants: self.participants.clone(),
            prizes: self.prizes.clone(),
            blacklist: self.blacklist.clone(),
            won_numbers: self.won.clone(),
            win_history: self.win_history.clone(),
        }
    }

    pub fn win_history_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.win_history)?)
    }

    // ---- drawing -------------------------------------------------------

    pub fn select_prize(&mut self, prize_id: &str) -> Result<()> {
        self.ensure_idle("change the selected prize")?;
        if !self.prizes.iter().any(|p| p.id == prize_id) {
            return Err(Error::NotFound(format!("prize {prize_id}")));
        }
        self.selected_prize = Some(prize_id.to_string());
        Ok(())
    }

    /// Idle -> Spinning. Refusals leave every piece of state untouched.
    pub fn request_spin(&mut self) -> std::result::Result<SpinTicket, SpinRefusal> {
        let result = self.try_spin();
        if let Err(refusal) = &result {
            warn!(reason = %refusal, "Spin refused");
        }
        result
    }

    fn try_spin(&mut self) -> std::result::Result<SpinTicket, SpinRefusal> {
        if !self.game.is_idle() || self.animator.is_spinning() {
            return Err(SpinRefusal::AlreadySpinning);
        }
        let prize = self.selected_prize().ok_or(SpinRefusal::NoPrizeSelected)?;
        if prize.is_exhausted() {
            return Err(SpinRefusal::PrizeExhausted);
        }
        let prize_id = prize.id.clone();

        let winner = select_winner(&self.participants, &self.blacklist, &self.won, self.rng.as_mut())
            .ok_or(SpinRefusal::NoEligibleWinners)?;

        if self.layout_dirty {
            self.rebuild_layout();
        }
        let target_index = pick_target_index(&self.segments, winner, self.rng.as_mut())
            .ok_or(SpinRefusal::DegenerateLayout)?;

        self.animator.release();
        let plan = self.animator.start_spin(&self.segments, target_index)?;
        self.game.begin_spin(winner, target_index)?;

        info!(winner = %winner, target_index, prize = %prize_id, "Spin accepted");
        Ok(SpinTicket {
            winner,
            target_index,
            prize_id,
            duration: plan.duration,
        })
    }

    /// Advance animation and phase timers by one frame
    pub fn advance(&mut self, delta: Duration, observer: &mut dyn SpinObserver) -> FrameUpdate {
        let mut capture = LandingCapture {
            inner: observer,
            landing: None,
        };
        let rotation = self.animator.advance(delta, &mut capture);

        let mut update = FrameUpdate {
            rotation,
            landing: None,
            reveal: None,
        };

        if let Some(landing) = capture.landing {
            let outcome = self.game.on_landed(landing.value, &self.blacklist);
            if let Some(LandingOutcome::Voided(_)) = outcome {
                self.return_to_idle();
            }
            if self.game.is_revealing() {
                update.reveal = Some(landing.value);
            }
            update.landing = outcome;
        } else {
            update.reveal = self.game.advance(delta);
        }

        update
    }

    /// Operator dismissed the winner popup: record the win.
    ///
    /// Returns the new history entry, or `None` when nothing was being
    /// revealed. If the selected prize was deleted during the reveal the
    /// number still counts as won but no history entry is written.
    pub fn close_reveal(&mut self) -> Option<WinRecord> {
        let winner = self.game.close_reveal()?;

        self.history.record(self.snapshot());
        self.won.push(winner);
        self.layout_dirty = true;

        let record = match self.selected_prize.clone() {
            Some(prize_id) => match self.prizes.iter_mut().find(|p| p.id == prize_id) {
                Some(prize) => {
                    prize.decrement();
                    assert_prize_invariants(prize);
                    let participant = self.participants.iter().find(|p| p.number == winner);
                    Some(WinRecord::new(winner, participant, prize))
                }
                None => None,
            },
            None => None,
        };
        if let Some(record) = &record {
            info!(
                number = %record.participant_number,
                winner = %record.participant_name,
                prize = %record.prize_name,
                "Win confirmed"
            );
            self.win_history.insert(0, record.clone());
        } else {
            warn!(number = %winner, "Win confirmed without a prize to award");
        }

        self.game.finish();
        self.return_to_idle();
        record
    }

    pub fn undo(&mut self) -> bool {
        if !self.game.is_idle() {
            return false;
        }
        let current = self.snapshot();
        match self.history.undo(|| current) {
            Some(previous) => {
                self.restore(previous);
                info!(undo_depth = self.history.undo_depth(), "Undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if !self.game.is_idle() {
            return false;
        }
        let current = self.snapshot();
        match self.history.redo(|| current) {
            Some(next) => {
                self.restore(next);
                info!(redo_depth = self.history.redo_depth(), "Redo");
                true
            }
            None => false,
        }
    }

    // ---- admin ---------------------------------------------------------

    pub fn add_participant(&mut self, participant: Participant) -> Result<()> {
        if self.participants.iter().any(|p| p.id == participant.id) {
            return Err(Error::InvalidOperation(format!(
                "participant id {} already exists",
                participant.id
            )));
        }
        self.ensure_number_free(participant.number, None)?;
        self.participants.push(participant);
        self.invalidate_layout();
        Ok(())
    }

    /// A participant who already won keeps their draw number.
    pub fn update_participant(&mut self, participant: Participant) -> Result<()> {
        self.ensure_number_free(participant.number, Some(&participant.id))?;
        let existing = self
            .participants
            .iter_mut()
            .find(|p| p.id == participant.id)
            .ok_or_else(|| Error::NotFound(format!("participant {}", participant.id)))?;
        if existing.number != participant.number {
            let locked = [existing.number, participant.number]
                .into_iter()
                .find(|n| self.won.contains(*n));
            if let Some(number) = locked {
                return Err(Error::InvalidOperation(format!(
                    "draw number {number} is tied to a recorded win"
                )));
            }
        }
        *existing = participant;
        self.invalidate_layout();
        Ok(())
    }

    pub fn remove_participant(&mut self, id: &str) -> Result<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("participant {id}")))?;
        let removed = self.participants.remove(index);
        self.invalidate_layout();
        Ok(removed)
    }

    /// Empty the roster. Winners, history and undo/redo go with it.
    pub fn clear_participants(&mut self) -> Result<()> {
        self.ensure_idle("clear the roster")?;
        self.participants.clear();
        self.won.clear();
        self.win_history.clear();
        self.history.clear();
        self.rebuild_layout();
        Ok(())
    }

    pub fn add_prize(&mut self, prize: Prize) -> Result<()> {
        if self.prizes.iter().any(|p| p.id == prize.id) {
            return Err(Error::InvalidOperation(format!("prize id {} already exists", prize.id)));
        }
        assert_prize_invariants(&prize);
        self.prizes.push(prize);
        Ok(())
    }

    /// Replace name, info, color and stock of an existing prize
    pub fn update_prize(&mut self, prize: Prize) -> Result<()> {
        let existing = self
            .prizes
            .iter_mut()
            .find(|p| p.id == prize.id)
            .ok_or_else(|| Error::NotFound(format!("prize {}", prize.id)))?;
        existing.name = prize.name;
        existing.info = prize.info;
        existing.color = prize.color;
        existing.initial_quantity = existing.initial_quantity.max(prize.initial_quantity);
        existing.set_quantity(prize.quantity);
        assert_prize_invariants(existing);
        Ok(())
    }

    pub fn remove_prize(&mut self, id: &str) -> Result<Prize> {
        let index = self
            .prizes
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("prize {id}")))?;
        if self.selected_prize.as_deref() == Some(id) {
            self.selected_prize = None;
        }
        Ok(self.prizes.remove(index))
    }

    pub fn set_blacklist(&mut self, blacklist: Blacklist) {
        self.blacklist = blacklist;
        self.invalidate_layout();
    }

    pub fn blacklist_add(&mut self, number: DrawNumber) -> bool {
        let added = self.blacklist.insert(number);
        if added {
            self.invalidate_layout();
        }
        added
    }

    pub fn blacklist_remove(&mut self, number: DrawNumber) -> bool {
        let removed = self.blacklist.remove(number);
        if removed {
            self.invalidate_layout();
        }
        removed
    }

    /// Replace everything with a fresh state (factory reset, reload)
    pub fn reset(&mut self, state: EventState) -> Result<()> {
        self.ensure_idle("reset the event")?;
        self.animator.release();
        self.load_state(state);
        info!(participants = self.participants.len(), prizes = self.prizes.len(), "Event reset");
        Ok(())
    }

    // ---- internals -----------------------------------------------------

    fn ensure_idle(&self, action: &str) -> Result<()> {
        if self.game.is_idle() {
            Ok(())
        } else {
            Err(Error::InvalidOperation(format!(
                "cannot {action} while {}",
                self.game.phase().label()
            )))
        }
    }

    fn ensure_number_free(&self, number: DrawNumber, except_id: Option<&str>) -> Result<()> {
        if !number.is_valid() {
            return Err(Error::InvalidOperation("draw numbers start at 1".to_string()));
        }
        let taken = self
            .participants
            .iter()
            .any(|p| p.number == number && Some(p.id.as_str()) != except_id);
        if taken {
            return Err(Error::InvalidOperation(format!("draw number {number} is already assigned")));
        }
        Ok(())
    }

    fn snapshot(&self) -> DrawSnapshot {
        DrawSnapshot {
            won_numbers: self.won.clone(),
            win_history: self.win_history.clone(),
            prizes: self.prizes.clone(),
        }
    }

    fn restore(&mut self, snapshot: DrawSnapshot) {
        self.won = snapshot.won_numbers;
        self.win_history = snapshot.win_history;
        self.prizes = snapshot.prizes;
        self.rebuild_layout();
    }

    fn return_to_idle(&mut self) {
        self.animator.release();
        if self.layout_dirty {
            self.rebuild_layout();
        }
    }

    /// Rebuild now when idle; otherwise wait, so the wheel never reshuffles
    /// under a moving pointer or an open reveal.
    fn invalidate_layout(&mut self) {
        if self.game.is_idle() && !self.animator.is_spinning() {
            self.rebuild_layout();
        } else {
            debug!(phase = self.game.phase().label(), "Layout rebuild deferred");
            self.layout_dirty = true;
        }
    }

    fn rebuild_layout(&mut self) {
        self.segments = self
            .builder
            .build(&self.participants, &self.blacklist, &self.won, self.rng.as_mut());
        self.layout_dirty = false;
        assert_layout_invariants(&self.segments, &self.participants, &self.blacklist, &self.won);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SeededRandom, SequenceRandom};
    use crate::spin::NoopObserver;

    const FRAME: Duration = Duration::from_millis(16);

    #[derive(Default)]
    struct Counter {
        ticks: u32,
        landed: Vec<DrawNumber>,
    }

    impl SpinObserver for Counter {
        fn on_tick(&mut self) {
            self.ticks += 1;
        }

        fn on_landed(&mut self, landing: &Landing) {
            self.landed.push(landing.value);
        }
    }

    fn state() -> EventState {
        EventState {
            participants: vec![
                Participant::staff("s1", "Senior", 4, 1),
                Participant::guest("g2", "Guest", 2),
                Participant::staff("s3", "Junior", 1, 3),
            ],
            prizes: vec![Prize::new("Phone", 2, "#FFD700").with_id("phone")],
            ..EventState::default()
        }
    }

    fn session_with(state: EventState, seed: u64) -> DrawSession {
        DrawSession::new(&WheelConfig::default(), state, Box::new(SeededRandom::seeded(seed)))
    }

    fn spin_until_settled(session: &mut DrawSession, observer: &mut dyn SpinObserver) -> FrameUpdate {
        for _ in 0..10_000 {
            let update = session.advance(FRAME, observer);
            if update.landing.is_some() {
                return update;
            }
        }
        panic!("spin never landed");
    }

    #[test]
    fn test_refusals_leave_state_untouched() {
        let mut session = session_with(state(), 1);
        assert_eq!(session.request_spin(), Err(SpinRefusal::NoPrizeSelected));

        session.add_prize(Prize::new("Empty", 0, "#000000").with_id("empty")).unwrap();
        session.select_prize("empty").unwrap();
        assert_eq!(session.request_spin(), Err(SpinRefusal::PrizeExhausted));

        session.select_prize("phone").unwrap();
        session.set_blacklist(Blacklist::from([1, 2, 3]));
        assert_eq!(session.request_spin(), Err(SpinRefusal::NoEligibleWinners));
        assert!(session.phase() == &GamePhase::Idle);
        assert!(!session.is_spinning());
        assert_eq!(session.segments().len(), 4);
    }

    #[test]
    fn test_full_draw_cycle() {
        let mut session = session_with(state(), 7);
        session.select_prize("phone").unwrap();

        let ticket = session.request_spin().unwrap();
        assert!(session.is_spinning());
        assert_eq!(session.segments()[ticket.target_index].value, ticket.winner);
        assert_eq!(session.request_spin(), Err(SpinRefusal::AlreadySpinning));

        let mut counter = Counter::default();
        let update = spin_until_settled(&mut session, &mut counter);
        assert_eq!(update.landing, Some(LandingOutcome::Accepted(ticket.winner)));
        assert_eq!(update.reveal, Some(ticket.winner));
        assert_eq!(counter.landed, vec![ticket.winner]);
        assert!(counter.ticks > 0);
        assert_eq!(session.current_winner().map(|p| p.number), Some(ticket.winner));
        assert!(!session.can_undo());

        let record = session.close_reveal().unwrap();
        assert_eq!(record.participant_number, ticket.winner);
        assert_eq!(record.prize_name, "Phone");
        assert_eq!(session.prizes()[0].quantity, 1);
        assert!(session.won_numbers().contains(ticket.winner));
        assert_eq!(session.win_history().len(), 1);
        assert!(session.segments().iter().all(|s| s.value != ticket.winner));
        assert!(session.can_undo());
        assert!(session.phase() == &GamePhase::Idle);
    }

    #[test]
    fn test_undo_redo_restores_draw() {
        let mut session = session_with(state(), 3);
        session.select_prize("phone").unwrap();
        session.request_spin().unwrap();
        spin_until_settled(&mut session, &mut NoopObserver);
        let record = session.close_reveal().unwrap();

        assert!(session.undo());
        assert!(session.won_numbers().is_empty());
        assert!(session.win_history().is_empty());
        assert_eq!(session.prizes()[0].quantity, 2);
        assert_eq!(session.segments().len(), 4);
        assert!(!session.undo());

        assert!(session.redo());
        assert_eq!(session.win_history()[0], record);
        assert_eq!(session.prizes()[0].quantity, 1);
        assert!(!session.redo());
    }

    #[test]
    fn test_new_win_clears_redo() {
        let mut session = session_with(state(), 5);
        session.select_prize("phone").unwrap();
        session.request_spin().unwrap();
        spin_until_settled(&mut session, &mut NoopObserver);
        session.close_reveal().unwrap();
        assert!(session.undo());
        assert!(session.can_redo());

        session.request_spin().unwrap();
        spin_until_settled(&mut session, &mut NoopObserver);
        session.close_reveal().unwrap();
        assert!(!session.can_redo());
    }

    #[test]
    fn test_layout_frozen_during_spin() {
        let mut session = session_with(state(), 9);
        session.select_prize("phone").unwrap();
        session.request_spin().unwrap();
        let frozen = session.segments().to_vec();

        session
            .add_participant(Participant::guest("g4", "Late arrival", 4))
            .unwrap();
        session.advance(FRAME, &mut NoopObserver);
        assert_eq!(session.segments(), frozen.as_slice());

        spin_until_settled(&mut session, &mut NoopObserver);
        assert_eq!(session.segments(), frozen.as_slice());

        let record = session.close_reveal().unwrap();
        assert!(session.segments().iter().any(|s| s.value == DrawNumber(4)));
        assert!(session.segments().iter().all(|s| s.value != record.participant_number));
    }

    #[test]
    fn test_blacklisted_mid_spin_voids() {
        let mut session = session_with(state(), 11);
        session.select_prize("phone").unwrap();
        let ticket = session.request_spin().unwrap();

        assert!(session.blacklist_add(ticket.winner));
        let update = spin_until_settled(&mut session, &mut NoopObserver);

        assert_eq!(update.landing, Some(LandingOutcome::Voided(ticket.winner)));
        assert_eq!(update.reveal, None);
        assert!(session.phase() == &GamePhase::Idle);
        assert!(session.close_reveal().is_none());
        assert!(session.won_numbers().is_empty());
        assert_eq!(session.prizes()[0].quantity, 2);
        assert!(session
            .segments()
            .iter()
            .filter(|s| s.value == ticket.winner)
            .all(|s| s.is_blacklisted));
    }

    #[test]
    fn test_single_candidate_spin() {
        let mut state = state();
        state.blacklist = Blacklist::from([1, 3]);
        let mut session = DrawSession::new(
            &WheelConfig::default(),
            state,
            Box::new(SequenceRandom::new(vec![0.42, 0.17, 0.66, 0.05])),
        );
        session.select_prize("phone").unwrap();

        let ticket = session.request_spin().unwrap();
        assert_eq!(ticket.winner, DrawNumber(2));
        assert_eq!(ticket.duration, Duration::from_secs(3));

        let update = spin_until_settled(&mut session, &mut NoopObserver);
        assert_eq!(update.landing, Some(LandingOutcome::Accepted(DrawNumber(2))));
        assert_eq!(session.segment_at_pointer().map(|s| s.value), Some(DrawNumber(2)));
    }

    #[test]
    fn test_reveal_delay() {
        let mut config = WheelConfig::default();
        config.reveal.delay_ms = 100;
        let mut session = DrawSession::new(&config, state(), Box::new(SeededRandom::seeded(2)));
        session.select_prize("phone").unwrap();
        let ticket = session.request_spin().unwrap();

        let update = spin_until_settled(&mut session, &mut NoopObserver);
        assert_eq!(update.reveal, None);
        assert!(session.close_reveal().is_none());

        let mut revealed = None;
        for _ in 0..20 {
            if let Some(winner) = session.advance(FRAME, &mut NoopObserver).reveal {
                revealed = Some(winner);
                break;
            }
        }
        assert_eq!(revealed, Some(ticket.winner));
        assert!(session.close_reveal().is_some());
    }

    #[test]
    fn test_exhausting_a_prize() {
        let mut session = session_with(state(), 13);
        session.select_prize("phone").unwrap();
        for _ in 0..2 {
            session.request_spin().unwrap();
            spin_until_settled(&mut session, &mut NoopObserver);
            session.close_reveal().unwrap();
        }
        assert!(session.selected_prize().unwrap().is_exhausted());
        assert_eq!(session.request_spin(), Err(SpinRefusal::PrizeExhausted));
        assert_eq!(session.win_history().len(), 2);
        assert_ne!(
            session.win_history()[0].participant_number,
            session.win_history()[1].participant_number
        );
    }

    #[test]
    fn test_all_won_gives_empty_wheel() {
        let mut state = state();
        state.won_numbers = WonNumbers::from([1, 2, 3]);
        let mut session = session_with(state, 1);
        session.select_prize("phone").unwrap();
        assert!(session.segments().is_empty());
        assert!(session.segment_at_pointer().is_none());
        assert_eq!(session.request_spin(), Err(SpinRefusal::NoEligibleWinners));
    }

    #[test]
    fn test_admin_roster_edits() {
        let mut session = session_with(state(), 1);

        let clash = session.add_participant(Participant::guest("g9", "Clash", 2));
        assert!(matches!(clash, Err(Error::InvalidOperation(_))));

        session.add_participant(Participant::guest("g9", "New", 9)).unwrap();
        assert_eq!(session.segments().len(), 5);

        let mut promoted = session.participant_by_number(DrawNumber(9)).unwrap().clone();
        promoted.category = crate::models::Category::Staff;
        promoted.tenure_years = 5;
        session.update_participant(promoted).unwrap();
        assert_eq!(session.segments().len(), 6);

        session.remove_participant("g9").unwrap();
        assert_eq!(session.segments().len(), 4);
        assert!(matches!(session.remove_participant("g9"), Err(Error::NotFound(_))));

        session.clear_participants().unwrap();
        assert!(session.segments().is_empty());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_winner_keeps_draw_number() {
        let mut session = session_with(state(), 7);
        session.select_prize("phone").unwrap();
        let ticket = session.request_spin().unwrap();
        spin_until_settled(&mut session, &mut NoopObserver);
        session.close_reveal().unwrap();

        let mut winner = session.participant_by_number(ticket.winner).unwrap().clone();
        let winner_id = winner.id.clone();
        winner.number = DrawNumber(42);
        assert!(matches!(session.update_participant(winner.clone()), Err(Error::InvalidOperation(_))));
        assert!(session.participant_by_number(ticket.winner).is_some());
        assert!(session.segments().iter().all(|s| s.value != DrawNumber(42)));

        winner.number = ticket.winner;
        winner.name = "Renamed".to_string();
        session.update_participant(winner).unwrap();
        assert_eq!(session.participant_by_number(ticket.winner).unwrap().name, "Renamed");

        let other = session
            .participants()
            .iter()
            .find(|p| p.number != ticket.winner)
            .unwrap()
            .clone();
        let mut onto_winner = other.clone();
        session.remove_participant(&winner_id).unwrap();
        onto_winner.number = ticket.winner;
        assert!(matches!(session.update_participant(onto_winner), Err(Error::InvalidOperation(_))));
        assert_eq!(session.participant_by_number(other.number).unwrap().id, other.id);
    }

    #[test]
    fn test_zero_draw_number_rejected() {
        let mut session = session_with(state(), 1);
        let zero = session.add_participant(Participant::guest("g0", "Zero", 0));
        assert!(matches!(zero, Err(Error::InvalidOperation(_))));

        let mut guest = session.participant_by_number(DrawNumber(2)).unwrap().clone();
        guest.number = DrawNumber(0);
        assert!(matches!(session.update_participant(guest), Err(Error::InvalidOperation(_))));
        assert_eq!(session.participants().len(), 3);
        assert_eq!(session.segments().len(), 4);
    }

    #[test]
    fn test_refused_spin_keeps_pending_layout() {
        let mut session = session_with(state(), 3);
        session.select_prize("phone").unwrap();
        session.set_blacklist(Blacklist::from([1, 2, 3]));
        let before = session.segments().to_vec();

        session.layout_dirty = true;
        assert_eq!(session.request_spin(), Err(SpinRefusal::NoEligibleWinners));
        assert_eq!(session.segments(), &before[..]);
        assert!(session.layout_dirty);
    }

    #[test]
    fn test_prize_admin() {
        let mut session = session_with(state(), 1);
        session.select_prize("phone").unwrap();

        let mut edited = session.prizes()[0].clone();
        edited.quantity = 5;
        session.update_prize(edited).unwrap();
        assert_eq!(session.prizes()[0].initial_quantity, 5);

        session.remove_prize("phone").unwrap();
        assert!(session.selected_prize().is_none());
        assert!(matches!(session.select_prize("phone"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_admin_locked_while_spinning() {
        let mut session = session_with(state(), 1);
        session.select_prize("phone").unwrap();
        session.request_spin().unwrap();

        assert!(matches!(session.clear_participants(), Err(Error::InvalidOperation(_))));
        assert!(matches!(session.reset(state()), Err(Error::InvalidOperation(_))));
        assert!(matches!(session.select_prize("phone"), Err(Error::InvalidOperation(_))));
        assert!(!session.undo());
    }

    #[test]
    fn test_history_json() {
        let mut session = session_with(state(), 21);
        session.select_prize("phone").unwrap();
        session.request_spin().unwrap();
        spin_until_settled(&mut session, &mut NoopObserver);
        let record = session.close_reveal().unwrap();

        let json = session.win_history_json().unwrap();
        let parsed: Vec<WinRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![record]);
    }
}
