//! Table engine: one [`TableState`] driven through the hand state machine.
//!
//! Phases are unit types dispatched through [`EngineState`]. A tick runs
//! exactly one phase's work and returns how long to wait before the next
//! tick. Commands are queued at any time and only applied during a tick.

use enum_dispatch::enum_dispatch;
use log::{debug, info, warn};
use std::{collections::VecDeque, fmt, time::Duration};

use super::{
    actions::ActionOutcome,
    commands::{Command, CommandKind, EngineCommand},
    entities::{Card, Deck, Player, SeatIndex, Street, Usd, Username},
    errors::{ActionError, SeatingError},
    snapshot::{StateDigest, TableSnapshot},
    state::TableState,
    states::{
        DealCards, DealStreet, EndHand, EndStreet, EveryoneFoldedPayout, PauseAfterEndHand,
        PauseAfterEndStreet, PauseAfterEveryoneFolded, PauseAfterEveryoneFoldedPayout,
        PauseAfterPostBlinds, PauseAfterShowdown, PauseAfterStartHand, PostBlinds,
        ProcessGameCommands, ProcessSitCommands, Showdown, StartHand,
    },
};
use crate::table::config::{EngineTiming, TableConfig};

/// One phase of the hand state machine.
#[enum_dispatch]
pub trait Phase {
    /// Does this phase's work and returns the phase to move to.
    fn step(&self, core: &mut EngineCore) -> EngineState;

    /// How long the engine rests after entering this phase.
    fn pacing(&self, timing: &EngineTiming) -> Duration {
        timing.loop_pause
    }
}

#[enum_dispatch(Phase)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EngineState {
    ProcessSitCommands(ProcessSitCommands),
    StartHand(StartHand),
    PauseAfterStartHand(PauseAfterStartHand),
    PostBlinds(PostBlinds),
    PauseAfterPostBlinds(PauseAfterPostBlinds),
    DealCards(DealCards),
    ProcessGameCommands(ProcessGameCommands),
    PauseAfterEveryoneFolded(PauseAfterEveryoneFolded),
    EveryoneFoldedPayout(EveryoneFoldedPayout),
    PauseAfterEveryoneFoldedPayout(PauseAfterEveryoneFoldedPayout),
    EndStreet(EndStreet),
    PauseAfterEndStreet(PauseAfterEndStreet),
    DealStreet(DealStreet),
    Showdown(Showdown),
    PauseAfterShowdown(PauseAfterShowdown),
    EndHand(EndHand),
    PauseAfterEndHand(PauseAfterEndHand),
}

impl Default for EngineState {
    fn default() -> Self {
        ProcessSitCommands.into()
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::ProcessSitCommands(_) => "ProcessSitCommands",
            Self::StartHand(_) => "StartHand",
            Self::PauseAfterStartHand(_) => "PauseAfterStartHand",
            Self::PostBlinds(_) => "PostBlinds",
            Self::PauseAfterPostBlinds(_) => "PauseAfterPostBlinds",
            Self::DealCards(_) => "DealCards",
            Self::ProcessGameCommands(_) => "ProcessGameCommands",
            Self::PauseAfterEveryoneFolded(_) => "PauseAfterEveryoneFolded",
            Self::EveryoneFoldedPayout(_) => "EveryoneFoldedPayout",
            Self::PauseAfterEveryoneFoldedPayout(_) => "PauseAfterEveryoneFoldedPayout",
            Self::EndStreet(_) => "EndStreet",
            Self::PauseAfterEndStreet(_) => "PauseAfterEndStreet",
            Self::DealStreet(_) => "DealStreet",
            Self::Showdown(_) => "Showdown",
            Self::PauseAfterShowdown(_) => "PauseAfterShowdown",
            Self::EndHand(_) => "EndHand",
            Self::PauseAfterEndHand(_) => "PauseAfterEndHand",
        };
        write!(f, "{repr}")
    }
}

/// Everything a phase may touch: the table, both command queues and the
/// deck.
#[derive(Debug)]
pub struct EngineCore {
    pub(crate) table: TableState,
    sit_commands: VecDeque<Command>,
    game_commands: VecDeque<Command>,
    deck: Deck,
    /// Cards to put on top of the deck at the next shuffle.
    stacked_deck: Option<Vec<Card>>,
}

impl EngineCore {
    fn new(table: TableState) -> Self {
        Self {
            table,
            sit_commands: VecDeque::new(),
            game_commands: VecDeque::new(),
            deck: Deck::default(),
            stacked_deck: None,
        }
    }

    /// Drains the seating queue. Returns whether `startGame` was seen and
    /// `allow_start` is set.
    pub(crate) fn process_sit_commands(&mut self, allow_start: bool) -> bool {
        let commands = std::mem::take(&mut self.sit_commands);
        let mut start = false;
        for command in commands {
            debug!("sit command: {command}");
            match command.kind {
                CommandKind::Join { seat, chips } => {
                    if let Err(error) = self.join(&command.user, seat, chips) {
                        warn!("{} can't join: {error}", command.user);
                    }
                }
                CommandKind::Leave => {
                    if self.table.remove_player(&command.user).is_none() {
                        warn!("{} can't leave: not seated", command.user);
                    }
                }
                CommandKind::StartGame if allow_start => start = true,
                CommandKind::StartGame => {
                    debug!("ignoring startGame from {}: game running", command.user);
                }
                _ => {
                    if let Err(error) = self.table.make_action(&command) {
                        warn!("rejected `{command}`: {error}");
                    }
                }
            }
        }
        start
    }

    fn join(
        &mut self,
        user: &Username,
        seat: Option<SeatIndex>,
        chips: Usd,
    ) -> Result<(), SeatingError> {
        if self.table.seat_of(user).is_some() {
            return Err(SeatingError::DuplicateUser(user.clone()));
        }
        let seat = self.table.determine_seat(seat)?;
        let player = Player::new(user.clone(), seat, chips, self.table.timebank_total);
        self.table.add_player(player)
    }

    /// Drains the action queue until a command ends the street or the
    /// hand. Whatever is left of the batch goes back to the front of the
    /// queue for the next street.
    pub(crate) fn process_game_commands(&mut self) -> Option<ActionOutcome> {
        let mut commands = std::mem::take(&mut self.game_commands);
        while let Some(command) = commands.pop_front() {
            match self.table.make_action(&command) {
                Ok(ActionOutcome::Continue) => debug!("applied `{command}`"),
                Ok(outcome) => {
                    debug!("applied `{command}`: {outcome:?}");
                    commands.append(&mut self.game_commands);
                    self.game_commands = commands;
                    return Some(outcome);
                }
                Err(error) => warn!("rejected `{command}`: {error}"),
            }
        }
        None
    }

    pub(crate) fn discard_game_commands(&mut self) {
        for command in self.game_commands.drain(..) {
            info!("dropping `{command}`: the hand is over");
        }
    }

    fn shuffle(&mut self) {
        match self.stacked_deck.take() {
            Some(top) => self.deck.shuffle_with_top(&top),
            None => self.deck.shuffle(),
        }
    }

    /// Two cards each, starting left of the dealer.
    pub(crate) fn deal_hole_cards(&mut self) {
        self.shuffle();
        for seat in self.table.acting_order() {
            let cards = self.deck.deal(2);
            if let Some(player) = self.table.player_mut(seat) {
                player.hole_cards = cards;
            }
        }
    }

    pub(crate) fn deal_street(&mut self) {
        let n = match self.table.street {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::BetweenHands | Street::Preflop => 0,
        };
        let cards = self.deck.deal(n);
        self.table.community_cards.extend(cards);
        debug!(
            "{}: [{}]",
            self.table.street,
            self.table
                .community_cards
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        );
    }
}

/// A single table's engine.
#[derive(Debug)]
pub struct Engine {
    room_name: String,
    phase: EngineState,
    core: EngineCore,
    timing: EngineTiming,
    last_digest: Option<StateDigest>,
}

impl Engine {
    pub fn new(config: &TableConfig, timing: EngineTiming) -> Self {
        let table = TableState::new(config.blinds(), config.timebank_total, config.max_players);
        Self {
            room_name: config.room_name.clone(),
            phase: EngineState::default(),
            core: EngineCore::new(table),
            timing,
            last_digest: None,
        }
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    pub fn phase(&self) -> EngineState {
        self.phase
    }

    pub fn table(&self) -> &TableState {
        &self.core.table
    }

    /// Whether the engine is idle, waiting for `startGame`.
    pub fn is_stopped(&self) -> bool {
        matches!(self.phase, EngineState::ProcessSitCommands(_))
    }

    /// Queues a command for a later tick. Player actions and seating
    /// commands are kept in separate queues.
    pub fn queue_command(&mut self, command: Command) {
        if command.kind.is_action() {
            self.core.game_commands.push_back(command);
        } else {
            self.core.sit_commands.push_back(command);
        }
    }

    pub fn queue_engine_command(&mut self, command: EngineCommand) -> Result<(), ActionError> {
        self.queue_command(command.try_into()?);
        Ok(())
    }

    pub fn pending_commands(&self) -> usize {
        self.core.sit_commands.len() + self.core.game_commands.len()
    }

    /// Puts `cards` on top of the deck for the next hand dealt. Hole cards
    /// come off first, two per player starting left of the dealer, then
    /// the board.
    pub fn stack_deck(&mut self, cards: Vec<Card>) {
        self.core.stacked_deck = Some(cards);
    }

    /// Runs the current phase once and returns how long to wait before
    /// the next tick.
    pub fn tick(&mut self) -> Duration {
        let next = self.phase.step(&mut self.core);
        if next != self.phase {
            info!("{}: {} -> {}", self.room_name, self.phase, next);
            self.phase = next;
        }
        self.phase.pacing(&self.timing)
    }

    pub fn snapshot(&self) -> TableSnapshot {
        self.core.table.snapshot(self.is_stopped())
    }

    /// A snapshot if anything tracked changed since the last call.
    pub fn snapshot_if_changed(&mut self) -> Option<TableSnapshot> {
        let digest = self.core.table.digest();
        if self.last_digest.as_ref() == Some(&digest) {
            return None;
        }
        self.last_digest = Some(digest);
        Some(self.snapshot())
    }
}
