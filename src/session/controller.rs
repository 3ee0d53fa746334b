//! Session controller.
//!
//! `Session` owns all state and runs the placement → effect panel →
//! settlement loop on a single thread of control. Commands either run
//! directly through `execute` or are queued with `submit` and applied at
//! the start of the next `tick`. Everything observable comes out as
//! `Event`s.
//!
//! ## Example
//!
//! ```
//! use bazi_duel::session::{Command, Event, Session};
//! use bazi_duel::core::SideId;
//!
//! let mut session = Session::builder().build().unwrap();
//! let card = session.state().sides[SideId::Player].hand[0].entity;
//!
//! session
//!     .execute(Command::PlaceCard { side: SideId::Player, slot: 4, card })
//!     .unwrap();
//! assert!(session.state().open_effect().is_some());
//!
//! session.execute(Command::ConfirmEffect).unwrap();
//! assert!(session
//!     .drain_events()
//!     .any(|e| matches!(e, Event::EffectPanelClosed { .. })));
//! ```

use std::collections::VecDeque;

use tracing::{debug, info, trace, warn};

use crate::ai::{AiAction, AiView, HandCard, OpponentConfig, OpponentPolicy, RuleBasedOpponent};
use crate::battlefield::{row_owner, PlacedCard};
use crate::bazi::Chart;
use crate::cards::{Card, CardCatalog, CardCategory, CardId};
use crate::core::{EngineConfig, EntityId, SideId, SideMap};
use crate::effects::{ActionKind, EffectResolver, PendingEffect, TargetId, TargetResolver};
use crate::error::{BlockReason, EngineError};
use crate::life::LifeElementEngine;
use crate::neutralization::{Neutralization, NeutralizationEngine};
use crate::scheduler::{PauseReason, TickReport, TimerAction};

use super::builder::SessionBuilder;
use super::command::{Command, SpecialAction};
use super::event::{Event, EventBus, SettleTrigger};
use super::snapshot::{PersistError, SavedSession, SessionSnapshot, SAVE_VERSION};
use super::state::{Phase, SessionRngs, SessionState};

/// A running two-sided session.
pub struct Session {
    config: EngineConfig,
    opponent_config: OpponentConfig,
    catalog: CardCatalog,
    charts: SideMap<Chart>,
    deck_lists: SideMap<Vec<CardId>>,
    policy: Box<dyn OpponentPolicy>,
    commands: VecDeque<Command>,
    events: EventBus,
    state: SessionState,
}

impl Session {
    /// Start configuring a session.
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub(crate) fn from_parts(
        config: EngineConfig,
        opponent_config: OpponentConfig,
        catalog: CardCatalog,
        charts: SideMap<Chart>,
        deck_lists: SideMap<Vec<CardId>>,
        policy: Box<dyn OpponentPolicy>,
        state: SessionState,
    ) -> Self {
        Self {
            config,
            opponent_config,
            catalog,
            charts,
            deck_lists,
            policy,
            commands: VecDeque::new(),
            events: EventBus::default(),
            state,
        }
    }

    pub(crate) fn fresh_state(
        config: &EngineConfig,
        catalog: &CardCatalog,
        charts: &SideMap<Chart>,
        deck_lists: &SideMap<Vec<CardId>>,
    ) -> SessionState {
        SessionState::deal(
            config,
            catalog,
            charts,
            deck_lists,
            SessionRngs::from_seed(config.seed),
        )
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[must_use]
    pub fn winner(&self) -> Option<SideId> {
        self.state.winner
    }

    /// Life of one side.
    #[must_use]
    pub fn life(&self, side: SideId) -> u32 {
        self.state.sides[side].remaining_life()
    }

    /// Current view of the whole session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.state)
    }

    /// Take every event emitted so far.
    pub fn drain_events(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.events.drain()
    }

    // === Commands ===

    /// Queue a command for the next tick. Rejections surface as
    /// `Event::CommandRejected`.
    pub fn submit(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Commands waiting for the next tick.
    #[must_use]
    pub fn queued_commands(&self) -> usize {
        self.commands.len()
    }

    /// Run a command now.
    pub fn execute(&mut self, command: Command) -> Result<(), EngineError> {
        self.apply(command)?;
        self.emit_state();
        Ok(())
    }

    fn apply(&mut self, command: Command) -> Result<(), EngineError> {
        trace!(?command, "command");
        match command {
            Command::PlaceCard { side, slot, card } => self.place_card(side, slot, card),
            Command::AllocateEffect { target, value } => self.allocate(target, value),
            Command::ConfirmEffect => self.settle(SettleTrigger::Confirmed),
            Command::DrawCard { side } => self.draw_card(side),
            Command::ReleasePriority => {
                self.release_priority();
                Ok(())
            }
            Command::UseSpecialAction { name } => self.use_special_action(&name),
            Command::Pause => {
                self.pause_clock(PauseReason::External);
                Ok(())
            }
            Command::Resume => {
                self.resume_clock(PauseReason::External);
                Ok(())
            }
            Command::Restart => {
                self.restart();
                Ok(())
            }
        }
    }

    fn ensure_not_ended(&self, side: SideId) -> Result<(), EngineError> {
        if self.state.is_ended() {
            return Err(EngineError::blocked(side, BlockReason::SessionEnded));
        }
        Ok(())
    }

    // === Placement ===

    fn place_card(&mut self, side: SideId, slot: u8, entity: EntityId) -> Result<(), EngineError> {
        self.ensure_not_ended(side)?;
        if self.state.open_effect().is_some() {
            return Err(EngineError::blocked(side, BlockReason::EffectPending));
        }
        if row_owner(slot) != Some(side) {
            return Err(EngineError::InvalidSlot { side, slot });
        }
        if self.state.battlefield.is_occupied(slot) {
            return Err(EngineError::SlotOccupied { slot });
        }
        if !self.state.sides[side].can_act() {
            return Err(EngineError::blocked(side, BlockReason::Cooldown));
        }

        let owner = &mut self.state.sides[side];
        let mut card = owner
            .take_from_hand(entity)
            .ok_or(EngineError::CardNotInHand { side, card: entity })?;
        let charged = LifeElementEngine::on_placement(&mut card, &owner.chart);
        owner.set_cooldown(self.config.placement_cooldown_ms);

        let now = self.state.scheduler.clock.session_ms();
        let card_id = card.card_id;
        self.state
            .battlefield
            .occupy(slot, PlacedCard::new(card.clone(), side, now))?;

        info!(%side, slot, card = %entity, name = %card.name, charged, "card placed");
        self.events.push(Event::CardPlaced { side, slot, card: entity, card_id, charged });

        if self.state.scheduler.clock.grant_priority(side) {
            self.events.push(Event::PriorityChanged { holder: Some(side) });
        }

        self.open_effect(side, slot, card);

        let hits = NeutralizationEngine::check(
            &mut self.state.battlefield,
            &mut self.state.rngs.neutralization,
            self.config.neutralization_chance,
        );
        self.handle_neutralizations(&hits);

        if side == SideId::Opponent {
            self.settle(SettleTrigger::Immediate)?;
        }
        Ok(())
    }

    fn open_effect(&mut self, side: SideId, slot: u8, card: Card) {
        let action = ActionKind::for_category(card.category);
        let targets =
            TargetResolver::collect(&self.state.battlefield, side, action, true, Some(card.entity));

        let id = self.state.next_effect;
        self.state.next_effect = id.next();
        let now = self.state.scheduler.clock.session_ms();
        let deadline_ms = now + self.config.effect_deadline_ms;
        let entity = card.entity;

        let pending = PendingEffect::new(id, card, slot, side, targets, true, now, deadline_ms);
        debug!(effect = %id, %action, targets = pending.targets.len(), deadline_ms, "effect panel opened");
        self.events.push(Event::EffectPanelOpened {
            effect: id,
            card: entity,
            action,
            targets: pending.targets.clone(),
            deadline_ms,
        });

        self.state.scheduler.timers.schedule(deadline_ms, TimerAction::EffectDeadline(id));
        self.state.pending = Some(pending);
        self.state.phase = Phase::EffectPanel;
        self.pause_clock(PauseReason::EffectPanel);
    }

    // === Effects ===

    fn allocate(&mut self, target: TargetId, value: u32) -> Result<(), EngineError> {
        let pending = self.state.pending.as_mut().ok_or(EngineError::NoPendingEffect)?;
        let remaining = EffectResolver::allocate(pending, &self.state.battlefield, target, value)?;
        self.events.push(Event::AllocationChanged {
            effect: pending.id,
            target,
            value,
            remaining,
        });
        Ok(())
    }

    fn settle(&mut self, trigger: SettleTrigger) -> Result<(), EngineError> {
        let state = &mut self.state;
        let pending = state.pending.as_mut().ok_or(EngineError::NoPendingEffect)?;
        if pending.is_settled() {
            return Err(EngineError::EffectAlreadySettled);
        }

        state.phase = Phase::Settlement;
        let report = EffectResolver::resolve(pending, &mut state.battlefield, &mut state.sides)?;
        let effect = pending.id;
        let actor = pending.actor;
        state
            .scheduler
            .timers
            .cancel_where(|a| *a == TimerAction::EffectDeadline(effect));

        info!(effect = %effect, ?trigger, auto = report.auto, allocations = ?report.allocations, "effect settled");
        self.events.push(Event::EffectResolved {
            effect,
            trigger,
            auto: report.auto,
            allocations: report.allocations.clone(),
        });
        for change in &report.life_changes {
            self.events.push(Event::LifeChanged {
                side: change.side,
                before: change.before,
                after: change.after,
            });
        }

        let now = self.state.scheduler.clock.session_ms();
        for &(slot, entity) in &report.neutralized {
            self.schedule_discard(slot, entity);
            self.events.push(Event::CardNeutralized { slot, card: entity, by: None });
        }
        for &(slot, entity) in &report.buffed {
            let clear = TimerAction::ClearBuff { slot, entity };
            let timers = &mut self.state.scheduler.timers;
            timers.cancel_where(|a| *a == clear);
            timers.schedule(now + self.config.buff_marker_ms, clear);
        }
        self.events.push(Event::EffectPanelClosed { effect });

        if self.check_winner(actor) {
            return Ok(());
        }

        self.resume_clock(PauseReason::EffectPanel);
        if self.state.scheduler.clock.release_priority().is_some() {
            self.events.push(Event::PriorityChanged { holder: None });
        }
        self.state.phase = Phase::Running;
        self.reaction_window(actor.other());
        Ok(())
    }

    fn schedule_discard(&mut self, slot: u8, entity: EntityId) {
        let at = self.state.scheduler.clock.session_ms() + self.config.discard_delay_ms;
        self.state
            .scheduler
            .timers
            .schedule(at, TimerAction::DiscardCard { slot, entity });
    }

    fn handle_neutralizations(&mut self, hits: &[Neutralization]) {
        for hit in hits {
            self.schedule_discard(hit.slot, hit.entity);
            self.events.push(Event::CardNeutralized {
                slot: hit.slot,
                card: hit.entity,
                by: Some(hit.by),
            });
        }
    }

    // === Life and session end ===

    fn damage(&mut self, side: SideId, amount: u32) {
        let before = self.state.sides[side].remaining_life();
        self.state.sides[side].damage(amount);
        self.note_life(side, before);
    }

    fn heal(&mut self, side: SideId, amount: u32) {
        let before = self.state.sides[side].remaining_life();
        self.state.sides[side].heal(amount);
        self.note_life(side, before);
    }

    fn note_life(&mut self, side: SideId, before: u32) {
        let after = self.state.sides[side].remaining_life();
        if after != before {
            self.events.push(Event::LifeChanged { side, before, after });
        }
    }

    /// End the session if a side is out of life. When both are, the side
    /// that did not act wins. Returns true if the session is over.
    fn check_winner(&mut self, actor: SideId) -> bool {
        let player_down = self.state.sides[SideId::Player].is_defeated();
        let opponent_down = self.state.sides[SideId::Opponent].is_defeated();
        let winner = match (player_down, opponent_down) {
            (false, false) => return self.state.is_ended(),
            (true, false) => SideId::Opponent,
            (false, true) => SideId::Player,
            (true, true) => actor.other(),
        };
        self.end_session(winner);
        true
    }

    fn end_session(&mut self, winner: SideId) {
        if self.state.is_ended() {
            return;
        }
        self.state.phase = Phase::Ended;
        self.state.winner = Some(winner);
        self.state.scheduler.halt();
        info!(%winner, elapsed_ms = self.state.scheduler.clock.elapsed_ms(), "session ended");
        self.events.push(Event::SessionEnded { winner });
    }

    // === Opponent ===

    fn ai_view(&self) -> AiView {
        let opponent = &self.state.sides[SideId::Opponent];
        AiView {
            own_life: opponent.remaining_life(),
            player_life: self.state.sides[SideId::Player].remaining_life(),
            elapsed_ms: self.state.scheduler.clock.elapsed_ms(),
            can_act: opponent.can_act(),
            hand: opponent
                .hand
                .iter()
                .map(|c| HandCard { entity: c.entity, category: c.category, power: c.power })
                .collect(),
        }
    }

    /// No reaction happens while the clock is held by any pause.
    fn reaction_window(&mut self, side: SideId) {
        if self.state.scheduler.clock.paused() {
            return;
        }
        if !self.state.rngs.reaction.roll(self.config.reaction_chance) {
            return;
        }
        debug!(%side, "reaction window");
        self.events.push(Event::ReactionWindow { side });
        match side {
            SideId::Opponent => self.opponent_turn(),
            SideId::Player => self.state.sides[SideId::Player].set_cooldown(0),
        }
    }

    fn opponent_turn(&mut self) {
        let view = self.ai_view();
        let action = self
            .policy
            .choose_action(&view, &mut self.state.rngs.opponent);
        debug!(policy = self.policy.name(), ?action, "opponent action");

        match action {
            AiAction::Probe => {}
            AiAction::DirectAttack { damage } => self.damage(SideId::Player, damage),
            AiAction::Defensive { heal } => self.heal(SideId::Opponent, heal),
            AiAction::CardPlay { card } => {
                let Some(card) = self.state.sides[SideId::Opponent].take_from_hand(card) else {
                    warn!(%card, "opponent chose a card it does not hold");
                    return;
                };
                match card.category {
                    CardCategory::Auspicious => self.heal(SideId::Opponent, card.power),
                    CardCategory::Inauspicious | CardCategory::Special => {
                        self.damage(SideId::Player, card.power)
                    }
                }
                let entity = card.entity;
                self.state.sides[SideId::Opponent].discard(card);
                self.events.push(Event::CardDiscarded { card: entity, owner: SideId::Opponent });
            }
        }

        if action != AiAction::Probe {
            self.state.sides[SideId::Opponent].set_cooldown(self.config.placement_cooldown_ms);
        }
        self.events.push(Event::OpponentActed { action });
        self.check_winner(SideId::Opponent);
    }

    // === Draw, priority, special actions, pause ===

    fn draw_card(&mut self, side: SideId) -> Result<(), EngineError> {
        self.ensure_not_ended(side)?;
        let owner = &mut self.state.sides[side];
        if !owner.can_act() {
            return Err(EngineError::blocked(side, BlockReason::Cooldown));
        }
        let card = owner.draw(self.config.hand_limit)?;
        owner.set_cooldown(self.config.draw_cooldown_ms);
        self.events.push(Event::CardDrawn { side, card });
        Ok(())
    }

    fn release_priority(&mut self) {
        let clock = &mut self.state.scheduler.clock;
        if clock.priority_holder() == Some(SideId::Player) {
            clock.release_priority();
            self.events.push(Event::PriorityChanged { holder: None });
        }
    }

    fn use_special_action(&mut self, name: &str) -> Result<(), EngineError> {
        let action: SpecialAction = name.parse()?;
        self.ensure_not_ended(SideId::Player)?;
        if self.state.scheduler.clock.priority_holder() != Some(SideId::Player) {
            return Err(EngineError::blocked(SideId::Player, BlockReason::NoPriority));
        }

        match action {
            SpecialAction::ForceNeutralization => {
                let hit = NeutralizationEngine::force(&mut self.state.battlefield);
                info!(%action, hit = ?hit.map(|h| h.slot), "special action");
                if let Some(hit) = hit {
                    self.handle_neutralizations(&[hit]);
                }
            }
        }
        Ok(())
    }

    fn pause_clock(&mut self, reason: PauseReason) {
        if self.state.scheduler.clock.pause(reason) {
            self.events.push(Event::Paused { reason });
        }
    }

    fn resume_clock(&mut self, reason: PauseReason) {
        if self.state.scheduler.clock.resume(reason) {
            self.events.push(Event::Resumed);
        }
    }

    // === Restart ===

    /// Reset both sides, the battlefield and the clock. Random streams
    /// continue, so decks are reshuffled differently.
    pub fn restart(&mut self) {
        let mut scheduler = std::mem::take(&mut self.state.scheduler);
        scheduler.reset();

        let rngs = self.state.rngs.clone();
        let mut state =
            SessionState::deal(&self.config, &self.catalog, &self.charts, &self.deck_lists, rngs);
        state.scheduler = scheduler;
        self.state = state;

        info!("session restarted");
        self.events.push(Event::SessionRestarted);
    }

    // === Time ===

    /// Apply queued commands, then advance one tick.
    pub fn tick(&mut self) -> TickReport {
        let mut dirty = false;
        while let Some(command) = self.commands.pop_front() {
            match self.apply(command.clone()) {
                Ok(()) => dirty = true,
                Err(error) => {
                    warn!(?command, %error, "command rejected");
                    self.events.push(Event::CommandRejected { command, error });
                }
            }
        }

        if self.state.is_ended() {
            if dirty {
                self.emit_state();
            }
            return TickReport::default();
        }

        let report = self.state.scheduler.tick(&self.config, &mut self.state.sides);

        for &action in &report.fired {
            if self.state.is_ended() {
                break;
            }
            self.fire_timer(action);
        }

        if report.advanced && !self.state.is_ended() {
            if let Some(cycle) = report.new_cycle {
                self.start_cycle(cycle);
            }
            if report.priority_expired.is_some() {
                self.events.push(Event::PriorityChanged { holder: None });
            }
            if report.auto_draw {
                self.auto_draw();
            }
            if report.neutralization_sample {
                let hits = NeutralizationEngine::check(
                    &mut self.state.battlefield,
                    &mut self.state.rngs.neutralization,
                    self.config.neutralization_chance,
                );
                self.handle_neutralizations(&hits);
            }
            if report.ai_window && self.opponent_may_act() {
                self.opponent_turn();
            }
        }

        if dirty || !report.is_quiet() {
            self.emit_state();
        }
        report
    }

    /// Run ticks covering `ms` of session time.
    pub fn advance(&mut self, ms: u64) {
        for _ in 0..self.config.ticks_per(ms) {
            self.tick();
        }
    }

    fn opponent_may_act(&self) -> bool {
        self.state.phase == Phase::Running
            && !self.state.scheduler.clock.paused()
            && self.state.sides[SideId::Opponent].can_act()
    }

    fn fire_timer(&mut self, action: TimerAction) {
        match action {
            TimerAction::DiscardCard { slot, entity } => {
                if self.state.battlefield.get_entity(slot, entity).is_none() {
                    return;
                }
                if let Some(placed) = self.state.battlefield.remove(slot) {
                    let owner = placed.owner;
                    self.state.sides[owner].discard(placed.card);
                    debug!(slot, card = %entity, %owner, "discarded");
                    self.events.push(Event::CardDiscarded { card: entity, owner });
                }
            }
            TimerAction::ClearBuff { slot, entity } => {
                if let Some(placed) = self.state.battlefield.get_entity_mut(slot, entity) {
                    placed.buffed = false;
                }
            }
            TimerAction::EffectDeadline(effect) => {
                let due = self
                    .state
                    .open_effect()
                    .is_some_and(|pending| pending.id == effect);
                if due {
                    info!(%effect, "effect deadline reached");
                    if let Err(error) = self.settle(SettleTrigger::Deadline) {
                        warn!(%effect, %error, "deadline resolution failed");
                    }
                }
            }
        }
    }

    fn start_cycle(&mut self, cycle: u32) {
        debug!(cycle, "cycle started");
        self.events.push(Event::CycleStarted { cycle });

        let charts = self.state.sides.map(|_, side| side.chart);
        LifeElementEngine::cycle_all(
            &mut self.state.battlefield,
            &charts,
            self.config.life_upkeep_per_cycle,
        );

        for slot in LifeElementEngine::check_depletion(&self.state.battlefield) {
            let Some(placed) = self.state.battlefield.remove(slot) else { continue };
            let (entity, owner) = (placed.card.entity, placed.owner);
            info!(slot, card = %entity, "card burned out");
            self.state.sides[owner].discard(placed.card);
            self.events.push(Event::CardBurnedOut { slot, card: entity });
            self.events.push(Event::CardDiscarded { card: entity, owner });
        }
    }

    fn auto_draw(&mut self) {
        let limit = self.config.hand_limit;
        for side in SideId::all() {
            let owner = &mut self.state.sides[side];
            if !owner.can_draw(limit) {
                continue;
            }
            if let Ok(card) = owner.draw(limit) {
                self.events.push(Event::CardDrawn { side, card });
            }
        }
    }

    fn emit_state(&mut self) {
        let snapshot = SessionSnapshot::capture(&self.state);
        self.events.push(Event::StateChanged(Box::new(snapshot)));
    }

    // === External collaborators ===

    /// Re-emit asset loading progress for subscribers of this session.
    pub fn forward_loading_progress(&mut self, loaded: u32, total: u32) {
        self.events.push(Event::LoadingProgress { loaded, total });
    }

    /// Encode everything needed to continue later.
    pub fn save(&self) -> Result<Vec<u8>, PersistError> {
        SavedSession {
            version: SAVE_VERSION,
            config: self.config.clone(),
            opponent: self.opponent_config.clone(),
            charts: self.charts.clone(),
            deck_lists: self.deck_lists.clone(),
            state: self.state.clone(),
        }
        .encode()
    }

    /// Continue a saved session with the default opponent policy.
    pub fn resume(bytes: &[u8], catalog: CardCatalog) -> Result<Self, PersistError> {
        let saved = SavedSession::decode(bytes)?;
        let policy = Box::new(RuleBasedOpponent::new(saved.opponent.clone()));
        info!(
            elapsed_ms = saved.state.scheduler.clock.elapsed_ms(),
            phase = ?saved.state.phase,
            "session resumed"
        );
        Ok(Self::from_parts(
            saved.config,
            saved.opponent,
            catalog,
            saved.charts,
            saved.deck_lists,
            policy,
            saved.state,
        ))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.state.phase)
            .field("policy", &self.policy.name())
            .field("queued", &self.commands.len())
            .finish_non_exhaustive()
    }
}
