//! Per-tick decision functions for computer-controlled players.
//!
//! Every behavior shares one contract: it runs once per playing tick after
//! combat, reads the tick, its tuning and its own player record, may draw from
//! the shared random source, and mutates only the scheduling fields of its own
//! record. It answers with the rotation to perform, if any; the world carries
//! the rotation out so the owned cells are re-stamped in one place.

use handlords_core::{BehaviorTuning, IntervalRange, RotationDirection};

use crate::{players::PlayerState, random::Randomness};

const PERMILLE: u32 = 1_000;

/// Inputs shared with a behavior for a single decision.
#[derive(Debug)]
pub(crate) struct BehaviorContext<'a> {
    pub(crate) tick: u64,
    pub(crate) tuning: BehaviorTuning,
    pub(crate) random: &'a mut Randomness,
}

/// Decides whether the opponent described by `player` rotates this tick.
pub(crate) fn decide(
    context: &mut BehaviorContext<'_>,
    player: &mut PlayerState,
) -> Option<RotationDirection> {
    match context.tuning {
        BehaviorTuning::Jittered {
            average,
            half_interval,
        } => jittered(
            context,
            player,
            IntervalRange::jittered(average, half_interval),
        ),
        BehaviorTuning::FixedCadence { interval } => fixed_cadence(context, player, interval),
        BehaviorTuning::LossReactive {
            per_loss_permille,
            cap_permille,
        } => loss_reactive(context, player, per_loss_permille, cap_permille),
        BehaviorTuning::Accelerating {
            initial,
            step,
            floor,
        } => accelerating(context, player, initial, step, floor),
    }
}

/// Ticks left before the player's next scheduled rotation, when it has one.
pub(crate) fn ticks_until_rotation(tick: u64, player: &PlayerState) -> Option<u64> {
    if player.rotation_period == 0 {
        return None;
    }
    let due = player
        .last_rotation_tick
        .saturating_add(u64::from(player.rotation_period));
    Some(due.saturating_sub(tick))
}

fn jittered(
    context: &mut BehaviorContext<'_>,
    player: &mut PlayerState,
    range: IntervalRange,
) -> Option<RotationDirection> {
    if player.rotation_period == 0 {
        player.rotation_period = sample_period(context.random, range);
    }

    if !period_elapsed(context.tick, player) {
        return None;
    }

    player.rotation_period = sample_period(context.random, range);
    Some(RotationDirection::Forward)
}

fn fixed_cadence(
    context: &mut BehaviorContext<'_>,
    player: &mut PlayerState,
    interval: u32,
) -> Option<RotationDirection> {
    player.rotation_period = interval.max(1);
    period_elapsed(context.tick, player).then_some(RotationDirection::Forward)
}

fn loss_reactive(
    context: &mut BehaviorContext<'_>,
    player: &mut PlayerState,
    per_loss_permille: u32,
    cap_permille: u32,
) -> Option<RotationDirection> {
    let chance = player
        .tick_losses
        .saturating_mul(per_loss_permille)
        .min(cap_permille)
        .min(PERMILLE);
    if chance == 0 {
        return None;
    }

    let roll = u32::from(context.random.next_u16()) % PERMILLE;
    (roll < chance).then_some(RotationDirection::Reverse)
}

fn accelerating(
    context: &mut BehaviorContext<'_>,
    player: &mut PlayerState,
    initial: u32,
    step: u32,
    floor: u32,
) -> Option<RotationDirection> {
    let floor = floor.max(1);
    player.rotation_period = initial
        .saturating_sub(step.saturating_mul(player.acceleration))
        .max(floor);

    if !period_elapsed(context.tick, player) {
        return None;
    }

    player.acceleration = player.acceleration.saturating_add(1);
    Some(RotationDirection::Forward)
}

fn period_elapsed(tick: u64, player: &PlayerState) -> bool {
    tick.saturating_sub(player.last_rotation_tick) >= u64::from(player.rotation_period)
}

fn sample_period(random: &mut Randomness, range: IntervalRange) -> u32 {
    range.min() + u32::from(random.next_u16()) % range.span()
}
