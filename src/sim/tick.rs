//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Every step
//! below runs in a fixed order; later steps read what earlier steps wrote.

use super::collision::{Contact, resolve_platform};
use super::entities::{
    Bat, Body, Checkpoint, Coin, Enemy, Lava, Platform, PowerUp, PowerUpKind, Spike,
};
use super::input::TickInput;
use super::level::World;
use super::player::{Facing, Player};
use super::rect::Rect;
use super::state::{DeathCause, GameEvent, GamePhase, GameState, JumpKind};
use crate::consts::*;

/// How the player's part of the tick ended
enum Outcome {
    Alive,
    Died(DeathCause),
    ReachedGoal,
}

/// Advance the game state by one fixed tick, returning this tick's events
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match state.phase {
        GamePhase::Menu => {
            state.menu_bob += MENU_BOB_STEP;
            if input.restart {
                state.start_game(&mut events);
            }
            return events;
        }
        GamePhase::LevelComplete => {
            state.level_complete_ticks = state.level_complete_ticks.saturating_sub(1);
            if state.level_complete_ticks == 0 {
                state.advance_level(&mut events);
            }
            return events;
        }
        GamePhase::GameOver | GamePhase::Win => {
            if input.restart {
                state.start_game(&mut events);
            }
            return events;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    match simulate(&mut state.player, &mut state.world, input, &mut events) {
        Outcome::Died(cause) => {
            state.kill_player(cause, &mut events);
            return events;
        }
        Outcome::ReachedGoal => state.complete_level(&mut events),
        Outcome::Alive => {}
    }

    state.camera.follow(state.player.pos);
    events
}

/// Player physics and every world interaction for one playing tick
fn simulate(
    player: &mut Player,
    world: &mut World,
    input: &TickInput,
    events: &mut Vec<GameEvent>,
) -> Outcome {
    apply_run_input(player, input);
    resolve_jump(player, input, events);
    integrate(player);
    decay_timers(player, events);
    resolve_platforms(player, &mut world.platforms);
    apply_wall_slide(player, input);

    // Left world edge
    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
        player.vel.x = 0.0;
    }

    if player.pos.y > FALL_DEATH_Y {
        return Outcome::Died(DeathCause::Fall);
    }

    touch_checkpoints(player, &mut world.checkpoints, events);
    collect_coins(player, &mut world.coins, events);

    if let Some(cause) = fight_enemies(player, &mut world.enemies, events) {
        return Outcome::Died(cause);
    }
    if let Some(cause) = fight_bats(player, &mut world.bats, events) {
        return Outcome::Died(cause);
    }
    if touches_spikes(player, &world.spikes) {
        return Outcome::Died(DeathCause::Spikes);
    }
    if touches_lava(player, &mut world.lavas) {
        return Outcome::Died(DeathCause::Lava);
    }
    collect_power_ups(player, &mut world.power_ups, events);

    world.flag.update();
    if player.rect().overlaps(&world.flag.rect()) {
        return Outcome::ReachedGoal;
    }

    Outcome::Alive
}

fn apply_run_input(player: &mut Player, input: &TickInput) {
    let accel = player.run_accel();
    if input.move_left {
        player.vel.x -= accel;
        player.facing = Facing::Left;
    }
    if input.move_right {
        player.vel.x += accel;
        player.facing = Facing::Right;
    }
}

/// Wall jump, then ground/double jump, then sustained climb
fn resolve_jump(player: &mut Player, input: &TickInput, events: &mut Vec<GameEvent>) {
    if player.jump_latch.just_pressed(input.jump) {
        let launched = match player.wall_dir {
            Some(wall) if !player.on_ground => {
                player.vel.y = JUMP_FORCE * WALL_JUMP_MULT;
                player.vel.x = -wall.sign() * WALL_JUMP_KICK;
                player.facing = match wall {
                    Facing::Left => Facing::Right,
                    Facing::Right => Facing::Left,
                };
                player.wall_dir = None;
                player.spend_jump();
                Some(JumpKind::Wall)
            }
            _ if player.jumps_left > 0 => {
                let kind = if player.on_ground {
                    player.vel.y = JUMP_FORCE;
                    JumpKind::Ground
                } else {
                    player.vel.y = JUMP_FORCE * DOUBLE_JUMP_MULT;
                    JumpKind::Air
                };
                player.on_ground = false;
                player.spend_jump();
                Some(kind)
            }
            _ => None,
        };

        if let Some(kind) = launched {
            player.jump_latch.engage();
            player.jump_time = 0;
            events.push(GameEvent::Jumped {
                pos: player.center(),
                kind,
            });
        }
    }

    // Holding extends the climb for a few ticks
    if input.jump
        && player.jump_latch.is_held()
        && player.jump_time < JUMP_SUSTAIN_TICKS
        && player.vel.y < 0.0
    {
        player.vel.y += JUMP_FORCE * JUMP_SUSTAIN_FRACTION;
        player.jump_time += 1;
    }

    if !input.jump {
        player.jump_latch.release();
    }
}

fn integrate(player: &mut Player) {
    player.vel.x *= FRICTION;
    player.vel.y += GRAVITY;
    player.pos += player.vel;
    // Contacts are re-established by platform resolution
    player.on_ground = false;
    player.wall_dir = None;
}

fn decay_timers(player: &mut Player, events: &mut Vec<GameEvent>) {
    player.invincible = player.invincible.saturating_sub(1);
    for kind in player.buffs.tick() {
        log::debug!("{} buff expired", kind.as_str());
        events.push(GameEvent::BuffExpired { kind });
    }
}

/// Each platform moves, then resolves against the player once
///
/// When several side contacts happen in one tick the last platform in
/// iteration order decides `wall_dir`.
fn resolve_platforms(player: &mut Player, platforms: &mut [Platform]) {
    for platform in platforms.iter_mut() {
        platform.update();
        match resolve_platform(player, platform) {
            Some(Contact::Landed { .. }) => {
                player.on_ground = true;
                player.refill_jumps();
            }
            Some(Contact::Wall(side)) if !player.on_ground => {
                player.wall_dir = Some(side);
            }
            _ => {}
        }
    }
    if player.on_ground {
        player.wall_dir = None;
    }
}

/// Slow the fall while pushing into a wall, and keep one jump in reserve
fn apply_wall_slide(player: &mut Player, input: &TickInput) {
    let Some(wall) = player.wall_dir else {
        return;
    };
    let pushing = match wall {
        Facing::Left => input.move_left,
        Facing::Right => input.move_right,
    };
    if player.on_ground || !pushing || player.vel.y <= 0.0 {
        return;
    }
    player.vel.y = player.vel.y.min(WALL_SLIDE_MAX_FALL);
    player.jumps_left = player.jumps_left.max(1).min(player.max_jumps);
}

fn touch_checkpoints(
    player: &mut Player,
    checkpoints: &mut [Checkpoint],
    events: &mut Vec<GameEvent>,
) {
    let body = player.rect();
    for (index, checkpoint) in checkpoints.iter_mut().enumerate() {
        if checkpoint.active || !body.overlaps(&checkpoint.rect()) {
            continue;
        }
        checkpoint.active = true;
        let spawn = checkpoint.respawn_point();
        player.last_checkpoint = Some(spawn);
        log::info!("Checkpoint {index} reached");
        events.push(GameEvent::CheckpointReached { index, pos: spawn });
    }
}

fn collect_coins(player: &mut Player, coins: &mut [Coin], events: &mut Vec<GameEvent>) {
    let magnet = player.buffs.is_active(PowerUpKind::Magnet);
    let center = player.center();
    let body = player.rect();

    for (index, coin) in coins.iter_mut().enumerate() {
        coin.update();
        if coin.collected {
            continue;
        }

        if magnet {
            let to_player = center - coin.rect.center();
            let dist = to_player.length();
            if dist > 0.0 && dist < MAGNET_RADIUS {
                let step = to_player / dist * MAGNET_STEP.min(dist);
                coin.rect.x += step.x;
                coin.rect.y += step.y;
            }
        }

        if body.overlaps(&coin.rect()) {
            coin.collected = true;
            player.score += COIN_SCORE;
            log::debug!("Coin {index} collected, score {}", player.score);
            events.push(GameEvent::CoinCollected {
                index,
                pos: coin.rect.center(),
            });
        }
    }
}

/// Falling onto the foe's head band
fn is_stomp(player: &Player, foe: &Rect, head_band: f32) -> bool {
    player.vel.y > 0.0 && player.bottom() < foe.y + head_band
}

fn stomp_bounce(player: &mut Player, score: u64) {
    player.vel.y = JUMP_FORCE * STOMP_BOUNCE_MULT;
    player.score += score;
}

fn fight_enemies(
    player: &mut Player,
    enemies: &mut [Enemy],
    events: &mut Vec<GameEvent>,
) -> Option<DeathCause> {
    for (index, enemy) in enemies.iter_mut().enumerate() {
        enemy.update();
        if !enemy.alive || !player.rect().overlaps(&enemy.rect()) {
            continue;
        }
        if is_stomp(player, &enemy.rect, Enemy::HEAD_BAND) {
            enemy.alive = false;
            stomp_bounce(player, ENEMY_SCORE);
            log::debug!("Enemy {index} stomped");
            events.push(GameEvent::EnemyStomped {
                index,
                pos: enemy.rect.center(),
            });
        } else if !player.is_invincible() {
            return Some(DeathCause::Enemy);
        }
    }
    None
}

fn fight_bats(
    player: &mut Player,
    bats: &mut [Bat],
    events: &mut Vec<GameEvent>,
) -> Option<DeathCause> {
    for (index, bat) in bats.iter_mut().enumerate() {
        bat.update();
        if !bat.alive || !player.rect().overlaps(&bat.rect()) {
            continue;
        }
        if is_stomp(player, &bat.rect, Bat::HEAD_BAND) {
            bat.alive = false;
            stomp_bounce(player, BAT_SCORE);
            log::debug!("Bat {index} stomped");
            events.push(GameEvent::BatStomped {
                index,
                pos: bat.rect.center(),
            });
        } else if !player.is_invincible() {
            return Some(DeathCause::Bat);
        }
    }
    None
}

fn touches_spikes(player: &Player, spikes: &[Spike]) -> bool {
    if player.is_invincible() {
        return false;
    }
    let body = player.rect();
    spikes.iter().any(|spike| body.overlaps(&spike.rect()))
}

/// Lava ignores the respawn grace period; only the power-up protects
fn touches_lava(player: &Player, lavas: &mut [Lava]) -> bool {
    let body = player.rect();
    let mut touched = false;
    for lava in lavas.iter_mut() {
        lava.update();
        touched |= body.overlaps(&lava.rect());
    }
    touched && !player.buffs.is_active(PowerUpKind::Invincibility)
}

fn collect_power_ups(player: &mut Player, power_ups: &mut [PowerUp], events: &mut Vec<GameEvent>) {
    let body = player.rect();
    for (index, power_up) in power_ups.iter_mut().enumerate() {
        power_up.update();
        if power_up.collected || !body.overlaps(&power_up.rect()) {
            continue;
        }
        power_up.collected = true;
        player.buffs.apply(power_up.kind);
        log::debug!("Power-up {index} ({}) collected", power_up.kind.as_str());
        events.push(GameEvent::PowerUpCollected {
            index,
            kind: power_up.kind,
        });
    }
}
