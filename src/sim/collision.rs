//! Player vs. platform contact resolution
//!
//! Each platform is tested once per tick after integration. A contact snaps
//! the player out of the platform and cancels the velocity component that
//! drove it in. Ability bookkeeping (ground flag, jump charges, wall flag)
//! is left to the caller.

use super::entities::{Body, Platform};
use super::player::{Facing, Player};
use crate::consts::*;

/// Which face of a platform the player touched
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Landed on top; `carry` is the horizontal nudge applied by a moving platform
    Landed { carry: f32 },
    /// Bumped the underside
    Ceiling,
    /// Pressed against a side face; the wall is on this side of the player
    Wall(Facing),
}

/// Resolve the player against one platform
///
/// Checks run top, bottom, then sides; at most one contact is produced.
pub fn resolve_platform(player: &mut Player, platform: &Platform) -> Option<Contact> {
    let plat = platform.rect();
    let body = player.rect();

    // Landing: falling, bottom crossed the top edge this tick
    if player.vel.y >= 0.0
        && body.overlaps_x(&plat)
        && body.bottom() > plat.y
        && body.bottom() - player.vel.y < plat.y + LANDING_TOLERANCE
    {
        player.pos.y = plat.y - player.size.y;
        player.vel.y = 0.0;
        let carry = platform.carry_velocity();
        player.pos.x += carry;
        return Some(Contact::Landed { carry });
    }

    // Ceiling: rising, head crossed the bottom edge this tick
    if player.vel.y < 0.0
        && body.right() > plat.x + CORNER_INSET
        && body.x < plat.right() - CORNER_INSET
        && body.y < plat.bottom()
        && body.y - player.vel.y > plat.bottom() - LANDING_TOLERANCE
    {
        player.pos.y = plat.bottom();
        player.vel.y = 0.0;
        return Some(Contact::Ceiling);
    }

    // Sides: inset top and bottom so corners don't count twice
    let vertical = body.bottom() > plat.y + CORNER_INSET && body.y < plat.bottom() - CORNER_INSET;
    if !vertical {
        return None;
    }

    if body.center().x < plat.center().x {
        // Player's right edge against the platform's left face
        if body.right() >= plat.x && body.right() < plat.x + SIDE_BAND {
            player.pos.x = plat.x - player.size.x;
            player.vel.x = 0.0;
            return Some(Contact::Wall(Facing::Right));
        }
    } else if body.x <= plat.right() && body.x > plat.right() - SIDE_BAND {
        player.pos.x = plat.right();
        player.vel.x = 0.0;
        return Some(Contact::Wall(Facing::Left));
    }

    None
}
