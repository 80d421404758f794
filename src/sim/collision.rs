//! Collision detection between the player and track objects
//!
//! Everything is axis-aligned: a z-band filter in front of and behind the
//! player, a lateral lane-proximity check, then a vertical interval test whose
//! shape depends on the object kind.

use glam::Vec3;

use super::world::{ObjectKind, WorldObject};
use crate::consts::PLAYER_HEIGHT;
use crate::tuning::Tuning;

/// Obstacles block the full height of a jump-less runner
pub const OBSTACLE_HEIGHT: f32 = 1.6;
/// Missiles fly at chest height
pub const MISSILE_BOTTOM: f32 = 0.5;
pub const MISSILE_TOP: f32 = 1.5;
/// Default half-height around an object's center
pub const DEFAULT_HALF_HEIGHT: f32 = 0.5;

/// Closed vertical extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Strict overlap; touching edges don't count
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.min < other.max && self.max > other.min
    }
}

/// Player occupies from its feet up to its head
pub fn player_interval(player: Vec3) -> Interval {
    Interval::new(player.y, player.y + PLAYER_HEIGHT)
}

/// Vertical extent that can hurt the player
pub fn object_interval(object: &WorldObject) -> Interval {
    match object.kind {
        ObjectKind::Obstacle => Interval::new(0.0, OBSTACLE_HEIGHT),
        ObjectKind::Missile => Interval::new(MISSILE_BOTTOM, MISSILE_TOP),
        _ => Interval::new(
            object.position.y - DEFAULT_HALF_HEIGHT,
            object.position.y + DEFAULT_HALF_HEIGHT,
        ),
    }
}

/// True if the object is close enough along the track to test at all
#[inline]
pub fn in_collision_band(object_z: f32, player_z: f32, band: f32) -> bool {
    (object_z - player_z).abs() < band
}

/// True if the object shares the player's lane
#[inline]
pub fn in_lane(object_x: f32, player_x: f32, half_width: f32) -> bool {
    (object_x - player_x).abs() < half_width
}

/// What touching an object means for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Damage source overlapped the player
    Hit,
    /// Gem or letter within reach
    Pickup,
    /// Player drove through the shop portal
    Portal,
}

/// Resolve contact between the player and one track object.
///
/// Boss and beam objects are handled by the boss logic and never resolve
/// here; inactive objects never collide.
pub fn check_contact(object: &WorldObject, player: Vec3, tuning: &Tuning) -> Option<Contact> {
    if !object.active {
        return None;
    }
    if !in_collision_band(object.position.z, player.z, tuning.collision_band) {
        return None;
    }
    if !in_lane(object.position.x, player.x, tuning.lane_hit_width) {
        return None;
    }

    match object.kind {
        ObjectKind::ShopPortal => {
            ((object.position.z - player.z).abs() < tuning.portal_reach).then_some(Contact::Portal)
        }
        ObjectKind::Obstacle | ObjectKind::Alien { .. } | ObjectKind::Missile => {
            object_interval(object)
                .overlaps(&player_interval(player))
                .then_some(Contact::Hit)
        }
        ObjectKind::Gem { .. } | ObjectKind::Letter { .. } => {
            ((object.position.y - player.y).abs() < tuning.pickup_reach).then_some(Contact::Pickup)
        }
        ObjectKind::Boss { .. } | ObjectKind::BossBeam { .. } => None,
    }
}

/// True if the player stands inside a beam fired down `beam_x`
#[inline]
pub fn in_beam(beam_x: f32, player_x: f32, tuning: &Tuning) -> bool {
    in_lane(beam_x, player_x, tuning.beam_hit_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(kind: ObjectKind, x: f32, y: f32, z: f32) -> WorldObject {
        WorldObject::new(1, kind, Vec3::new(x, y, z))
    }

    #[test]
    fn test_interval_overlap() {
        let a = Interval::new(0.0, 1.0);
        assert!(a.overlaps(&Interval::new(0.5, 2.0)));
        assert!(!a.overlaps(&Interval::new(1.0, 2.0)));
        assert!(!a.overlaps(&Interval::new(-2.0, -0.1)));
    }

    #[test]
    fn test_obstacle_hits_grounded_player() {
        let tuning = Tuning::default();
        let obstacle = object(ObjectKind::Obstacle, 0.0, 0.0, 0.5);
        assert_eq!(
            check_contact(&obstacle, Vec3::ZERO, &tuning),
            Some(Contact::Hit)
        );
    }

    #[test]
    fn test_jump_clears_obstacle() {
        let tuning = Tuning::default();
        let obstacle = object(ObjectKind::Obstacle, 0.0, 0.0, 0.0);
        assert_eq!(
            check_contact(&obstacle, Vec3::new(0.0, 1.7, 0.0), &tuning),
            None
        );
    }

    #[test]
    fn test_missile_band() {
        let tuning = Tuning::default();
        let missile = object(ObjectKind::Missile, 0.0, 1.0, 0.0);
        // Jumping high enough clears the missile
        assert_eq!(check_contact(&missile, Vec3::new(0.0, 1.6, 0.0), &tuning), None);
        assert_eq!(
            check_contact(&missile, Vec3::new(0.0, 0.0, 0.0), &tuning),
            Some(Contact::Hit)
        );
    }

    #[test]
    fn test_other_lane_and_far_objects_ignored() {
        let tuning = Tuning::default();
        let gem = object(ObjectKind::Gem { points: 50 }, 2.2, 1.0, 0.0);
        assert_eq!(check_contact(&gem, Vec3::ZERO, &tuning), None);

        let far = object(ObjectKind::Gem { points: 50 }, 0.0, 1.0, -10.0);
        assert_eq!(check_contact(&far, Vec3::ZERO, &tuning), None);
    }

    #[test]
    fn test_pickup_reach_is_loose() {
        let tuning = Tuning::default();
        let gem = object(ObjectKind::Gem { points: 50 }, 0.3, 2.4, 1.0);
        assert_eq!(
            check_contact(&gem, Vec3::ZERO, &tuning),
            Some(Contact::Pickup)
        );
    }

    #[test]
    fn test_inactive_never_collides() {
        let tuning = Tuning::default();
        let mut obstacle = object(ObjectKind::Obstacle, 0.0, 0.0, 0.0);
        obstacle.active = false;
        assert_eq!(check_contact(&obstacle, Vec3::ZERO, &tuning), None);
    }

    #[test]
    fn test_portal_contact() {
        let tuning = Tuning::default();
        let portal = object(ObjectKind::ShopPortal, 0.0, 0.0, 1.0);
        assert_eq!(
            check_contact(&portal, Vec3::ZERO, &tuning),
            Some(Contact::Portal)
        );
    }
}
