//! World state: the two combatants, the floor and the opponent's brain
//!
//! Entities live in one list and refer to each other by [`EntityId`] only.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, Role};
use super::opponent::{Behavior, OpponentBrain};
use crate::consts::*;

/// Everything the physics step mutates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Indexed by `EntityId`
    entities: Vec<Entity>,
    player: EntityId,
    opponent: EntityId,
    floor: EntityId,
    /// Opponent AI state
    pub brain: OpponentBrain,
}

impl Default for World {
    fn default() -> Self {
        Self::new(PLAYER_SPAWN, OPPONENT_SPAWN, Behavior::default())
    }
}

impl World {
    /// Player and opponent at their spawns, facing each other, plus the floor
    pub fn new(player_spawn: Vec3, opponent_spawn: Vec3, behavior: Behavior) -> Self {
        let mut world = Self {
            entities: Vec::with_capacity(3),
            player: EntityId(0),
            opponent: EntityId(0),
            floor: EntityId(0),
            brain: OpponentBrain::new(behavior),
        };

        world.player = world.spawn(Role::Player, player_spawn);
        world.opponent = world.spawn(Role::Opponent, opponent_spawn);
        world.floor = world.spawn(Role::Terrain, FLOOR_POSITION);
        world.get_mut(world.floor).radius = ARENA_RADIUS;

        world.set_target(world.player, Some(world.opponent));
        world.set_target(world.opponent, Some(world.player));
        world.set_position(world.player, player_spawn);
        world.set_position(world.opponent, opponent_spawn);
        world
    }

    /// Append an entity; ids are assigned in spawn order
    pub fn spawn(&mut self, role: Role, position: Vec3) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(Entity::new(id, role, position));
        id
    }

    #[inline]
    pub fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.index()]
    }

    #[inline]
    pub fn player_id(&self) -> EntityId {
        self.player
    }

    #[inline]
    pub fn opponent_id(&self) -> EntityId {
        self.opponent
    }

    #[inline]
    pub fn floor_id(&self) -> EntityId {
        self.floor
    }

    #[inline]
    pub fn player(&self) -> &Entity {
        self.get(self.player)
    }

    #[inline]
    pub fn opponent(&self) -> &Entity {
        self.get(self.opponent)
    }

    /// All entities in id order (render traversal order)
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[inline]
    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Current position of `id`'s target, if it has one
    pub fn target_position(&self, id: EntityId) -> Option<Vec3> {
        self.get(id).target().map(|t| self.get(t).position())
    }

    /// Move an entity and refresh its facing
    pub fn set_position(&mut self, id: EntityId, position: Vec3) {
        let target = self.target_position(id);
        self.get_mut(id).place(position, target);
    }

    #[inline]
    pub fn set_velocity(&mut self, id: EntityId, velocity: Vec3) {
        self.get_mut(id).set_velocity(velocity);
    }

    #[inline]
    pub fn set_target(&mut self, id: EntityId, target: Option<EntityId>) {
        self.get_mut(id).set_target(target);
    }

    /// Put both combatants back on their spawns with a fresh opponent tier
    pub fn reset_round(&mut self, player_spawn: Vec3, opponent_spawn: Vec3, behavior: Behavior) {
        self.set_velocity(self.player, Vec3::ZERO);
        self.set_velocity(self.opponent, Vec3::ZERO);
        self.set_position(self.player, player_spawn);
        self.set_position(self.opponent, opponent_spawn);
        self.brain = OpponentBrain::new(behavior);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_layout() {
        let world = World::default();
        assert_eq!(world.entities().len(), 3);
        assert_eq!(world.player().role, Role::Player);
        assert_eq!(world.opponent().role, Role::Opponent);
        assert_eq!(world.get(world.floor_id()).role, Role::Terrain);
        assert_eq!(world.get(world.floor_id()).target(), None);
        assert_eq!(world.player().target(), Some(world.opponent_id()));
        assert_eq!(world.opponent().target(), Some(world.player_id()));
        assert_eq!(world.player().position(), PLAYER_SPAWN);
        assert_eq!(world.opponent().position(), OPPONENT_SPAWN);
    }

    #[test]
    fn test_spawned_combatants_face_each_other() {
        let world = World::default();
        assert!(world.player().facing().abs() < 1e-6);
        assert!((world.opponent().facing() - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_vertical_move_keeps_facing() {
        let mut world = World::default();
        let id = world.player_id();
        world.set_position(id, Vec3::new(-1.0, 0.5, 2.0));
        let before = world.player().facing();
        world.set_position(id, Vec3::new(-1.0, 9.0, 2.0));
        assert!((world.player().facing() - before).abs() < 1e-6);
    }

    #[test]
    fn test_reset_round_restores_spawns() {
        let mut world = World::default();
        let (p, o) = (world.player_id(), world.opponent_id());
        world.set_position(p, Vec3::new(5.0, 0.5, 5.0));
        world.set_velocity(p, Vec3::X);
        world.set_position(o, Vec3::new(-8.0, 0.5, 1.0));
        world.reset_round(PLAYER_SPAWN, OPPONENT_SPAWN, Behavior::Angry);
        assert_eq!(world.player().position(), PLAYER_SPAWN);
        assert_eq!(world.player().velocity(), Vec3::ZERO);
        assert_eq!(world.opponent().position(), OPPONENT_SPAWN);
        assert_eq!(world.brain.behavior, Behavior::Angry);
    }
}
